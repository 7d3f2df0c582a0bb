use core::alloc::Layout;
use core::fmt;

/// The error type for fallible table allocation.
///
/// Returned by [`IntTable::try_with_capacity_and_hasher`] and
/// [`IntTable::try_set`] when the backing slot array cannot be created.
///
/// [`IntTable::try_with_capacity_and_hasher`]: crate::IntTable::try_with_capacity_and_hasher
/// [`IntTable::try_set`]: crate::IntTable::try_set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// The requested slot count, or its size in bytes, does not fit in the
    /// address space.
    CapacityOverflow,
    /// The allocator refused to provide memory for `layout`.
    AllocFailed {
        /// Layout of the slot array that could not be allocated.
        layout: Layout,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow => write!(f, "slot array capacity overflow"),
            Self::AllocFailed { layout } => write!(
                f,
                "failed to allocate {} bytes (align {}) for the slot array",
                layout.size(),
                layout.align()
            ),
        }
    }
}

impl core::error::Error for AllocError {}

/// Treat an allocation failure as fatal, the way the infallible API does.
#[cold]
#[inline(never)]
pub(crate) fn alloc_failure(err: AllocError) -> ! {
    match err {
        AllocError::CapacityOverflow => panic!("capacity overflow"),
        AllocError::AllocFailed { layout } => alloc::alloc::handle_alloc_error(layout),
    }
}
