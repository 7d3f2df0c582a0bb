use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt::Debug;

use crate::error::AllocError;
use crate::error::alloc_failure;
use crate::hash::IntHasher;
use crate::hash::ShiftMix;

/// Number of slots allocated by [`IntTable::new`].
pub const DEFAULT_CAPACITY: usize = 4096;

/// Smallest slot count a table is ever built with.
///
/// A single doubling must bring the load back to half or below, which only
/// holds once there are at least a couple of slots.
pub const MIN_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Slot {
    #[default]
    Empty,
    /// Previously occupied. Probes walk over it; insertions may reuse it.
    Tombstone,
    Occupied {
        key: i32,
        value: i32,
    },
}

fn allocate_slots(len: usize) -> Result<Vec<Slot>, AllocError> {
    let layout = Layout::array::<Slot>(len).map_err(|_| AllocError::CapacityOverflow)?;

    let mut slots = Vec::new();
    slots
        .try_reserve_exact(len)
        .map_err(|_| AllocError::AllocFailed { layout })?;
    slots.resize(len, Slot::Empty);
    Ok(slots)
}

fn slot_count(capacity: usize) -> Result<usize, AllocError> {
    capacity
        .max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .ok_or(AllocError::CapacityOverflow)
}

/// Debug statistics for table analysis.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of key-value pairs currently stored
    pub populated: usize,
    /// Number of tombstoned slots awaiting a rebuild
    pub tombstones: usize,
    /// Total number of slots allocated
    pub total_slots: usize,
    /// Load factor (populated / total_slots)
    pub load_factor: f64,
    /// Load factor counting tombstones as used
    pub used_factor: f64,
    /// Longest distance of any entry from its start index
    pub max_probe: usize,
    /// Mean distance of entries from their start index
    pub mean_probe: f64,
    /// Total memory in bytes used by the slot array
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Int Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.total_slots,
            self.load_factor * 100.0
        );
        println!(
            "Tombstones: {} ({:.2}% of slots in use)",
            self.tombstones,
            self.used_factor * 100.0
        );
        println!(
            "Probe length: max {}, mean {:.3}",
            self.max_probe, self.mean_probe
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// An open-addressing hash table from `i32` keys to `i32` values.
///
/// Collisions are resolved by linear probing over a power-of-two slot array.
/// Removed entries leave tombstones so that lookups for other keys keep
/// walking past them; tombstones are discarded whenever the array is
/// rebuilt. The table doubles once more than half of its slots hold live
/// entries and never shrinks.
///
/// References returned by [`get`](Self::get) borrow the table, so they
/// cannot outlive the next mutating call such as [`set`](Self::set), which
/// may move every entry into a new array.
///
/// ## Example
///
/// ```rust
/// use lin_hash::IntTable;
///
/// let mut table = IntTable::new();
/// assert_eq!(table.set(7, 49), 0);
/// assert_eq!(table.get(7), Some(&49));
///
/// assert!(table.unset(7));
/// assert_eq!(table.get(7), None);
/// assert!(!table.unset(7));
/// ```
#[derive(Clone)]
pub struct IntTable<H = ShiftMix> {
    slots: Vec<Slot>,
    mask: usize,

    populated: usize,
    tombstones: usize,

    hasher: H,
}

impl<H> Debug for IntTable<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::string::String;

        f.debug_struct("IntTable")
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.capacity())
            .field(
                "slots",
                &self
                    .slots
                    .chunks(64)
                    .map(|row| {
                        row.iter()
                            .map(|slot| match slot {
                                Slot::Empty => '.',
                                Slot::Tombstone => 'x',
                                Slot::Occupied { .. } => '#',
                            })
                            .collect::<String>()
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for IntTable<ShiftMix> {
    fn default() -> Self {
        Self::new()
    }
}

impl IntTable<ShiftMix> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lin_hash::IntTable;
    ///
    /// let table = IntTable::new();
    /// assert_eq!(table.capacity(), 4096);
    /// assert_eq!(table.mask(), 0xfff);
    /// assert!(table.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty table with room for at least `capacity` slots.
    ///
    /// The slot count is rounded up to a power of two and to at least
    /// [`MIN_CAPACITY`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lin_hash::IntTable;
    ///
    /// let table = IntTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 128);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, ShiftMix)
    }
}

impl<H> IntTable<H>
where
    H: IntHasher,
{
    /// Creates an empty table with [`DEFAULT_CAPACITY`] slots using `hasher`
    /// to pick start indices.
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    /// Creates an empty table with room for at least `capacity` slots using
    /// `hasher` to pick start indices.
    ///
    /// # Panics
    ///
    /// Panics if the slot count overflows; aborts through
    /// [`handle_alloc_error`](alloc::alloc::handle_alloc_error) if the
    /// allocator fails.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        match Self::try_with_capacity_and_hasher(capacity, hasher) {
            Ok(table) => table,
            Err(err) => alloc_failure(err),
        }
    }

    /// Fallible version of [`with_capacity_and_hasher`](Self::with_capacity_and_hasher).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lin_hash::AllocError;
    /// use lin_hash::IntTable;
    /// use lin_hash::hash::ShiftMix;
    ///
    /// let table = IntTable::try_with_capacity_and_hasher(16, ShiftMix).unwrap();
    /// assert_eq!(table.capacity(), 16);
    ///
    /// let err = IntTable::try_with_capacity_and_hasher(usize::MAX, ShiftMix).unwrap_err();
    /// assert_eq!(err, AllocError::CapacityOverflow);
    /// ```
    pub fn try_with_capacity_and_hasher(capacity: usize, hasher: H) -> Result<Self, AllocError> {
        let len = slot_count(capacity)?;
        let slots = allocate_slots(len)?;

        Ok(Self {
            slots,
            mask: len - 1,
            populated: 0,
            tombstones: 0,
            hasher,
        })
    }

    /// Returns the hasher used to pick start indices.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    #[inline(always)]
    fn start_index(&self, key: i32) -> usize {
        (self.hasher.hash(key) as u32 as usize) & self.mask
    }

    /// Slots in probe order for `key`: from its start index to the end of
    /// the array, then wrapping around to the slot before the start.
    #[inline]
    fn probe_order(&self, key: i32) -> impl Iterator<Item = (usize, &Slot)> + '_ {
        let start = self.start_index(key);
        let (head, tail) = self.slots.split_at(start);
        (start..).zip(tail).chain((0..).zip(head))
    }

    /// Index and value of the occupied slot holding `key`, if any.
    #[inline]
    fn find(&self, key: i32) -> Option<(usize, &i32)> {
        for (index, slot) in self.probe_order(key) {
            match slot {
                Slot::Empty => return None,
                Slot::Occupied { key: k, value } if *k == key => return Some((index, value)),
                Slot::Occupied { .. } | Slot::Tombstone => {}
            }
        }
        None
    }

    /// Sets `key` to `value`, overwriting any previous value.
    ///
    /// Returns the number of occupied slots holding other keys that the probe
    /// walked over. The count is a diagnostic only: it is `0` for a key whose
    /// start slot was free.
    ///
    /// When the insertion leaves more than half of the slots live, the table
    /// doubles before returning.
    ///
    /// # Panics
    ///
    /// Growth failures are fatal, see
    /// [`with_capacity_and_hasher`](Self::with_capacity_and_hasher). Use
    /// [`try_set`](Self::try_set) to observe them instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lin_hash::IntTable;
    ///
    /// let mut table = IntTable::new();
    /// table.set(1, 10);
    /// table.set(1, 11);
    /// assert_eq!(table.len(), 1);
    /// assert_eq!(table.get(1), Some(&11));
    /// ```
    #[inline]
    pub fn set(&mut self, key: i32, value: i32) -> usize {
        match self.try_set(key, value) {
            Ok(collisions) => collisions,
            Err(err) => alloc_failure(err),
        }
    }

    /// Fallible version of [`set`](Self::set).
    ///
    /// If the rebuild that follows an insertion cannot allocate, the pair is
    /// still stored, the error is returned, and the rebuild is retried by the
    /// next call.
    pub fn try_set(&mut self, key: i32, value: i32) -> Result<usize, AllocError> {
        // A previous rebuild may have failed; the array must keep an empty
        // slot for the probe below to terminate.
        if self.over_threshold() {
            self.rebuild()?;
        }

        let (collisions, inserted) = self.insert_slot(key, value);
        if inserted && self.over_threshold() {
            self.rebuild()?;
        }

        Ok(collisions)
    }

    /// Places `key` without checking the load. Returns the collision count
    /// and whether a new pair was added.
    #[inline]
    fn insert_slot(&mut self, key: i32, value: i32) -> (usize, bool) {
        let mut index = self.start_index(key);
        let mut collisions = 0;
        let mut reusable = None;

        loop {
            match &mut self.slots[index] {
                Slot::Empty => break,
                Slot::Tombstone => {
                    reusable.get_or_insert(index);
                }
                Slot::Occupied { key: k, value: v } => {
                    if *k == key {
                        *v = value;
                        return (collisions, false);
                    }
                    collisions += 1;
                }
            }
            index = (index + 1) & self.mask;
        }

        let target = match reusable {
            Some(tombstone) => {
                self.tombstones -= 1;
                tombstone
            }
            None => index,
        };
        self.slots[target] = Slot::Occupied { key, value };
        self.populated += 1;

        (collisions, true)
    }

    #[inline(always)]
    fn over_threshold(&self) -> bool {
        (self.populated + self.tombstones) * 2 > self.mask
    }

    /// Doubles the array when live entries pass half of it, otherwise
    /// rebuilds at the same size to clear tombstones.
    #[cold]
    fn rebuild(&mut self) -> Result<(), AllocError> {
        let mask = if self.populated * 2 > self.mask {
            (self.mask << 1) | 1
        } else {
            self.mask
        };
        self.rehash(mask)
    }

    fn rehash(&mut self, mask: usize) -> Result<(), AllocError> {
        let len = mask.checked_add(1).ok_or(AllocError::CapacityOverflow)?;
        let fresh = allocate_slots(len)?;

        let old = core::mem::replace(&mut self.slots, fresh);
        self.mask = mask;
        self.populated = 0;
        self.tombstones = 0;

        for slot in old {
            if let Slot::Occupied { key, value } = slot {
                self.insert_slot(key, value);
            }
        }

        Ok(())
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lin_hash::IntTable;
    ///
    /// let mut table = IntTable::new();
    /// table.set(42, 4200);
    ///
    /// assert_eq!(table.get(42), Some(&4200));
    /// assert_eq!(table.get(99), None);
    /// ```
    #[inline]
    pub fn get(&self, key: i32) -> Option<&i32> {
        self.find(key).map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lin_hash::IntTable;
    ///
    /// let mut table = IntTable::new();
    /// table.set(5, 1);
    /// if let Some(value) = table.get_mut(5) {
    ///     *value += 9;
    /// }
    /// assert_eq!(table.get(5), Some(&10));
    /// ```
    #[inline]
    pub fn get_mut(&mut self, key: i32) -> Option<&mut i32> {
        let start = self.start_index(key);
        let (head, tail) = self.slots.split_at_mut(start);
        for slot in tail.iter_mut().chain(head) {
            match slot {
                Slot::Empty => return None,
                Slot::Occupied { key: k, value } if *k == key => return Some(value),
                Slot::Occupied { .. } | Slot::Tombstone => {}
            }
        }
        None
    }

    /// Returns `true` if the table holds a value for `key`.
    #[inline]
    pub fn contains_key(&self, key: i32) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key` from the table, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lin_hash::IntTable;
    ///
    /// let mut table = IntTable::new();
    /// table.set(3, 33);
    ///
    /// assert_eq!(table.remove(3), Some(33));
    /// assert_eq!(table.remove(3), None);
    /// assert!(table.is_empty());
    /// ```
    pub fn remove(&mut self, key: i32) -> Option<i32> {
        let (index, &value) = self.find(key)?;

        // No probe continues past an empty successor, so the slot can go
        // straight back to empty.
        if self.slots[(index + 1) & self.mask] == Slot::Empty {
            self.slots[index] = Slot::Empty;
        } else {
            self.slots[index] = Slot::Tombstone;
            self.tombstones += 1;
        }
        self.populated -= 1;

        Some(value)
    }

    /// Removes `key` from the table. Returns `true` if it was present.
    #[inline]
    pub fn unset(&mut self, key: i32) -> bool {
        self.remove(key).is_some()
    }
}

impl<H> IntTable<H> {
    /// Returns the number of key-value pairs in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots in the backing array.
    ///
    /// Always a power of two. The table doubles this once more than half of
    /// the slots hold live pairs.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slot index mask, `capacity() - 1`.
    pub fn mask(&self) -> usize {
        self.mask
    }

    /// Removes every pair, keeping the allocated slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lin_hash::IntTable;
    ///
    /// let mut table = IntTable::with_capacity(8);
    /// for key in 0..100 {
    ///     table.set(key, key);
    /// }
    /// let capacity = table.capacity();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.populated = 0;
        self.tombstones = 0;
    }
}

#[cfg(any(test, feature = "stats"))]
impl<H> IntTable<H>
where
    H: IntHasher,
{
    fn probe_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| match slot {
                Slot::Occupied { key, .. } => {
                    Some(index.wrapping_sub(self.start_index(*key)) & self.mask)
                }
                Slot::Empty | Slot::Tombstone => None,
            })
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// Available with the `stats` feature.
    ///
    /// The probe length of an entry is its distance from its start index,
    /// `hash(key) & mask`, walking forward with wrap-around. Index `n` of the
    /// returned vector counts the entries at distance `n`; the vector ends
    /// at the longest distance present and is empty for an empty table.
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();
        for distance in self.probe_lengths() {
            if hist.len() <= distance {
                hist.resize(distance + 1, 0);
            }
            hist[distance] += 1;
        }
        hist
    }

    /// Returns utilization and probe statistics for debugging.
    ///
    /// Available with the `stats` feature.
    pub fn debug_stats(&self) -> DebugStats {
        let total_slots = self.slots.len();
        let (max_probe, probe_sum) = self
            .probe_lengths()
            .fold((0, 0), |(max, sum), len| (max.max(len), sum + len));

        DebugStats {
            populated: self.populated,
            tombstones: self.tombstones,
            total_slots,
            load_factor: self.populated as f64 / total_slots as f64,
            used_factor: (self.populated + self.tombstones) as f64 / total_slots as f64,
            max_probe,
            mean_probe: if self.populated == 0 {
                0.0
            } else {
                probe_sum as f64 / self.populated as f64
            },
            total_bytes: total_slots * core::mem::size_of::<Slot>(),
        }
    }

    /// Pretty-prints the probe-length histogram horizontally using stdout.
    ///
    /// Requires the `stats` and `std` features. Each row is one probe
    /// length.
    #[cfg(feature = "std")]
    pub fn print_probe_histogram(&self) {
        let hist = self.probe_histogram();
        let max = *hist.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.populated);

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let rem = units % 8;
            if rem > 0 {
                bar.push(['▏', '▎', '▍', '▌', '▋', '▊', '▉'][rem - 1]);
            }
            bar
        };

        for (distance, &count) in hist.iter().enumerate() {
            println!("{:>3} | {} ({})", distance, make_bar(count), count);
        }
    }
}
