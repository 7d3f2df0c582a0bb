/// Mixes a key into a pseudo-random start position for probing.
///
/// All arithmetic wraps, so the function is defined for every `i32`. The
/// output is bit-for-bit identical to the classic 32-bit
/// multiply/shift-xor mixer, so indices derived from it stay stable.
///
/// # Examples
///
/// ```rust
/// use lin_hash::hash::hash_int;
///
/// assert_eq!(hash_int(0), hash_int(0));
/// assert_ne!(hash_int(1), hash_int(2));
/// // Extremes are fine too.
/// let _ = hash_int(i32::MIN);
/// let _ = hash_int(i32::MAX);
/// ```
#[inline(always)]
pub const fn hash_int(key: i32) -> i32 {
    const MULTIPLIER: i32 = 357913941;

    let mut k = key.wrapping_mul(MULTIPLIER);
    k ^= k << 24;
    k = k.wrapping_add(!MULTIPLIER);
    k ^= k >> 31;
    k ^= k << 31;
    k
}

/// A deterministic mixing function from an `i32` key to an `i32` hash.
///
/// [`IntTable`](crate::IntTable) masks the low bits of the result to pick
/// the first slot of a probe sequence, so implementations must spread
/// entropy into those bits. Implementations must be pure: the same key
/// always hashes to the same value for the lifetime of a table.
pub trait IntHasher {
    /// Hash `key`.
    fn hash(&self, key: i32) -> i32;
}

/// The default hasher, delegating to [`hash_int`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftMix;

impl IntHasher for ShiftMix {
    #[inline(always)]
    fn hash(&self, key: i32) -> i32 {
        hash_int(key)
    }
}

/// A hasher built on foldhash's fixed-seed fast hasher.
///
/// Useful when the key distribution defeats [`ShiftMix`]; the output is
/// deterministic for a given seed but is not compatible with [`hash_int`].
///
/// # Examples
///
/// ```rust
/// use lin_hash::IntTable;
/// use lin_hash::hash::FoldMix;
///
/// let mut table = IntTable::with_hasher(FoldMix::with_seed(7));
/// table.set(3, 30);
/// assert_eq!(table.get(3), Some(&30));
/// ```
#[cfg(feature = "foldhash")]
#[derive(Clone)]
pub struct FoldMix {
    state: foldhash::fast::FixedState,
}

#[cfg(feature = "foldhash")]
impl FoldMix {
    /// Creates a hasher with the given fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: foldhash::fast::FixedState::with_seed(seed),
        }
    }
}

#[cfg(feature = "foldhash")]
impl core::fmt::Debug for FoldMix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FoldMix").finish_non_exhaustive()
    }
}

#[cfg(feature = "foldhash")]
impl Default for FoldMix {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

#[cfg(feature = "foldhash")]
impl IntHasher for FoldMix {
    #[inline]
    fn hash(&self, key: i32) -> i32 {
        use core::hash::BuildHasher;

        let wide = self.state.hash_one(key);
        (wide ^ (wide >> 32)) as i32
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn matches_reference_values() {
        assert_eq!(hash_int(0), -1789569707);
        assert_eq!(hash_int(1), -1426063361);
        assert_eq!(hash_int(2), 1800754516);
        assert_eq!(hash_int(-1), -1403693739);
        assert_eq!(hash_int(500), -425022639);
    }

    #[test]
    fn total_over_extremes() {
        assert_eq!(hash_int(i32::MAX), 1403693738);
        assert_eq!(hash_int(i32::MIN), 1789569706);
    }

    #[test]
    fn deterministic() {
        let mut rng = SmallRng::seed_from_u64(213);
        for _ in 0..1000 {
            let key: i32 = rng.random();
            assert_eq!(hash_int(key), hash_int(key));
            assert_eq!(ShiftMix.hash(key), hash_int(key));
        }
    }

    #[test]
    fn usable_in_const_context() {
        const H: i32 = hash_int(42);
        assert_eq!(H, hash_int(42));
    }

    #[test]
    fn spreads_sequential_keys() {
        let mut seen = alloc::vec![false; 4096];
        let mut distinct = 0;
        for key in 0..1000 {
            let index = (hash_int(key) as u32 as usize) & 0xfff;
            if !seen[index] {
                seen[index] = true;
                distinct += 1;
            }
        }
        assert_eq!(distinct, 1000);
    }

    #[cfg(feature = "foldhash")]
    #[test]
    fn foldmix_is_seed_deterministic() {
        let a = FoldMix::with_seed(1);
        let b = FoldMix::with_seed(1);
        for key in -500..500 {
            assert_eq!(a.hash(key), b.hash(key));
        }
    }
}
