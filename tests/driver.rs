use std::collections::HashMap;

use lin_hash::IntHasher;
use lin_hash::IntTable;
use lin_hash::hash::ShiftMix;
use lin_hash::hash::hash_int;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[test]
fn end_to_end_scenario() {
    let mut table = IntTable::new();
    assert_eq!(table.capacity(), 4096);
    assert_eq!(table.mask(), 0xfff);

    for key in 0..1000 {
        table.set(key, key);
    }

    assert_eq!(table.get(500), Some(&500));
    assert!(table.unset(500));
    assert_eq!(table.get(500), None);
    assert_eq!(table.get(501), Some(&501));
}

#[test]
#[cfg_attr(miri, ignore)]
fn benchmark_driver_flow() {
    const MAX: i32 = 200_000;

    let mut rng = SmallRng::seed_from_u64(213);
    let hashed: Vec<i32> = (0..MAX)
        .map(|_| hash_int(rng.random_range(0..MAX)))
        .collect();
    assert_eq!(hashed.len(), MAX as usize);

    let mut table = IntTable::new();
    let mut total_collisions = 0usize;
    for key in 0..MAX {
        total_collisions += table.set(key, key);
    }
    assert_eq!(table.len(), MAX as usize);
    assert!(table.len() * 2 <= table.capacity());
    // Same keys, same hash, same growth schedule: the count is reproducible.
    let mut again = IntTable::new();
    let repeat: usize = (0..MAX).map(|key| again.set(key, key)).sum();
    assert_eq!(total_collisions, repeat);

    for key in 0..MAX {
        assert_eq!(table.get(key), Some(&key));
    }

    assert!(table.get(100).is_some());
    assert!(table.unset(100));
    assert!(!table.unset(100));
    assert!(table.get(100).is_none());
    assert_eq!(table.len(), MAX as usize - 1);
}

#[test]
fn repeated_sequences_are_deterministic() {
    let mut rng = SmallRng::seed_from_u64(42);
    let keys: Vec<i32> = (0..20_000).map(|_| rng.random()).collect();

    let run = || {
        let mut table = IntTable::new();
        let collisions: Vec<usize> = keys.iter().map(|&k| table.set(k, k / 2)).collect();
        (collisions, table.capacity(), table.len())
    };

    assert_eq!(run(), run());
}

#[test]
fn matches_std_hashmap_under_random_ops() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut table = IntTable::with_capacity(0);
    let mut model: HashMap<i32, i32> = HashMap::new();

    for step in 0..200_000 {
        let key = rng.random_range(-2_000..2_000);
        match rng.random_range(0..10) {
            0..=4 => {
                let value: i32 = rng.random();
                table.set(key, value);
                model.insert(key, value);
            }
            5..=7 => {
                assert_eq!(table.unset(key), model.remove(&key).is_some(), "step {step}");
            }
            _ => {
                assert_eq!(table.get(key), model.get(&key), "step {step}");
            }
        }
        assert_eq!(table.len(), model.len(), "step {step}");
    }

    for (key, value) in &model {
        assert_eq!(table.get(*key), Some(value));
    }
    for key in -2_000..2_000 {
        assert_eq!(table.contains_key(key), model.contains_key(&key));
    }
}

/// Clears the low byte, so start slots fall on multiples of 256.
struct Clustered;

impl IntHasher for Clustered {
    fn hash(&self, key: i32) -> i32 {
        ShiftMix.hash(key) & !0xff
    }
}

#[test]
fn heavy_clustering_stays_correct() {
    let mut table = IntTable::with_capacity_and_hasher(0, Clustered);
    for key in 0..5_000 {
        table.set(key, key);
    }
    for key in (0..5_000).filter(|k| k % 3 == 0) {
        assert!(table.unset(key));
    }
    for key in 0..5_000 {
        let expected = if key % 3 == 0 { None } else { Some(&key) };
        assert_eq!(table.get(key), expected);
    }
    assert_eq!(table.len(), 5_000 - 1_667);
}

#[test]
fn try_set_reports_success() {
    let mut table = IntTable::with_capacity(8);
    for key in 0..1_000 {
        assert!(table.try_set(key, key).is_ok());
    }
    assert_eq!(table.len(), 1_000);
}
