use std::time::Instant;

use clap::Parser;
use lin_hash::IntTable;
use lin_hash::hash::hash_int;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "count", default_value_t = 10_000_000)]
    count: i32,

    #[arg(short = 's', long = "seed", default_value_t = 213)]
    seed: u64,

    #[arg(short = 'c', long = "capacity", default_value_t = 4096)]
    capacity: usize,
}

fn millis(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn main() {
    let args = Args::parse();
    let count = args.count.max(1);

    let mut table = IntTable::with_capacity(args.capacity);
    println!(
        "Created table with {} slots (mask {:#x})",
        table.capacity(),
        table.mask()
    );

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let mut some_nums: Vec<i32> = (0..count).map(|_| rng.random_range(0..count)).collect();

    println!("starting benchmark...");

    let start = Instant::now();
    for num in some_nums.iter_mut() {
        *num = hash_int(*num);
    }
    std::hint::black_box(&some_nums);
    println!("took {:.2}ms to hash {} nums", millis(start), count);

    let start = Instant::now();
    let mut total_collisions = 0usize;
    for key in 0..count {
        total_collisions += table.set(key, key);
    }
    println!("took {:.2}ms for {} insertions", millis(start), count);

    println!("total collisions: {}", total_collisions);
    println!("table size: {}", table.len());

    for key in 0..count {
        assert_eq!(table.get(key), Some(&key), "lost key {}", key);
    }

    let probe = 100.min(count - 1);
    assert!(table.get(probe).is_some());
    assert!(table.unset(probe));
    assert!(!table.unset(probe));
    assert!(table.get(probe).is_none());

    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );
    table.debug_stats().print();
    table.print_probe_histogram();
}
