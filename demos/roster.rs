//! Load a generated student roster and report how it spreads over buckets.
//!
//! Run with `RUST_LOG=digit_store=trace` to see every mutation.

use digit_store::{Store, StoreConfig, Student};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const COHORTS: usize = 200;
const PER_TRACK: usize = 75;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = StdRng::seed_from_u64(98);
    let store = Store::with_config(StoreConfig {
        capacity: 1000,
        ..StoreConfig::default()
    })
    .expect("non-zero capacity");

    load_roster(&store, &mut rng);
    print_load(&store);
    walk_through(&store);
}

/// Ids are `91` + random 4-digit cohort + track digit + 3-digit serial.
fn load_roster(store: &Store<Student>, rng: &mut StdRng) {
    for c in 0..COHORTS {
        let cohort = format!("{:04}", rng.gen_range(0..9999));
        for serial in 0..PER_TRACK {
            for track in 0..2 {
                let id = format!("91{cohort}{track}{serial:03}");
                let gpa = rng.gen_range(10.0..20.0);
                let name = format!("student number {}", (c + 1) * (serial + 1));
                if let Err(err) = store.set(Student::new(name, id, gpa, "CE")) {
                    eprintln!("skipping record: {err}");
                }
            }
        }
    }
}

fn print_load(store: &Store<Student>) {
    let stats = store.load_stats();
    println!("=== Bucket distribution ===\n");
    println!("Records:        {}", store.len());
    println!("Capacity:       {}", store.capacity());
    println!("Load factor:    {:.2}", stats.mean);
    println!("Chain range:    {} - {}", stats.min, stats.max);
    println!("Std deviation:  {:.2}", stats.std_dev);
    println!("Empty buckets:  {}\n", stats.empty_buckets);
}

fn walk_through(store: &Store<Student>) {
    println!("=== Operations ===\n");

    let Some(first) = store.all_keys().into_iter().next() else {
        println!("roster is empty");
        return;
    };
    if let Some(st) = store.get(&first) {
        println!("{st}\n");
    }

    let cohort = &first[..6];
    println!("Ids in cohort {cohort}: {}", store.keys_with_prefix(cohort).len());

    println!("Deleting {first}: {}", store.delete(&first));
    println!("Deleting {first} again: {}", store.delete(&first));
    println!("Ids in cohort {cohort}: {}", store.keys_with_prefix(cohort).len());

    match store.check_consistency() {
        Ok(()) => println!("Index consistent, {} records", store.len()),
        Err(err) => println!("Index broken: {err}"),
    }
}
