//! Prints the bucket view and the recency view of a small cache.
//!
//! ```text
//! cargo run --example print_cache
//! RUST_LOG=chainlru=trace cargo run --example print_cache
//! ```

use chainlru::ChainedLru;
use tracing_subscriber::EnvFilter;

fn print_buckets(cache: &ChainedLru<i32, i32>) {
    for (bucket, key, value) in cache.bucket_entries() {
        println!("bucket {bucket} | key {key} | value {value}");
    }
}

fn print_list(cache: &ChainedLru<i32, i32>) {
    for (index, (key, value)) in cache.iter().enumerate() {
        println!("list index {index} | key {key} | value {value}");
    }
}

fn main() -> Result<(), chainlru::CacheError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut cache: ChainedLru<i32, i32> = ChainedLru::try_new(4, 5)?;
    for key in [1, 5, 2, 9, 6] {
        cache.add(key, key * 10)?;
    }
    cache.search(1);
    cache.add(13, 130)?;
    cache.remove(6);

    println!("-- buckets --");
    print_buckets(&cache);
    println!("-- recency (MRU first) --");
    print_list(&cache);
    Ok(())
}
