//! Multi-producer example
//!
//! Several threads share one logger; a small ring shows the overflow policy.
//!
//! Run with: cargo run --example multi_producer

use rust_ring_logger::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

fn main() -> Result<()> {
    println!("=== Rust Ring Logger - Multi Producer Example ===\n");

    let alerts = Arc::new(AtomicU64::new(0));
    let alerts_clone = Arc::clone(&alerts);
    let sink = MemorySink::new();

    let logger = Arc::new(
        Logger::builder()
            .capacity_log2(4)
            .overflow_policy(OverflowPolicy::DropNewest)
            .on_overflow(Arc::new(move |count| {
                alerts_clone.store(count, Ordering::Relaxed);
            }))
            .sink(sink.clone())
            .build()?,
    );

    let handles: Vec<_> = (0..4)
        .map(|id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || -> Result<()> {
                for seq in 0..500 {
                    logger.write("worker %d step %d\n", &[Arg::Int(id), Arg::Int(seq)])?;
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => eprintln!("worker panicked"),
        }
    }
    logger.close();

    let metrics = logger.metrics();
    println!("Written:      {}", sink.len());
    println!("Dropped:      {}", metrics.dropped_count());
    println!("Drop rate:    {:.2}%", metrics.drop_rate());
    println!("Last alert:   {}", alerts.load(Ordering::Relaxed));
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
