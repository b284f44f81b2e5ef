//! File logging example
//!
//! Demonstrates opening a log file, switching sinks and closing cleanly.
//!
//! Run with: cargo run --example file_logging

use rust_ring_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Ring Logger - File Logging Example ===\n");

    let config = LoggerConfig::from_json(
        r#"{
            "capacity_log2": 8,
            "overflow_policy": "Block",
            "timestamp_format": "Iso8601Micros"
        }"#,
    )?;
    let logger = Logger::new(config)?;
    logger.open("application.log")?;

    println!("1. Logging to 'application.log':");
    logger.write("Application started\n", &[])?;
    for i in 1..=5 {
        logger.write("Processing item %d/%d\n", &[Arg::Int(i), Arg::Int(5)])?;
    }

    println!("2. Switching to the console:");
    logger.set_sink(Box::new(ConsoleSink::new()))?;
    logger.write("now on stdout\n", &[])?;

    if !logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT) {
        eprintln!("Warning: Logger shutdown timed out");
    }

    let metrics = logger.metrics();
    println!("\nLogged: {}, dropped: {}", metrics.total_logged(), metrics.dropped_count());
    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the file output");

    Ok(())
}
