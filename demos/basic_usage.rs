//! Basic logger usage example
//!
//! Demonstrates console output, typed arguments and the record builder.
//!
//! Run with: cargo run --example basic_usage

use rust_ring_logger::log_write;
use rust_ring_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Ring Logger - Basic Usage Example ===\n");

    let logger = Logger::builder().sink(ConsoleSink::new()).build()?;

    println!("1. Writing with an argument slice:");
    logger.write("x=%\n", &[Arg::Int(5)])?;
    logger.write("%d-%s\n", &[Arg::Int(42), Arg::CString("ok")])?;
    logger.flush()?;

    println!("\n2. Writing with the log_write! macro:");
    let port: u16 = 8080;
    log_write!(logger, "listening on port %u\n", port)?;
    log_write!(logger, "ratio %lf, flag byte %02X\n", 0.75f64, 0x1fu8)?;
    logger.flush()?;

    println!("\n3. Building a record argument by argument:");
    logger
        .record("user %s from %d.%d.%d.%d\n")
        .str("alice")
        .int(192)
        .int(168)
        .int(0)
        .int(7)
        .commit()?;
    logger.flush()?;

    println!("\n4. Contract errors are returned to the caller:");
    if let Err(e) = logger.write("%s\n", &[Arg::Int(1)]) {
        println!("   rejected: {}", e);
    }

    logger.close();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
