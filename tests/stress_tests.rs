//! Stress tests for concurrent producers
//!
//! These tests verify:
//! - Every record from many producers is written exactly once under `Block`
//! - Lines are never interleaved or cut
//! - Per-producer order is preserved
//! - Under `DropNewest` every record is either written or counted as dropped
//! - The sink keeps being flushed on its interval while producers never pause

use rust_ring_logger::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const PRODUCERS: usize = 4;
const PER_PRODUCER: usize = 1000;

fn spawn_producers(logger: &Arc<Logger>, payload: &'static str) -> Vec<thread::JoinHandle<()>> {
    (0..PRODUCERS)
        .map(|producer| {
            let logger = Arc::clone(logger);
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    logger
                        .write(
                            "producer=%d seq=%lu payload=%s\n",
                            &[
                                Arg::Int(producer as i32),
                                Arg::UnsignedLong(seq as u64),
                                Arg::CString(payload),
                            ],
                        )
                        .expect("Failed to write");
                }
            })
        })
        .collect()
}

/// Parse `producer=P seq=S payload=X`, rejecting anything else
fn parse_line(message: &str, payload: &str) -> Option<(usize, usize)> {
    let mut fields = message.split(' ');
    let producer = fields.next()?.strip_prefix("producer=")?.parse().ok()?;
    let seq = fields.next()?.strip_prefix("seq=")?.parse().ok()?;
    let rest = fields.next()?.strip_prefix("payload=")?;
    if rest != payload || fields.next().is_some() {
        return None;
    }
    Some((producer, seq))
}

#[test]
fn test_concurrent_writers_block_policy() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("stress.log");
    let payload = "abcdefghijklmnopqrstuvwxyz";

    // Small ring so producers regularly wait on the consumer
    let logger = Arc::new(
        Logger::builder()
            .capacity_log2(6)
            .poll_interval(Duration::from_millis(1))
            .overflow_policy(OverflowPolicy::Block)
            .build()
            .expect("Failed to build logger"),
    );
    logger.open(&log_file).expect("Failed to open log file");

    for handle in spawn_producers(&logger, payload) {
        handle.join().expect("producer panicked");
    }
    assert!(logger.shutdown(Duration::from_secs(10)));

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), PRODUCERS * PER_PRODUCER);

    let mut next_seq: HashMap<usize, usize> = HashMap::new();
    for line in lines {
        let (_, message) = line.split_once(' ').expect("timestamp prefix");
        let (producer, seq) =
            parse_line(message, payload).unwrap_or_else(|| panic!("malformed line: {:?}", line));
        let expected = next_seq.entry(producer).or_insert(0);
        assert_eq!(seq, *expected, "producer {} out of order", producer);
        *expected += 1;
    }

    assert_eq!(next_seq.len(), PRODUCERS);
    assert!(next_seq.values().all(|&count| count == PER_PRODUCER));
    assert_eq!(logger.dropped_count(), 0);
    assert_eq!(logger.metrics().total_logged(), (PRODUCERS * PER_PRODUCER) as u64);
}

#[test]
fn test_concurrent_writers_drop_policy_accounting() {
    let sink = MemorySink::new();
    let payload = "drop";
    let logger = Arc::new(
        Logger::builder()
            .capacity_log2(4)
            .poll_interval(Duration::from_millis(2))
            .overflow_policy(OverflowPolicy::DropNewest)
            .sink(sink.clone())
            .build()
            .expect("Failed to build logger"),
    );

    for handle in spawn_producers(&logger, payload) {
        handle.join().expect("producer panicked");
    }
    assert!(logger.shutdown(Duration::from_secs(10)));

    let messages = sink.messages();
    let dropped = logger.dropped_count() as usize;
    assert_eq!(messages.len() + dropped, PRODUCERS * PER_PRODUCER);
    assert!(messages
        .iter()
        .all(|message| parse_line(message, payload).is_some()));
}

#[test]
fn test_producers_racing_shutdown() {
    let sink = MemorySink::new();
    let logger = Arc::new(
        Logger::builder()
            .capacity_log2(5)
            .poll_interval(Duration::from_millis(1))
            .overflow_policy(OverflowPolicy::Block)
            .sink(sink.clone())
            .build()
            .expect("Failed to build logger"),
    );

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                let mut accepted = 0usize;
                for seq in 0..PER_PRODUCER {
                    match logger.write(
                        "producer=%d seq=%lu payload=%s\n",
                        &[
                            Arg::Int(producer as i32),
                            Arg::UnsignedLong(seq as u64),
                            Arg::CString("race"),
                        ],
                    ) {
                        Ok(()) => accepted += 1,
                        Err(LoggerError::LoggerStopped) => break,
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
                accepted
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(5));
    assert!(logger.shutdown(Duration::from_secs(10)));

    let accepted: usize = handles
        .into_iter()
        .map(|handle| handle.join().expect("producer panicked"))
        .sum();

    // Records accepted after the final drain began are forfeit, never torn
    let messages = sink.messages();
    assert!(messages.len() <= accepted);
    assert!(messages
        .iter()
        .all(|message| parse_line(message, "race").is_some()));
}

#[test]
fn test_periodic_flush_under_sustained_load() {
    let sink = MemorySink::new();
    let logger = Arc::new(
        Logger::builder()
            .capacity_log2(12)
            .poll_interval(Duration::from_millis(1))
            .flush_interval(Duration::from_millis(5))
            .max_arguments(2)
            .max_argument_size(16)
            .overflow_policy(OverflowPolicy::Block)
            .sink(sink.clone())
            .build()
            .expect("Failed to build logger"),
    );
    let running = Arc::new(AtomicBool::new(true));

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let logger = Arc::clone(&logger);
            let running = Arc::clone(&running);
            thread::spawn(move || {
                let mut seq = 0u64;
                while running.load(Ordering::Relaxed) {
                    logger
                        .write(
                            "producer=%d seq=%lu\n",
                            &[Arg::Int(producer as i32), Arg::UnsignedLong(seq)],
                        )
                        .expect("Failed to write");
                    seq += 1;
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(200));
    let flushes_under_load = sink.flush_count();
    running.store(false, Ordering::Relaxed);
    for handle in handles {
        handle.join().expect("producer panicked");
    }
    assert!(logger.shutdown(Duration::from_secs(10)));

    assert!(
        flushes_under_load >= 2,
        "only {} flushes in 200ms with a 5ms interval",
        flushes_under_load
    );
    assert!(!sink.is_empty());
}
