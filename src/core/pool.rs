//! Fixed-capacity slot ring shared by producers and the consumer
//!
//! Each slot carries a sequence stamp that doubles as its readiness marker.
//! For the claim at cursor position `pos` (slot `pos & mask`):
//!
//! - `stamp == pos`: free, the next producer at `pos` may take it
//! - `stamp == pos + 1`: ready, holds a published record for the consumer
//! - release by the consumer stores `pos + capacity`, freeing it for the
//!   claim one lap later
//!
//! The producer cursor only moves on a successful claim, so a record that
//! is dropped because the ring is full never leaves a gap in the sequence.

use super::config::LoggerConfig;
use super::encoder::{RecordLimits, SlotRecord};
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

struct Slot {
    stamp: AtomicU64,
    record: UnsafeCell<SlotRecord>,
}

// SAFETY: the record is only reached through a `ClaimedSlot` or `ReadySlot`,
// and the stamp protocol hands each slot to at most one of them at a time.
unsafe impl Sync for Slot {}

/// Ring of `2^k` pre-allocated slots
pub struct SlotPool {
    slots: Box<[Slot]>,
    mask: u64,
    producer: CachePadded<AtomicU64>,
    consumer_taken: AtomicBool,
}

impl SlotPool {
    pub fn new(capacity_log2: u32, limits: RecordLimits) -> Self {
        let capacity = 1u64 << capacity_log2;
        let slots = (0..capacity)
            .map(|pos| Slot {
                stamp: AtomicU64::new(pos),
                record: UnsafeCell::new(SlotRecord::new(limits)),
            })
            .collect();
        Self {
            slots,
            mask: capacity - 1,
            producer: CachePadded::new(AtomicU64::new(0)),
            consumer_taken: AtomicBool::new(false),
        }
    }

    pub fn with_config(config: &LoggerConfig) -> Self {
        Self::new(config.capacity_log2, RecordLimits::from(config))
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of successful claims so far
    #[inline]
    pub fn producer_position(&self) -> u64 {
        self.producer.load(Ordering::Relaxed)
    }

    #[inline]
    fn slot(&self, position: u64) -> &Slot {
        &self.slots[(position & self.mask) as usize]
    }

    /// Reserve the slot at the producer cursor
    ///
    /// Returns `None` when that slot still holds the record from one lap
    /// earlier; the caller applies its overflow policy.
    pub fn try_claim(&self) -> Option<ClaimedSlot<'_>> {
        let mut position = self.producer.load(Ordering::Relaxed);
        loop {
            let slot = self.slot(position);
            let stamp = slot.stamp.load(Ordering::Acquire);
            let lag = stamp.wrapping_sub(position) as i64;

            if lag == 0 {
                match self.producer.compare_exchange_weak(
                    position,
                    position + 1,
                    Ordering::SeqCst,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        return Some(ClaimedSlot {
                            slot,
                            position,
                            published: false,
                        })
                    }
                    Err(current) => position = current,
                }
            } else if lag < 0 {
                // previous occupant not drained yet, unless the cursor moved on
                let current = self.producer.load(Ordering::Relaxed);
                if current == position {
                    return None;
                }
                position = current;
            } else {
                position = self.producer.load(Ordering::Relaxed);
            }
        }
    }

    /// True if the record claimed at `position` is published and not yet drained
    pub fn is_ready(&self, position: u64) -> bool {
        self.slot(position).stamp.load(Ordering::Acquire) == position + 1
    }

    /// The single consumer handle; `None` after the first call
    pub fn drain_cursor(self: &Arc<Self>) -> Option<DrainCursor> {
        if self.consumer_taken.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(DrainCursor {
            pool: Arc::clone(self),
            position: 0,
        })
    }
}

/// A slot reserved by a producer
///
/// Dropping it without [`publish`](ClaimedSlot::publish) publishes the slot
/// flagged as discarded, so the consumer skips it instead of stalling.
pub struct ClaimedSlot<'a> {
    slot: &'a Slot,
    position: u64,
    published: bool,
}

impl ClaimedSlot<'_> {
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    #[inline]
    pub fn record(&mut self) -> &mut SlotRecord {
        // SAFETY: stamp == position and the producer cursor moved past it,
        // so no other producer and not the consumer can reach this record.
        unsafe { &mut *self.slot.record.get() }
    }

    /// Mark the slot ready for the consumer
    pub fn publish(mut self) {
        self.release();
    }

    /// Publish the slot as discarded
    pub fn discard(mut self) {
        self.record().mark_discarded();
        self.release();
    }

    fn release(&mut self) {
        if !self.published {
            self.published = true;
            self.slot.stamp.store(self.position + 1, Ordering::Release);
        }
    }
}

impl Drop for ClaimedSlot<'_> {
    fn drop(&mut self) {
        if !self.published {
            self.record().mark_discarded();
            self.release();
        }
    }
}

/// Consumer-side cursor; exactly one exists per pool
pub struct DrainCursor {
    pool: Arc<SlotPool>,
    position: u64,
}

impl DrainCursor {
    /// Next ready slot in claim order, or `None` if it is not published yet
    pub fn poll(&mut self) -> Option<ReadySlot<'_>> {
        let slot = self.pool.slot(self.position);
        if slot.stamp.load(Ordering::Acquire) != self.position + 1 {
            return None;
        }
        let ready = ReadySlot {
            slot,
            release_stamp: self.position + self.pool.slots.len() as u64,
        };
        self.position += 1;
        Some(ready)
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn pool(&self) -> &SlotPool {
        &self.pool
    }
}

/// A published slot held by the consumer; released on drop
pub struct ReadySlot<'a> {
    slot: &'a Slot,
    release_stamp: u64,
}

impl ReadySlot<'_> {
    #[inline]
    pub fn record(&mut self) -> &mut SlotRecord {
        // SAFETY: stamp == position + 1, the producer has released the slot
        // and no producer can claim it until this guard stores the next lap.
        unsafe { &mut *self.slot.record.get() }
    }
}

impl Drop for ReadySlot<'_> {
    fn drop(&mut self) {
        self.slot.stamp.store(self.release_stamp, Ordering::Release);
    }
}
