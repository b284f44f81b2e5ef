//! Overflow policies for the slot ring
//!
//! When every slot is still waiting for the consumer, these policies
//! determine what a producer does with its record. Each logger runs with
//! exactly one policy, chosen at construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for handling a saturated slot ring
///
/// # Example
///
/// ```
/// use rust_ring_logger::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: drop the new record and count it
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::DropNewest);
///
/// // Block with timeout
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OverflowPolicy {
    /// Drop the record being written when no slot is free
    ///
    /// The producer never waits. Drops are counted in the metrics and
    /// reported through the overflow callback.
    #[default]
    DropNewest,

    /// Wait until the consumer frees the slot
    ///
    /// Warning: latency is unbounded under sustained overload. The wait
    /// gives up only if the logger stops.
    Block,

    /// Wait for a free slot, then drop once the timeout expires
    BlockWithTimeout(Duration),
}

impl OverflowPolicy {
    /// True if a producer may wait on this policy
    pub fn may_block(&self) -> bool {
        !matches!(self, OverflowPolicy::DropNewest)
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
        }
    }
}

/// What to do with a text argument longer than its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArgumentOverflow {
    /// Keep the first `max_argument_size` bytes
    #[default]
    Truncate,
    /// Reject the whole record with `ArgumentTooLarge`
    Reject,
}

impl fmt::Display for ArgumentOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentOverflow::Truncate => write!(f, "Truncate"),
            ArgumentOverflow::Reject => write!(f, "Reject"),
        }
    }
}

/// Callback type for overflow notifications
///
/// Called when records are dropped because the ring is full.
/// The parameter is the total count of dropped records so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_default() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::DropNewest);
        assert_eq!(ArgumentOverflow::default(), ArgumentOverflow::Truncate);
    }

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(OverflowPolicy::DropNewest.to_string(), "DropNewest");
        assert_eq!(OverflowPolicy::Block.to_string(), "Block");
        assert_eq!(
            OverflowPolicy::BlockWithTimeout(Duration::from_millis(100)).to_string(),
            "BlockWithTimeout(100ms)"
        );
        assert_eq!(ArgumentOverflow::Reject.to_string(), "Reject");
    }

    #[test]
    fn test_may_block() {
        assert!(!OverflowPolicy::DropNewest.may_block());
        assert!(OverflowPolicy::Block.may_block());
        assert!(OverflowPolicy::BlockWithTimeout(Duration::ZERO).may_block());
    }
}
