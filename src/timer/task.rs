//! Timer record model.

use std::cmp::{Eq, Ord, Ordering, PartialEq, PartialOrd};
use std::fmt;

/// Absolute due time, counted in `DEADLINE_TICK` units elapsed since the
/// owning manager started.
pub type Deadline = u64;

/// Deferred work carried by a record. Owned exclusively by the record until
/// it fires; ownership moves to the worker at pop time.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// One deferred work item of the pending set.
pub struct TimerRecord {
    /// Insertion stamp from the manager's monotonic counter. Never reused.
    pub(crate) sequence_id: u64,

    /// deadline.
    pub(crate) deadline: Deadline,

    /// The deferred work itself.
    pub(crate) callback: TimerCallback,
}

impl TimerRecord {
    pub(crate) fn new(sequence_id: u64, deadline: Deadline, callback: TimerCallback) -> Self {
        TimerRecord {
            sequence_id,
            deadline,
            callback,
        }
    }

    /// Absolute due time of this record, in ticks.
    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Insertion stamp of this record.
    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }
}

// Heap order is deadline-first. The sequence stamp only gives the order its
// totality; records sharing a deadline carry no firing-order contract.
impl Ord for TimerRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then_with(|| self.sequence_id.cmp(&other.sequence_id))
    }
}

impl PartialOrd for TimerRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TimerRecord {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.sequence_id == other.sequence_id
    }
}

impl Eq for TimerRecord {}

impl fmt::Debug for TimerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRecord")
            .field("sequence_id", &self.sequence_id)
            .field("deadline", &self.deadline)
            .finish()
    }
}
