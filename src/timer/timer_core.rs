//! The scheduling core.
//!
//! One exclusive lock guards the pending set, the sequence counter and the
//! wake flags; one condition variable is the worker's only suspension point.
//! The worker drains due records while locked, then runs their callbacks
//! unlocked, so a slow or re-entrant callback never blocks an inserter.

use super::pending::PendingHeap;
use super::task::{Deadline, TimerCallback, TimerRecord};
use crate::prelude::*;

use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Internal timestamp precision. Deadlines are truncated onto this grid
/// exactly once, at insertion; a coarser grid than the input `Duration`
/// bounds heap-comparison cost and sub-tick false precision.
pub const DEADLINE_TICK: Duration = Duration::from_millis(1);

/// Truncate an elapsed duration onto the `DEADLINE_TICK` grid.
pub(crate) fn duration_to_ticks(elapsed: Duration) -> Deadline {
    (elapsed.as_nanos() / DEADLINE_TICK.as_nanos()) as Deadline
}

pub(crate) fn ticks_to_duration(ticks: Deadline) -> Duration {
    Duration::from_nanos(ticks.saturating_mul(DEADLINE_TICK.as_nanos() as u64))
}

/// Everything the exclusive lock guards.
struct SchedulerState {
    pending: PendingHeap,
    // Next sequence stamp, post-incremented at insertion. Never reused.
    sequence: u64,
    should_process: bool,
    shutdown: bool,
}

impl SchedulerState {
    fn new() -> Self {
        SchedulerState {
            pending: PendingHeap::new(),
            sequence: 0,
            should_process: false,
            shutdown: false,
        }
    }
}

/// Core shared between the caller-facing handles and the worker thread.
pub(crate) struct SchedulerCore {
    state: Mutex<SchedulerState>,
    process_signal: Condvar,
    // Epoch of the tick grid; all deadlines count from here.
    started_at: Instant,
}

impl SchedulerCore {
    pub(crate) fn new() -> Self {
        SchedulerCore {
            state: Mutex::new(SchedulerState::new()),
            process_signal: Condvar::new(),
            started_at: Instant::now(),
        }
    }

    fn now_ticks(&self) -> Deadline {
        duration_to_ticks(self.started_at.elapsed())
    }

    /// Arm one record. Fire-and-forget; the only public mutator.
    ///
    /// The worker is signalled iff the new record took over the heap root,
    /// so inserts behind the current minimum cause no wake/sleep churn.
    pub(crate) fn insert(&self, callback: TimerCallback, duration: Duration) {
        let wake_worker = {
            let mut state = self.state.lock();

            if state.shutdown {
                warn!("insert after shutdown began; timer discarded");
                return;
            }

            let deadline = duration_to_ticks(self.started_at.elapsed() + duration);
            let sequence_id = state.sequence;
            state.sequence += 1;

            let previous_nearest = state.pending.peek_min();
            state.pending.push(TimerRecord::new(sequence_id, deadline, callback));
            trace!("timer {} armed for tick {}", sequence_id, deadline);

            if previous_nearest.map_or(true, |nearest| deadline < nearest) {
                state.should_process = true;
                true
            } else {
                false
            }
        };

        // Only one worker ever waits on the condvar, signalling unlocked is
        // enough here.
        if wake_worker {
            self.process_signal.notify_one();
        }
    }

    /// Raise the stop flag and wake the worker if it is waiting. Pending
    /// timers are discarded unfired.
    pub(crate) fn request_shutdown(&self) {
        {
            let mut state = self.state.lock();
            state.shutdown = true;
        }
        self.process_signal.notify_one();
    }

    pub(crate) fn worker_loop(&self) {
        info!("`timer_worker` start.");
        let span = info_span!("timer_worker");
        let _enter = span.enter();

        while let Some(batch) = self.wait_for_due_batch() {
            self.execute_batch(batch);
        }

        info!("`timer_worker` exiting.");
    }

    // Block until shutdown (`None`) or a drain pass completed (`Some`,
    // records in pop order). An empty batch after a stray wakeup is
    // harmless; the caller just comes straight back.
    fn wait_for_due_batch(&self) -> Option<Vec<TimerRecord>> {
        let mut state = self.state.lock();

        loop {
            // The stop flag is re-checked after every wakeup, before the
            // pending set is touched.
            if state.shutdown {
                return None;
            }
            if state.should_process {
                break;
            }

            match state.pending.peek_min() {
                Some(nearest) => {
                    let due_at = self.started_at + ticks_to_duration(nearest);
                    if Instant::now() >= due_at {
                        break;
                    }
                    let wait = self.process_signal.wait_until(&mut state, due_at);
                    if wait.timed_out() && !state.shutdown {
                        break;
                    }
                }
                None => self.process_signal.wait(&mut state),
            }
        }

        state.should_process = false;

        let drain_span = debug_span!("drain");
        let _enter = drain_span.enter();

        let now = self.now_ticks();
        let mut due = Vec::new();
        while let Some(nearest) = state.pending.peek_min() {
            if nearest > now {
                break;
            }
            if let Some(record) = state.pending.pop_min() {
                due.push(record);
            }
        }

        if !due.is_empty() {
            debug!(
                "drained {} due timer(s) at tick {}, {} still pending",
                due.len(),
                now,
                state.pending.len()
            );
        }

        Some(due)
    }

    // Run callbacks in pop order, lock released. A panicking callback is
    // reported and the rest of the batch still runs.
    fn execute_batch(&self, batch: Vec<TimerRecord>) {
        for record in batch {
            let TimerRecord {
                sequence_id,
                callback,
                ..
            } = record;

            if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
                error!("timer {} panicked; later timers are unaffected", sequence_id);
            }
        }
    }
}

impl fmt::Debug for SchedulerCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerCore")
            .field("started_at", &self.started_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_truncation_boundaries() {
        assert_eq!(duration_to_ticks(Duration::ZERO), 0);
        // Sub-tick remainders round toward the earlier tick.
        assert_eq!(duration_to_ticks(Duration::from_micros(999)), 0);
        assert_eq!(duration_to_ticks(Duration::from_micros(1999)), 1);
        assert_eq!(duration_to_ticks(Duration::from_micros(2000)), 2);
        assert_eq!(duration_to_ticks(Duration::from_secs(5) + Duration::from_millis(500)), 5500);
    }

    #[test]
    fn test_tick_duration_round_trip() {
        for ticks in [0, 1, 5500, u64::from(u32::MAX)] {
            assert_eq!(duration_to_ticks(ticks_to_duration(ticks)), ticks);
        }
    }

    #[test]
    fn test_insert_after_shutdown_is_discarded() {
        let core = SchedulerCore::new();
        core.request_shutdown();

        core.insert(Box::new(|| {}), Duration::ZERO);

        let state = core.state.lock();
        assert_eq!(state.pending.len(), 0);
        assert_eq!(state.sequence, 0);
    }

    #[test]
    fn test_insert_assigns_sequence_and_wake_flag() {
        let core = SchedulerCore::new();

        core.insert(Box::new(|| {}), Duration::from_secs(60));
        core.insert(Box::new(|| {}), Duration::from_secs(120));

        let mut state = core.state.lock();
        assert_eq!(state.sequence, 2);
        // First insert took the empty root; second fired no wake.
        assert!(state.should_process);

        state.should_process = false;
        drop(state);

        // A later deadline leaves the flag clear, an earlier one sets it.
        core.insert(Box::new(|| {}), Duration::from_secs(180));
        assert!(!core.state.lock().should_process);
        core.insert(Box::new(|| {}), Duration::from_secs(1));
        assert!(core.state.lock().should_process);
    }
}
