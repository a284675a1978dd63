use crate::entity::TimersHandle;
use crate::prelude::*;

pub mod functions {

    use super::*;

    /// Generate a closure that runs `routine`, then re-arms itself on
    /// `handle` with a fixed `period`.
    ///
    /// This is the whole repeating-timer story: the core gives repetition
    /// no special support, a repeating timer is just a callback that
    /// re-inserts itself through the ordinary insertion path (which is why
    /// insertion has to be safe from within a firing callback).
    ///
    /// Repetition ends when the manager shuts down; the pending re-arm is
    /// then discarded like any other timer.
    pub fn repeating_routine<F>(
        handle: TimersHandle,
        period: Duration,
        routine: F,
    ) -> impl FnOnce() + Send + 'static
    where
        F: FnMut() + Send + 'static,
    {
        move || run_and_rearm(handle, period, routine)
    }

    fn run_and_rearm<F>(handle: TimersHandle, period: Duration, mut routine: F)
    where
        F: FnMut() + Send + 'static,
    {
        routine();

        let rearm_handle = handle.clone();
        handle.insert_timer(move || run_and_rearm(rearm_handle, period, routine), period);
    }

    /// Generate a closure that reports how long it slept each time it runs,
    /// measured from arming (or from its previous run).
    ///
    /// The measurement probe of the demo programs.
    pub fn elapsed_report_routine(label: &str) -> impl FnMut() + Send + 'static {
        let label = label.to_owned();
        let mut armed_at = Instant::now();

        move || {
            let elapsed = armed_at.elapsed();
            info!(
                "{}: slept for {}s/{}ms",
                label,
                elapsed.as_secs(),
                elapsed.as_millis()
            );
            armed_at = Instant::now();
        }
    }
}
