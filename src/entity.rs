//! TimersManager is a deadline scheduler for deferred callbacks,
//! based on an internal pending-set heap and a single worker thread,
//! which makes it easy to fire arbitrary one-shot work items as close as
//! possible to their deadline, from any number of inserting threads.

use crate::prelude::*;
use crate::timer::timer_core::SchedulerCore;

use std::sync::Arc;
use std::thread::{Builder as ThreadBuilder, JoinHandle};

/// Builds TimersManager with the minimal fixed configuration.
///
/// Clock source, tick precision and diagnostics are not tunable; the
/// TimersManager is constructed by calling `build`, which also starts the
/// worker immediately.
///
/// # Examples
///
/// ```
/// use timers_manager::entity::TimersManagerBuilder;
///
/// let timers = TimersManagerBuilder::default().build().unwrap();
/// drop(timers);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TimersManagerBuilder {}

/// TimersManager is an abstraction layer that helps users defer callbacks
/// onto one dedicated worker thread, in deadline order.
///
/// Dropping the manager requests a stop, wakes the worker and joins it;
/// timers still pending at that point are discarded unfired.
#[derive(Debug)]
pub struct TimersManager {
    scheduler_core: Arc<SchedulerCore>,
    worker: Option<JoinHandle<()>>,
}

/// Cloneable insertion handle, detached from the manager's lifetime.
///
/// This is the re-entrancy surface: a firing callback may hold a handle and
/// insert new timers from within its own execution. A handle used after
/// shutdown began degrades to a logged no-op.
#[derive(Clone, Debug)]
pub struct TimersHandle {
    scheduler_core: Arc<SchedulerCore>,
}

impl TimersManagerBuilder {
    /// Build TimersManager, spawning the worker thread.
    pub fn build(self) -> Result<TimersManager, TimerError> {
        let scheduler_core = Arc::new(SchedulerCore::new());
        let worker = Self::run_worker_loop(scheduler_core.clone())?;

        Ok(TimersManager {
            scheduler_core,
            worker: Some(worker),
        })
    }

    fn run_worker_loop(scheduler_core: Arc<SchedulerCore>) -> Result<JoinHandle<()>, TimerError> {
        let worker = ThreadBuilder::new()
            .name("timer_worker".into())
            .spawn(move || scheduler_core.worker_loop())?;

        Ok(worker)
    }
}

impl TimersManager {
    /// New a TimersManager.
    pub fn new() -> Result<TimersManager, TimerError> {
        TimersManagerBuilder::default().build()
    }

    /// Arm `callback` to fire once, `duration` from now.
    ///
    /// Fire-and-forget: nothing is returned to the caller and the timer can
    /// be neither cancelled nor modified afterwards. A zero duration means
    /// "fire as soon as possible". Safe to call concurrently from any
    /// number of threads.
    ///
    /// # Examples
    ///
    /// ```
    /// use timers_manager::prelude::*;
    /// use std::time::Duration;
    ///
    /// let timers = TimersManager::new().unwrap();
    /// timers.insert_timer(|| println!("due"), Duration::from_millis(10));
    /// std::thread::sleep(Duration::from_millis(100));
    /// ```
    pub fn insert_timer<F>(&self, callback: F, duration: Duration)
    where
        F: FnOnce() + Send + 'static,
    {
        self.scheduler_core.insert(Box::new(callback), duration);
    }

    /// A handle for inserting from other threads or from within a firing
    /// callback (the repeating-timer pattern).
    pub fn handle(&self) -> TimersHandle {
        TimersHandle {
            scheduler_core: self.scheduler_core.clone(),
        }
    }

    /// Stop TimersManager, discarding pending timers unfired.
    ///
    /// Blocks until the worker observed the stop request and exited.
    /// Idempotent; also performed implicitly on drop.
    pub fn stop(&mut self) -> Result<(), TimerError> {
        self.scheduler_core.request_shutdown();

        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| TimerError::WorkerThreadPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for TimersManager {
    // The worker must be joined before any scheduler memory is released.
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!("timer worker shut down uncleanly: {}", e);
        }
    }
}

impl TimersHandle {
    /// Arm `callback` to fire once, `duration` from now.
    ///
    /// Same contract as `TimersManager::insert_timer`.
    pub fn insert_timer<F>(&self, callback: F, duration: Duration)
    where
        F: FnOnce() + Send + 'static,
    {
        self.scheduler_core.insert(Box::new(callback), duration);
    }
}
