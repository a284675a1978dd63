//! Public error of timers-manager..

use crate::prelude::*;

use std::io;

/// Error enumeration for `TimersManager`-related operations.
#[derive(Error, Debug)]
pub enum TimerError {
    /// The dedicated worker thread could not be spawned.
    #[error("The timer worker thread failed to spawn.")]
    WorkerThreadSpawn(#[from] io::Error),
    /// The worker thread terminated by panic instead of observing shutdown.
    #[error("The timer worker thread terminated by panic.")]
    WorkerThreadPanicked,
}
