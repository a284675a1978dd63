//! A "prelude" for users of the `timers-manager` crate.
//!
//! This prelude is similar to the standard library's prelude in that you'll
//! almost always want to import its entire contents, but unlike the standard
//! library's prelude you'll have to do so manually:
//!
//! ```
//! use timers_manager::prelude::*;
//! ```
//!
//! The prelude may grow over time as additional items see ubiquitous use.

pub use crate::entity::{TimersHandle, TimersManager, TimersManagerBuilder};
pub use crate::error::TimerError;
pub use crate::timer::task::{Deadline, TimerCallback, TimerRecord};
pub use crate::timer::timer_core::DEADLINE_TICK;
pub use crate::utils::convenience::functions::{elapsed_report_routine, repeating_routine};

pub use anyhow::{anyhow, Result as AnyResult};
pub use thiserror::Error;

pub(crate) use log::{debug, error, info, trace, warn};
pub(crate) use std::time::{Duration, Instant};
pub(crate) use tracing::{debug_span, info_span};
