//! TimersManager is a single-process deadline scheduler,
//! based on an internal pending-set heap and one dedicated worker thread,
//! which makes it easy to defer arbitrary callbacks from any number of
//! threads, including from within a firing callback itself.
//!
//! # TimersManager
//!
//! User applications can be served through the lib used by TimersManager:
//!
//! 1. One-shot deferred callbacks, fired once in deadline order.
//! 2. Repeating routines, layered on re-entrant insertion.

pub mod entity;
pub mod error;
pub mod prelude;
pub mod timer;
pub mod utils;
