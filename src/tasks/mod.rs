//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the cache is alive.
//!
//! # Tasks
//! - Expired-entry sweep: removes expired entries at the configured interval

mod cleanup;

pub use cleanup::{CleanupScheduler, SchedulerState};
