//! Periodic task scheduler.
//!
//! Runs one action at a fixed rate with pause, resume and kill control. At
//! most one arming exists at a time, and every run holds a shared worker lock
//! so runs never overlap, even across a replacement.
//!
//! ```text
//! Idle --schedule--> Scheduled <--> Running
//!                        |  ^
//!                  pause |  | resume
//!                        v  |
//!                       Paused
//! any --kill--> Killed --> Idle
//! ```

mod runner;
mod types;

pub use runner::PeriodicScheduler;
pub use types::{action, Action, SchedulerStatus, TaskState};
