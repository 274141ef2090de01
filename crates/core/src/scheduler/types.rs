use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;

/// A zero-argument async unit of work, invoked once per tick.
pub type Action = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Wrap an async closure as an [`Action`].
pub fn action<F, Fut>(f: F) -> Action
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// Lifecycle state of the scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// No task.
    Idle,
    /// Armed, waiting for the next tick.
    Scheduled,
    /// The action is executing.
    Running,
    /// Task kept, no ticks until resumed.
    Paused,
    /// Published once by a kill, immediately followed by `Idle`.
    Killed,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scheduled => "scheduled",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Killed => "killed",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of the scheduler.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub state: TaskState,
    /// Set when a run starts, cleared only by pause or kill.
    pub task_running: bool,
    /// Interval of the current task, if any.
    pub interval_secs: Option<u64>,
    /// Runs started since the scheduler was created.
    pub runs_started: u64,
    pub last_run_started_at: Option<DateTime<Utc>>,
}
