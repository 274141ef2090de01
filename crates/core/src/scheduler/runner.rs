use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::types::{Action, SchedulerStatus, TaskState};
use crate::notify::NotifyHandle;

const KILLED_NOTICE: &str = "Task killed and reset";

struct ScheduledTask {
    action: Action,
    interval_secs: u64,
}

struct Arming {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Slot {
    task: Option<ScheduledTask>,
    arming: Option<Arming>,
    /// Cancelled armings that may still be finishing a run.
    retired: Vec<JoinHandle<()>>,
}

impl Slot {
    /// Stop the current arming from ticking again. A run in progress finishes.
    fn retire_arming(&mut self) -> bool {
        self.retired.retain(|handle| !handle.is_finished());
        match self.arming.take() {
            Some(arming) => {
                arming.cancel.cancel();
                self.retired.push(arming.handle);
                true
            }
            None => false,
        }
    }

    fn abort_all(&mut self) {
        if let Some(arming) = self.arming.take() {
            arming.cancel.cancel();
            arming.handle.abort();
        }
        for handle in self.retired.drain(..) {
            handle.abort();
        }
    }
}

/// State shared with the spawned tick loops.
struct Shared {
    state: watch::Sender<TaskState>,
    transitions: broadcast::Sender<TaskState>,
    task_running: AtomicBool,
    runs_started: AtomicU64,
    last_run_started_at: StdMutex<Option<DateTime<Utc>>>,
    /// Held for the whole of every run.
    worker: Mutex<()>,
}

impl Shared {
    fn set_state(&self, next: TaskState) {
        self.update_state(next, None);
    }

    /// Like `set_state`, but does nothing once `cancel` has fired. The check
    /// happens under the state lock, so a concurrent pause or kill always wins.
    fn set_state_if_armed(&self, cancel: &CancellationToken, next: TaskState) {
        self.update_state(next, Some(cancel));
    }

    fn update_state(&self, next: TaskState, cancel: Option<&CancellationToken>) {
        let changed = self.state.send_if_modified(|current| {
            if cancel.is_some_and(CancellationToken::is_cancelled) || *current == next {
                return false;
            }
            *current = next;
            true
        });
        if changed {
            debug!("Scheduler state -> {}", next);
            // No subscribers is fine.
            let _ = self.transitions.send(next);
        }
    }

    fn begin_run(&self, cancel: &CancellationToken) {
        self.task_running.store(true, Ordering::SeqCst);
        // Pause and kill cancel before clearing the flag.
        if cancel.is_cancelled() {
            self.task_running.store(false, Ordering::SeqCst);
        }
        self.runs_started.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_run_started_at.lock() {
            *last = Some(Utc::now());
        }
        self.set_state_if_armed(cancel, TaskState::Running);
    }
}

/// Runs a single replaceable task at a fixed rate.
///
/// Control methods are serialized through an async mutex. Tick loops are
/// spawned on the runtime handle given at construction and use tokio's clock.
pub struct PeriodicScheduler {
    runtime: Handle,
    slot: Mutex<Slot>,
    shared: Arc<Shared>,
    notify: Option<NotifyHandle>,
}

impl PeriodicScheduler {
    pub fn new(runtime: Handle) -> Self {
        let (state, _) = watch::channel(TaskState::Idle);
        let (transitions, _) = broadcast::channel(64);

        Self {
            runtime,
            slot: Mutex::new(Slot::default()),
            shared: Arc::new(Shared {
                state,
                transitions,
                task_running: AtomicBool::new(false),
                runs_started: AtomicU64::new(0),
                last_run_started_at: StdMutex::new(None),
                worker: Mutex::new(()),
            }),
            notify: None,
        }
    }

    /// Announce kills on this notice channel.
    pub fn with_notifier(mut self, notify: NotifyHandle) -> Self {
        self.notify = Some(notify);
        self
    }

    /// Replace any existing task with `action`, first run immediately.
    pub async fn schedule(&self, action: Action, interval_secs: u64) {
        let interval_secs = if interval_secs == 0 {
            warn!("Interval of 0 seconds requested, using 1");
            1
        } else {
            interval_secs
        };

        let mut slot = self.slot.lock().await;
        if slot.retire_arming() {
            debug!("Replacing the scheduled task");
        }
        slot.task = Some(ScheduledTask {
            action,
            interval_secs,
        });
        self.arm(&mut slot);
        info!("Task scheduled every {}s", interval_secs);
    }

    /// Stop future ticks. A run already executing is not interrupted.
    pub async fn pause(&self) {
        let mut slot = self.slot.lock().await;
        if !slot.retire_arming() {
            debug!("Pause ignored: no armed task");
            return;
        }
        self.shared.task_running.store(false, Ordering::SeqCst);
        self.shared.set_state(TaskState::Paused);
        info!("Task paused");
    }

    /// Re-arm a paused task with its stored interval, first run immediately.
    pub async fn resume(&self) {
        let mut slot = self.slot.lock().await;
        if slot.task.is_none() {
            debug!("Resume ignored: no task");
            return;
        }
        if slot.arming.is_some() {
            debug!("Resume ignored: task already armed");
            return;
        }
        self.arm(&mut slot);
        info!("Task resumed");
    }

    /// Cancel everything, interrupting a run at its next await point, and
    /// forget the task.
    pub async fn kill(&self) {
        let mut slot = self.slot.lock().await;
        if slot.task.is_none() && slot.arming.is_none() {
            debug!("Kill ignored: no task");
            return;
        }

        slot.abort_all();
        slot.task = None;
        self.shared.task_running.store(false, Ordering::SeqCst);
        self.shared.set_state(TaskState::Killed);
        self.shared.set_state(TaskState::Idle);

        info!("{}", KILLED_NOTICE);
        if let Some(notify) = &self.notify {
            notify.notify(KILLED_NOTICE);
        }
    }

    /// Run `work` on the scheduler's worker, waiting for any run in progress.
    ///
    /// Used for manual cycles so they never overlap a scheduled one.
    pub async fn run_exclusive<F: Future>(&self, work: F) -> F::Output {
        let _worker = self.shared.worker.lock().await;
        work.await
    }

    pub fn state(&self) -> TaskState {
        *self.shared.state.borrow()
    }

    /// Liveness flag: set when a run starts, cleared only by pause and kill.
    pub fn is_task_running(&self) -> bool {
        self.shared.task_running.load(Ordering::SeqCst)
    }

    /// Every state transition, including the transient `Killed`.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskState> {
        self.shared.transitions.subscribe()
    }

    /// Latest state only.
    pub fn watch_state(&self) -> watch::Receiver<TaskState> {
        self.shared.state.subscribe()
    }

    pub async fn status(&self) -> SchedulerStatus {
        let interval_secs = self
            .slot
            .lock()
            .await
            .task
            .as_ref()
            .map(|task| task.interval_secs);

        SchedulerStatus {
            state: self.state(),
            task_running: self.is_task_running(),
            interval_secs,
            runs_started: self.shared.runs_started.load(Ordering::SeqCst),
            last_run_started_at: self
                .shared
                .last_run_started_at
                .lock()
                .ok()
                .and_then(|last| *last),
        }
    }

    fn arm(&self, slot: &mut Slot) {
        let Some(task) = slot.task.as_ref() else {
            return;
        };

        let cancel = CancellationToken::new();
        self.shared.set_state(TaskState::Scheduled);
        let handle = self.runtime.spawn(run_loop(
            Arc::clone(&self.shared),
            Arc::clone(&task.action),
            Duration::from_secs(task.interval_secs),
            cancel.clone(),
        ));
        slot.arming = Some(Arming { cancel, handle });
    }
}

impl Drop for PeriodicScheduler {
    fn drop(&mut self) {
        self.slot.get_mut().abort_all();
    }
}

async fn run_loop(shared: Arc<Shared>, action: Action, period: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let _worker = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            guard = shared.worker.lock() => guard,
        };
        if cancel.is_cancelled() {
            break;
        }

        shared.begin_run(&cancel);
        let run = AssertUnwindSafe(async { action().await });
        if let Err(payload) = run.catch_unwind().await {
            error!("Scheduled task panicked: {}", panic_message(&*payload));
        }
        shared.set_state_if_armed(&cancel, TaskState::Scheduled);
    }

    debug!("Tick loop stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}
