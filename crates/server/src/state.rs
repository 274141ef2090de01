use std::sync::Arc;

use tracing::info;

use kitchenprint_core::{
    action, Config, ConfigStore, CycleReport, NotifyHandle, PeriodicScheduler, PrintPipeline,
    PrintSink, RecentNotices, SanitizedConfig, SettingsError, SettingsSnapshot,
};

/// Shared application state
pub struct AppState {
    config: Config,
    store: Arc<dyn ConfigStore>,
    sink: Arc<dyn PrintSink>,
    pipeline: Arc<PrintPipeline>,
    scheduler: Arc<PeriodicScheduler>,
    notify: NotifyHandle,
    recent_notices: RecentNotices,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        store: Arc<dyn ConfigStore>,
        sink: Arc<dyn PrintSink>,
        pipeline: Arc<PrintPipeline>,
        scheduler: Arc<PeriodicScheduler>,
        notify: NotifyHandle,
        recent_notices: RecentNotices,
    ) -> Self {
        Self {
            config,
            store,
            sink,
            pipeline,
            scheduler,
            notify,
            recent_notices,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn store(&self) -> &dyn ConfigStore {
        self.store.as_ref()
    }

    pub fn sink(&self) -> &dyn PrintSink {
        self.sink.as_ref()
    }

    pub fn scheduler(&self) -> &PeriodicScheduler {
        &self.scheduler
    }

    pub fn notify(&self) -> &NotifyHandle {
        &self.notify
    }

    pub fn recent_notices(&self) -> &RecentNotices {
        &self.recent_notices
    }

    /// Check the stored settings and start polling at the stored interval.
    ///
    /// Returns the interval in seconds.
    pub async fn launch(&self) -> Result<u64, SettingsError> {
        let settings = SettingsSnapshot::load(self.store.as_ref())?;
        let interval_secs = settings.interval_secs;

        self.notify.notify(format!(
            "Checking for new orders every {} seconds",
            interval_secs
        ));

        let pipeline = Arc::clone(&self.pipeline);
        let cycle = action(move || {
            let pipeline = Arc::clone(&pipeline);
            async move {
                pipeline.run_cycle().await;
            }
        });
        self.scheduler.schedule(cycle, interval_secs).await;

        info!(
            "Polling {} every {}s",
            settings.endpoint.server, interval_secs
        );
        Ok(interval_secs)
    }

    /// One cycle outside the schedule, serialized with scheduled runs.
    pub async fn run_once(&self) -> CycleReport {
        self.scheduler
            .run_exclusive(self.pipeline.run_cycle())
            .await
    }
}
