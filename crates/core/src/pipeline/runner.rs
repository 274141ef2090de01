use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::config::PipelineConfig;
use super::latch::NoticeLatch;
use super::types::{CycleReport, ItemReport, StepOutcome};
use crate::notify::NotifyHandle;
use crate::printing::{print_to_targets, PrintSink};
use crate::store::{ConfigStore, SettingsError, SettingsSnapshot};
use crate::transport::{RemoteItem, RemoteTransport};

/// Runs fetch, print and cleanup cycles against injected collaborators.
///
/// The pipeline holds no scheduling state. Callers decide when to run a cycle.
pub struct PrintPipeline {
    config: PipelineConfig,
    store: Arc<dyn ConfigStore>,
    transport: Arc<dyn RemoteTransport>,
    sink: Arc<dyn PrintSink>,
    notify: NotifyHandle,
    idle_latch: NoticeLatch,
    settings_latch: NoticeLatch,
}

impl PrintPipeline {
    pub fn new(
        config: PipelineConfig,
        store: Arc<dyn ConfigStore>,
        transport: Arc<dyn RemoteTransport>,
        sink: Arc<dyn PrintSink>,
        notify: NotifyHandle,
    ) -> Self {
        Self {
            config,
            store,
            transport,
            sink,
            notify,
            idle_latch: NoticeLatch::new(),
            settings_latch: NoticeLatch::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one full cycle.
    ///
    /// Never fails: every problem is logged, announced and recorded in the
    /// returned report.
    pub async fn run_cycle(&self) -> CycleReport {
        let started_at = Utc::now();

        let settings = match SettingsSnapshot::load(self.store.as_ref()) {
            Ok(settings) => {
                self.settings_latch.rearm();
                settings
            }
            Err(e) => {
                self.report_settings_error(&e);
                return CycleReport::idle(started_at, Some(e.to_string()));
            }
        };

        let items = match self
            .transport
            .list(&settings.endpoint, &self.config.directory, &self.config.prefix)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                error!(
                    "Listing {} on {} failed: {}",
                    self.config.directory, settings.endpoint.server, e
                );
                self.notify
                    .notify(format!("Could not list orders on {}: {}", settings.endpoint.server, e));
                self.note_idle();
                return CycleReport::idle(started_at, Some(e.to_string()));
            }
        };

        if items.is_empty() {
            debug!("No orders in {}", self.config.directory);
            self.note_idle();
            return CycleReport::idle(started_at, None);
        }

        self.idle_latch.rearm();
        info!("Found {} order(s) to print", items.len());

        if let Err(e) = tokio::fs::create_dir_all(&self.config.staging_dir).await {
            error!(
                "Cannot create staging directory {}: {}",
                self.config.staging_dir.display(),
                e
            );
        }

        let mut reports = Vec::with_capacity(items.len());
        for item in &items {
            reports.push(self.process_item(&settings, item).await);
        }

        CycleReport {
            work_found: true,
            error: None,
            items: reports,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn process_item(&self, settings: &SettingsSnapshot, item: &RemoteItem) -> ItemReport {
        let name = item.name.as_str();
        let staged = self.config.staging_dir.join(name);
        // A leftover from an interrupted cycle must not be printed in place of this fetch.
        remove_staged(&staged).await;

        self.notify.notify(format!("Processing {}", name));

        let fetch = match self
            .transport
            .fetch(&settings.endpoint, &self.config.directory, name, &self.config.staging_dir)
            .await
        {
            Ok(path) => {
                debug!("Fetched {} to {}", name, path.display());
                StepOutcome::Done
            }
            Err(e) => {
                warn!("Fetching {} failed: {}", name, e);
                self.notify.notify(format!("Download of {} failed: {}", name, e));
                StepOutcome::failed(e)
            }
        };

        let prints =
            print_to_targets(self.sink.as_ref(), &staged, &settings.targets, &self.notify).await;

        let delete = match self
            .transport
            .delete(&settings.endpoint, &self.config.directory, name)
            .await
        {
            Ok(()) => {
                info!("Deleted {} from {}", name, settings.endpoint.server);
                StepOutcome::Done
            }
            Err(e) => {
                warn!("Deleting {} failed: {}", name, e);
                self.notify.notify(format!("Could not delete {}: {}", name, e));
                StepOutcome::failed(e)
            }
        };

        remove_staged(&staged).await;

        ItemReport {
            name: item.name.clone(),
            fetch,
            prints,
            delete,
        }
    }

    fn note_idle(&self) {
        if self.idle_latch.trip() {
            self.notify.notify("No orders found for now");
        }
    }

    fn report_settings_error(&self, e: &SettingsError) {
        warn!("Skipping cycle: {}", e);
        if self.settings_latch.trip() {
            self.notify
                .notify(format!("Cannot check for orders: {}", e));
        }
    }
}

async fn remove_staged(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove staged file {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notice;
    use crate::store::{keys, MemoryConfigStore};
    use crate::testing::{fixtures, MockPrintSink, MockTransport, TransportCall};
    use crate::transport::TransportError;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    struct Harness {
        pipeline: PrintPipeline,
        transport: MockTransport,
        sink: MockPrintSink,
        notices: mpsc::Receiver<Notice>,
        staging: TempDir,
    }

    impl Harness {
        fn new(store: MemoryConfigStore, devices: &[&str]) -> Self {
            let staging = TempDir::new().unwrap();
            let transport = MockTransport::new();
            let sink = MockPrintSink::with_devices(devices);
            let (tx, notices) = mpsc::channel(64);
            let config = PipelineConfig {
                directory: "/".to_string(),
                prefix: "order".to_string(),
                staging_dir: staging.path().join("pdf"),
            };
            let pipeline = PrintPipeline::new(
                config,
                Arc::new(store),
                Arc::new(transport.clone()),
                Arc::new(sink.clone()),
                NotifyHandle::new(tx),
            );
            Self {
                pipeline,
                transport,
                sink,
                notices,
                staging,
            }
        }

        fn notices(&mut self) -> Vec<String> {
            let mut texts = Vec::new();
            while let Ok(notice) = self.notices.try_recv() {
                texts.push(notice.text);
            }
            texts
        }
    }

    #[tokio::test]
    async fn test_cycle_prints_and_deletes_each_item() {
        let mut h = Harness::new(fixtures::settings_store(&["Kitchen1"]), &["Kitchen1"]);
        h.transport
            .add_files(&["order_20240101120000.pdf", "order_20240101110000.pdf"])
            .await;

        let report = h.pipeline.run_cycle().await;

        assert!(report.work_found);
        assert!(report.error.is_none());
        let names: Vec<&str> = report.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["order_20240101110000.pdf", "order_20240101120000.pdf"]);
        assert!(report.items.iter().all(|i| i.fetch.is_done() && i.delete.is_done()));
        assert_eq!(report.submission_count(), 2);
        assert!(h.transport.remaining().await.is_empty());

        let submissions = h.sink.submissions().await;
        assert_eq!(submissions[0].bytes, b"order_20240101110000.pdf");

        // Staged copies are cleaned up.
        let staged: Vec<_> = std::fs::read_dir(h.staging.path().join("pdf")).unwrap().collect();
        assert!(staged.is_empty());

        let notices = h.notices();
        assert!(notices.contains(&"Processing order_20240101110000.pdf".to_string()));
    }

    #[tokio::test]
    async fn test_listing_uses_snapshot_endpoint() {
        let h = Harness::new(fixtures::settings_store(&[]), &[]);
        h.pipeline.run_cycle().await;

        assert_eq!(
            h.transport.calls().await,
            vec![TransportCall::List {
                server: fixtures::SERVER.to_string(),
                directory: "/".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_still_deletes() {
        let mut h = Harness::new(fixtures::settings_store(&["Kitchen1"]), &["Kitchen1"]);
        h.transport
            .add_files(&["order_20240101110000.pdf", "order_20240101120000.pdf"])
            .await;
        h.transport.fail_fetch("order_20240101110000.pdf").await;

        let report = h.pipeline.run_cycle().await;

        let first = &report.items[0];
        assert!(matches!(first.fetch, StepOutcome::Failed { .. }));
        assert!(first
            .prints
            .iter()
            .all(|p| matches!(p.outcome, crate::printing::DeliveryOutcome::Skipped { .. })));
        assert!(first.delete.is_done());

        let second = &report.items[1];
        assert!(second.fetch.is_done());
        assert_eq!(report.submission_count(), 1);
        assert_eq!(h.transport.deleted().await.len(), 2);

        assert!(h
            .notices()
            .iter()
            .any(|n| n.starts_with("Download of order_20240101110000.pdf failed")));
    }

    #[tokio::test]
    async fn test_delete_failure_does_not_stop_later_items() {
        let h = Harness::new(fixtures::settings_store(&["Kitchen1"]), &["Kitchen1"]);
        h.transport
            .add_files(&["order_20240101110000.pdf", "order_20240101120000.pdf"])
            .await;
        h.transport.fail_delete("order_20240101110000.pdf").await;

        let report = h.pipeline.run_cycle().await;

        assert!(matches!(report.items[0].delete, StepOutcome::Failed { .. }));
        assert!(report.items[1].delete.is_done());
        assert_eq!(h.transport.remaining().await, vec!["order_20240101110000.pdf"]);
    }

    #[tokio::test]
    async fn test_idle_notice_once_per_drought() {
        let mut h = Harness::new(fixtures::settings_store(&["Kitchen1"]), &["Kitchen1"]);

        assert!(!h.pipeline.run_cycle().await.work_found);
        assert!(!h.pipeline.run_cycle().await.work_found);
        assert!(!h.pipeline.run_cycle().await.work_found);
        let idle: Vec<_> = h
            .notices()
            .into_iter()
            .filter(|n| n == "No orders found for now")
            .collect();
        assert_eq!(idle.len(), 1);

        h.transport.add_files(&["order_20240101110000.pdf"]).await;
        assert!(h.pipeline.run_cycle().await.work_found);
        assert!(!h.pipeline.run_cycle().await.work_found);

        let notices = h.notices();
        assert_eq!(
            notices.iter().filter(|n| *n == "No orders found for now").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_listing_failure_is_no_work() {
        let mut h = Harness::new(fixtures::settings_store(&["Kitchen1"]), &["Kitchen1"]);
        h.transport.add_files(&["order_20240101110000.pdf"]).await;
        h.transport
            .set_next_list_error(TransportError::UnknownHost {
                server: fixtures::SERVER.to_string(),
            })
            .await;

        let report = h.pipeline.run_cycle().await;
        assert!(!report.work_found);
        assert_eq!(
            report.error.as_deref(),
            Some("Server not found: ftp.kitchen.test")
        );
        assert!(h.transport.fetched().await.is_empty());
        assert!(h
            .notices()
            .iter()
            .any(|n| n.starts_with("Could not list orders on ftp.kitchen.test")));

        // Next cycle recovers.
        assert!(h.pipeline.run_cycle().await.work_found);
    }

    #[tokio::test]
    async fn test_incomplete_settings_skip_cycle() {
        let store = MemoryConfigStore::new();
        store.set(keys::SERVER, "ftp.kitchen.test").unwrap();
        let mut h = Harness::new(store, &["Kitchen1"]);
        h.transport.add_files(&["order_20240101110000.pdf"]).await;

        let report = h.pipeline.run_cycle().await;
        let again = h.pipeline.run_cycle().await;

        assert!(!report.work_found);
        assert_eq!(
            report.error.as_deref(),
            Some("settings incomplete, missing: username, password")
        );
        assert!(!again.work_found);
        assert!(h.transport.calls().await.is_empty());

        let notices = h.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].starts_with("Cannot check for orders"));
    }

    #[tokio::test]
    async fn test_non_matching_files_are_left_alone() {
        let h = Harness::new(fixtures::settings_store(&["Kitchen1"]), &["Kitchen1"]);
        h.transport
            .add_files(&["readme.txt", "invoice_20240101110000.pdf"])
            .await;

        let report = h.pipeline.run_cycle().await;

        assert!(!report.work_found);
        assert_eq!(h.transport.remaining().await.len(), 2);
        assert!(h.transport.deleted().await.is_empty());
    }

    #[tokio::test]
    async fn test_stale_staged_file_is_not_printed() {
        let h = Harness::new(fixtures::settings_store(&["Kitchen1"]), &["Kitchen1"]);
        let staging = h.staging.path().join("pdf");
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::write(staging.join("order_20240101110000.pdf"), b"stale").unwrap();

        h.transport.add_files(&["order_20240101110000.pdf"]).await;
        h.transport.fail_fetch("order_20240101110000.pdf").await;

        let report = h.pipeline.run_cycle().await;

        assert_eq!(report.submission_count(), 0);
        assert_eq!(h.sink.submission_count().await, 0);
    }
}
