use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use super::{Notice, NotifyHandle};

/// Shared window of the most recent notices.
#[derive(Clone)]
pub struct RecentNotices {
    inner: Arc<RwLock<VecDeque<Notice>>>,
    capacity: usize,
}

impl RecentNotices {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    async fn push(&self, notice: Notice) {
        let mut notices = self.inner.write().await;
        if notices.len() == self.capacity {
            notices.pop_front();
        }
        notices.push_back(notice);
    }

    /// Oldest first.
    pub async fn snapshot(&self) -> Vec<Notice> {
        self.inner.read().await.iter().cloned().collect()
    }
}

/// Background task that receives notices, logs them and keeps the recent window
pub struct NoticeWriter {
    rx: mpsc::Receiver<Notice>,
    recent: RecentNotices,
}

impl NoticeWriter {
    pub fn new(rx: mpsc::Receiver<Notice>, recent: RecentNotices) -> Self {
        Self { rx, recent }
    }

    /// Run the writer, consuming notices until every handle is dropped
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) {
        tracing::debug!("Notice writer started");

        while let Some(notice) = self.rx.recv().await {
            tracing::info!(target: "kitchenprint::notice", "{}", notice.text);
            self.recent.push(notice).await;
        }

        tracing::debug!("Notice writer shutting down");
    }
}

/// Create a complete notice system
///
/// Returns:
/// - `NotifyHandle` - for emitting notices (clone this to share across tasks)
/// - `NoticeWriter` - spawn this with `tokio::spawn(writer.run())`
/// - `RecentNotices` - read side for the control API
pub fn create_notice_system(
    buffer_size: usize,
    history: usize,
) -> (NotifyHandle, NoticeWriter, RecentNotices) {
    let (tx, rx) = mpsc::channel(buffer_size);
    let recent = RecentNotices::new(history);
    (
        NotifyHandle::new(tx),
        NoticeWriter::new(rx, recent.clone()),
        recent,
    )
}
