use std::sync::Arc;

use tokio::sync::RwLock;

/// Ordered log of calls shared between mocks.
///
/// Lets a test assert the interleaving of transport and sink calls, e.g.
/// `["list", "fetch:a.pdf", "print:a.pdf@Kitchen1", "delete:a.pdf"]`.
#[derive(Debug, Clone, Default)]
pub struct CallJournal {
    entries: Arc<RwLock<Vec<String>>>,
}

impl CallJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, entry: impl Into<String>) {
        self.entries.write().await.push(entry.into());
    }

    pub async fn entries(&self) -> Vec<String> {
        self.entries.read().await.clone()
    }
}
