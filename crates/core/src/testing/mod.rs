//! Testing utilities and mock collaborators.
//!
//! The mocks record every call and allow failures to be injected per file or
//! per device, so pipeline and scheduler behavior can be exercised without an
//! FTP server or a print system.
//!
//! # Example
//!
//! ```rust,ignore
//! use kitchenprint_core::testing::{MockPrintSink, MockTransport};
//!
//! let transport = MockTransport::new();
//! transport.add_files(&["order_20240101120000.pdf"]).await;
//! let sink = MockPrintSink::with_devices(&["Kitchen1"]);
//! ```

mod journal;
mod mock_print_sink;
mod mock_transport;

pub use journal::CallJournal;
pub use mock_print_sink::{MockPrintSink, RecordedSubmission};
pub use mock_transport::{MockTransport, TransportCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::store::MemoryConfigStore;
    use crate::transport::RemoteEndpoint;

    pub const SERVER: &str = "ftp.kitchen.test";
    pub const USERNAME: &str = "kitchen";
    pub const PASSWORD: &str = "s3cret";

    /// `order_<timestamp>.pdf`
    pub fn order_name(timestamp: &str) -> String {
        format!("order_{}.pdf", timestamp)
    }

    pub fn endpoint() -> RemoteEndpoint {
        RemoteEndpoint {
            server: SERVER.to_string(),
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
        }
    }

    /// Memory store with complete connection settings and the given targets.
    pub fn settings_store(targets: &[&str]) -> MemoryConfigStore {
        MemoryConfigStore::with_settings(SERVER, USERNAME, PASSWORD, targets)
    }
}
