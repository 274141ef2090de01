//! Print output.
//!
//! A [`PrintSink`] enumerates named output devices and accepts documents for
//! one device at a time. [`print_to_targets`] fans one staged document out to
//! every configured target, resolving names against the live device list.

mod cups;
mod error;
mod fanout;
mod log;
mod traits;
mod types;

pub use cups::CupsPrintSink;
pub use error::PrintError;
pub use fanout::print_to_targets;
pub use log::LogPrintSink;
pub use traits::PrintSink;
pub use types::{DeliveryOutcome, DeviceOutcome, Document};
