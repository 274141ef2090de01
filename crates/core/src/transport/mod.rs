//! Remote drop box access.
//!
//! A [`RemoteTransport`] lists, downloads and deletes order documents. Every
//! call opens and closes its own session; nothing is kept between cycles.
//!
//! Listing is shared by all backends: names are filtered against
//! `<prefix>_<yyyyMMddHHmmss>.pdf` and ordered oldest first (see [`order_listing`]).

mod error;
mod ftp;
mod listing;
mod local;
mod traits;
mod types;

pub use error::TransportError;
pub use ftp::FtpTransport;
pub use listing::order_listing;
pub use local::LocalDirTransport;
pub use traits::RemoteTransport;
pub use types::{remote_path, RemoteEndpoint, RemoteItem};
