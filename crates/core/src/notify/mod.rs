//! User-visible notices.
//!
//! The pipeline and scheduler report outcomes as short text lines through a
//! [`NotifyHandle`]. Sending never blocks the worker: lines are pushed onto a
//! bounded channel and drained by a [`NoticeWriter`] that logs them and keeps a
//! window of recent notices for the control API.

mod handle;
mod writer;

pub use handle::{Notice, NotifyHandle};
pub use writer::{create_notice_system, NoticeWriter, RecentNotices};
