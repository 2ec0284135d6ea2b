//! Broken link bookkeeping for a CMS link checker.
//!
//! The crate has two halves:
//!
//! - a [`LinkTargetCache`] (and the in-memory [`MemoryCache`]) used to avoid
//!   checking the same link target over and over, and
//! - a [`ContentChangeReactor`] which listens for records being saved or
//!   deleted and keeps the broken link table consistent with those changes.
//!
//! Everything the reactor needs from the host (storage, notifications,
//! translations) is passed in explicitly as trait objects.

#![forbid(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod cache;
mod check;
mod error;
pub mod exclude;
pub mod hooks;
pub mod locale;
mod notify;
mod repository;
mod response;

pub use cache::LinkTargetCache;
pub use check::*;
pub use error::Error;
pub use exclude::{ExcludeRule, MatchKind};
pub use hooks::{ContentChangeReactor, RecordListener};
pub use locale::{Catalog, Translator};
pub use notify::{MessageQueue, Notification, NotificationSink, Severity};
pub use repository::{BrokenLinkRecord, BrokenLinkRepository, MemoryRepository};
pub use response::{ErrorParams, UrlResponse};
