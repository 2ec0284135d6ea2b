//! Messages shown to the editor who triggered a change.

use crate::Error;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How important a [`Notification`] is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Severity {
    Notice,
    Info,
    Ok,
    Warning,
    Error,
}

impl Default for Severity {
    fn default() -> Self { Severity::Ok }
}

/// A transient message for the acting user.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct Notification {
    /// The message body.
    pub message: String,
    /// A title, possibly empty.
    pub title: String,
    /// How the message should be presented.
    pub severity: Severity,
}

impl Notification {
    /// Create a new [`Notification`].
    pub fn new<M, T>(message: M, title: T, severity: Severity) -> Self
    where
        M: Into<String>,
        T: Into<String>,
    {
        Notification {
            message: message.into(),
            title: title.into(),
            severity,
        }
    }
}

/// Somewhere [`Notification`]s can be sent so the host can display them.
///
/// Delivery is fire-and-forget. There is no guarantee a notification is
/// persisted.
pub trait NotificationSink {
    /// Queue a [`Notification`] for display.
    fn enqueue(&self, notification: Notification) -> Result<(), Error>;
}

impl<'s, S: NotificationSink + ?Sized> NotificationSink for &'s S {
    fn enqueue(&self, notification: Notification) -> Result<(), Error> {
        (**self).enqueue(notification)
    }
}

/// A [`NotificationSink`] which collects everything it is given.
#[derive(Debug, Default)]
pub struct MessageQueue {
    messages: Mutex<Vec<Notification>>,
}

impl MessageQueue {
    /// Create an empty [`MessageQueue`].
    pub fn new() -> Self { MessageQueue::default() }

    /// Take every queued [`Notification`], leaving the queue empty.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    /// Get a copy of every queued [`Notification`].
    pub fn messages(&self) -> Vec<Notification> { self.lock().clone() }

    /// The number of queued messages.
    pub fn len(&self) -> usize { self.lock().len() }

    /// Is the queue empty?
    pub fn is_empty(&self) -> bool { self.lock().is_empty() }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationSink for MessageQueue {
    fn enqueue(&self, notification: Notification) -> Result<(), Error> {
        self.lock().push(notification);
        Ok(())
    }
}
