/// Errors raised by the collaborators the [`crate::ContentChangeReactor`]
/// talks to.
///
/// The reactor never recovers from these, they are handed straight back to
/// the host so it can abort its own database operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The storage layer (broken link table, record lookup) failed.
    #[error("Storage error: {0}")]
    Storage(String),
    /// A notification couldn't be delivered.
    #[error("Unable to enqueue the notification: {0}")]
    Notification(String),
}
