//! Reacting to records being changed in the host CMS.

mod events;
mod options;
mod reactor;

pub use events::{
    ChangedFields, ContentFields, DeleteEvent, EventContext, ExcludeRuleFields,
    OtherTable, RecordChange, SaveEvent, SaveStatus, CONTENT_TABLE,
    PAGES_TABLE,
};
pub use options::ReactorOptions;
pub use reactor::ContentChangeReactor;

use crate::Error;

/// Something which wants to know when records are saved or deleted.
///
/// The host (or a thin adapter around it) calls these synchronously while
/// performing its own database operation. Listeners are invoked for every
/// table and must quietly ignore events they don't care about. An error
/// should abort the host's operation.
pub trait RecordListener {
    /// A record was created or updated.
    fn after_save(&self, event: &SaveEvent) -> Result<(), Error>;

    /// A record was deleted.
    fn after_delete(&self, event: &DeleteEvent) -> Result<(), Error>;
}

/// Used to read the full, current state of a record.
pub trait RecordFetcher {
    /// Load an exclude rule, returning `None` if it doesn't exist.
    fn exclude_rule(
        &self,
        uid: u64,
    ) -> Result<Option<ExcludeRuleFields>, Error>;
}

impl<F> RecordFetcher for F
where
    F: Fn(u64) -> Result<Option<ExcludeRuleFields>, Error>,
{
    fn exclude_rule(
        &self,
        uid: u64,
    ) -> Result<Option<ExcludeRuleFields>, Error> {
        self(uid)
    }
}

/// A set of [`RecordListener`]s, notified in the order they were
/// registered.
#[derive(Default)]
pub struct Listeners<'a> {
    listeners: Vec<Box<dyn RecordListener + 'a>>,
}

impl<'a> Listeners<'a> {
    /// Create an empty set of [`Listeners`].
    pub fn new() -> Self { Listeners::default() }

    /// Register a [`RecordListener`].
    pub fn register<L: RecordListener + 'a>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    /// How many listeners are registered?
    pub fn len(&self) -> usize { self.listeners.len() }

    /// Are there no listeners?
    pub fn is_empty(&self) -> bool { self.listeners.is_empty() }
}

impl<'a> RecordListener for Listeners<'a> {
    fn after_save(&self, event: &SaveEvent) -> Result<(), Error> {
        for listener in &self.listeners {
            listener.after_save(event)?;
        }

        Ok(())
    }

    fn after_delete(&self, event: &DeleteEvent) -> Result<(), Error> {
        for listener in &self.listeners {
            listener.after_delete(event)?;
        }

        Ok(())
    }
}

impl<'a> std::fmt::Debug for Listeners<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}

impl<'l, L: RecordListener + ?Sized> RecordListener for &'l L {
    fn after_save(&self, event: &SaveEvent) -> Result<(), Error> {
        (**self).after_save(event)
    }

    fn after_delete(&self, event: &DeleteEvent) -> Result<(), Error> {
        (**self).after_delete(event)
    }
}
