use crate::{
    exclude::EXCLUDE_TABLE,
    hooks::{ChangedFields, RecordChange},
    Severity,
};

/// Options used to tweak how a [`crate::ContentChangeReactor`] recognises
/// exclude rules and reports what it did.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactorOptions {
    exclude_table: String,
    severity: Severity,
    notify: bool,
}

impl ReactorOptions {
    /// Create the default [`ReactorOptions`].
    pub fn new() -> Self {
        ReactorOptions {
            exclude_table: String::from(EXCLUDE_TABLE),
            severity: Severity::Ok,
            notify: true,
        }
    }

    /// The table exclude rules are stored in.
    pub fn exclude_table(&self) -> &str { &self.exclude_table }

    /// Set the [`ReactorOptions::exclude_table()`].
    pub fn with_exclude_table<S: Into<String>>(self, exclude_table: S) -> Self {
        ReactorOptions {
            exclude_table: exclude_table.into(),
            ..self
        }
    }

    /// The [`Severity`] used for notifications.
    pub fn severity(&self) -> Severity { self.severity }

    /// Set the [`ReactorOptions::severity()`].
    pub fn with_severity(self, severity: Severity) -> Self {
        ReactorOptions { severity, ..self }
    }

    /// Should editors be told when broken links are removed?
    ///
    /// Hosts without a UI (e.g. command line imports) can turn this off.
    pub fn notify(&self) -> bool { self.notify }

    /// Set [`ReactorOptions::notify()`].
    pub fn with_notify(self, notify: bool) -> Self {
        ReactorOptions { notify, ..self }
    }

    /// Turn a host's `(table, changed fields)` pair into a [`RecordChange`],
    /// using [`ReactorOptions::exclude_table()`] to spot exclude rules.
    pub fn record_change<S: Into<String>>(
        &self,
        table: S,
        fields: ChangedFields,
    ) -> RecordChange {
        RecordChange::classify(table, &self.exclude_table, fields)
    }
}

impl Default for ReactorOptions {
    fn default() -> Self { ReactorOptions::new() }
}
