use crate::{
    hooks::{
        DeleteEvent, ExcludeRuleFields, ReactorOptions, RecordChange,
        RecordFetcher, RecordListener, SaveEvent, SaveStatus,
    },
    locale::{self, Translator},
    BrokenLinkRepository, Error, Notification, NotificationSink,
};
use std::fmt::{self, Debug, Formatter};

/// Keeps the broken link table consistent with editorial changes.
///
/// - Saving an exclude rule removes every broken link it now excludes.
/// - Hiding a page or content element removes its broken links.
/// - Deleting any record removes its broken links.
///
/// Whenever rows are removed the editor gets a [`Notification`].
pub struct ContentChangeReactor<'a> {
    repository: Box<dyn BrokenLinkRepository + 'a>,
    records: Box<dyn RecordFetcher + 'a>,
    notifications: Box<dyn NotificationSink + 'a>,
    translator: Box<dyn Translator + 'a>,
    options: ReactorOptions,
}

impl<'a> ContentChangeReactor<'a> {
    /// Create a new [`ContentChangeReactor`] using the default
    /// [`ReactorOptions`].
    pub fn new<R, F, N, T>(
        repository: R,
        records: F,
        notifications: N,
        translator: T,
    ) -> Self
    where
        R: BrokenLinkRepository + 'a,
        F: RecordFetcher + 'a,
        N: NotificationSink + 'a,
        T: Translator + 'a,
    {
        ContentChangeReactor {
            repository: Box::new(repository),
            records: Box::new(records),
            notifications: Box::new(notifications),
            translator: Box::new(translator),
            options: ReactorOptions::default(),
        }
    }

    /// Use a different set of [`ReactorOptions`].
    pub fn with_options(self, options: ReactorOptions) -> Self {
        ContentChangeReactor { options, ..self }
    }

    /// The [`ReactorOptions`] in use.
    pub fn options(&self) -> &ReactorOptions { &self.options }

    /// React to a record being created or updated.
    pub fn on_after_save(&self, event: &SaveEvent) -> Result<(), Error> {
        if !event.context.is_live_edit() {
            log::debug!(
                "Ignoring a change to {}:{} outside of the live workspace",
                event.change.table(self.options.exclude_table()),
                event.uid
            );
            return Ok(());
        }

        match (&event.change, event.status) {
            (RecordChange::ExcludeRule(changed), status)
                if changed.touches_matching() =>
            {
                let row = match status {
                    // the changed fields don't necessarily contain the whole
                    // rule, so read it back from storage
                    SaveStatus::Update => self
                        .records
                        .exclude_rule(event.uid)?
                        .unwrap_or_default(),
                    SaveStatus::New => changed.clone(),
                };

                self.remove_excluded(&row)
            },
            (RecordChange::Page(fields), SaveStatus::Update)
            | (RecordChange::Content(fields), SaveStatus::Update)
                if fields.hides_record() =>
            {
                let table = event.change.table(self.options.exclude_table());
                self.remove_for_record(table, event.uid)
            },
            _ => Ok(()),
        }
    }

    /// React to a record being deleted.
    pub fn on_delete_record(&self, event: &DeleteEvent) -> Result<(), Error> {
        self.remove_for_record(&event.table, event.uid)
    }

    fn remove_excluded(&self, row: &ExcludeRuleFields) -> Result<(), Error> {
        let (link_target, link_type, match_kind, pid) = match row.complete() {
            Some(parts) => parts,
            None => {
                log::debug!("The exclude rule is incomplete, nothing to do");
                return Ok(());
            },
        };

        let removed = self.repository.remove_broken_links_for_link_target(
            link_target,
            link_type,
            match_kind,
            pid,
        )?;

        if removed > 0 {
            log::info!(
                "Removed {} broken link(s) excluded by \"{}\" ({}, {})",
                removed,
                link_target,
                link_type,
                match_kind
            );
            let title = self.translator.translate(locale::EXCLUDE_LIST);
            self.notify(removed, link_target, title)?;
        }

        Ok(())
    }

    fn remove_for_record(&self, table: &str, uid: u64) -> Result<(), Error> {
        let removed =
            self.repository.remove_broken_links_for_record(table, uid)?;

        if removed > 0 {
            log::info!(
                "Removed {} broken link(s) belonging to {}:{}",
                removed,
                table,
                uid
            );
            self.notify(removed, &uid.to_string(), String::new())?;
        }

        Ok(())
    }

    fn notify(
        &self,
        count: usize,
        target: &str,
        title: String,
    ) -> Result<(), Error> {
        if !self.options.notify() {
            return Ok(());
        }

        let template = self.translator.translate(locale::BROKEN_LINKS_REMOVED);
        let message = locale::format_removed(&template, count, target);

        self.notifications.enqueue(Notification::new(
            message,
            title,
            self.options.severity(),
        ))
    }
}

impl<'a> RecordListener for ContentChangeReactor<'a> {
    fn after_save(&self, event: &SaveEvent) -> Result<(), Error> {
        self.on_after_save(event)
    }

    fn after_delete(&self, event: &DeleteEvent) -> Result<(), Error> {
        self.on_delete_record(event)
    }
}

impl<'a> Debug for ContentChangeReactor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentChangeReactor")
            .field("options", &self.options)
            .finish()
    }
}
