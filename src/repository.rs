//! Storage for broken link records.

use crate::{exclude::ExcludeRule, Error, MatchKind};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The store of broken link records.
///
/// Implementations typically wrap the host's database. Errors are passed
/// straight back to the caller.
pub trait BrokenLinkRepository {
    /// Delete every broken link found in a particular record, returning how
    /// many rows were deleted.
    fn remove_broken_links_for_record(
        &self,
        table: &str,
        uid: u64,
    ) -> Result<usize, Error>;

    /// Delete every broken link excluded by an exclude rule, returning how
    /// many rows were deleted.
    fn remove_broken_links_for_link_target(
        &self,
        link_target: &str,
        link_type: &str,
        match_kind: &str,
        pid: i64,
    ) -> Result<usize, Error>;
}

impl<'r, R: BrokenLinkRepository + ?Sized> BrokenLinkRepository for &'r R {
    fn remove_broken_links_for_record(
        &self,
        table: &str,
        uid: u64,
    ) -> Result<usize, Error> {
        (**self).remove_broken_links_for_record(table, uid)
    }

    fn remove_broken_links_for_link_target(
        &self,
        link_target: &str,
        link_type: &str,
        match_kind: &str,
        pid: i64,
    ) -> Result<usize, Error> {
        (**self).remove_broken_links_for_link_target(
            link_target,
            link_type,
            match_kind,
            pid,
        )
    }
}

/// A link, found in some record, which was checked and found to be broken.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct BrokenLinkRecord {
    /// The table containing the record with the link.
    pub table: String,
    /// The record's uid.
    pub record_uid: u64,
    /// The field the link was found in.
    pub field: String,
    /// The broken link target.
    pub url: String,
    /// The kind of link.
    pub link_type: String,
    /// The storage folder whose exclude rules apply to this link.
    pub exclude_link_targets_pid: i64,
}

/// A [`BrokenLinkRepository`] which keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    records: Mutex<Vec<BrokenLinkRecord>>,
}

impl MemoryRepository {
    /// Create an empty [`MemoryRepository`].
    pub fn new() -> Self { MemoryRepository::default() }

    /// Record a broken link.
    pub fn insert(&self, record: BrokenLinkRecord) { self.lock().push(record); }

    /// Get a copy of every broken link record.
    pub fn records(&self) -> Vec<BrokenLinkRecord> { self.lock().clone() }

    /// How many broken links are currently known?
    pub fn len(&self) -> usize { self.lock().len() }

    /// Are there no broken links at all?
    pub fn is_empty(&self) -> bool { self.lock().is_empty() }

    fn lock(&self) -> MutexGuard<'_, Vec<BrokenLinkRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove_where<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&BrokenLinkRecord) -> bool,
    {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|record| !predicate(record));
        before - records.len()
    }
}

impl Extend<BrokenLinkRecord> for MemoryRepository {
    fn extend<T: IntoIterator<Item = BrokenLinkRecord>>(&mut self, iter: T) {
        self.records
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(iter);
    }
}

impl BrokenLinkRepository for MemoryRepository {
    fn remove_broken_links_for_record(
        &self,
        table: &str,
        uid: u64,
    ) -> Result<usize, Error> {
        Ok(self.remove_where(|record| {
            record.table == table && record.record_uid == uid
        }))
    }

    fn remove_broken_links_for_link_target(
        &self,
        link_target: &str,
        link_type: &str,
        match_kind: &str,
        pid: i64,
    ) -> Result<usize, Error> {
        let match_kind = match match_kind.parse::<MatchKind>() {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!(
                    "Ignoring exclude rule for \"{}\": {}",
                    link_target,
                    e
                );
                return Ok(0);
            },
        };
        let rule = ExcludeRule {
            link_target: link_target.to_string(),
            link_type: link_type.to_string(),
            match_kind,
            pid,
        };

        Ok(self.remove_where(|record| {
            record.exclude_link_targets_pid == rule.pid
                && rule.matches(&record.url, &record.link_type)
        }))
    }
}
