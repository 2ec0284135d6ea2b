use crate::exclude::ExcludeRule;
use std::collections::HashMap;

/// The table holding pages.
pub const PAGES_TABLE: &str = "pages";
/// The table holding content elements.
pub const CONTENT_TABLE: &str = "tt_content";

/// Was the saved record created or updated?
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SaveStatus {
    /// The record was just created.
    New,
    /// An existing record was modified.
    Update,
}

/// Information about the operation the host is performing.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct EventContext {
    /// Is the host importing records in bulk?
    pub is_importing: bool,
    /// The acting user's workspace. `0` is the live workspace.
    pub workspace: u32,
}

impl EventContext {
    /// A change made directly in the live workspace.
    pub fn live() -> Self { EventContext::default() }

    /// Is this a change editors will actually see (i.e. not an import and
    /// not a draft workspace)?
    pub fn is_live_edit(&self) -> bool {
        !self.is_importing && self.workspace == 0
    }
}

/// The fields of an exclude rule. `None` means the field wasn't part of the
/// change (or is missing from the stored row).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeRuleFields {
    /// The URL or domain being excluded.
    pub linktarget: Option<String>,
    /// The kind of links the rule applies to.
    pub link_type: Option<String>,
    /// `"exact"` or `"domain"`, stored in the `match` column.
    pub match_kind: Option<String>,
    /// The storage folder the rule lives in.
    pub pid: Option<i64>,
}

impl ExcludeRuleFields {
    /// Does the change touch a field which decides what the rule matches?
    pub fn touches_matching(&self) -> bool {
        self.linktarget.is_some()
            || self.link_type.is_some()
            || self.match_kind.is_some()
    }

    /// Get the raw parts of the rule, if every field is filled in.
    ///
    /// Empty strings count as missing.
    pub fn complete(&self) -> Option<(&str, &str, &str, i64)> {
        let linktarget = non_empty(&self.linktarget)?;
        let link_type = non_empty(&self.link_type)?;
        let match_kind = non_empty(&self.match_kind)?;
        let pid = self.pid?;

        Some((linktarget, link_type, match_kind, pid))
    }
}

impl From<ExcludeRule> for ExcludeRuleFields {
    fn from(rule: ExcludeRule) -> Self {
        ExcludeRuleFields {
            linktarget: Some(rule.link_target),
            link_type: Some(rule.link_type),
            match_kind: Some(rule.match_kind.to_string()),
            pid: Some(rule.pid),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Changed fields of a page or content element which matter for broken
/// link bookkeeping.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ContentFields {
    /// The new value of the `hidden` flag.
    pub hidden: Option<bool>,
    /// The workspace stage (`t3ver_stage`), where `0` means "editing".
    pub t3ver_stage: Option<i64>,
}

impl ContentFields {
    /// Did this change hide a record outside of any review stage?
    pub fn hides_record(&self) -> bool {
        self.hidden == Some(true) && self.t3ver_stage.unwrap_or(0) == 0
    }
}

/// Every field the host may report as changed, regardless of table.
///
/// This is what a host adapter fills in before handing it to
/// [`RecordChange::classify()`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedFields {
    /// `linktarget` (exclude rules).
    pub linktarget: Option<String>,
    /// `link_type` (exclude rules).
    pub link_type: Option<String>,
    /// `match` (exclude rules).
    pub match_kind: Option<String>,
    /// `pid` (exclude rules).
    pub pid: Option<i64>,
    /// `hidden` (pages and content elements).
    pub hidden: Option<bool>,
    /// `t3ver_stage` (pages and content elements).
    pub t3ver_stage: Option<i64>,
}

/// The name of a table with no broken link bookkeeping of its own.
///
/// Only [`RecordChange::classify()`] creates these, so a page or content
/// element can never end up being treated as an unrelated table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtherTable(String);

impl OtherTable {
    /// The table's name.
    pub fn as_str(&self) -> &str { &self.0 }
}

/// The changed fields of a saved record, by table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordChange {
    /// A change to an exclude rule.
    ExcludeRule(ExcludeRuleFields),
    /// A change to a page.
    Page(ContentFields),
    /// A change to a content element.
    Content(ContentFields),
    /// A change to some table we don't care about.
    Other(OtherTable),
}

impl RecordChange {
    /// Work out which kind of change the host is reporting, keeping only
    /// the fields which matter for that table.
    ///
    /// `exclude_table` is the name of the table exclude rules are stored in
    /// (usually [`crate::exclude::EXCLUDE_TABLE`]).
    pub fn classify<S: Into<String>>(
        table: S,
        exclude_table: &str,
        fields: ChangedFields,
    ) -> Self {
        let table = table.into();
        let content = ContentFields {
            hidden: fields.hidden,
            t3ver_stage: fields.t3ver_stage,
        };

        if table == exclude_table {
            RecordChange::ExcludeRule(ExcludeRuleFields {
                linktarget: fields.linktarget,
                link_type: fields.link_type,
                match_kind: fields.match_kind,
                pid: fields.pid,
            })
        } else if table == PAGES_TABLE {
            RecordChange::Page(content)
        } else if table == CONTENT_TABLE {
            RecordChange::Content(content)
        } else {
            RecordChange::Other(OtherTable(table))
        }
    }

    /// The table the changed record lives in, given the name of the exclude
    /// rule table.
    pub fn table<'t>(&'t self, exclude_table: &'t str) -> &'t str {
        match self {
            RecordChange::ExcludeRule(_) => exclude_table,
            RecordChange::Page(_) => PAGES_TABLE,
            RecordChange::Content(_) => CONTENT_TABLE,
            RecordChange::Other(table) => table.as_str(),
        }
    }
}

/// A record was created or updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEvent {
    #[allow(missing_docs)]
    pub status: SaveStatus,
    /// The saved record's uid.
    pub uid: u64,
    /// The fields which were changed.
    pub change: RecordChange,
    #[allow(missing_docs)]
    pub context: EventContext,
}

impl SaveEvent {
    /// Create a [`SaveEvent`] for a change in the live workspace.
    pub fn new(status: SaveStatus, uid: u64, change: RecordChange) -> Self {
        SaveEvent {
            status,
            uid,
            change,
            context: EventContext::live(),
        }
    }

    /// Set the [`EventContext`].
    pub fn with_context(self, context: EventContext) -> Self {
        SaveEvent { context, ..self }
    }
}

/// A record was deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteEvent {
    /// The table the record lived in.
    pub table: String,
    /// The deleted record's uid.
    pub uid: u64,
    /// The record as it was before deletion, if the host supplied it.
    pub snapshot: Option<HashMap<String, String>>,
    /// Did the host actually delete the record?
    pub was_deleted: bool,
    #[allow(missing_docs)]
    pub context: EventContext,
}

impl DeleteEvent {
    /// Create a [`DeleteEvent`] for a record which was deleted in the live
    /// workspace.
    pub fn new<S: Into<String>>(table: S, uid: u64) -> Self {
        DeleteEvent {
            table: table.into(),
            uid,
            snapshot: None,
            was_deleted: true,
            context: EventContext::live(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclude::EXCLUDE_TABLE;
    use pretty_assertions::assert_eq;

    fn hidden() -> ChangedFields {
        ChangedFields {
            hidden: Some(true),
            t3ver_stage: Some(0),
            ..Default::default()
        }
    }

    #[test]
    fn known_tables_are_never_classified_as_other() {
        let page = RecordChange::classify("pages", EXCLUDE_TABLE, hidden());
        let content =
            RecordChange::classify("tt_content", EXCLUDE_TABLE, hidden());

        let expected = ContentFields {
            hidden: Some(true),
            t3ver_stage: Some(0),
        };
        assert_eq!(page, RecordChange::Page(expected));
        assert_eq!(content, RecordChange::Content(expected));
        assert_eq!(content.table(EXCLUDE_TABLE), CONTENT_TABLE);
    }

    #[test]
    fn exclude_rules_keep_only_their_own_fields() {
        let fields = ChangedFields {
            linktarget: Some(String::from("example.com")),
            match_kind: Some(String::from("domain")),
            hidden: Some(true),
            ..Default::default()
        };

        let got = RecordChange::classify(EXCLUDE_TABLE, EXCLUDE_TABLE, fields);

        assert_eq!(
            got,
            RecordChange::ExcludeRule(ExcludeRuleFields {
                linktarget: Some(String::from("example.com")),
                match_kind: Some(String::from("domain")),
                ..Default::default()
            })
        );
    }

    #[test]
    fn the_exclude_table_can_be_renamed() {
        let renamed =
            RecordChange::classify("tx_exclude", "tx_exclude", hidden());
        let stock =
            RecordChange::classify(EXCLUDE_TABLE, "tx_exclude", hidden());

        assert!(matches!(renamed, RecordChange::ExcludeRule(_)));
        assert_eq!(renamed.table("tx_exclude"), "tx_exclude");
        match stock {
            RecordChange::Other(table) => {
                assert_eq!(table.as_str(), EXCLUDE_TABLE)
            },
            other => panic!("Expected an unrelated table, got {:?}", other),
        }
    }

    #[test]
    fn empty_strings_make_a_rule_incomplete() {
        let fields = ExcludeRuleFields {
            linktarget: Some(String::new()),
            link_type: Some(String::from("external")),
            match_kind: Some(String::from("exact")),
            pid: Some(1),
        };

        assert!(fields.touches_matching());
        assert_eq!(fields.complete(), None);
    }

    #[test]
    fn a_full_rule_is_complete() {
        let fields = ExcludeRuleFields::from(ExcludeRule {
            link_target: String::from("example.com"),
            link_type: String::from("external"),
            match_kind: crate::MatchKind::Domain,
            pid: 0,
        });

        assert_eq!(
            fields.complete(),
            Some(("example.com", "external", "domain", 0))
        );
    }

    #[test]
    fn a_pid_on_its_own_doesnt_touch_matching() {
        let fields = ExcludeRuleFields {
            pid: Some(4),
            ..Default::default()
        };

        assert!(!fields.touches_matching());
    }

    #[test]
    fn only_unstaged_hiding_counts() {
        let hide = |stage| ContentFields {
            hidden: Some(true),
            t3ver_stage: stage,
        };

        assert!(hide(None).hides_record());
        assert!(hide(Some(0)).hides_record());
        assert!(!hide(Some(1)).hides_record());
        assert!(!ContentFields {
            hidden: Some(false),
            t3ver_stage: None
        }
        .hides_record());
    }
}
