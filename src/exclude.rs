//! Exclude rules: administrator-defined link targets which should never be
//! reported as broken.

use std::{fmt, str::FromStr};
use url::Url;

/// The table exclude rules are stored in.
pub const EXCLUDE_TABLE: &str = "tx_brofix_exclude_link_target";

/// How an exclude rule's link target is compared against a URL.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-1", serde(rename_all = "lowercase"))]
pub enum MatchKind {
    /// The URL must be identical to the link target.
    Exact,
    /// The URL's host must be the link target.
    Domain,
}

impl MatchKind {
    /// The name used when storing the rule.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Domain => "domain",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when parsing an unknown [`MatchKind`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown match kind \"{0}\"")]
pub struct UnknownMatchKind(pub String);

impl FromStr for MatchKind {
    type Err = UnknownMatchKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(MatchKind::Exact),
            "domain" => Ok(MatchKind::Domain),
            other => Err(UnknownMatchKind(other.to_string())),
        }
    }
}

/// A fully specified exclude rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct ExcludeRule {
    /// The URL (or domain) to exclude.
    pub link_target: String,
    /// Which kind of links the rule applies to.
    pub link_type: String,
    /// How [`ExcludeRule::link_target`] is compared.
    pub match_kind: MatchKind,
    /// The storage folder the rule lives in.
    pub pid: i64,
}

impl ExcludeRule {
    /// Does this rule exclude `url`?
    pub fn matches(&self, url: &str, link_type: &str) -> bool {
        if link_type != self.link_type {
            return false;
        }

        match self.match_kind {
            MatchKind::Exact => url == self.link_target,
            MatchKind::Domain => match Url::parse(url) {
                Ok(parsed) => parsed
                    .host_str()
                    .map(|host| host.eq_ignore_ascii_case(&self.link_target))
                    .unwrap_or(false),
                Err(_) => false,
            },
        }
    }
}
