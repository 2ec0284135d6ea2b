//! Localized message templates.

use std::collections::HashMap;

/// The label used as a title for messages about the exclude list.
pub const EXCLUDE_LIST: &str = "exclude_list";
/// The template used when broken link records were removed. Accepts the
/// `{count}` and `{target}` placeholders.
pub const BROKEN_LINKS_REMOVED: &str = "broken_links_removed";

/// Resolves message keys to text in the acting user's language.
pub trait Translator {
    /// Get the template for `key`.
    ///
    /// Implementations should fall back to returning the key itself rather
    /// than failing.
    fn translate(&self, key: &str) -> String;
}

impl<'t, T: Translator + ?Sized> Translator for &'t T {
    fn translate(&self, key: &str) -> String { (**self).translate(key) }
}

/// A simple in-memory [`Translator`].
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    labels: HashMap<String, String>,
}

impl Catalog {
    /// Create a [`Catalog`] with no labels at all.
    pub fn empty() -> Self {
        Catalog {
            labels: HashMap::new(),
        }
    }

    /// Create a [`Catalog`] populated with the English labels.
    pub fn english() -> Self {
        Catalog::empty()
            .with_label(EXCLUDE_LIST, "Exclude list")
            .with_label(
                BROKEN_LINKS_REMOVED,
                "{count} broken link record(s) removed for {target}",
            )
    }

    /// Add or replace a label.
    pub fn with_label<K, V>(mut self, key: K, label: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.labels.insert(key.into(), label.into());
        self
    }
}

impl Default for Catalog {
    fn default() -> Self { Catalog::english() }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> String {
        match self.labels.get(key) {
            Some(label) => label.clone(),
            None => {
                log::debug!("No label for \"{}\"", key);
                key.to_string()
            },
        }
    }
}

/// Substitute a count and a target into a message template.
pub fn format_removed(template: &str, count: usize, target: &str) -> String {
    template
        .replace("{count}", &count.to_string())
        .replace("{target}", target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_fall_back_to_the_key() {
        let catalog = Catalog::empty();

        assert_eq!(catalog.translate(EXCLUDE_LIST), EXCLUDE_LIST);
    }

    #[test]
    fn fill_in_the_removed_template() {
        let catalog = Catalog::english();
        let template = catalog.translate(BROKEN_LINKS_REMOVED);

        let got = format_removed(&template, 2, "https://example.com/x");

        assert_eq!(
            got,
            "2 broken link record(s) removed for https://example.com/x"
        );
    }

    #[test]
    fn labels_can_be_overridden() {
        let catalog = Catalog::english().with_label(
            BROKEN_LINKS_REMOVED,
            "{count} Links entfernt ({target})",
        );

        let got =
            format_removed(&catalog.translate(BROKEN_LINKS_REMOVED), 3, "42");

        assert_eq!(got, "3 Links entfernt (42)");
    }
}
