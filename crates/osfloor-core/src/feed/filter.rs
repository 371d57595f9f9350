//! Title substring filter for release announcements.

use serde::{Deserialize, Serialize};

use super::ReleaseAnnouncement;

/// Keeps titles that contain every `include` substring and no `exclude` one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl TitleFilter {
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn matches(&self, title: &str) -> bool {
        if self.case_sensitive {
            self.include.iter().all(|s| title.contains(s.as_str()))
                && !self.exclude.iter().any(|s| title.contains(s.as_str()))
        } else {
            let title = title.to_lowercase();
            self.include
                .iter()
                .all(|s| title.contains(&s.to_lowercase()))
                && !self
                    .exclude
                    .iter()
                    .any(|s| title.contains(&s.to_lowercase()))
        }
    }

    /// First matching announcement in feed order.
    pub fn newest<'a>(&self, items: &'a [ReleaseAnnouncement]) -> Option<&'a ReleaseAnnouncement> {
        items.iter().find(|item| self.matches(&item.title))
    }
}

/// First title in `titles` that passes `filter`.
pub fn filter_titles<'a, S: AsRef<str>>(titles: &'a [S], filter: &TitleFilter) -> Option<&'a str> {
    titles
        .iter()
        .map(AsRef::as_ref)
        .find(|title| filter.matches(title))
}
