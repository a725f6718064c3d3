//! Derived views over a notes snapshot: search and sort.

use std::fmt;
use std::str::FromStr;

use crate::models::Note;

/// Sort key for [`filtered_notes`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Most recently created first.
    #[default]
    CreatedAt,
    /// Title, ascending.
    Title,
}

impl SortBy {
    /// Parse a sort key, falling back to [`SortBy::CreatedAt`] for anything
    /// unrecognized.
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "createdAt",
            SortBy::Title => "title",
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(SortBy::CreatedAt),
            "title" => Ok(SortBy::Title),
            other => Err(format!("Unknown sort key: {other}")),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter `notes` by a case-insensitive substring over title or content, then
/// sort. The input is never modified; ties keep their original order.
pub fn filtered_notes(notes: &[Note], search: &str, sort_by: SortBy) -> Vec<Note> {
    let mut view: Vec<Note> = if search.is_empty() {
        notes.to_vec()
    } else {
        let needle = search.to_lowercase();
        notes
            .iter()
            .filter(|n| {
                n.title.to_lowercase().contains(&needle)
                    || n.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    };

    match sort_by {
        SortBy::Title => view.sort_by(|a, b| a.title.cmp(&b.title)),
        SortBy::CreatedAt => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    view
}
