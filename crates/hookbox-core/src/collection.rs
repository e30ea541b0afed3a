// ABOUTME: The ordered, duplicate-permitting sequence of records and its mutation rules.
// ABOUTME: Implements append, newline rendering, and exact-match or clear-all deletion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Ordered sequence of records. Insertion order is preserved and identical
/// records may appear more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    records: Vec<Record>,
}

/// Result of applying a delete target to a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The target was blank; every record was removed.
    Cleared { removed: usize },
    /// `count` records whose text equalled `text` were removed.
    Deleted { text: String, count: usize },
    /// No record matched; the collection is unchanged.
    NotFound,
}

impl DeleteOutcome {
    /// Whether the collection changed and must be persisted.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cleared { .. } => write!(f, "All data cleared"),
            Self::Deleted { text, .. } => write!(f, "Deleted occurrences of '{}'", text),
            Self::NotFound => write!(f, "Text not found"),
        }
    }
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Add one record at the end.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Text representation of every record, in insertion order.
    pub fn texts(&self) -> impl Iterator<Item = std::borrow::Cow<'_, str>> {
        self.records.iter().map(Record::as_text)
    }

    /// Join every record's text with a single newline. No trailing separator;
    /// an empty collection renders as the empty string.
    pub fn render(&self) -> String {
        self.texts().collect::<Vec<_>>().join("\n")
    }

    /// Apply a delete target.
    ///
    /// A blank or whitespace-only target clears the collection. Any other
    /// target removes every record whose text is exactly equal to it; no
    /// trimming or case folding is applied.
    pub fn delete(&mut self, target: &str) -> DeleteOutcome {
        if target.trim().is_empty() {
            let removed = self.records.len();
            self.records.clear();
            return DeleteOutcome::Cleared { removed };
        }

        let before = self.records.len();
        self.records.retain(|record| record.as_text() != target);
        let count = before - self.records.len();

        if count == 0 {
            DeleteOutcome::NotFound
        } else {
            DeleteOutcome::Deleted {
                text: target.to_string(),
                count,
            }
        }
    }
}

impl FromIterator<Record> for Collection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
