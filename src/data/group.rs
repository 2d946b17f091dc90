use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column groups: which header entries belong to time / raw / processed
// ---------------------------------------------------------------------------

/// The three logical column groups of a FlexVolt recording.
///
/// A column belongs to a group when its name contains the group's needle,
/// ignoring case.  Groups are not exclusive: a column named
/// `raw_process_time` belongs to all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnGroup {
    Time,
    Raw,
    Processed,
}

impl ColumnGroup {
    pub const ALL: [ColumnGroup; 3] = [ColumnGroup::Time, ColumnGroup::Raw, ColumnGroup::Processed];

    /// The lowercase substring a column name must contain.
    pub fn needle(self) -> &'static str {
        match self {
            ColumnGroup::Time => "time",
            ColumnGroup::Raw => "raw",
            ColumnGroup::Processed => "process",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            ColumnGroup::Time => "Time",
            ColumnGroup::Raw => "Raw",
            ColumnGroup::Processed => "Processed",
        }
    }

    pub fn matches(self, column: &str) -> bool {
        column.to_lowercase().contains(self.needle())
    }

    /// Indices of the header entries in this group, in header order.
    pub fn column_indices<S: AsRef<str>>(self, header: &[S]) -> Vec<usize> {
        header
            .iter()
            .enumerate()
            .filter(|(_, name)| self.matches(name.as_ref()))
            .map(|(i, _)| i)
            .collect()
    }
}

impl fmt::Display for ColumnGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every group a column name belongs to.
pub fn classify(column: &str) -> Vec<ColumnGroup> {
    ColumnGroup::ALL
        .into_iter()
        .filter(|g| g.matches(column))
        .collect()
}
