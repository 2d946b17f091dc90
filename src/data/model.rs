use std::collections::BTreeMap;
use std::fmt;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::Serialize;

use super::group::ColumnGroup;

// ---------------------------------------------------------------------------
// MetadataValue – a single value in the header literal
// ---------------------------------------------------------------------------

/// A dynamically-typed value from the metadata header line.
///
/// Serialises untagged, so a metadata record turns into plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<MetadataValue>),
    Map(BTreeMap<String, MetadataValue>),
    Null,
}

/// The parsed metadata header: key → value.
pub type Metadata = BTreeMap<String, MetadataValue>;

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            MetadataValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            MetadataValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// GroupData – one column group after squeezing
// ---------------------------------------------------------------------------

/// The columns of one [`ColumnGroup`], shaped by how many columns matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum GroupData {
    /// No header entry matched.
    Empty,
    /// Exactly one column matched: a flat sequence, one value per sample.
    Single(Array1<f64>),
    /// Several columns matched: samples × matched columns.
    Multi(Array2<f64>),
}

impl GroupData {
    /// Extract `indices` (in the given order) from `table` and squeeze the
    /// result.  Every index must be a column of `table`.
    pub(crate) fn select(table: &Array2<f64>, indices: &[usize]) -> Self {
        match indices {
            [] => GroupData::Empty,
            [col] => GroupData::Single(table.column(*col).to_owned()),
            _ => GroupData::Multi(table.select(Axis(1), indices)),
        }
    }

    /// Number of columns (channels) in this group.
    pub fn n_channels(&self) -> usize {
        match self {
            GroupData::Empty => 0,
            GroupData::Single(_) => 1,
            GroupData::Multi(t) => t.ncols(),
        }
    }

    /// Number of samples.  An empty group has none.
    pub fn n_rows(&self) -> usize {
        match self {
            GroupData::Empty => 0,
            GroupData::Single(v) => v.len(),
            GroupData::Multi(t) => t.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, GroupData::Empty)
    }

    pub fn as_single(&self) -> Option<&Array1<f64>> {
        match self {
            GroupData::Single(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Array2<f64>> {
        match self {
            GroupData::Multi(t) => Some(t),
            _ => None,
        }
    }

    /// One channel as a 1-D view.
    pub fn channel(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        match self {
            GroupData::Empty => None,
            GroupData::Single(v) => (index == 0).then(|| v.view()),
            GroupData::Multi(t) => (index < t.ncols()).then(|| t.column(index)),
        }
    }

    /// All channels copied out as flat sequences, in header order.
    pub fn channels(&self) -> Vec<Vec<f64>> {
        (0..self.n_channels())
            .filter_map(|i| self.channel(i))
            .map(|c| c.to_vec())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Recording – the complete loaded file
// ---------------------------------------------------------------------------

/// A fully parsed FlexVolt recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recording {
    /// The metadata header (line 1).
    pub metadata: Metadata,
    /// Lowercased column names (line 2), untrimmed.
    pub columns: Vec<String>,
    /// Number of data rows read.
    pub n_samples: usize,
    pub processed: GroupData,
    pub raw: GroupData,
    pub time: GroupData,
}

impl Recording {
    pub fn group(&self, group: ColumnGroup) -> &GroupData {
        match group {
            ColumnGroup::Time => &self.time,
            ColumnGroup::Raw => &self.raw,
            ColumnGroup::Processed => &self.processed,
        }
    }

    /// The x axis for plotting: the first time column, or the sample index
    /// when the file has no time column.
    pub fn time_axis(&self) -> Vec<f64> {
        self.time
            .channel(0)
            .map(|c| c.to_vec())
            .unwrap_or_else(|| (0..self.n_samples).map(|i| i as f64).collect())
    }

    /// Split into `(processed, raw, time, metadata)`.
    pub fn into_parts(self) -> (GroupData, GroupData, GroupData, Metadata) {
        (self.processed, self.raw, self.time, self.metadata)
    }
}
