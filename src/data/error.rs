use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Reader errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while reading a FlexVolt recording.
///
/// Reading is fail-fast: any of these aborts the whole read and no partial
/// recording is returned.
#[derive(Debug, Error)]
pub enum FlexVoltError {
    /// The file could not be opened or read.
    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file ended before one of the two header lines.
    #[error("file ended before the {what} (line {line})")]
    MissingLine { line: usize, what: &'static str },

    /// Line 1 is not a valid metadata literal.
    #[error("invalid metadata header")]
    Metadata(#[from] MetadataError),

    /// The data section could not be tokenised.
    #[error("malformed data record")]
    Csv(#[from] csv::Error),

    /// A data field is not a floating-point number.
    #[error("line {line}, column {column}: '{value}' is not a number")]
    InvalidNumber {
        line: u64,
        column: usize,
        value: String,
    },

    /// The parsed rows do not form a rows × columns table.
    #[error("data section does not form a table")]
    Shape(#[from] ndarray::ShapeError),

    /// A data row is wider or narrower than the column header.
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },
}

// ---------------------------------------------------------------------------
// Metadata literal errors
// ---------------------------------------------------------------------------

/// A metadata literal parse failure, located by byte offset into the line.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at byte {offset}")]
pub struct MetadataError {
    pub offset: usize,
    pub kind: MetadataErrorKind,
}

impl MetadataError {
    pub(crate) fn new(offset: usize, kind: MetadataErrorKind) -> Self {
        Self { offset, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetadataErrorKind {
    UnexpectedEnd,
    UnexpectedChar(char),
    UnterminatedString,
    InvalidEscape,
    InvalidNumber(String),
    TooDeep,
    UnknownWord(String),
    NonStringKey,
    NotAMap,
    TrailingInput,
}

impl fmt::Display for MetadataErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataErrorKind::UnexpectedEnd => write!(f, "unexpected end of input"),
            MetadataErrorKind::UnexpectedChar(c) => write!(f, "unexpected character '{c}'"),
            MetadataErrorKind::UnterminatedString => write!(f, "unterminated string"),
            MetadataErrorKind::InvalidEscape => write!(f, "invalid escape sequence"),
            MetadataErrorKind::InvalidNumber(s) => write!(f, "invalid number '{s}'"),
            MetadataErrorKind::TooDeep => {
                write!(f, "nesting deeper than {} levels", super::literal::MAX_DEPTH)
            }
            MetadataErrorKind::UnknownWord(w) => write!(f, "unknown identifier '{w}'"),
            MetadataErrorKind::NonStringKey => write!(f, "map keys must be strings"),
            MetadataErrorKind::NotAMap => write!(f, "metadata must be a {{...}} mapping"),
            MetadataErrorKind::TrailingInput => write!(f, "unexpected trailing input"),
        }
    }
}
