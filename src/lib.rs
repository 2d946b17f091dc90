//! Reader for EMG recordings saved by the FlexVolt recording plugin.
//!
//! ```no_run
//! let (processed, raw, time, metadata) =
//!     flexvolt_viewer::read_flexvolt("flexvolt-recorded-data.txt")?;
//! println!("{} raw channels, rate = {:?}", raw.n_channels(), metadata.get("rate"));
//! # let _ = (processed, time);
//! # Ok::<(), flexvolt_viewer::FlexVoltError>(())
//! ```

pub mod data;

pub use data::error::{FlexVoltError, MetadataError, MetadataErrorKind};
pub use data::group::{classify, ColumnGroup};
pub use data::literal::{parse_literal, parse_metadata};
pub use data::loader::{load_recording, parse_column_header, parse_recording, read_flexvolt};
pub use data::model::{GroupData, Metadata, MetadataValue, Recording};
pub use ndarray;
