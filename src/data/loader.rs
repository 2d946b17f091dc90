use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use ndarray::Array2;

use super::error::FlexVoltError;
use super::group::ColumnGroup;
use super::literal::parse_metadata;
use super::model::{GroupData, Metadata, Recording};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a FlexVolt recording and return `(processed, raw, time, metadata)`.
///
/// Each group is squeezed: one matching column gives a flat sequence, several
/// give a samples × columns table, none gives [`GroupData::Empty`].
pub fn read_flexvolt(
    path: impl AsRef<Path>,
) -> Result<(GroupData, GroupData, GroupData, Metadata), FlexVoltError> {
    load_recording(path).map(Recording::into_parts)
}

/// Read a FlexVolt recording into a [`Recording`].
///
/// File layout:
///
/// ```text
/// {'deviceId': 'ABC123', 'recording': true, 'rate': 1000}
/// Time,Raw EMG 1,Raw EMG 2,Processed EMG 1,Processed EMG 2
/// 0.000,512,498,3.1,2.9
/// ...
/// ```
pub fn load_recording(path: impl AsRef<Path>) -> Result<Recording, FlexVoltError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FlexVoltError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let recording = parse_recording(BufReader::new(file)).map_err(|err| match err {
        FlexVoltError::Io { source, .. } => FlexVoltError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    log::info!(
        "Loaded {} samples from {} ({} processed, {} raw, {} time columns)",
        recording.n_samples,
        path.display(),
        recording.processed.n_channels(),
        recording.raw.n_channels(),
        recording.time.n_channels(),
    );
    Ok(recording)
}

/// Parse a recording from any buffered reader.
///
/// I/O failures are reported with an empty path; [`load_recording`] fills
/// in the real one.
pub fn parse_recording<R: BufRead>(mut reader: R) -> Result<Recording, FlexVoltError> {
    let meta_line = read_header_line(&mut reader, 1, "metadata line")?;
    let metadata = parse_metadata(&meta_line)?;
    log::debug!("Metadata header: {} keys", metadata.len());

    let header_line = read_header_line(&mut reader, 2, "column header")?;
    let columns = parse_column_header(&header_line);
    log::debug!("Column header: {columns:?}");

    let table = parse_table(reader, columns.len())?;

    let select = |group: ColumnGroup| {
        let indices = group.column_indices(&columns);
        log::debug!("{group} columns: {indices:?}");
        GroupData::select(&table, &indices)
    };
    let time = select(ColumnGroup::Time);
    let raw = select(ColumnGroup::Raw);
    let processed = select(ColumnGroup::Processed);

    Ok(Recording {
        metadata,
        n_samples: table.nrows(),
        columns,
        processed,
        raw,
        time,
    })
}

/// Lowercase and split the column header on commas.  Fields are not trimmed.
pub fn parse_column_header(line: &str) -> Vec<String> {
    line.to_lowercase().split(',').map(str::to_string).collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_header_line<R: BufRead>(
    reader: &mut R,
    line: usize,
    what: &'static str,
) -> Result<String, FlexVoltError> {
    let mut buf = String::new();
    let n = reader.read_line(&mut buf).map_err(|source| FlexVoltError::Io {
        path: Default::default(),
        source,
    })?;
    if n == 0 {
        return Err(FlexVoltError::MissingLine { line, what });
    }
    Ok(strip_line_ending(&buf).to_string())
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Parse the data section (everything after the two header lines).
///
/// Fields are trimmed, `#` starts a comment that runs to the end of the line
/// and lines left empty are skipped.  Quotes get no special treatment.  Every
/// remaining row must have exactly `n_cols` numeric fields.
fn parse_table<R: Read>(reader: R, n_cols: usize) -> Result<Array2<f64>, FlexVoltError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = Vec::new();
    let mut n_rows = 0;

    for result in csv_reader.records() {
        let record = result?;
        // Header lines come before the csv reader's first line.
        let line = record.position().map_or(0, |p| p.line() + 2);

        let mut fields = Vec::with_capacity(n_cols);
        for field in record.iter() {
            match field.find('#') {
                Some(at) => {
                    fields.push(field[..at].trim());
                    break;
                }
                None => fields.push(field),
            }
        }

        if fields.len() == 1 && fields[0].is_empty() {
            continue;
        }
        if fields.len() != n_cols {
            return Err(FlexVoltError::FieldCount {
                line,
                expected: n_cols,
                found: fields.len(),
            });
        }

        for (column, field) in fields.iter().enumerate() {
            let value = field
                .parse::<f64>()
                .map_err(|_| FlexVoltError::InvalidNumber {
                    line,
                    column,
                    value: field.to_string(),
                })?;
            values.push(value);
        }
        n_rows += 1;
    }

    Ok(Array2::from_shape_vec((n_rows, n_cols), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MetadataValue;
    use ndarray::array;

    fn parse(text: &str) -> Result<Recording, FlexVoltError> {
        parse_recording(text.as_bytes())
    }

    #[test]
    fn header_is_lowercased_and_not_trimmed() {
        assert_eq!(
            parse_column_header("Time, Raw 1 ,PROCESS"),
            vec!["time", " raw 1 ", "process"]
        );
    }

    #[test]
    fn parses_crlf_file() {
        let rec = parse("{'id': 7}\r\nTime,Raw 1\r\n0,1\r\n1,2\r\n").unwrap();
        assert_eq!(rec.columns, vec!["time", "raw 1"]);
        assert_eq!(rec.metadata["id"], MetadataValue::Integer(7));
        assert_eq!(rec.time, GroupData::Single(array![0.0, 1.0]));
        assert_eq!(rec.raw, GroupData::Single(array![1.0, 2.0]));
        assert_eq!(rec.processed, GroupData::Empty);
    }

    #[test]
    fn skips_blank_and_comment_lines_and_trims_fields() {
        let rec = parse("{}\ntime,raw\n 0 , 1\n\n# pause\n   \n1,\t2\n").unwrap();
        assert_eq!(rec.n_samples, 2);
        assert_eq!(rec.raw, GroupData::Single(array![1.0, 2.0]));
    }

    #[test]
    fn trailing_and_indented_comments_are_stripped() {
        let rec = parse("{}\ntime,raw\n0,1 # start\n  # note, with comma\n1,2#\n").unwrap();
        assert_eq!(rec.n_samples, 2);
        assert_eq!(rec.raw, GroupData::Single(array![1.0, 2.0]));
    }

    #[test]
    fn comment_inside_a_row_cuts_the_rest() {
        let err = parse("{}\ntime,raw,process\n0,1 # ,2\n").unwrap_err();
        assert!(matches!(
            err,
            FlexVoltError::FieldCount { line: 3, expected: 3, found: 2 }
        ));
    }

    #[test]
    fn quoted_numbers_are_not_numbers() {
        let err = parse("{}\ntime,raw\n\"0\",\"1\"\n").unwrap_err();
        match err {
            FlexVoltError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, 0);
                assert_eq!(value, "\"0\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_only_file_has_no_samples() {
        let rec = parse("{}\ntime,raw 1,raw 2\n").unwrap();
        assert_eq!(rec.n_samples, 0);
        assert_eq!(rec.time.n_rows(), 0);
        assert_eq!(rec.time.n_channels(), 1);
        assert_eq!(rec.raw.n_channels(), 2);
        assert_eq!(rec.raw.n_rows(), 0);
    }

    #[test]
    fn short_row_reports_file_line() {
        let err = parse("{}\ntime,raw,process\n0,1,2\n1,2\n").unwrap_err();
        match err {
            FlexVoltError::FieldCount {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 4);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let err = parse("{}\ntime,raw\n0,abc\n").unwrap_err();
        match err {
            FlexVoltError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, 1);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_header_lines() {
        assert!(matches!(
            parse("").unwrap_err(),
            FlexVoltError::MissingLine { line: 1, .. }
        ));
        assert!(matches!(
            parse("{'a': 1}\n").unwrap_err(),
            FlexVoltError::MissingLine { line: 2, .. }
        ));
    }

    #[test]
    fn bad_metadata_fails_before_columns_are_read() {
        assert!(matches!(
            parse("not a literal").unwrap_err(),
            FlexVoltError::Metadata(_)
        ));
    }
}
