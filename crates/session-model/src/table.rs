//! Column lookup and typed cell parsing for CSV inputs.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use ballgaze_common::error::{GazeError, GazeResult};

/// Open a CSV reader with headers and trimmed cells.
pub fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader)
}

/// Resolve the positions of `columns` in the header row.
///
/// Fails with `MissingColumn` on the first column that is absent.
pub fn column_indices<const N: usize>(
    headers: &csv::StringRecord,
    columns: [&str; N],
    source: &Path,
) -> GazeResult<[usize; N]> {
    let mut indices = [0usize; N];
    for (slot, column) in indices.iter_mut().zip(columns) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| GazeError::missing_column(column, source))?;
    }
    Ok(indices)
}

/// Parse one cell as `T`. `row` is the 1-based data row for error messages.
pub fn parse_cell<T: FromStr>(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    row: usize,
) -> GazeResult<T> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse()
        .map_err(|_| GazeError::invalid_field(column, raw, row))
}

/// Parse a frame index cell. Pupil Player occasionally writes integral
/// floats (`"30.0"`) for index columns; those are accepted.
pub fn parse_frame_index(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    row: usize,
) -> GazeResult<u64> {
    let raw = record.get(idx).unwrap_or_default();
    if let Ok(value) = raw.parse::<u64>() {
        return Ok(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 => {
            Ok(value as u64)
        }
        _ => Err(GazeError::invalid_field(column, raw, row)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_column_indices_resolve_in_any_order() {
        let headers = record(&["b", "a", "c"]);
        let [a, c] = column_indices(&headers, ["a", "c"], Path::new("t.csv")).unwrap();
        assert_eq!((a, c), (1, 2));
    }

    #[test]
    fn test_missing_column_named() {
        let headers = record(&["a"]);
        let err = column_indices(&headers, ["a", "zzz"], Path::new("t.csv")).unwrap_err();
        assert!(matches!(err, GazeError::MissingColumn { ref column, .. } if column == "zzz"));
    }

    #[test]
    fn test_frame_index_accepts_integral_float() {
        let rec = record(&["30", "31.0", "2.5", "-1"]);
        assert_eq!(parse_frame_index(&rec, 0, "f", 1).unwrap(), 30);
        assert_eq!(parse_frame_index(&rec, 1, "f", 1).unwrap(), 31);
        assert!(parse_frame_index(&rec, 2, "f", 1).is_err());
        assert!(parse_frame_index(&rec, 3, "f", 1).is_err());
    }
}
