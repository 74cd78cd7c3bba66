use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{Duration, NaiveDateTime};
use log::debug;
use std::path::Path;

use crate::error::{InjectError, Result};

const ACTIONS_COLUMN: u32 = 0;
const EXPECTED_RESULTS_COLUMN: u32 = 1;

/// Actions and expected results of every row of the first sheet, in order
///
/// There is no header row. Rows run from the first used row to the last
/// used row; a missing cell reads as empty text.
pub fn read_step_rows<P: AsRef<Path>>(path: P) -> Result<Vec<(String, String)>> {
    let path = path.as_ref();
    let spreadsheet_error = |source| InjectError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InjectError::NoSheets {
            path: path.to_path_buf(),
        })?
        .map_err(spreadsheet_error)?;

    let rows = rows_from_range(&range)?;
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn rows_from_range(range: &Range<Data>) -> Result<Vec<(String, String)>> {
    let (Some((first_row, _)), Some((last_row, _))) = (range.start(), range.end()) else {
        return Ok(Vec::new());
    };

    (first_row..=last_row)
        .map(|row| {
            let actions =
                cell_text(range.get_value((row, ACTIONS_COLUMN)), row, ACTIONS_COLUMN)?;
            let expected_results = cell_text(
                range.get_value((row, EXPECTED_RESULTS_COLUMN)),
                row,
                EXPECTED_RESULTS_COLUMN,
            )?;
            Ok((actions, expected_results))
        })
        .collect()
}

/// Text form of a cell; `row` and `column` are zero-based sheet positions
pub(crate) fn cell_text(cell: Option<&Data>, row: u32, column: u32) -> Result<String> {
    let serialization_error = |reason: String| InjectError::Serialization {
        row: row as usize + 1,
        column: column as usize + 1,
        reason,
    };

    let Some(cell) = cell else {
        return Ok(String::new());
    };

    match cell {
        Data::Empty => Ok(String::new()),
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            Ok(text.clone())
        }
        Data::Int(value) => Ok(value.to_string()),
        Data::Float(value) => Ok(value.to_string()),
        Data::Bool(value) => Ok(if *value { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(value) if value.is_duration() => value
            .as_duration()
            .map(format_duration)
            .ok_or_else(|| serialization_error(format!("duration {} is out of range", value))),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|datetime| format_datetime(datetime, value.as_f64() < 1.0))
            .ok_or_else(|| serialization_error(format!("date value {} is out of range", value))),
        Data::Error(error) => Err(serialization_error(format!(
            "cell holds the error {}",
            error
        ))),
    }
}

/// Serials below one day carry only a time of day
fn format_datetime(datetime: NaiveDateTime, time_only: bool) -> String {
    let pattern = if time_only {
        "%H:%M:%S"
    } else {
        "%Y-%m-%d %H:%M:%S"
    };
    datetime.format(pattern).to_string()
}

/// Elapsed time as `[h]:mm:ss`, hours not wrapped at 24
fn format_duration(duration: Duration) -> String {
    let seconds = duration.num_seconds();
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        seconds / 3600,
        seconds / 60 % 60,
        seconds % 60
    )
}
