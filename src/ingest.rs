//! Reading video IDs from a Watch Later CSV export.

use crate::error::{MigrateError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column holding the video identifier.
pub const ID_COLUMN: &str = "ID";
/// Placeholder written for an identifier that could not be determined.
pub const MISSING_SENTINEL: &str = "N/A";

/// Extract the video ID from one CSV row, if it carries a usable one.
///
/// Rows without an `ID` column, with an empty value, or with the `N/A`
/// sentinel yield `None`. Anything else passes through unchanged.
pub fn video_id_from_row(row: &HashMap<String, String>) -> Option<&str> {
    row.get(ID_COLUMN)
        .map(String::as_str)
        .filter(|id| !id.is_empty() && *id != MISSING_SENTINEL)
}

/// Read all usable video IDs from the CSV file at `path`, in row order.
///
/// # Errors
/// * `MigrateError::FileAccess` if the file cannot be opened or read
/// * `MigrateError::Csv` if a record is malformed
pub fn read_video_ids(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|source| MigrateError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let ids = read_video_ids_from(file, path)?;
    println!(
        "Successfully read {} video IDs from the CSV file.",
        ids.len()
    );
    Ok(ids)
}

/// Read video IDs from any reader; `path` is only used for error reporting.
pub fn read_video_ids_from<R: Read>(reader: R, path: &Path) -> Result<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    // Fields are decoded lossily so one badly encoded title cannot drop the file.
    let headers: Vec<String> = csv_reader
        .byte_headers()
        .map_err(|err| MigrateError::from_csv(err, path))?
        .iter()
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect();

    let mut ids = Vec::new();
    for result in csv_reader.byte_records() {
        let record = result.map_err(|err| MigrateError::from_csv(err, path))?;
        // Short rows simply lack the trailing columns.
        let row: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.clone(), String::from_utf8_lossy(value).into_owned()))
            .collect();
        if let Some(id) = video_id_from_row(&row) {
            ids.push(id.to_string());
        }
    }

    tracing::debug!(count = ids.len(), path = %path.display(), "read video ids");
    Ok(ids)
}
