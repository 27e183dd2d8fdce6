use std::path::Path;

use gridgap::{GridgapError, NormalizedResultRow};
use log::info;

/// Writes one JSON object per classified driver, in classification order.
pub fn write_classification(file: &Path, rows: &[NormalizedResultRow]) -> Result<(), GridgapError> {
    serde_jsonlines::write_json_lines(file, rows)
        .map_err(|e| GridgapError::WriterError { source: e })?;
    info!("Wrote {} rows to {:?}", rows.len(), file);
    Ok(())
}
