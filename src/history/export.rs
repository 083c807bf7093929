use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

use crate::common::constants::HISTORY_COLUMNS;
use crate::common::UtmRecord;

/// Serializes the history as UTF-8 CSV with a header row.
pub fn to_csv_bytes(records: &[UtmRecord]) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::with_capacity(records.len().saturating_mul(256)));

    wtr.write_record(HISTORY_COLUMNS)
        .context("csv write_record failed")?;
    for record in records {
        wtr.write_record(record.to_row())
            .context("csv write_record failed")?;
    }

    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush failed: {}", e))
}

pub fn write_export(records: &[UtmRecord], path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(records)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, &bytes)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    info!(
        "Exported {} rows ({} bytes) to {}",
        records.len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}
