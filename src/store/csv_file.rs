use csv::{Reader, WriterBuilder};
use log::debug;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use super::HistoryStore;
use crate::common::{StoreError, UtmRecord};

/// History kept in a local CSV file with a header row.
pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn has_rows(&self) -> bool {
        fs::metadata(&self.path)
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }
}

impl HistoryStore for CsvFileStore {
    fn append(&mut self, record: &UtmRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let write_header = !self.has_rows();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        debug!("Appended row to {}", self.path.display());
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<UtmRecord>, StoreError> {
        if !self.path.exists() {
            debug!("History file {} does not exist yet", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize::<UtmRecord>() {
            records.push(row?);
        }

        debug!("Read {} rows from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
