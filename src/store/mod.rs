use anyhow::Result;
use log::info;

mod csv_file;
mod sheets;

pub use csv_file::CsvFileStore;
pub use sheets::{rows_to_records, SheetsStore};

use crate::auth::ServiceAccountKey;
use crate::common::{StoreError, UtmRecord};
use crate::settings::{Backend, Settings};

/// Append-only log of generated links.
pub trait HistoryStore {
    /// Appends one row after any existing rows.
    fn append(&mut self, record: &UtmRecord) -> Result<(), StoreError>;

    /// Every row in storage order.
    fn list_all(&self) -> Result<Vec<UtmRecord>, StoreError>;

    /// Human-readable name for log and status messages.
    fn describe(&self) -> String;
}

/// Builds the configured backend. Errors here are startup configuration
/// problems, not store outages.
pub fn open_store(settings: &Settings) -> Result<Box<dyn HistoryStore>> {
    match settings.backend {
        Backend::Sheets => {
            let sheets = settings.sheets_settings()?;
            let key = ServiceAccountKey::load(&settings.credentials_path()?)?;
            let store = SheetsStore::new(sheets, key, settings.request_timeout_secs)?;
            info!("Using Google Sheets history: {}", store.describe());
            Ok(Box::new(store))
        }
        Backend::Csv => {
            let store = CsvFileStore::new(settings.history_csv_path()?);
            info!("Using local CSV history: {}", store.describe());
            Ok(Box::new(store))
        }
    }
}
