use log::{debug, warn};

mod export;
mod table;

pub use export::{to_csv_bytes, write_export};
pub use table::render_table;

use crate::common::{UtmError, UtmRecord};
use crate::store::HistoryStore;

/// Presentation-side cache of the history. The store stays the source of
/// truth; call `invalidate` after any append.
#[derive(Debug, Default)]
pub struct HistoryView {
    cache: Option<Vec<UtmRecord>>,
}

impl HistoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        debug!("History view invalidated");
        self.cache = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_some()
    }

    /// Returns cached rows, loading them from the store when the cache is empty.
    /// A failed load leaves the view unloaded.
    pub fn load(&mut self, store: &dyn HistoryStore) -> Result<&[UtmRecord], UtmError> {
        if self.cache.is_none() {
            return self.refresh(store);
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    /// Always re-reads the store.
    pub fn refresh(&mut self, store: &dyn HistoryStore) -> Result<&[UtmRecord], UtmError> {
        match store.list_all() {
            Ok(records) => {
                let inconsistent = records.iter().filter(|r| !r.is_consistent()).count();
                if inconsistent > 0 {
                    warn!(
                        "{} history row(s) have a link that does not match their fields",
                        inconsistent
                    );
                }
                debug!("History view loaded {} rows", records.len());
                Ok(self.cache.insert(records).as_slice())
            }
            Err(e) => {
                self.cache = None;
                Err(UtmError::StoreReadFailure(e))
            }
        }
    }
}
