use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::constants::{
    CREDENTIALS_ENV_VAR, DEFAULT_WORKSHEET, EXPORT_FILE_NAME, HTTP_TIMEOUT_SECS,
    SHEETS_API_BASE_URL,
};
use crate::utm::{BrandMode, BrandPolicy};

const APP_DIR: &str = "utm-builder";
const SETTINGS_FILE: &str = "settings.json";

fn default_worksheet() -> String {
    DEFAULT_WORKSHEET.to_string()
}

fn default_api_base_url() -> String {
    SHEETS_API_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    HTTP_TIMEOUT_SECS
}

fn default_export_file_name() -> String {
    EXPORT_FILE_NAME.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sheets,
    Csv,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SheetsSettings {
    #[serde(default)]
    pub credentials_file: String,
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default = "default_worksheet")]
    pub worksheet: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CsvSettings {
    /// Empty means `<data dir>/utm-builder/history.csv`.
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub sheets: Option<SheetsSettings>,
    #[serde(default)]
    pub csv: CsvSettings,
    #[serde(default)]
    pub brand: BrandPolicy,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
}

impl Settings {
    pub fn load(settings_file: &str) -> Result<Self> {
        let path = Path::new(settings_file);
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "settings.json not found at '{}'. Exiting...",
                settings_file
            ));
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", settings_file))?;

        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", settings_file))?;

        info!("Settings loaded from '{}'.", settings_file);
        Ok(settings)
    }

    /// Explicit path first, then `./settings.json`, then the user config dir.
    pub fn locate(explicit: Option<&str>) -> Result<String> {
        if let Some(path) = explicit {
            return Ok(path.to_string());
        }

        let mut candidates = vec![PathBuf::from(SETTINGS_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(APP_DIR).join(SETTINGS_FILE));
        }

        for candidate in &candidates {
            debug!("Looking for settings at {}", candidate.display());
            if candidate.is_file() {
                return Ok(candidate.to_string_lossy().to_string());
            }
        }

        Err(anyhow::anyhow!(
            "No settings file found. Looked in: {}",
            candidates
                .iter()
                .map(|c| c.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    /// Startup checks. A failure here is fatal.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("request_timeout_secs must be greater than 0"));
        }

        if self.brand.mode != BrandMode::Off && self.brand.token_slug().is_empty() {
            return Err(anyhow::anyhow!(
                "brand.token is required when brand.mode is not 'off'"
            ));
        }

        if self.backend == Backend::Sheets {
            let sheets = self.sheets_settings()?;
            let missing: Vec<&str> = [
                ("sheets.credentials_file", &sheets.credentials_file),
                ("sheets.spreadsheet_id", &sheets.spreadsheet_id),
                ("sheets.worksheet", &sheets.worksheet),
            ]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();

            if !missing.is_empty() {
                return Err(anyhow::anyhow!(
                    "Missing required settings: {}",
                    missing.join(", ")
                ));
            }
        }

        Ok(())
    }

    pub fn sheets_settings(&self) -> Result<&SheetsSettings> {
        self.sheets
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Missing required settings section: sheets"))
    }

    /// Resolves the key file path. The value `GOOGLE_APPLICATION_CREDENTIALS`
    /// means "read the path from that environment variable".
    pub fn credentials_path(&self) -> Result<String> {
        let configured = &self.sheets_settings()?.credentials_file;
        if configured != CREDENTIALS_ENV_VAR {
            return Ok(configured.to_string());
        }

        let path = std::env::var(CREDENTIALS_ENV_VAR)
            .with_context(|| format!("{} environment variable not set", CREDENTIALS_ENV_VAR))?;
        if path.is_empty() {
            return Err(anyhow::anyhow!(
                "{} environment variable is empty",
                CREDENTIALS_ENV_VAR
            ));
        }

        info!("Using credentials from environment variable: {}", path);
        Ok(path)
    }

    pub fn history_csv_path(&self) -> Result<PathBuf> {
        if !self.csv.path.is_empty() {
            return Ok(PathBuf::from(&self.csv.path));
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine the user data directory"))?;
        Ok(data_dir.join(APP_DIR).join("history.csv"))
    }
}
