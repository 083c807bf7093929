/// Default timeout for HTTP requests in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// User agent string for HTTP requests
pub const USER_AGENT: &str = "utm-builder/1.0";

/// Google endpoints
pub const SHEETS_API_BASE_URL: &str = "https://sheets.googleapis.com";
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Environment variable that may hold the service account key path
pub const CREDENTIALS_ENV_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Worksheet used when settings don't name one
pub const DEFAULT_WORKSHEET: &str = "historico";

/// Persisted row schema, in column order
pub const HISTORY_COLUMNS: [&str; 7] = [
    "base_url",
    "source",
    "medium",
    "campaign",
    "term",
    "content",
    "generated_link",
];

/// Default file name offered for history exports
pub const EXPORT_FILE_NAME: &str = "utm_history.csv";

/// Spinner template while waiting on the backing store
pub const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
