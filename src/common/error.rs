use thiserror::Error;

/// Failure talking to the backing history store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not reach the history store: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("authorization with the history store failed: {0}")]
    Auth(String),

    #[error("history store responded with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("history file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("history file is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unexpected response from the history store: {0}")]
    Malformed(String),
}

/// User-facing failure kinds. All of them are recoverable.
#[derive(Debug, Error)]
pub enum UtmError {
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingField(Vec<&'static str>),

    #[error("invalid URL '{0}': must start with http:// or https:// and contain a valid domain")]
    InvalidUrl(String),

    #[error("policy violation: {0}")]
    PolicyViolation(String),

    #[error("link was generated but could not be saved: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("history could not be loaded: {0}")]
    StoreReadFailure(#[source] StoreError),
}

impl UtmError {
    /// Validation failures leave no trace in the store; store failures happen
    /// after a link already exists.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            UtmError::MissingField(_) | UtmError::InvalidUrl(_) | UtmError::PolicyViolation(_)
        )
    }
}
