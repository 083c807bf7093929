pub mod constants;
pub mod error;
pub mod types;

pub use error::{StoreError, UtmError};
pub use types::{FormInput, UtmParams, UtmRecord};
