mod builder;
mod link;
mod policy;
mod slug;
mod validation;

pub use builder::{LinkBuilder, Submission};
pub use link::{assemble_link, encode_query, ensure_trailing_slash};
pub use policy::{BrandMode, BrandPolicy};
pub use slug::normalize_slug;
pub use validation::{missing_required, valid_url, validate_input};
