use serde::{Deserialize, Serialize};

use super::slug::normalize_slug;
use crate::common::UtmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandMode {
    /// No brand check.
    #[default]
    Off,
    /// Block generation when the campaign lacks the token.
    Reject,
    /// Prefix the token onto campaigns that lack it.
    Prefix,
}

/// Campaign naming rule requiring a fixed brand token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandPolicy {
    #[serde(default)]
    pub mode: BrandMode,
    #[serde(default)]
    pub token: String,
}

impl BrandPolicy {
    pub fn new(mode: BrandMode, token: &str) -> Self {
        Self {
            mode,
            token: token.to_string(),
        }
    }

    /// Token in slug form, comparable to a normalized campaign.
    pub fn token_slug(&self) -> String {
        normalize_slug(&self.token)
    }

    /// Applies the policy to an already normalized campaign slug.
    pub fn apply(&self, campaign: &str) -> Result<String, UtmError> {
        let token = self.token_slug();
        if self.mode == BrandMode::Off || token.is_empty() || campaign.contains(&token) {
            return Ok(campaign.to_string());
        }

        match self.mode {
            BrandMode::Reject => Err(UtmError::PolicyViolation(format!(
                "campaign '{}' must contain '{}'",
                campaign, token
            ))),
            BrandMode::Prefix => Ok(format!("{}-{}", token, campaign)),
            BrandMode::Off => Ok(campaign.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_passes_through() {
        let policy = BrandPolicy::default();
        assert_eq!(policy.apply("black-friday").unwrap(), "black-friday");
    }

    #[test]
    fn test_reject_blocks_unbranded_campaign() {
        let policy = BrandPolicy::new(BrandMode::Reject, "Macfor");
        assert!(matches!(
            policy.apply("black-friday"),
            Err(UtmError::PolicyViolation(_))
        ));
        assert_eq!(
            policy.apply("macfor-black-friday").unwrap(),
            "macfor-black-friday"
        );
    }

    #[test]
    fn test_prefix_rewrites_once() {
        let policy = BrandPolicy::new(BrandMode::Prefix, "macfor");
        let first = policy.apply("black-friday").unwrap();
        assert_eq!(first, "macfor-black-friday");
        assert_eq!(policy.apply(&first).unwrap(), first);
    }

    #[test]
    fn test_mode_deserializes_lowercase() {
        let policy: BrandPolicy =
            serde_json::from_str(r#"{"mode": "prefix", "token": "macfor"}"#).unwrap();
        assert_eq!(policy.mode, BrandMode::Prefix);
    }
}
