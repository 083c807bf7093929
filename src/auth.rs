use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::common::constants::{GOOGLE_TOKEN_URI, SHEETS_SCOPE};
use crate::common::StoreError;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

/// The parts of a Google service account key file this tool needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read service account key: {}", path))?;
        let key = Self::from_json(&contents)
            .with_context(|| format!("Invalid service account key: {}", path))?;
        info!("Service account key loaded for {}", key.client_email);
        Ok(key)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let key: ServiceAccountKey =
            serde_json::from_str(contents).context("Failed to parse service account JSON")?;

        if key.client_email.trim().is_empty() {
            return Err(anyhow::anyhow!("client_email is empty"));
        }
        if key.private_key.trim().is_empty() {
            return Err(anyhow::anyhow!("private_key is empty"));
        }
        EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .context("private_key is not a valid RSA PEM key")?;

        Ok(key)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

/// Bearer token with its absolute expiry as a unix timestamp.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: i64,
}

impl AccessToken {
    pub fn is_fresh(&self, now: i64) -> bool {
        now + EXPIRY_MARGIN_SECS < self.expires_at
    }
}

fn sign_assertion(key: &ServiceAccountKey, now: i64) -> Result<String, StoreError> {
    let claims = Claims {
        iss: &key.client_email,
        scope: SHEETS_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| StoreError::Auth(format!("invalid private key: {}", e)))?;

    encode(&header, &claims, &encoding_key)
        .map_err(|e| StoreError::Auth(format!("failed to sign assertion: {}", e)))
}

/// Exchanges a signed service account assertion for an OAuth2 access token.
pub fn get_access_token(
    client: &reqwest::blocking::Client,
    key: &ServiceAccountKey,
) -> Result<AccessToken, StoreError> {
    let now = Utc::now().timestamp();
    let assertion = sign_assertion(key, now)?;

    debug!("Requesting access token from {}", key.token_uri);
    let response = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        error!("Failed to authenticate with Google: {}", status);
        return Err(StoreError::Auth(format!(
            "token endpoint returned {}: {}",
            status, body
        )));
    }

    let token_response: AccessTokenResponse = response
        .json()
        .map_err(|e| StoreError::Malformed(format!("token response: {}", e)))?;

    if token_response.access_token.is_empty() {
        error!("Failed to retrieve access token. Response was empty");
        return Err(StoreError::Auth("empty access token received".to_string()));
    }

    debug!(
        "Received {} token valid for {}s",
        token_response.token_type, token_response.expires_in
    );
    Ok(AccessToken {
        value: token_response.access_token,
        expires_at: now + token_response.expires_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_requires_client_email() {
        let json = r#"{"client_email": "", "private_key": "x"}"#;
        let err = ServiceAccountKey::from_json(json).unwrap_err();
        assert!(err.to_string().contains("client_email"));
    }

    #[test]
    fn test_from_json_rejects_garbage_key() {
        let json = r#"{
            "client_email": "bot@project.iam.gserviceaccount.com",
            "private_key": "not a pem"
        }"#;
        assert!(ServiceAccountKey::from_json(json).is_err());
    }

    #[test]
    fn test_token_freshness_margin() {
        let token = AccessToken {
            value: "t".to_string(),
            expires_at: 1_000,
        };
        assert!(token.is_fresh(900));
        assert!(!token.is_fresh(950));
        assert!(!token.is_fresh(1_000));
    }
}
