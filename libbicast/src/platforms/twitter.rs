//! Twitter/X platform implementation
//!
//! Posts through the v2 tweets endpoint with OAuth 1.0a user-context
//! signing (HMAC-SHA1 over the RFC 5849 signature base string). The JSON
//! request body takes no part in the signature.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::header::AUTHORIZATION;
use sha1::Sha1;

use crate::config::TwitterCredentials;
use crate::error::{PlatformError, Result};
use crate::platforms::Platform;

const TWEETS_ENDPOINT: &str = "https://api.twitter.com/2/tweets";

// RFC 3986 unreserved characters stay bare, everything else is escaped.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

type HmacSha1 = Hmac<Sha1>;

fn oauth_encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Build the `Authorization: OAuth ...` header for a request with no query
/// or form parameters.
fn authorization_header(
    method: &str,
    url: &str,
    credentials: &ResolvedCredentials<'_>,
    nonce: &str,
    timestamp: &str,
) -> Result<String> {
    // Kept in sorted-by-key order, which is what the signature base string
    // requires.
    let params = [
        ("oauth_consumer_key", credentials.api_key),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp),
        ("oauth_token", credentials.access_token),
        ("oauth_version", "1.0"),
    ];

    let param_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", oauth_encode(k), oauth_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method,
        oauth_encode(url),
        oauth_encode(&param_string)
    );
    let signing_key = format!(
        "{}&{}",
        oauth_encode(credentials.api_secret),
        oauth_encode(credentials.access_secret)
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|e| PlatformError::Posting(format!("Failed to sign request: {}", e)))?;
    mac.update(base_string.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    let header = params
        .iter()
        .chain(std::iter::once(&("oauth_signature", signature.as_str())))
        .map(|(k, v)| format!("{}=\"{}\"", oauth_encode(k), oauth_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {}", header))
}

struct ResolvedCredentials<'a> {
    api_key: &'a str,
    api_secret: &'a str,
    access_token: &'a str,
    access_secret: &'a str,
}

pub struct TwitterPlatform {
    credentials: TwitterCredentials,
    http: reqwest::Client,
    connected: bool,
}

impl TwitterPlatform {
    pub fn new(credentials: TwitterCredentials) -> Self {
        Self {
            credentials,
            http: reqwest::Client::new(),
            connected: false,
        }
    }

    fn resolved(&self) -> Result<ResolvedCredentials<'_>> {
        match (
            &self.credentials.api_key,
            &self.credentials.api_secret,
            &self.credentials.access_token,
            &self.credentials.access_secret,
        ) {
            (Some(api_key), Some(api_secret), Some(access_token), Some(access_secret)) => {
                Ok(ResolvedCredentials {
                    api_key,
                    api_secret,
                    access_token,
                    access_secret,
                })
            }
            _ => Err(PlatformError::Authentication(
                "Twitter credentials incomplete: need api_key, api_secret, access_token and access_secret"
                    .to_string(),
            )
            .into()),
        }
    }
}

#[async_trait]
impl Platform for TwitterPlatform {
    async fn connect(&mut self) -> Result<()> {
        // The tweets endpoint is stateless HTTP; connecting only verifies
        // the credential set is complete.
        self.resolved()?;
        self.connected = true;
        Ok(())
    }

    async fn publish(&self, message: &str) -> Result<String> {
        if !self.connected {
            return Err(PlatformError::Authentication("Not connected".to_string()).into());
        }

        let credentials = self.resolved()?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let auth = authorization_header(
            "POST",
            TWEETS_ENDPOINT,
            &credentials,
            &nonce(),
            &timestamp,
        )?;

        let response = self
            .http
            .post(TWEETS_ENDPOINT)
            .header(AUTHORIZATION, auth)
            .json(&serde_json::json!({ "text": message }))
            .send()
            .await
            .map_err(|e| PlatformError::Network(format!("Request to Twitter failed: {}", e)))?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.map_err(|e| {
            PlatformError::Posting(format!("Malformed response from Twitter: {}", e))
        })?;

        if status.is_success() {
            return body["data"]["id"]
                .as_str()
                .map(|id| id.to_string())
                .ok_or_else(|| {
                    PlatformError::Posting("Twitter response missing tweet id".to_string()).into()
                });
        }

        // The v2 error shape carries "detail" at the top level; older-style
        // errors carry an "errors" array with "message" entries.
        let detail = body["detail"]
            .as_str()
            .or_else(|| body["errors"][0]["message"].as_str())
            .unwrap_or("no error detail provided")
            .to_string();

        let error = match status.as_u16() {
            401 | 403 => PlatformError::Authentication(format!("Twitter rejected the request: {}", detail)),
            429 => PlatformError::RateLimit(format!("Twitter rate limit: {}", detail)),
            _ => PlatformError::Posting(format!("Twitter API error ({}): {}", status, detail)),
        };
        Err(error.into())
    }

    fn name(&self) -> &str {
        "twitter"
    }

    fn is_configured(&self) -> bool {
        self.resolved().is_ok()
    }
}
