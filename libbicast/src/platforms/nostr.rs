//! Nostr platform implementation
//!
//! Broadcasts a kind-1 text note to every configured relay. The client
//! fans the publish out itself; we only register the relay set up front.

use async_trait::async_trait;
use nostr_sdk::{Client, Keys, ToBech32};
use tracing::debug;

use crate::config::NostrCredentials;
use crate::error::{PlatformError, Result};
use crate::platforms::Platform;

pub struct NostrPlatform {
    credentials: NostrCredentials,
    relays: Vec<String>,
    client: Option<Client>,
}

impl NostrPlatform {
    /// Relay URLs are passed in explicitly so tests and callers can
    /// substitute their own list.
    pub fn new(credentials: NostrCredentials, relays: Vec<String>) -> Self {
        Self {
            credentials,
            relays,
            client: None,
        }
    }

    fn parse_keys(&self) -> Result<Keys> {
        let key = self.credentials.private_key.as_deref().ok_or_else(|| {
            PlatformError::Authentication("Nostr private key not configured".to_string())
        })?;

        // Keys::parse accepts both bech32 nsec and 64-character hex
        Keys::parse(key.trim()).map_err(|e| {
            PlatformError::Authentication(format!(
                "Invalid Nostr key (expected nsec or 64-character hex): {}",
                e
            ))
            .into()
        })
    }
}

#[async_trait]
impl Platform for NostrPlatform {
    async fn connect(&mut self) -> Result<()> {
        let keys = self.parse_keys()?;
        let client = Client::new(keys);

        for relay in &self.relays {
            client.add_relay(relay.as_str()).await.map_err(|e| {
                PlatformError::Network(format!("Failed to add relay {}: {}", relay, e))
            })?;
            debug!("Registered relay {}", relay);
        }

        client.connect().await;
        self.client = Some(client);
        Ok(())
    }

    async fn publish(&self, message: &str) -> Result<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| PlatformError::Authentication("Not connected".to_string()))?;

        let output = client
            .publish_text_note(message, [])
            .await
            .map_err(|e| PlatformError::Posting(format!("Failed to publish note: {}", e)))?;

        // note1... form, hex if bech32 encoding ever fails
        Ok(output
            .id()
            .to_bech32()
            .unwrap_or_else(|_| output.id().to_hex()))
    }

    async fn disconnect(&mut self) {
        // Cleanup path: a failure here has nothing left to affect
        if let Some(client) = self.client.take() {
            let _ = client.disconnect().await;
        }
    }

    fn name(&self) -> &str {
        "nostr"
    }

    fn is_configured(&self) -> bool {
        self.credentials.private_key.is_some()
    }
}
