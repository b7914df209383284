//! Credentials data model and path resolution for Bicast

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CredentialError, Result};

/// Relays every note is broadcast to when the credentials file does not
/// name its own list. Redundant publication across several well-known
/// relays keeps the note visible to readers connected elsewhere.
pub const DEFAULT_RELAYS: [&str; 3] = [
    "wss://relay.damus.io",
    "wss://nos.lol",
    "wss://relay.snort.social",
];

/// Decrypted credentials bundle
///
/// Both tables are optional: an absent table means the corresponding
/// platform is unconfigured, which the publishers report at broadcast time
/// rather than the loader failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub twitter: Option<TwitterCredentials>,
    pub nostr: Option<NostrCredentials>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwitterCredentials {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub access_token: Option<String>,
    pub access_secret: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NostrCredentials {
    /// Private signing key, nsec bech32 or 64-character hex
    pub private_key: Option<String>,
    /// Optional relay list overriding [`DEFAULT_RELAYS`]
    pub relays: Option<Vec<String>>,
}

impl Credentials {
    /// Parse a plaintext credentials file from disk
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(CredentialError::Read)?;
        let credentials: Credentials =
            toml::from_str(&content).map_err(CredentialError::Parse)?;
        Ok(credentials)
    }
}

impl NostrCredentials {
    /// Relay URLs to broadcast to, falling back to the built-in list
    pub fn relay_urls(&self) -> Vec<String> {
        match &self.relays {
            Some(relays) if !relays.is_empty() => relays.clone(),
            _ => DEFAULT_RELAYS.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Resolve the encrypted credentials file path
///
/// Checks `BICAST_CREDENTIALS` first, then falls back to
/// `<config_dir>/bicast/credentials.toml.gpg` per the XDG base directory
/// conventions.
pub fn resolve_credentials_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("BICAST_CREDENTIALS") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| CredentialError::MissingPath("config directory".to_string()))?;

    Ok(config_dir.join("bicast").join("credentials.toml.gpg"))
}

/// Sibling path the plaintext is decrypted to: the encrypted path minus its
/// final extension (`credentials.toml.gpg` becomes `credentials.toml`).
pub fn plaintext_path(encrypted: &Path) -> PathBuf {
    let mut plaintext = encrypted.to_path_buf();
    if plaintext.extension().is_some() {
        plaintext.set_extension("");
    } else {
        plaintext.set_extension("plain");
    }
    plaintext
}
