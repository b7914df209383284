//! Bicast - broadcast one message to Twitter/X and Nostr
//!
//! This library holds the credential handling, platform clients and
//! sequential broadcast orchestration behind the `bicast` command.

pub mod broadcaster;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod platforms;

// Re-export commonly used types
pub use broadcaster::{create_platforms, Broadcaster, PublishOutcome, TargetSelection};
pub use config::{Credentials, NostrCredentials, TwitterCredentials};
pub use credentials::{load_encrypted, Decryptor};
pub use error::{BicastError, Result};
