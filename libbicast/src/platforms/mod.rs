//! Platform abstraction and implementations
//!
//! Each platform implements the same small capability set: connect,
//! publish one message, disconnect. Callers hold boxed trait objects and
//! never depend on a concrete client.

use async_trait::async_trait;

use crate::error::Result;

pub mod mock;
pub mod nostr;
pub mod twitter;

/// Unified publishing interface for the supported social networks
#[async_trait]
pub trait Platform: Send + Sync {
    /// Establish whatever session the platform needs before publishing
    ///
    /// For Twitter this validates that the credential set is complete; for
    /// Nostr it parses the signing key and opens the relay connections.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Authentication` for credential problems and
    /// `PlatformError::Network` for connection failures.
    async fn connect(&mut self) -> Result<()>;

    /// Publish the message and return the platform-specific post id
    ///
    /// The message is passed verbatim. Overlong content is the platform's
    /// problem to reject and comes back as a posting error.
    async fn publish(&self, message: &str) -> Result<String>;

    /// Tear down any open connections
    ///
    /// Runs after publishing whether it succeeded or not. Implementations
    /// absorb their own failures; there is nothing left to report from a
    /// cleanup path.
    async fn disconnect(&mut self) {}

    /// Lowercase platform identifier (e.g. "twitter", "nostr")
    fn name(&self) -> &str;

    /// Whether the platform has every credential it needs to connect
    fn is_configured(&self) -> bool;
}
