//! Sequential broadcast orchestration
//!
//! Platforms are attempted one after another in registration order. A
//! failure anywhere in one platform's attempt is recorded and never stops
//! the platforms after it; the process outcome stays successful either way.

use tracing::{info, warn};

use crate::config::Credentials;
use crate::platforms::nostr::NostrPlatform;
use crate::platforms::twitter::TwitterPlatform;
use crate::platforms::Platform;

/// Which platforms a run should publish to
///
/// The resolution rule is deliberate: no flags means broadcast everywhere,
/// and both flags means the same thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSelection {
    pub twitter: bool,
    pub nostr: bool,
}

impl TargetSelection {
    pub fn from_flags(twitter: bool, nostr: bool) -> Self {
        if twitter == nostr {
            Self {
                twitter: true,
                nostr: true,
            }
        } else {
            Self { twitter, nostr }
        }
    }
}

/// Result of one platform's publish attempt
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub platform: String,
    pub success: bool,
    pub post_id: Option<String>,
    pub error: Option<String>,
}

impl PublishOutcome {
    fn success(platform: &str, post_id: String) -> Self {
        Self {
            platform: platform.to_string(),
            success: true,
            post_id: Some(post_id),
            error: None,
        }
    }

    fn failure(platform: &str, error: impl std::fmt::Display) -> Self {
        Self {
            platform: platform.to_string(),
            success: false,
            post_id: None,
            error: Some(error.to_string()),
        }
    }
}

/// Build the platform clients for the selected targets
///
/// Order matters: twitter first, then nostr, which is also the order the
/// broadcaster attempts them in. Absent credential tables still produce a
/// platform so the attempt is reported as unconfigured instead of silently
/// missing.
pub fn create_platforms(
    credentials: &Credentials,
    selection: TargetSelection,
) -> Vec<Box<dyn Platform>> {
    let mut platforms: Vec<Box<dyn Platform>> = Vec::new();

    if selection.twitter {
        let creds = credentials.twitter.clone().unwrap_or_default();
        platforms.push(Box::new(TwitterPlatform::new(creds)));
    }

    if selection.nostr {
        let creds = credentials.nostr.clone().unwrap_or_default();
        let relays = creds.relay_urls();
        platforms.push(Box::new(NostrPlatform::new(creds, relays)));
    }

    platforms
}

pub struct Broadcaster {
    platforms: Vec<Box<dyn Platform>>,
}

impl Broadcaster {
    pub fn new(platforms: Vec<Box<dyn Platform>>) -> Self {
        Self { platforms }
    }

    /// Publish `message` to every platform, in order
    ///
    /// Exactly one outcome per platform comes back, so the caller always
    /// has a line to print per attempt. Disconnection runs even when the
    /// publish failed.
    pub async fn broadcast(&mut self, message: &str) -> Vec<PublishOutcome> {
        let mut outcomes = Vec::with_capacity(self.platforms.len());

        for platform in &mut self.platforms {
            let name = platform.name().to_string();

            if !platform.is_configured() {
                warn!("Skipping {}: missing credentials", name);
                outcomes.push(PublishOutcome::failure(&name, "not configured"));
                continue;
            }

            if let Err(e) = platform.connect().await {
                warn!("Failed to connect to {}: {}", name, e);
                outcomes.push(PublishOutcome::failure(&name, e));
                continue;
            }

            let result = platform.publish(message).await;
            platform.disconnect().await;

            match result {
                Ok(post_id) => {
                    info!("Published to {}: {}", name, post_id);
                    outcomes.push(PublishOutcome::success(&name, post_id));
                }
                Err(e) => {
                    warn!("Failed to publish to {}: {}", name, e);
                    outcomes.push(PublishOutcome::failure(&name, e));
                }
            }
        }

        outcomes
    }
}
