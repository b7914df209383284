//! Mock platform implementation for testing
//!
//! Configurable successes and failures plus call counters, so broadcaster
//! logic can be verified without credentials or network access. A shared
//! publish log lets tests assert the order platforms were attempted in.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{PlatformError, Result};
use crate::platforms::Platform;

/// Shared, ordered record of publish attempts across several mocks
pub type PublishLog = Arc<Mutex<Vec<String>>>;

pub struct MockPlatform {
    name: String,
    configured: bool,
    connect_error: Option<String>,
    publish_error: Option<String>,
    connected: bool,
    connect_calls: Arc<Mutex<usize>>,
    publish_calls: Arc<Mutex<usize>>,
    disconnect_calls: Arc<Mutex<usize>>,
    published: Arc<Mutex<Vec<String>>>,
    log: Option<PublishLog>,
}

impl MockPlatform {
    pub fn success(name: &str) -> Self {
        Self {
            name: name.to_string(),
            configured: true,
            connect_error: None,
            publish_error: None,
            connected: false,
            connect_calls: Arc::new(Mutex::new(0)),
            publish_calls: Arc::new(Mutex::new(0)),
            disconnect_calls: Arc::new(Mutex::new(0)),
            published: Arc::new(Mutex::new(Vec::new())),
            log: None,
        }
    }

    pub fn connect_failure(name: &str, error: &str) -> Self {
        Self {
            connect_error: Some(error.to_string()),
            ..Self::success(name)
        }
    }

    pub fn publish_failure(name: &str, error: &str) -> Self {
        Self {
            publish_error: Some(error.to_string()),
            ..Self::success(name)
        }
    }

    pub fn not_configured(name: &str) -> Self {
        Self {
            configured: false,
            ..Self::success(name)
        }
    }

    /// Record publish attempts into a log shared with other mocks
    pub fn with_log(mut self, log: PublishLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn connect_calls(&self) -> usize {
        *self.connect_calls.lock().unwrap()
    }

    pub fn publish_calls(&self) -> usize {
        *self.publish_calls.lock().unwrap()
    }

    pub fn disconnect_calls(&self) -> usize {
        *self.disconnect_calls.lock().unwrap()
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }

    /// Handles to the counters and content, usable after the mock has been
    /// boxed into a broadcaster.
    pub fn probes(&self) -> MockProbes {
        MockProbes {
            connect_calls: Arc::clone(&self.connect_calls),
            publish_calls: Arc::clone(&self.publish_calls),
            disconnect_calls: Arc::clone(&self.disconnect_calls),
            published: Arc::clone(&self.published),
        }
    }
}

#[derive(Clone)]
pub struct MockProbes {
    connect_calls: Arc<Mutex<usize>>,
    publish_calls: Arc<Mutex<usize>>,
    disconnect_calls: Arc<Mutex<usize>>,
    published: Arc<Mutex<Vec<String>>>,
}

impl MockProbes {
    pub fn connect_calls(&self) -> usize {
        *self.connect_calls.lock().unwrap()
    }

    pub fn publish_calls(&self) -> usize {
        *self.publish_calls.lock().unwrap()
    }

    pub fn disconnect_calls(&self) -> usize {
        *self.disconnect_calls.lock().unwrap()
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn connect(&mut self) -> Result<()> {
        *self.connect_calls.lock().unwrap() += 1;

        if let Some(error) = &self.connect_error {
            return Err(PlatformError::Authentication(error.clone()).into());
        }
        self.connected = true;
        Ok(())
    }

    async fn publish(&self, message: &str) -> Result<String> {
        *self.publish_calls.lock().unwrap() += 1;
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.name.clone());
        }

        if !self.connected {
            return Err(PlatformError::Authentication("Not connected".to_string()).into());
        }
        if let Some(error) = &self.publish_error {
            return Err(PlatformError::Posting(error.clone()).into());
        }

        self.published.lock().unwrap().push(message.to_string());
        Ok(format!("{}:mock-id", self.name))
    }

    async fn disconnect(&mut self) {
        *self.disconnect_calls.lock().unwrap() += 1;
        self.connected = false;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_success() {
        let mut platform = MockPlatform::success("test");
        assert!(platform.is_configured());

        platform.connect().await.unwrap();
        let id = platform.publish("Test content").await.unwrap();
        assert_eq!(id, "test:mock-id");

        assert_eq!(platform.connect_calls(), 1);
        assert_eq!(platform.publish_calls(), 1);
        assert_eq!(platform.published(), vec!["Test content"]);
    }

    #[tokio::test]
    async fn test_mock_connect_failure() {
        let mut platform = MockPlatform::connect_failure("test", "Invalid credentials");
        let result = platform.connect().await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_mock_publish_failure() {
        let mut platform = MockPlatform::publish_failure("test", "Service unavailable");
        platform.connect().await.unwrap();

        let result = platform.publish("content").await;
        assert!(result.is_err());
        assert_eq!(platform.publish_calls(), 1);
        assert!(platform.published().is_empty());
    }

    #[tokio::test]
    async fn test_mock_requires_connect() {
        let platform = MockPlatform::success("test");
        let result = platform.publish("content").await;
        assert!(result.unwrap_err().to_string().contains("Not connected"));
    }

    #[tokio::test]
    async fn test_mock_shared_log_records_order() {
        let log: PublishLog = Arc::new(Mutex::new(Vec::new()));
        let mut first = MockPlatform::success("first").with_log(Arc::clone(&log));
        let mut second = MockPlatform::success("second").with_log(Arc::clone(&log));

        first.connect().await.unwrap();
        second.connect().await.unwrap();
        first.publish("m").await.unwrap();
        second.publish("m").await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }
}
