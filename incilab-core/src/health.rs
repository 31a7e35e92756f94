use crate::transport::{Backend, TransportError};
use tracing::warn;

/// Advisory backend-liveness flag.
///
/// False until the first probe resolves; one probe at startup, no polling.
/// A failed probe records false instead of propagating, so liveness can
/// never take the view down with it.
#[derive(Debug, Default)]
pub struct HealthMonitor {
    up: bool,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_up(&self) -> bool {
        self.up
    }

    /// Folds a probe result into the flag. Affirmative payload means up;
    /// a negative payload or any transport failure means down.
    pub fn record(&mut self, outcome: Result<bool, TransportError>) {
        self.up = match outcome {
            Ok(ok) => ok,
            Err(err) => {
                warn!(%err, "health probe failed");
                false
            }
        };
    }

    /// Runs one probe against the backend and records it.
    pub async fn probe(&mut self, backend: &dyn Backend) {
        let outcome = backend.health().await;
        self.record(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SearchResultItem, ValidateRequest, ValidateResponse};
    use async_trait::async_trait;

    struct DownBackend;

    #[async_trait]
    impl Backend for DownBackend {
        async fn health(&self) -> crate::transport::Result<bool> {
            Err(TransportError::Status(500))
        }

        async fn search(&self, _query: &str) -> crate::transport::Result<Vec<SearchResultItem>> {
            unimplemented!("not exercised here")
        }

        async fn validate(
            &self,
            _request: &ValidateRequest,
        ) -> crate::transport::Result<ValidateResponse> {
            unimplemented!("not exercised here")
        }
    }

    #[test]
    fn test_down_until_first_probe() {
        let monitor = HealthMonitor::new();
        assert!(!monitor.is_up());
    }

    #[test]
    fn test_affirmative_probe_marks_up() {
        let mut monitor = HealthMonitor::new();
        monitor.record(Ok(true));
        assert!(monitor.is_up());
    }

    #[test]
    fn test_negative_payload_marks_down() {
        let mut monitor = HealthMonitor::new();
        monitor.record(Ok(true));
        monitor.record(Ok(false));
        assert!(!monitor.is_up());
    }

    #[test]
    fn test_probe_failure_marks_down_without_panicking() {
        let mut monitor = HealthMonitor::new();
        monitor.record(Err(TransportError::Status(500)));
        assert!(!monitor.is_up());
    }

    #[tokio::test]
    async fn test_probe_drives_backend_and_swallows_failure() {
        let mut monitor = HealthMonitor::new();
        monitor.probe(&DownBackend).await;
        assert!(!monitor.is_up());
    }
}
