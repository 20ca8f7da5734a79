//! Engine configuration

use chrono::Duration;

/// Tunable policy for the workflow engine
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// How long a submitted document may stay pending before the external
    /// scheduler is expected to expire it. Stamped onto `expires_at` at
    /// submission.
    pub pending_ttl: Duration,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pending_ttl(mut self, pending_ttl: Duration) -> Self {
        self.pending_ttl = pending_ttl;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pending_ttl: Duration::days(7),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl() {
        let config = EngineConfig::default();
        assert_eq!(config.pending_ttl, Duration::days(7));
    }

    #[test]
    fn test_with_pending_ttl() {
        let config = EngineConfig::new().with_pending_ttl(Duration::hours(48));
        assert_eq!(config.pending_ttl, Duration::hours(48));
    }
}
