//! Explicit debug server configuration

use std::time::Duration;

/// Everything the debug server needs to start.
///
/// Built directly, or from command-line flags via
/// [`DebugArgs::config`](crate::cli::DebugArgs::config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugConfig {
    /// `host:port` to bind; port 0 picks a free port
    pub address: String,
    /// Longest CPU profile a request may ask for
    pub max_profile_duration: Duration,
}

impl DebugConfig {
    pub const DEFAULT_MAX_PROFILE_DURATION: Duration = Duration::from_secs(60);

    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into(), max_profile_duration: Self::DEFAULT_MAX_PROFILE_DURATION }
    }

    #[must_use]
    pub fn with_max_profile_duration(mut self, max: Duration) -> Self {
        self.max_profile_duration = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DebugConfig::new("127.0.0.1:6060");
        assert_eq!(config.address, "127.0.0.1:6060");
        assert_eq!(config.max_profile_duration, Duration::from_secs(60));
    }

    #[test]
    fn test_override_max_profile() {
        let config = DebugConfig::new("[::1]:0").with_max_profile_duration(Duration::from_secs(5));
        assert_eq!(config.max_profile_duration, Duration::from_secs(5));
    }
}
