//! ============================================================================
//! Client Configuration
//! ============================================================================
//! Environment-overridable settings for the Instagram client.
//! Overrides: GRAMSCOPE_USER_AGENT, GRAMSCOPE_PAGE_DELAY_MS
//! ============================================================================

use std::time::Duration;

use tracing::warn;

/// Browser-shaped user agent sent with every request
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Pause between paginated list requests
const DEFAULT_PAGE_DELAY_MS: u64 = 700;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    pub page_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
        }
    }
}

impl ClientConfig {
    /// Build the configuration from environment overrides, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(agent) = std::env::var("GRAMSCOPE_USER_AGENT") {
            if !agent.is_empty() {
                config.user_agent = agent;
            }
        }

        if let Ok(delay) = std::env::var("GRAMSCOPE_PAGE_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => config.page_delay = Duration::from_millis(ms),
                Err(_) => warn!("ignoring invalid GRAMSCOPE_PAGE_DELAY_MS: {delay}"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.page_delay, Duration::from_millis(700));
    }

    #[test]
    fn test_env_overrides() {
        // Tests run in parallel; this one test owns both variables
        std::env::set_var("GRAMSCOPE_USER_AGENT", "test-agent/1.0");
        std::env::set_var("GRAMSCOPE_PAGE_DELAY_MS", "1200");
        let config = ClientConfig::from_env();
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.page_delay, Duration::from_millis(1200));

        std::env::set_var("GRAMSCOPE_PAGE_DELAY_MS", "not-a-number");
        let config = ClientConfig::from_env();
        assert_eq!(config.page_delay, Duration::from_millis(700));

        std::env::remove_var("GRAMSCOPE_USER_AGENT");
        std::env::remove_var("GRAMSCOPE_PAGE_DELAY_MS");
    }
}
