//! Pacing configuration with builder pattern

use std::time::Duration;

/// Fixed pauses applied between mutating calls and entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingConfig {
    /// Pause after every paced mutating call
    pub call_delay: Duration,
    /// Pause after all calls for one entity are done
    pub entity_delay: Duration,
    /// Pause after a whole collection has been processed
    pub completion_delay: Duration,
    pub enabled: bool,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            call_delay: Duration::from_millis(50),
            entity_delay: Duration::from_millis(100),
            completion_delay: Duration::from_secs(5),
            enabled: true,
        }
    }
}

impl PacingConfig {
    /// Create a new builder for PacingConfig
    pub fn builder() -> PacingConfigBuilder {
        PacingConfigBuilder::new()
    }

    /// Disable all pauses (for testing)
    pub fn disabled() -> Self {
        Self {
            call_delay: Duration::ZERO,
            entity_delay: Duration::ZERO,
            completion_delay: Duration::ZERO,
            enabled: false,
        }
    }
}

/// Builder for PacingConfig
#[derive(Debug)]
pub struct PacingConfigBuilder {
    config: PacingConfig,
}

impl PacingConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: PacingConfig::default(),
        }
    }

    pub fn call_delay_ms(mut self, ms: u64) -> Self {
        self.config.call_delay = Duration::from_millis(ms);
        self
    }

    pub fn entity_delay_ms(mut self, ms: u64) -> Self {
        self.config.entity_delay = Duration::from_millis(ms);
        self
    }

    pub fn completion_delay_ms(mut self, ms: u64) -> Self {
        self.config.completion_delay = Duration::from_millis(ms);
        self
    }

    /// Enable/disable pacing
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> PacingConfig {
        self.config
    }
}

impl Default for PacingConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
