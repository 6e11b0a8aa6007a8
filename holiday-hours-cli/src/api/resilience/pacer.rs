//! Sleep-based pacer
//!
//! Applies the pauses described by [`PacingConfig`] and keeps counters so
//! callers and tests can see how much pacing actually happened.

use super::config::PacingConfig;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct Pacer {
    config: PacingConfig,
    call_pauses: AtomicU64,
    entity_pauses: AtomicU64,
    completion_pauses: AtomicU64,
    paused_ms: AtomicU64,
}

/// Snapshot of pacer counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacerStats {
    pub call_pauses: u64,
    pub entity_pauses: u64,
    pub completion_pauses: u64,
    pub paused_ms: u64,
}

impl Pacer {
    pub fn new(config: PacingConfig) -> Self {
        Self {
            config,
            call_pauses: AtomicU64::new(0),
            entity_pauses: AtomicU64::new(0),
            completion_pauses: AtomicU64::new(0),
            paused_ms: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    /// Pause after a paced mutating call
    pub async fn after_call(&self) {
        if self.pause(self.config.call_delay).await {
            self.call_pauses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Pause after finishing one entity
    pub async fn after_entity(&self) {
        if self.pause(self.config.entity_delay).await {
            self.entity_pauses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Pause after a whole collection has been processed
    pub async fn on_complete(&self) {
        if self.pause(self.config.completion_delay).await {
            self.completion_pauses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// How long [`Pacer::on_complete`] will actually wait
    pub fn completion_pause(&self) -> Duration {
        if self.config.enabled {
            self.config.completion_delay
        } else {
            Duration::ZERO
        }
    }

    /// Get current statistics
    pub fn stats(&self) -> PacerStats {
        PacerStats {
            call_pauses: self.call_pauses.load(Ordering::Relaxed),
            entity_pauses: self.entity_pauses.load(Ordering::Relaxed),
            completion_pauses: self.completion_pauses.load(Ordering::Relaxed),
            paused_ms: self.paused_ms.load(Ordering::Relaxed),
        }
    }

    async fn pause(&self, delay: Duration) -> bool {
        if !self.config.enabled || delay.is_zero() {
            return false;
        }

        debug!("Pacer: sleeping {:?}", delay);
        tokio::time::sleep(delay).await;
        self.paused_ms
            .fetch_add(delay.as_millis() as u64, Ordering::Relaxed);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_pauses_are_counted() {
        let pacer = Pacer::new(PacingConfig::default());
        let start = Instant::now();

        pacer.after_call().await;
        pacer.after_call().await;
        pacer.after_entity().await;
        pacer.on_complete().await;

        let stats = pacer.stats();
        assert_eq!(stats.call_pauses, 2);
        assert_eq!(stats.entity_pauses, 1);
        assert_eq!(stats.completion_pauses, 1);
        assert_eq!(stats.paused_ms, 5200);
        assert!(start.elapsed() >= Duration::from_millis(5200));
    }

    #[tokio::test]
    async fn test_disabled_pacer_never_sleeps() {
        let pacer = Pacer::new(PacingConfig::disabled());

        pacer.after_call().await;
        pacer.after_entity().await;
        pacer.on_complete().await;

        assert_eq!(pacer.stats(), PacerStats::default());
    }

    #[test]
    fn test_completion_pause_is_zero_when_disabled() {
        let enabled = Pacer::new(PacingConfig::default());
        let disabled = Pacer::new(PacingConfig::builder().enabled(false).build());

        assert_eq!(enabled.completion_pause(), Duration::from_secs(5));
        assert_eq!(disabled.config().completion_delay, Duration::from_secs(5));
        assert_eq!(disabled.completion_pause(), Duration::ZERO);
    }
}
