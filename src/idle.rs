//! Idle Watchdog
//!
//! Tracks the last user activity and decides when to nudge the user.
//! Runs on the tokio clock so paused-time tests can drive it.

use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

/// Default inactivity before the user counts as idle
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(120);

const FIRST_TIER: Duration = Duration::from_secs(180);
const SECOND_TIER: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct IdleWatchdog {
    last_activity: Instant,
    prompt_sent: bool,
    threshold: Duration,
}

impl Default for IdleWatchdog {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_THRESHOLD)
    }
}

impl IdleWatchdog {
    pub fn new(threshold: Duration) -> Self {
        info!("⏱️ Idle watchdog armed ({}s)", threshold.as_secs());
        Self {
            last_activity: Instant::now(),
            prompt_sent: false,
            threshold,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// User did something; starts a new idle episode
    pub fn record_activity(&mut self) {
        self.last_activity = Instant::now();
        self.prompt_sent = false;
    }

    pub fn idle_duration(&self) -> Duration {
        self.last_activity.elapsed()
    }

    /// Strictly longer than the threshold
    pub fn is_idle(&self) -> bool {
        self.idle_duration() > self.threshold
    }

    /// True at most once per idle episode
    pub fn should_prompt(&mut self) -> bool {
        if self.is_idle() && !self.prompt_sent {
            self.prompt_sent = true;
            return true;
        }
        false
    }

    pub fn prompt_sent(&self) -> bool {
        self.prompt_sent
    }

    /// Prompt text, firmer the longer the user has been away
    pub fn idle_message(&self) -> &'static str {
        let idle = self.idle_duration();
        if idle < FIRST_TIER {
            "I haven't seen you use the map for a while. Do you need help?"
        } else if idle < SECOND_TIER {
            "Still there? Is there anything I can help with?"
        } else {
            "If you need help, just say so!"
        }
    }

    pub fn reset(&mut self) {
        self.record_activity();
        info!("Idle watchdog reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_threshold_is_strict() {
        let watchdog = IdleWatchdog::new(Duration::from_secs(120));
        advance(Duration::from_secs(120)).await;
        assert!(!watchdog.is_idle());
        advance(Duration::from_millis(1)).await;
        assert!(watchdog.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompt_once_per_episode() {
        let mut watchdog = IdleWatchdog::default();
        assert!(!watchdog.should_prompt());

        advance(Duration::from_secs(121)).await;
        assert!(watchdog.should_prompt());
        assert!(!watchdog.should_prompt());

        advance(Duration::from_secs(600)).await;
        assert!(!watchdog.should_prompt());

        watchdog.record_activity();
        assert!(!watchdog.prompt_sent());
        advance(Duration::from_secs(121)).await;
        assert!(watchdog.should_prompt());
    }

    #[tokio::test(start_paused = true)]
    async fn test_message_tiers() {
        let watchdog = IdleWatchdog::default();
        advance(Duration::from_secs(150)).await;
        assert!(watchdog.idle_message().starts_with("I haven't seen you"));
        advance(Duration::from_secs(60)).await;
        assert!(watchdog.idle_message().starts_with("Still there?"));
        advance(Duration::from_secs(120)).await;
        assert_eq!(watchdog.idle_message(), "If you need help, just say so!");
    }
}
