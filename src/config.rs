use embassy_time::Duration;

use crate::error::ConfigError;

/// Timing and release policy of a [`ButtonController`](crate::ButtonController).
///
/// Fixed at construction time; the controller never changes it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// Continuous press time after which the press becomes a hold.
    ///
    /// Exactly one `hold` event is published per press, once this much time
    /// has passed since the press began.
    pub hold_threshold: Duration,

    /// Spacing of `repeat` events while the button stays pressed.
    ///
    /// The first `repeat` arrives one interval after the press, not at the press itself.
    pub repeat_interval: Duration,

    /// When set, a release that ends a hold publishes no `release` event.
    pub suppress_release_after_hold: bool,
}

impl ButtonConfig {
    /// Checks that both durations are non-zero.
    ///
    /// A zero repeat interval would spin the repeat loop, a zero hold threshold
    /// would turn every press into a hold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hold_threshold.as_ticks() == 0 {
            return Err(ConfigError::ZeroHoldThreshold);
        }
        if self.repeat_interval.as_ticks() == 0 {
            return Err(ConfigError::ZeroRepeatInterval);
        }
        Ok(())
    }
}

impl Default for ButtonConfig {
    /// - hold threshold: 2 s
    /// - repeat interval: 500 ms
    /// - release after hold: published
    fn default() -> Self {
        Self {
            hold_threshold: Duration::from_secs(2),
            repeat_interval: Duration::from_millis(500),
            suppress_release_after_hold: false,
        }
    }
}
