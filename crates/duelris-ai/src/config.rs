use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::placement_evaluator::{HeuristicWeights, PanicWeights};

/// Tuning of one AI opponent.
///
/// ```
/// use duelris_ai::config::AiConfig;
///
/// let config: AiConfig = serde_json::from_str(r#"{ "level": 8 }"#).unwrap();
/// assert_eq!(config.level, 8);
/// assert_eq!(config.weights.holes, -50.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Skill level, clamped to `1..=10`.
    pub level: u8,
    pub weights: HeuristicWeights,
    pub panic_weights: PanicWeights,
    /// The AI panics once the stack reaches this many rows from the ceiling.
    pub panic_margin_rows: usize,
    pub think_delay: ThinkDelayConfig,
    /// Half-width of the uniform noise added per level below the maximum.
    pub noise_amplitude: f32,
    /// Levels above this one hard-drop after positioning.
    pub hard_drop_above_level: u8,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            level: 5,
            weights: HeuristicWeights::default(),
            panic_weights: PanicWeights::default(),
            panic_margin_rows: 4,
            think_delay: ThinkDelayConfig::default(),
            noise_amplitude: 2.5,
            hard_drop_above_level: 5,
        }
    }
}

impl AiConfig {
    #[must_use]
    pub fn with_level(level: u8) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }
}

/// Delay between AI decisions: `max(floor, base - level * step)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThinkDelayConfig {
    pub base_ms: u64,
    pub level_step_ms: u64,
    pub floor_ms: u64,
}

impl Default for ThinkDelayConfig {
    fn default() -> Self {
        Self {
            base_ms: 550,
            level_step_ms: 50,
            floor_ms: 50,
        }
    }
}

impl ThinkDelayConfig {
    #[must_use]
    pub fn delay(&self, level: u8) -> Duration {
        let millis = self
            .base_ms
            .saturating_sub(u64::from(level).saturating_mul(self.level_step_ms))
            .max(self.floor_ms);
        Duration::from_millis(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_think_delay() {
        let delay = ThinkDelayConfig::default();
        assert_eq!(delay.delay(1), Duration::from_millis(500));
        assert_eq!(delay.delay(5), Duration::from_millis(300));
        assert_eq!(delay.delay(10), Duration::from_millis(50));
        assert_eq!(delay.delay(u8::MAX), Duration::from_millis(50));
    }

    #[test]
    fn test_think_delay_huge_step_hits_floor() {
        let config: AiConfig =
            serde_json::from_str(r#"{ "think_delay": { "level_step_ms": 18446744073709551615 } }"#)
                .unwrap();
        assert_eq!(config.think_delay.level_step_ms, u64::MAX);
        assert_eq!(config.think_delay.delay(5), Duration::from_millis(50));
        assert_eq!(config.think_delay.delay(0), Duration::from_millis(550));
    }

    #[test]
    fn test_default_config_round_trip() {
        let config = AiConfig::with_level(7);
        let json = serde_json::to_string(&config).unwrap();
        let back: AiConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
