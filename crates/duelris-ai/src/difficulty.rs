use std::time::Duration;

use crate::config::AiConfig;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 10;

/// Level-dependent behavior of an AI opponent.
///
/// - **Think delay**: time between two decisions, shorter at higher levels
/// - **Noise scale**: `MAX_LEVEL - level`, multiplied with the configured noise
///   amplitude; zero at the maximum level
/// - **Drop style**: hard drop after positioning above a level threshold or in panic,
///   otherwise one soft-drop step per decision
///
/// ```
/// use std::time::Duration;
///
/// use duelris_ai::{config::AiConfig, difficulty::Difficulty};
///
/// let difficulty = Difficulty::new(&AiConfig::with_level(10));
/// assert_eq!(difficulty.think_delay(), Duration::from_millis(50));
/// assert_eq!(difficulty.noise_scale(), 0.0);
/// assert!(difficulty.hard_drop(false));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    level: u8,
    think_delay: Duration,
    noise_scale: f32,
    hard_drop_above_level: u8,
}

impl Difficulty {
    #[must_use]
    pub fn new(config: &AiConfig) -> Self {
        let level = config.level.clamp(MIN_LEVEL, MAX_LEVEL);
        Self {
            level,
            think_delay: config.think_delay.delay(level),
            noise_scale: f32::from(MAX_LEVEL - level),
            hard_drop_above_level: config.hard_drop_above_level,
        }
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub fn think_delay(&self) -> Duration {
        self.think_delay
    }

    #[must_use]
    pub fn noise_scale(&self) -> f32 {
        self.noise_scale
    }

    #[must_use]
    pub fn hard_drop(&self, panic: bool) -> bool {
        panic || self.level > self.hard_drop_above_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(Difficulty::new(&AiConfig::with_level(0)).level(), 1);
        assert_eq!(Difficulty::new(&AiConfig::with_level(42)).level(), 10);
    }

    #[test]
    fn test_low_level_is_slow_and_noisy() {
        let difficulty = Difficulty::new(&AiConfig::with_level(1));
        assert_eq!(difficulty.think_delay(), Duration::from_millis(500));
        assert!((difficulty.noise_scale() - 9.0).abs() < f32::EPSILON);
        assert!(!difficulty.hard_drop(false));
        assert!(difficulty.hard_drop(true));
    }

    #[test]
    fn test_hard_drop_threshold() {
        assert!(!Difficulty::new(&AiConfig::with_level(5)).hard_drop(false));
        assert!(Difficulty::new(&AiConfig::with_level(6)).hard_drop(false));
    }
}
