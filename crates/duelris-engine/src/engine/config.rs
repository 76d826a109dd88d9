use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable rules of a single match.
///
/// Every field falls back to its default when missing from a deserialized document.
///
/// ```
/// use duelris_engine::MatchConfig;
///
/// let config: MatchConfig = serde_json::from_str(r#"{ "preview_len": 3 }"#).unwrap();
/// assert_eq!(config.preview_len, 3);
/// assert_eq!(config.garbage_for_lines(4), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub gravity: GravityConfig,
    /// Gravity interval divisor while soft drop is held.
    pub soft_drop_factor: u32,
    /// Number of upcoming pieces kept visible.
    pub preview_len: usize,
    /// Garbage rows sent to the opponent, indexed by lines cleared at once.
    pub garbage_table: Vec<usize>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            gravity: GravityConfig::default(),
            soft_drop_factor: 20,
            preview_len: 5,
            garbage_table: vec![0, 0, 1, 2, 4],
        }
    }
}

impl MatchConfig {
    /// Garbage rows sent for clearing `lines` rows with one piece.
    ///
    /// Clears larger than the table use its last entry.
    #[must_use]
    pub fn garbage_for_lines(&self, lines: usize) -> usize {
        self.garbage_table
            .get(lines)
            .or_else(|| self.garbage_table.last())
            .copied()
            .unwrap_or(0)
    }
}

/// Gravity speed curve: `max(min, base - level * step)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    pub base_interval_ms: u64,
    pub level_step_ms: u64,
    pub min_interval_ms: u64,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 1000,
            level_step_ms: 100,
            min_interval_ms: 100,
        }
    }
}

impl GravityConfig {
    #[must_use]
    pub fn drop_interval(&self, level: usize) -> Duration {
        let level = u64::try_from(level).unwrap_or(u64::MAX);
        let millis = self
            .base_interval_ms
            .saturating_sub(level.saturating_mul(self.level_step_ms))
            .max(self.min_interval_ms);
        Duration::from_millis(millis)
    }
}
