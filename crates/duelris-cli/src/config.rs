use std::path::Path;

use duelris_ai::config::AiConfig;
use duelris_engine::MatchConfig;
use serde::{Deserialize, Serialize};

use crate::util;

/// Configuration file of an AI-vs-AI session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    #[serde(rename = "match")]
    pub match_config: MatchConfig,
    pub left_ai: AiConfig,
    pub right_ai: AiConfig,
}

impl DuelConfig {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json("duel config", path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: DuelConfig = serde_json::from_str(
            r#"{ "match": { "preview_len": 3 }, "right_ai": { "level": 9 } }"#,
        )
        .unwrap();
        assert_eq!(config.match_config.preview_len, 3);
        assert_eq!(config.match_config.garbage_table, [0, 0, 1, 2, 4]);
        assert_eq!(config.left_ai, AiConfig::default());
        assert_eq!(config.right_ai.level, 9);
    }
}
