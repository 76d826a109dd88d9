//! Placement evaluation: scoring the board left by a single placement.
//!
//! Two evaluators are provided:
//!
//! - [`HeuristicEvaluator`] for normal play, favoring flat, hole-free stacks:
//!   `height * w_h + lines * w_l + holes * w_o`
//! - [`PanicEvaluator`] for a stack close to the ceiling, which ignores holes and
//!   goes for any line clear: `lines * w_l + height * w_h`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board_analysis::BoardAnalysis;

/// Scores a placement from the analysis of the board it leaves (higher is better).
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_placement(&self, analysis: &BoardAnalysis) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    pub height: f32,
    pub lines: f32,
    pub holes: f32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            height: -10.0,
            lines: 20.0,
            holes: -50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanicWeights {
    pub lines: f32,
    pub height: f32,
}

impl Default for PanicWeights {
    fn default() -> Self {
        Self {
            lines: 1000.0,
            height: -10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeuristicEvaluator {
    weights: HeuristicWeights,
}

impl HeuristicEvaluator {
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }
}

impl PlacementEvaluator for HeuristicEvaluator {
    #[expect(clippy::cast_precision_loss)]
    fn evaluate_placement(&self, analysis: &BoardAnalysis) -> f32 {
        analysis.height() as f32 * self.weights.height
            + analysis.full_lines() as f32 * self.weights.lines
            + analysis.holes() as f32 * self.weights.holes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanicEvaluator {
    weights: PanicWeights,
}

impl PanicEvaluator {
    #[must_use]
    pub fn new(weights: PanicWeights) -> Self {
        Self { weights }
    }
}

impl PlacementEvaluator for PanicEvaluator {
    #[expect(clippy::cast_precision_loss)]
    fn evaluate_placement(&self, analysis: &BoardAnalysis) -> f32 {
        analysis.full_lines() as f32 * self.weights.lines
            + analysis.height() as f32 * self.weights.height
    }
}
