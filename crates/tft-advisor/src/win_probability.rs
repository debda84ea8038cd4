use crate::board::board_strength;
use crate::error::SectionError;
use serde::{Deserialize, Serialize};
use tft_state::{GameState, MAX_LEVEL};

const HEALTH_WEIGHT: f64 = 0.35;
const BOARD_WEIGHT: f64 = 0.40;
const LEVEL_WEIGHT: f64 = 0.15;
const ECONOMY_WEIGHT: f64 = 0.10;

/// Stage at which outcomes are considered settled
const LATE_STAGE: f64 = 7.0;

/// Placement risk bands in percent.
///
/// These are descriptive bands, not a distribution: the three values are
/// not normalised and need not sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinProbability {
    pub top1_probability: f64,
    pub top4_probability: f64,
    pub bottom4_probability: f64,
    /// Stage-adjusted combined score, scaled by 100
    pub score: f64,
}

impl WinProbability {
    pub(crate) fn ensure_finite(&self) -> Result<(), SectionError> {
        let fields = [
            ("top1_probability", self.top1_probability),
            ("top4_probability", self.top4_probability),
            ("bottom4_probability", self.bottom4_probability),
            ("score", self.score),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(SectionError::NonFinite(*name)),
            None => Ok(()),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Top 1: {:.1}%", self.top1_probability),
            format!("Top 4: {:.1}%", self.top4_probability),
            format!("Bottom 4: {:.1}%", self.bottom4_probability),
        ]
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Estimate placement odds from health, board, level and gold, with later
/// stages pushing the estimate towards more confident values.
pub fn estimate(state: &GameState) -> WinProbability {
    let health_score = f64::from(state.health) / 100.0;
    let board_score = (f64::from(board_strength(&state.current_board)) / 100.0).min(1.0);
    let level_score = f64::from(state.level) / f64::from(MAX_LEVEL);
    let economy_score = (f64::from(state.gold) / 50.0).min(1.0);

    let base = HEALTH_WEIGHT * health_score
        + BOARD_WEIGHT * board_score
        + LEVEL_WEIGHT * level_score
        + ECONOMY_WEIGHT * economy_score;

    let stage_factor = (f64::from(state.stage_major()) / LATE_STAGE).min(1.0);
    let adjusted = base * (0.7 + 0.3 * stage_factor);

    let top1 = adjusted.powi(2).clamp(0.0, 1.0);
    let top4 = (adjusted * 1.5).clamp(0.0, 1.0);
    let bottom4 = 1.0 - top4;

    WinProbability {
        top1_probability: round1(top1 * 100.0),
        top4_probability: round1(top4 * 100.0),
        bottom4_probability: round1(bottom4 * 100.0),
        score: round1(adjusted * 100.0),
    }
}
