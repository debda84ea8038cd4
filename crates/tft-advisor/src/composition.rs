use crate::report::{Recommendation, RecommendationSource};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tft_data::GameDataSource;
use tft_state::GameState;

const MAX_MISSING_SHOWN: usize = 5;
const MAX_LOOK_FOR: usize = 3;
/// Below this health a second composition is offered as a pivot
const PIVOT_HEALTH: i32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosestComp {
    pub name: String,
    pub tier: String,
    /// Percentage of core units already on the board
    pub completion: f64,
    pub missing_units: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionAdvice {
    pub closest: Option<ClosestComp>,
    /// Average cost of board units the data source knows about
    pub average_cost: Option<f64>,
    /// Highest priority first
    pub hints: Vec<Recommendation>,
}

impl CompositionAdvice {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(closest) = &self.closest {
            lines.push(format!(
                "Closest meta comp: {} ({:.0}% complete)",
                closest.name, closest.completion
            ));
            lines.push(format!("Tier: {}", closest.tier));
            if !closest.missing_units.is_empty() {
                lines.push(format!(
                    "Missing key units: {}",
                    closest.missing_units.join(", ")
                ));
            }
        }
        if let Some(avg) = self.average_cost {
            lines.push(format!("Average unit cost: {:.1}", avg));
        }
        lines.extend(self.hints.iter().map(|h| h.text.clone()));
        lines
    }
}

/// Compare the board against meta compositions. Errors from the data
/// source are returned to the caller untouched.
pub fn assess(source: &dyn GameDataSource, state: &GameState) -> Result<Option<CompositionAdvice>> {
    if state.current_board.is_empty() {
        return Ok(None);
    }

    let names = state.board_unit_names();
    let matches = source.recommend_compositions(&names)?;

    let mut hints = Vec::new();
    if let Some(top) = matches.first() {
        if top.matched_units.len() >= 2 {
            let look_for: Vec<&str> = top
                .missing_units
                .iter()
                .take(MAX_LOOK_FOR)
                .map(String::as_str)
                .collect();
            hints.push(Recommendation {
                text: format!(
                    "Building toward {} comp ({} tier). Look for: {}",
                    top.name,
                    top.tier,
                    look_for.join(", ")
                ),
                source: RecommendationSource::Meta {
                    comp: top.name.clone(),
                },
                priority: Some(top.completion()),
            });
        }
    }
    if let Some(alt) = matches.get(1) {
        if state.health < PIVOT_HEALTH {
            hints.push(Recommendation {
                text: format!(
                    "Alternative pivot: {} (you have {} units)",
                    alt.name,
                    alt.matched_units.len()
                ),
                source: RecommendationSource::Meta {
                    comp: alt.name.clone(),
                },
                priority: Some(alt.completion()),
            });
        }
    }
    hints.sort_by(|a, b| {
        b.priority
            .unwrap_or(0.0)
            .total_cmp(&a.priority.unwrap_or(0.0))
    });

    let closest = matches.first().map(|top| ClosestComp {
        name: top.name.clone(),
        tier: top.tier.clone(),
        completion: top.completion() * 100.0,
        missing_units: top
            .missing_units
            .iter()
            .take(MAX_MISSING_SHOWN)
            .cloned()
            .collect(),
    });

    let mut known_costs = Vec::new();
    for name in &names {
        if let Some(info) = source.get_unit_info(name)? {
            known_costs.push(f64::from(info.cost));
        }
    }
    let average_cost = if known_costs.is_empty() {
        None
    } else {
        Some(known_costs.iter().sum::<f64>() / known_costs.len() as f64)
    };

    if closest.is_none() && average_cost.is_none() {
        return Ok(None);
    }

    Ok(Some(CompositionAdvice {
        closest,
        average_cost,
        hints,
    }))
}
