use crate::positioning::counter_position;
use serde::{Deserialize, Serialize};
use tft_state::OpponentBoard;

const GENERAL_COUNTERS: [&str; 3] = ["Build tank items", "Stack MR", "Position defensively"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    pub opponent: String,
    /// Sum of cost times stars over the board, divided by ten
    pub threat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
    pub counters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatReport {
    /// Most threatening first
    pub threats: Vec<Threat>,
}

impl ThreatReport {
    pub fn lines(&self) -> Vec<String> {
        self.threats
            .iter()
            .map(|t| {
                let name = if t.opponent.is_empty() {
                    "Unknown opponent"
                } else {
                    t.opponent.as_str()
                };
                match &t.archetype {
                    Some(archetype) => format!(
                        "{} ({}): threat {:.1} - {}",
                        name,
                        archetype,
                        t.threat,
                        t.counters.join("; ")
                    ),
                    None => format!(
                        "{}: threat {:.1} - {}",
                        name,
                        t.threat,
                        t.counters.join("; ")
                    ),
                }
            })
            .collect()
    }

    pub fn top(&self) -> Option<&Threat> {
        self.threats.first()
    }
}

pub fn threat_level(opponent: &OpponentBoard) -> f64 {
    let total: f64 = opponent
        .board
        .iter()
        .map(|u| f64::from(u.cost) * f64::from(u.stars))
        .sum();
    total / 10.0
}

/// Score every scouted board, most threatening first
pub fn analyze_threats(opponents: &[OpponentBoard]) -> ThreatReport {
    let mut threats: Vec<Threat> = opponents
        .iter()
        .map(|opponent| {
            let mut counters: Vec<String> = Vec::new();
            if let Some(archetype) = &opponent.archetype {
                counters.push(counter_position(archetype).to_string());
            }
            counters.extend(GENERAL_COUNTERS.iter().map(|c| c.to_string()));
            Threat {
                opponent: opponent.name.clone(),
                threat: threat_level(opponent),
                archetype: opponent.archetype.clone(),
                counters,
            }
        })
        .collect();

    threats.sort_by(|a, b| b.threat.total_cmp(&a.threat));
    ThreatReport { threats }
}
