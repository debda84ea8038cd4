use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Above this, the player can afford to play for economy
pub const HEALTHY_ABOVE: i32 = 80;
/// Below this, only board strength matters
pub const CRITICAL_BELOW: i32 = 30;
/// Active count at which a synergy is called out as strong
pub const STRONG_SYNERGY: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    Healthy,
    Neutral,
    Critical,
}

pub fn health_band(health: i32) -> HealthBand {
    if health > HEALTHY_ABOVE {
        HealthBand::Healthy
    } else if health < CRITICAL_BELOW {
        HealthBand::Critical
    } else {
        HealthBand::Neutral
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthAdvice {
    pub health: i32,
    pub band: HealthBand,
    pub commentary: String,
}

impl HealthAdvice {
    pub fn lines(&self) -> Vec<String> {
        vec![self.commentary.clone()]
    }
}

/// Health commentary; nothing to say in the neutral band
pub fn advise_health(health: i32) -> Option<HealthAdvice> {
    let band = health_band(health);
    let commentary = match band {
        HealthBand::Healthy => "Good health. You can focus on economy.",
        HealthBand::Critical => "Critical health! Focus on board strength.",
        HealthBand::Neutral => return None,
    };
    Some(HealthAdvice {
        health,
        band,
        commentary: commentary.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSynergy {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynergyAdvice {
    pub strong: Vec<ActiveSynergy>,
}

impl SynergyAdvice {
    pub fn lines(&self) -> Vec<String> {
        let listed: Vec<String> = self
            .strong
            .iter()
            .map(|s| format!("{} ({})", s.name, s.count))
            .collect();
        vec![format!("Strong synergies: {}", listed.join(", "))]
    }
}

/// Synergies at or above the strong threshold, by name
pub fn advise_synergies(synergies: &BTreeMap<String, u32>) -> Option<SynergyAdvice> {
    let strong: Vec<ActiveSynergy> = synergies
        .iter()
        .filter(|(_, count)| **count >= STRONG_SYNERGY)
        .map(|(name, &count)| ActiveSynergy {
            name: name.clone(),
            count,
        })
        .collect();

    if strong.is_empty() {
        None
    } else {
        Some(SynergyAdvice { strong })
    }
}
