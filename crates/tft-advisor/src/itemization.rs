use serde::{Deserialize, Serialize};
use tft_state::Unit;

pub const MAX_ITEMS: usize = 3;
const SUGGESTIONS_PER_UNIT: usize = 2;

const CARRY_BUILD: [&str; 3] = ["Infinity Edge", "Giant Slayer", "Deathblade"];
const CASTER_BUILD: [&str; 3] = ["Blue Buff", "Rabadon", "Morello"];
const TANK_BUILD: [&str; 3] = ["Sunfire Cape", "Warmog", "Bramble Vest"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSuggestion {
    pub unit: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizationAdvice {
    pub suggestions: Vec<ItemSuggestion>,
}

impl ItemizationAdvice {
    pub fn lines(&self) -> Vec<String> {
        self.suggestions
            .iter()
            .map(|s| format!("{}: {}", s.unit, s.items.join(", ")))
            .collect()
    }
}

fn build_for(cost: u32) -> &'static [&'static str] {
    if cost >= 4 {
        &CARRY_BUILD
    } else if cost >= 2 {
        &CASTER_BUILD
    } else {
        &TANK_BUILD
    }
}

/// Next items for every unit with a free item slot, by cost tier
pub fn recommend_items(board: &[Unit]) -> Vec<ItemSuggestion> {
    board
        .iter()
        .filter(|unit| unit.items.len() < MAX_ITEMS)
        .filter_map(|unit| {
            let items: Vec<String> = build_for(unit.cost)
                .iter()
                .copied()
                .filter(|item| !unit.items.iter().any(|held| held == item))
                .take(SUGGESTIONS_PER_UNIT)
                .map(|item| item.to_string())
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(ItemSuggestion {
                    unit: unit.name.clone(),
                    items,
                })
            }
        })
        .collect()
}
