use serde::{Deserialize, Serialize};
use std::fmt;
use tft_state::{Hex, Unit};

/// Items that mark their holder as the damage carry
pub const CARRY_ITEMS: &[&str] = &[
    "Infinity Edge",
    "Deathblade",
    "Giant Slayer",
    "Guinsoo",
    "Rabadon",
    "Jeweled Gauntlet",
    "Last Whisper",
];

pub const TANK_ITEMS: &[&str] = &[
    "Bramble Vest",
    "Dragon Claw",
    "Gargoyle Stoneplate",
    "Warmog",
    "Sunfire Cape",
    "Titan's Resolve",
];

pub const TANK_TRAITS: &[&str] = &["Bruiser", "Vanguard", "Bodyguard", "Colossus"];

/// Front line
pub const TANK_SLOTS: [Hex; 5] = [Hex(0, 0), Hex(0, 3), Hex(0, 6), Hex(1, 1), Hex(1, 5)];
/// Back corners
pub const CARRY_SLOTS: [Hex; 5] = [Hex(3, 0), Hex(3, 6), Hex(2, 1), Hex(2, 5), Hex(3, 3)];
/// Middle ring
pub const SUPPORT_SLOTS: [Hex; 5] = [Hex(1, 2), Hex(1, 4), Hex(2, 2), Hex(2, 4), Hex(2, 3)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Carry,
    Tank,
    Support,
}

impl Role {
    fn slots(self) -> &'static [Hex] {
        match self {
            Role::Tank => &TANK_SLOTS,
            Role::Carry => &CARRY_SLOTS,
            Role::Support => &SUPPORT_SLOTS,
        }
    }

    fn reason(self) -> &'static str {
        match self {
            Role::Tank => "Frontline tank to absorb damage",
            Role::Carry => "Backline carry for maximum damage output",
            Role::Support => "Midline support for utility",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Carry => "carry",
            Role::Tank => "tank",
            Role::Support => "support",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub unit: String,
    pub position: Hex,
    pub role: Role,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositioningPlan {
    /// Tanks first, then carries, then supports; each group in board order
    pub placements: Vec<Placement>,
    pub tanks: usize,
    pub carries: usize,
    pub supports: usize,
    pub summary: String,
    /// Adjustment against the most threatening scouted opponent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_tip: Option<String>,
}

impl PositioningPlan {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.summary.clone()];
        lines.extend(
            self.placements
                .iter()
                .map(|p| format!("{} -> {}: {}", p.unit, p.position, p.reason)),
        );
        if let Some(tip) = &self.counter_tip {
            lines.push(tip.clone());
        }
        lines
    }
}

/// Role by fixed precedence: carry, then tank, then support
pub fn classify(unit: &Unit) -> Role {
    let holds_any = |list: &[&str]| unit.items.iter().any(|i| list.contains(&i.as_str()));

    if holds_any(CARRY_ITEMS) || unit.cost >= 4 {
        Role::Carry
    } else if holds_any(TANK_ITEMS) || unit.traits.iter().any(|t| TANK_TRAITS.contains(&t.as_str())) {
        Role::Tank
    } else {
        Role::Support
    }
}

/// Assign each board unit a hex for its role. Units beyond a role's slot
/// count are left out of the plan.
pub fn optimize(board: &[Unit]) -> PositioningPlan {
    let mut tanks = Vec::new();
    let mut carries = Vec::new();
    let mut supports = Vec::new();

    for unit in board {
        match classify(unit) {
            Role::Carry => carries.push(unit),
            Role::Tank => tanks.push(unit),
            Role::Support => supports.push(unit),
        }
    }

    let mut placements = Vec::with_capacity(board.len());
    for (role, group) in [
        (Role::Tank, &tanks),
        (Role::Carry, &carries),
        (Role::Support, &supports),
    ] {
        placements.extend(group.iter().zip(role.slots()).map(|(unit, &position)| {
            Placement {
                unit: unit.name.clone(),
                position,
                role,
                reason: role.reason().to_string(),
            }
        }));
    }

    PositioningPlan {
        placements,
        tanks: tanks.len(),
        carries: carries.len(),
        supports: supports.len(),
        summary: format!(
            "{} tanks front, {} carries back, {} supports mid",
            tanks.len(),
            carries.len(),
            supports.len()
        ),
        counter_tip: None,
    }
}

/// Positioning adjustment against an enemy composition archetype
pub fn counter_position(archetype: &str) -> &'static str {
    match archetype {
        "Assassins" => "Clump in corner to protect carries from assassin jumps",
        "AoE" => "Spread units to minimize AoE damage",
        "Shroud" => "Position carries on opposite side from enemy carries",
        "Frontline" => "Stack one side to focus fire",
        _ => "Standard positioning",
    }
}
