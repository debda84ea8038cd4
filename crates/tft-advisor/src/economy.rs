use serde::{Deserialize, Serialize};

pub const MAX_INTEREST: u32 = 5;
pub const INTEREST_STEP: u32 = 10;
pub const REROLL_COST: u32 = 2;

/// Gold needed to level up from a given level
const LEVEL_UP_COSTS: [(i32, u32); 6] = [(4, 4), (5, 8), (6, 20), (7, 36), (8, 56), (9, 80)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub target: u32,
    pub needed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub cost: u32,
    pub affordable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyAdvice {
    pub gold: u32,
    pub interest: u32,
    /// Absent once interest is capped
    pub next_breakpoint: Option<Breakpoint>,
    /// Absent for levels without a known cost
    pub level_up: Option<LevelUp>,
    pub rerolls: u32,
    pub advice: Vec<String>,
}

impl EconomyAdvice {
    pub fn lines(&self) -> Vec<String> {
        self.advice.clone()
    }
}

pub fn interest(gold: u32) -> u32 {
    (gold / INTEREST_STEP).min(MAX_INTEREST)
}

/// Next interest breakpoint, or None once interest is already capped
pub fn next_breakpoint(gold: u32) -> Option<Breakpoint> {
    if interest(gold) >= MAX_INTEREST {
        return None;
    }
    let target = (gold / INTEREST_STEP + 1) * INTEREST_STEP;
    Some(Breakpoint {
        target,
        needed: target - gold,
    })
}

pub fn level_up_cost(level: i32) -> Option<u32> {
    LEVEL_UP_COSTS
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, cost)| *cost)
}

pub fn rerolls(gold: u32) -> u32 {
    gold / REROLL_COST
}

/// Interest, leveling and rolling advice for the current gold and level
pub fn advise(gold: i32, level: i32) -> EconomyAdvice {
    let gold = u32::try_from(gold).unwrap_or(0);
    let interest = interest(gold);
    let next_breakpoint = next_breakpoint(gold);
    let level_up = level_up_cost(level).map(|cost| LevelUp {
        cost,
        affordable: gold >= cost,
    });
    let rerolls = rerolls(gold);

    let mut advice = vec![format!(
        "Current gold: {}g (earning {}g interest)",
        gold, interest
    )];

    if let Some(bp) = next_breakpoint {
        advice.push(format!(
            "Need {}g for next interest breakpoint ({}g)",
            bp.needed, bp.target
        ));
    }

    if let Some(lu) = level_up {
        if lu.affordable {
            advice.push(format!("Can afford to level up ({}g)", lu.cost));
        } else {
            advice.push(format!(
                "Need {}g more to level ({}g)",
                lu.cost - gold,
                lu.cost
            ));
        }
    }

    if rerolls > 0 {
        advice.push(format!(
            "Can roll {} times ({}g each)",
            rerolls, REROLL_COST
        ));
    }

    if gold > 50 {
        advice.push("You have plenty of gold. Consider leveling up.".to_string());
    } else if gold < 30 {
        advice.push("Low on gold. Avoid rolling unless necessary.".to_string());
    }

    EconomyAdvice {
        gold,
        interest,
        next_breakpoint,
        level_up,
        rerolls,
        advice,
    }
}
