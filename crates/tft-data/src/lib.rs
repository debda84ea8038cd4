mod history;

pub use history::{MatchHistory, MatchRecord, MatchSink, MatchStats};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Champion data from Data Dragon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionData {
    pub id: String,
    pub name: String,
    pub cost: u32,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ChampionStats>,
}

/// Base combat stats at one star
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionStats {
    pub hp: f64,
    pub mana: f64,
    pub armor: f64,
    pub mr: f64,
    pub damage: f64,
}

/// Meta composition definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaComp {
    pub name: String,
    pub tier: String,
    pub core_units: Vec<String>,
    #[serde(default)]
    pub flex_units: Vec<String>,
    #[serde(default)]
    pub core_items: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub early_game: Vec<String>,
    #[serde(default)]
    pub power_spike: String,
}

/// How closely a board lines up with one meta composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompMatch {
    pub name: String,
    pub matched_units: Vec<String>,
    pub missing_units: Vec<String>,
    pub tier: String,
}

impl CompMatch {
    /// Share of the composition's core units already on the board, 0.0-1.0
    pub fn completion(&self) -> f64 {
        let total = self.matched_units.len() + self.missing_units.len();
        if total == 0 {
            0.0
        } else {
            self.matched_units.len() as f64 / total as f64
        }
    }
}

/// Sort key for tier letters; S is best
pub fn tier_rank(tier: &str) -> u8 {
    match tier.trim().to_ascii_uppercase().as_str() {
        "S" => 0,
        "A" => 1,
        "B" => 2,
        "C" => 3,
        "D" => 4,
        _ => 5,
    }
}

/// Read-only lookups the advisor may consult. Implementations may be backed
/// by anything (files, a database, a cache of scraped data) and may fail.
pub trait GameDataSource: Send + Sync {
    /// Look up a champion by id or display name
    fn get_unit_info(&self, name: &str) -> Result<Option<ChampionData>>;

    /// Best compositions of the current patch, best first
    fn top_compositions(&self, limit: usize) -> Result<Vec<MetaComp>>;

    /// Compositions sharing at least one unit with `unit_names`, ranked by
    /// matched unit count (descending) and then tier
    fn recommend_compositions(&self, unit_names: &[String]) -> Result<Vec<CompMatch>> {
        let comps = self.top_compositions(usize::MAX)?;
        Ok(match_compositions(&comps, unit_names))
    }
}

/// Rank `comps` against the units currently held
pub fn match_compositions(comps: &[MetaComp], unit_names: &[String]) -> Vec<CompMatch> {
    let owned: HashSet<&str> = unit_names.iter().map(String::as_str).collect();

    let mut matches: Vec<CompMatch> = comps
        .iter()
        .filter_map(|comp| {
            let (matched, missing): (Vec<&String>, Vec<&String>) = comp
                .core_units
                .iter()
                .partition(|unit| owned.contains(unit.as_str()));
            if matched.is_empty() {
                return None;
            }
            Some(CompMatch {
                name: comp.name.clone(),
                matched_units: matched.into_iter().cloned().collect(),
                missing_units: missing.into_iter().cloned().collect(),
                tier: comp.tier.clone(),
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.matched_units
            .len()
            .cmp(&a.matched_units.len())
            .then_with(|| tier_rank(&a.tier).cmp(&tier_rank(&b.tier)))
    });
    matches
}

/// Raw champions.json file format
#[derive(Debug, Deserialize)]
struct ChampionsFile {
    #[allow(dead_code)]
    version: String,
    #[allow(dead_code)]
    set: Option<u32>,
    champions: Vec<ChampionData>,
}

/// Raw comps.json file format
#[derive(Debug, Deserialize)]
struct CompsFile {
    comps: Vec<MetaComp>,
}

/// Game data registry
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub champions: HashMap<String, ChampionData>,
    pub champions_by_name: HashMap<String, String>,
    pub meta_comps: Vec<MetaComp>,
}

impl GameData {
    /// Load champion and composition data from the data directory
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut data = Self::default();

        let champions_path = data_dir.join("champions.json");
        if champions_path.exists() {
            let content = std::fs::read_to_string(&champions_path)
                .context("Failed to read champions.json")?;
            let file: ChampionsFile =
                serde_json::from_str(&content).context("Failed to parse champions.json")?;

            for champ in file.champions {
                data.insert_champion(champ);
            }

            tracing::info!("Loaded {} champions", data.champions.len());
        } else {
            tracing::warn!(
                "No champions.json found at {}. Unit lookups disabled.",
                champions_path.display()
            );
        }

        let comps_path = data_dir.join("comps.json");
        if comps_path.exists() {
            let content =
                std::fs::read_to_string(&comps_path).context("Failed to read comps.json")?;
            let file: CompsFile =
                serde_json::from_str(&content).context("Failed to parse comps.json")?;
            data.meta_comps = file.comps;
            tracing::info!("Loaded {} meta compositions", data.meta_comps.len());
        } else {
            tracing::warn!("No comps.json found at {}", comps_path.display());
        }

        Ok(data)
    }

    pub fn insert_champion(&mut self, champ: ChampionData) {
        self.champions_by_name
            .insert(champ.name.to_lowercase(), champ.id.clone());
        self.champions.insert(champ.id.clone(), champ);
    }

    pub fn is_empty(&self) -> bool {
        self.champions.is_empty() && self.meta_comps.is_empty()
    }
}

impl GameDataSource for GameData {
    fn get_unit_info(&self, name: &str) -> Result<Option<ChampionData>> {
        let champ = self.champions.get(name).or_else(|| {
            self.champions_by_name
                .get(&name.to_lowercase())
                .and_then(|id| self.champions.get(id))
        });
        Ok(champ.cloned())
    }

    fn top_compositions(&self, limit: usize) -> Result<Vec<MetaComp>> {
        let mut comps = self.meta_comps.clone();
        comps.sort_by_key(|c| tier_rank(&c.tier));
        comps.truncate(limit);
        Ok(comps)
    }
}
