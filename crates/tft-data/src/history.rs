use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tft_state::{GameState, Unit};
use tracing::{debug, info};

/// Destination for completed-match records
pub trait MatchSink {
    fn save_match(&mut self, state: &GameState, placement: u8, comp_name: &str) -> Result<()>;
}

/// A finished game as stored in the history file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unix time in milliseconds
    pub timestamp: u64,
    pub placement: u8,
    #[serde(default)]
    pub comp_name: String,
    pub final_level: i32,
    #[serde(default)]
    pub board: Vec<Unit>,
    #[serde(default)]
    pub synergies: BTreeMap<String, u32>,
}

/// Aggregate performance over the stored matches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub total_games: usize,
    pub avg_placement: f64,
    /// Percentage of games finishing in the top four
    pub top4_rate: f64,
    /// Percentage of games won
    pub win_rate: f64,
}

/// Match history persisted as a JSON array
#[derive(Debug, Clone)]
pub struct MatchHistory {
    path: PathBuf,
    matches: Vec<MatchRecord>,
}

impl MatchHistory {
    /// Open the history at `path`; a missing file is an empty history
    pub fn open(path: &Path) -> Result<Self> {
        let matches = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read match history {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse match history {}", path.display()))?
        } else {
            Vec::new()
        };
        debug!("Opened match history with {} record(s)", matches.len());
        Ok(Self {
            path: path.to_path_buf(),
            matches,
        })
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn stats(&self) -> MatchStats {
        if self.matches.is_empty() {
            return MatchStats::default();
        }

        let total = self.matches.len() as f64;
        let placements = self.matches.iter().map(|m| m.placement as f64);
        let top4 = self.matches.iter().filter(|m| m.placement <= 4).count() as f64;
        let wins = self.matches.iter().filter(|m| m.placement == 1).count() as f64;

        MatchStats {
            total_games: self.matches.len(),
            avg_placement: placements.sum::<f64>() / total,
            top4_rate: top4 / total * 100.0,
            win_rate: wins / total * 100.0,
        }
    }

    /// Write `records` as the full history file
    fn persist(&self, records: &[MatchRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create history directory {}", parent.display())
                })?;
            }
        }
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write match history {}", self.path.display()))
    }
}

impl MatchSink for MatchHistory {
    fn save_match(&mut self, state: &GameState, placement: u8, comp_name: &str) -> Result<()> {
        if !(1..=8).contains(&placement) {
            bail!("Placement must be between 1 and 8, got {}", placement);
        }

        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        // Only keep the record in memory once it is on disk
        let mut records = self.matches.clone();
        records.push(MatchRecord {
            timestamp,
            placement,
            comp_name: comp_name.to_string(),
            final_level: state.level,
            board: state.current_board.clone(),
            synergies: state.synergies.clone(),
        });
        self.persist(&records)?;
        self.matches = records;

        info!(
            "Saved match: placement {} ({} games recorded)",
            placement,
            self.matches.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState {
            level: 8,
            stage: "5-1".into(),
            current_board: vec![Unit::new("Ahri", 4, 2)],
            ..GameState::default()
        }
    }

    #[test]
    fn test_empty_history_stats() {
        let dir = tempfile::tempdir().unwrap();
        let history = MatchHistory::open(&dir.path().join("history.json")).unwrap();
        assert_eq!(history.stats(), MatchStats::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let mut history = MatchHistory::open(&path).unwrap();
        history.save_match(&state(), 1, "Mages").unwrap();
        history.save_match(&state(), 3, "").unwrap();
        history.save_match(&state(), 6, "").unwrap();
        history.save_match(&state(), 4, "").unwrap();

        let reloaded = MatchHistory::open(&path).unwrap();
        assert_eq!(reloaded.matches().len(), 4);
        assert_eq!(reloaded.matches()[0].comp_name, "Mages");
        assert_eq!(reloaded.matches()[0].final_level, 8);

        let stats = reloaded.stats();
        assert_eq!(stats.total_games, 4);
        assert!((stats.avg_placement - 3.5).abs() < 1e-9);
        assert!((stats.top4_rate - 75.0).abs() < 1e-9);
        assert!((stats.win_rate - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_out_of_range_placement() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = MatchHistory::open(&dir.path().join("h.json")).unwrap();
        assert!(history.save_match(&state(), 0, "").is_err());
        assert!(history.save_match(&state(), 9, "").is_err());
        assert!(history.matches().is_empty());
    }

    #[test]
    fn test_failed_write_keeps_history_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut history = MatchHistory::open(&path).unwrap();
        history.save_match(&state(), 1, "Mages").unwrap();

        // A directory in place of the file makes the write fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(history.save_match(&state(), 2, "").is_err());
        assert_eq!(history.matches().len(), 1);
        assert_eq!(history.stats().total_games, 1);
        assert_eq!(history.stats().win_rate, 100.0);
    }
}
