pub mod analyze;
pub mod history;
pub mod rules;
pub mod watch;

use crate::config::{AppConfig, OutputFormat};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tft_advisor::{Advisor, Report, RuleEngine};
use tft_data::GameData;
use tft_state::GameState;
use tracing::{info, warn};

/// Rules from disk; a missing file means an empty rule set
pub fn load_rules(path: &Path) -> Result<RuleEngine> {
    if !path.exists() {
        warn!("Rules file {} not found, no rules loaded", path.display());
        return Ok(RuleEngine::default());
    }
    RuleEngine::load(path)
}

/// Advisor with rules and, when the data directory has any content, the
/// unit and composition registry
pub fn build_advisor(config: &AppConfig) -> Result<Advisor> {
    let rules = load_rules(&config.rules_path)?;
    let advisor = Advisor::new(rules);

    let data = GameData::load(&config.data_dir)?;
    if data.is_empty() {
        info!("No game data in {}, composition analysis disabled", config.data_dir.display());
        return Ok(advisor);
    }
    Ok(advisor.with_data_source(Arc::new(data)))
}

/// Read a state file, or stdin when the path is `-`
pub fn read_state(path: &Path) -> Result<GameState> {
    if path == Path::new("-") {
        let json = std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?;
        return GameState::from_json(&json).context("Failed to parse game state from stdin");
    }
    GameState::load(path)
}

pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_rules_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let rules = load_rules(&dir.path().join("rules.json")).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn test_build_advisor_without_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            rules_path: dir.path().join("rules.json"),
            data_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        let advisor = build_advisor(&config).unwrap();
        assert!(advisor.rules().is_empty());
    }

    #[test]
    fn test_render_json() {
        let json = render(&Report::default(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["recommendations"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_read_state_missing_file() {
        assert!(read_state(&PathBuf::from("/nonexistent/state.json")).is_err());
    }
}
