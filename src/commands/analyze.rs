use super::{build_advisor, read_state, render};
use crate::config::AppConfig;
use anyhow::Result;
use std::path::Path;
use tft_advisor::Advisor;
use tft_state::GameState;
use tracing::info;

/// One-shot analysis of a state file
pub fn run(config: &AppConfig, state_path: &Path) -> Result<()> {
    let advisor = build_advisor(config)?;
    let state = read_state(state_path)?;
    info!("Analyzing stage {} ({})", state.stage, state_path.display());
    println!("{}", analyze(&advisor, &state, config)?);
    Ok(())
}

pub fn analyze(advisor: &Advisor, state: &GameState, config: &AppConfig) -> Result<String> {
    let report = advisor.compose(state)?;
    render(&report, config.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tft_advisor::{Condition, Rule, RuleEngine};

    fn state() -> GameState {
        GameState::from_json(
            r#"{"level": 7, "gold": 12, "health": 25, "stage": "4-5",
                "current_board": [{"unit": "Garen", "cost": 1, "stars": 2}]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_analyze_text() {
        let advisor = Advisor::new(RuleEngine::new(vec![Rule::new(
            Condition::new("health", "lt", 30),
            "Roll down for upgrades",
        )]));
        let text = analyze(&advisor, &state(), &AppConfig::default()).unwrap();
        assert!(text.contains("1. Roll down for upgrades"));
        assert!(text.contains("Health Status:\n- Critical health! Focus on board strength."));
    }

    #[test]
    fn test_analyze_json() {
        let config = AppConfig {
            format: OutputFormat::Json,
            ..AppConfig::default()
        };
        let advisor = Advisor::new(RuleEngine::default());
        let json = analyze(&advisor, &state(), &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sections"][0]["kind"], "economy");
    }

    #[test]
    fn test_invalid_state_is_error() {
        let mut state = state();
        state.stage.clear();
        let advisor = Advisor::new(RuleEngine::default());
        let err = analyze(&advisor, &state, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("stage"));
    }
}
