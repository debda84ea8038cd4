use super::read_state;
use crate::config::{AppConfig, OutputFormat};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tft_advisor::RuleEngine;
use tft_state::GameState;

/// Check the configured rule set, optionally against a state
pub fn run(config: &AppConfig, state_path: Option<&Path>, strict: bool) -> Result<()> {
    let engine = RuleEngine::load(&config.rules_path)?;
    let state = state_path.map(read_state).transpose()?;

    println!("{}", describe(&engine, state.as_ref(), config.format)?);

    if strict && !engine.diagnostics().is_empty() {
        bail!(
            "{} problem(s) in {}",
            engine.diagnostics().len(),
            config.rules_path.display()
        );
    }
    Ok(())
}

fn describe(engine: &RuleEngine, state: Option<&GameState>, format: OutputFormat) -> Result<String> {
    let fired = state.map(|s| engine.match_state(s));

    if format == OutputFormat::Json {
        let value = serde_json::json!({
            "rules": engine.len(),
            "diagnostics": engine.diagnostics(),
            "fired": fired,
        });
        return serde_json::to_string_pretty(&value).context("Failed to serialize rule check");
    }

    let mut out = format!("{} rule(s) loaded", engine.len());
    if engine.diagnostics().is_empty() {
        out.push_str(", no problems found");
    } else {
        for diagnostic in engine.diagnostics() {
            out.push_str(&format!("\n  {}", diagnostic));
        }
    }
    if let Some(fired) = fired {
        out.push_str(&format!("\n{} rule(s) fire for this state", fired.len()));
        for text in fired {
            out.push_str(&format!("\n  - {}", text));
        }
    }
    Ok(out)
}
