use super::read_state;
use crate::config::{AppConfig, OutputFormat};
use anyhow::{Context, Result};
use std::path::Path;
use tft_data::{MatchHistory, MatchSink, MatchStats};

/// Save the final state of a finished game
pub fn record(config: &AppConfig, state_path: &Path, placement: u8, comp: &str) -> Result<()> {
    let state = read_state(state_path)?;
    let mut history = MatchHistory::open(&config.history_path)?;
    history.save_match(&state, placement, comp)?;
    println!(
        "Recorded placement {} ({} games in {})",
        placement,
        history.matches().len(),
        config.history_path.display()
    );
    Ok(())
}

pub fn stats(config: &AppConfig) -> Result<()> {
    let history = MatchHistory::open(&config.history_path)?;
    println!("{}", format_stats(&history.stats(), config.format)?);
    Ok(())
}

fn format_stats(stats: &MatchStats, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(stats).context("Failed to serialize match stats")
        }
        OutputFormat::Text if stats.total_games == 0 => Ok("No matches recorded yet.".to_string()),
        OutputFormat::Text => Ok(format!(
            "Games played: {}\nAverage placement: {:.2}\nTop 4 rate: {:.1}%\nWin rate: {:.1}%",
            stats.total_games, stats.avg_placement, stats.top4_rate, stats.win_rate
        )),
    }
}
