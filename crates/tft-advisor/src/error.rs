use tft_state::StateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The state failed validation; the caller should ask for corrected input
    #[error(transparent)]
    InvalidState(#[from] StateError),
    #[error("rule configuration is not valid: {0}")]
    RuleConfig(String),
}

/// Why a single report section was left out
#[derive(Debug, Error)]
pub enum SectionError {
    #[error("data source failed: {0:#}")]
    DataSource(anyhow::Error),
    #[error("{0} is not a finite number")]
    NonFinite(&'static str),
    #[error("scorer panicked: {0}")]
    Panicked(String),
}
