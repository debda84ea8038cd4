pub mod commands;
pub mod config;
pub mod pipeline;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{AppConfig, OutputFormat};
use std::path::PathBuf;

const DEFAULT_FILTER: &str = "tft_companion=info,tft_advisor=info,tft_data=info,tft_state=info";
const VERBOSE_FILTER: &str = "tft_companion=debug,tft_advisor=debug,tft_data=debug,tft_state=debug";

/// Strategic advice for Teamfight Tactics game states
#[derive(Parser, Debug)]
#[command(name = "tft-companion")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Configuration file (default: tft-companion.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Rules file, overriding the configuration
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Game data directory, overriding the configuration
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format: text or json
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Debug logging for all crates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a game state file once (`-` reads stdin)
    Analyze {
        state: PathBuf,
    },

    /// Re-analyze a state file whenever it or the rules change
    Watch {
        state: PathBuf,

        /// Polling interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Record the final placement of a finished game
    Record {
        state: PathBuf,

        /// Final placement (1-8)
        #[arg(short, long)]
        placement: u8,

        /// Composition played
        #[arg(long, default_value = "")]
        comp: String,

        /// Match history file, overriding the configuration
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Show statistics over recorded games
    Stats {
        /// Match history file, overriding the configuration
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Check the rule configuration for problems
    Rules {
        /// Also list the rules that fire for this state
        #[arg(long)]
        state: Option<PathBuf>,

        /// Fail when any rule has a problem
        #[arg(long)]
        strict: bool,
    },
}

impl Args {
    /// Configuration with command-line overrides applied
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::resolve(self.config.as_deref())?;
        if let Some(rules) = &self.rules {
            config.rules_path = rules.clone();
        }
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        match &self.command {
            Command::Watch {
                interval_ms: Some(ms),
                ..
            } => config.poll_interval_ms = *ms,
            Command::Record {
                history: Some(path),
                ..
            }
            | Command::Stats {
                history: Some(path),
            } => config.history_path = path.clone(),
            _ => {}
        }
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new(VERBOSE_FILTER)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| DEFAULT_FILTER.into())
    };
    // Logs go to stderr so reports on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub async fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args.resolve_config()?;
    match args.command {
        Command::Analyze { state } => commands::analyze::run(&config, &state),
        Command::Watch { state, .. } => commands::watch::run(&config, state).await,
        Command::Record {
            state,
            placement,
            comp,
            ..
        } => commands::history::record(&config, &state, placement, &comp),
        Command::Stats { .. } => commands::history::stats(&config),
        Command::Rules { state, strict } => {
            commands::rules::run(&config, state.as_deref(), strict)
        }
    }
}
