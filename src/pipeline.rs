use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use tft_advisor::{Advisor, AdvisorError, Report, RuleEngine};
use tft_state::GameState;

/// Outcome of analysing the latest state
pub type Analysis = Result<Arc<Report>, Arc<AdvisorError>>;

/// What identifies one version of a file on disk
type Fingerprint = (SystemTime, u64);

fn to_fingerprint(meta: std::fs::Metadata) -> Option<Fingerprint> {
    Some((meta.modified().ok()?, meta.len()))
}

async fn fingerprint(path: &Path) -> Option<Fingerprint> {
    to_fingerprint(tokio::fs::metadata(path).await.ok()?)
}

/// Manages the state file → analysis → report pipeline.
///
/// Two pollers watch the state file and the rules file; a third task
/// re-runs the advisor whenever either changes.
pub struct Pipeline {
    stop: Arc<AtomicBool>,
    state_rx: watch::Receiver<Option<Arc<GameState>>>,
    report_rx: watch::Receiver<Option<Analysis>>,
}

impl Pipeline {
    pub fn start(
        advisor: Arc<Advisor>,
        state_path: PathBuf,
        rules_path: PathBuf,
        interval: Duration,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));

        let (state_tx, state_rx) = watch::channel::<Option<Arc<GameState>>>(None);
        let (rules_tx, rules_rx) = watch::channel(0u64);
        let (report_tx, report_rx) = watch::channel::<Option<Analysis>>(None);

        // State file poller
        let stop_state = stop.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut last: Option<Fingerprint> = None;
            loop {
                ticker.tick().await;
                if stop_state.load(Ordering::Relaxed) {
                    break;
                }

                let current = fingerprint(&state_path).await;
                if current.is_none() || current == last {
                    continue;
                }
                last = current;

                let content = match tokio::fs::read_to_string(&state_path).await {
                    Ok(c) => c,
                    Err(e) => {
                        warn!("Failed to read {}: {}", state_path.display(), e);
                        continue;
                    }
                };
                match GameState::from_json(&content) {
                    Ok(state) => {
                        debug!("Game state updated: stage {}", state.stage);
                        if state_tx.send(Some(Arc::new(state))).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Ignoring unreadable state {}: {}", state_path.display(), e),
                }
            }
        });

        // Rules file poller; the version on disk now is the one the advisor was built with
        let stop_rules = stop.clone();
        let rules_advisor = advisor.clone();
        let mut last = std::fs::metadata(&rules_path).ok().and_then(to_fingerprint);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut generation = 0u64;
            loop {
                ticker.tick().await;
                if stop_rules.load(Ordering::Relaxed) {
                    break;
                }

                let current = fingerprint(&rules_path).await;
                if current.is_none() || current == last {
                    continue;
                }
                last = current;

                let path = rules_path.clone();
                let loaded = tokio::task::spawn_blocking(move || RuleEngine::load(&path)).await;
                match loaded {
                    Ok(Ok(engine)) => {
                        info!("Reloaded {} rule(s) from {}", engine.len(), rules_path.display());
                        rules_advisor.replace_rules(engine);
                        generation += 1;
                        if rules_tx.send(generation).is_err() {
                            break;
                        }
                    }
                    Ok(Err(e)) => warn!("Keeping previous rules: {:#}", e),
                    Err(e) => warn!("Rules reload task failed: {}", e),
                }
            }
        });

        // Analysis loop
        let mut analysis_state_rx = state_rx.clone();
        let mut analysis_rules_rx = rules_rx;
        let stop_analysis = stop.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = analysis_state_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    changed = analysis_rules_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
                if stop_analysis.load(Ordering::Relaxed) {
                    break;
                }

                let state = analysis_state_rx.borrow_and_update().clone();
                let Some(state) = state else {
                    continue;
                };
                let a = advisor.clone();
                let result = tokio::task::spawn_blocking(move || a.compose(&state)).await;

                let analysis = match result {
                    Ok(Ok(report)) => Ok(Arc::new(report)),
                    Ok(Err(e)) => {
                        warn!("State rejected: {}", e);
                        Err(Arc::new(e))
                    }
                    Err(e) => {
                        warn!("Analysis task failed: {}", e);
                        continue;
                    }
                };
                if report_tx.send(Some(analysis)).is_err() {
                    break;
                }
            }
        });

        info!("Pipeline started");

        Self {
            stop,
            state_rx,
            report_rx,
        }
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
        info!("Pipeline stop requested");
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn latest_state(&self) -> Option<Arc<GameState>> {
        self.state_rx.borrow().clone()
    }

    /// Receiver notified on every new analysis
    pub fn subscribe(&self) -> watch::Receiver<Option<Analysis>> {
        self.report_rx.clone()
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
