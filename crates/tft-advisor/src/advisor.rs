use crate::commentary::{advise_health, advise_synergies};
use crate::composition;
use crate::economy;
use crate::error::{AdvisorError, SectionError};
use crate::itemization::{recommend_items, ItemizationAdvice};
use crate::positioning::{counter_position, optimize};
use crate::report::{Report, Section, SectionFault, SectionKind};
use crate::rules::RuleEngine;
use crate::threats::analyze_threats;
use crate::win_probability;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};
use tft_data::GameDataSource;
use tft_state::GameState;
use tracing::{debug, warn};

/// Composes the full strategic report for a game state.
///
/// The rule set is held behind a lock and swapped whole; an analysis in
/// progress keeps the snapshot it started with.
pub struct Advisor {
    rules: RwLock<Arc<RuleEngine>>,
    data: Option<Arc<dyn GameDataSource>>,
}

impl Advisor {
    pub fn new(rules: RuleEngine) -> Self {
        Self {
            rules: RwLock::new(Arc::new(rules)),
            data: None,
        }
    }

    /// Enable the composition section, backed by this unit and meta lookup
    pub fn with_data_source(mut self, data: Arc<dyn GameDataSource>) -> Self {
        self.data = Some(data);
        self
    }

    /// Current rule set snapshot
    pub fn rules(&self) -> Arc<RuleEngine> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Atomically replace the whole rule set
    pub fn replace_rules(&self, rules: RuleEngine) {
        let rules = Arc::new(rules);
        let mut guard = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        *guard = rules;
        debug!("Rule set replaced ({} rule(s))", guard.len());
    }

    /// Analyse a state. Only an invalid state is an error; a failing section
    /// is left out and recorded in `Report::faults`.
    pub fn compose(&self, state: &GameState) -> Result<Report, AdvisorError> {
        state.validate()?;

        let rules = self.rules();
        let mut report = Report {
            recommendations: rules.recommendations(state),
            ..Report::default()
        };

        let mut run = |kind: SectionKind, f: &dyn Fn() -> Result<Option<Section>, SectionError>| {
            match run_section(f) {
                Ok(Some(section)) => report.sections.push(section),
                Ok(None) => {}
                Err(e) => {
                    warn!("{} section omitted: {}", kind, e);
                    report.faults.push(SectionFault {
                        section: kind,
                        message: e.to_string(),
                    });
                }
            }
        };

        run(SectionKind::Economy, &|| {
            Ok(Some(Section::Economy(economy::advise(state.gold, state.level))))
        });
        run(SectionKind::Health, &|| {
            Ok(advise_health(state.health).map(Section::Health))
        });
        run(SectionKind::Synergy, &|| {
            Ok(advise_synergies(&state.synergies).map(Section::Synergy))
        });
        if let Some(data) = &self.data {
            run(SectionKind::Composition, &|| {
                composition::assess(data.as_ref(), state)
                    .map(|advice| advice.map(Section::Composition))
                    .map_err(SectionError::DataSource)
            });
        }
        run(SectionKind::WinProbability, &|| {
            let odds = win_probability::estimate(state);
            odds.ensure_finite()?;
            Ok(Some(Section::WinProbability(odds)))
        });
        run(SectionKind::Positioning, &|| {
            if state.current_board.is_empty() {
                return Ok(None);
            }
            let mut plan = optimize(&state.current_board);
            let threats = analyze_threats(&state.opponents);
            plan.counter_tip = threats
                .top()
                .and_then(|t| t.archetype.as_deref())
                .map(|archetype| format!("vs {}: {}", archetype, counter_position(archetype)));
            Ok(Some(Section::Positioning(plan)))
        });
        run(SectionKind::Itemization, &|| {
            let suggestions = recommend_items(&state.current_board);
            if suggestions.is_empty() {
                return Ok(None);
            }
            Ok(Some(Section::Itemization(ItemizationAdvice { suggestions })))
        });
        run(SectionKind::Threats, &|| {
            let threats = analyze_threats(&state.opponents);
            if threats.threats.is_empty() {
                return Ok(None);
            }
            Ok(Some(Section::Threats(threats)))
        });

        debug!(
            "Report composed: {} recommendation(s), {} section(s), {} fault(s)",
            report.recommendations.len(),
            report.sections.len(),
            report.faults.len()
        );
        Ok(report)
    }
}

fn run_section(
    f: &dyn Fn() -> Result<Option<Section>, SectionError>,
) -> Result<Option<Section>, SectionError> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(SectionError::Panicked(panic_message(payload.as_ref())))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
