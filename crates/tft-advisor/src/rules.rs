use crate::condition::{Condition, Field};
use crate::error::AdvisorError;
use crate::report::{Recommendation, RecommendationSource};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tft_state::GameState;
use tracing::{debug, info, warn};

/// Condition and the advice shown when it holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub condition: Condition,
    pub recommendation: String,
}

impl Rule {
    pub fn new(condition: Condition, recommendation: impl Into<String>) -> Self {
        Self {
            condition,
            recommendation: recommendation.into(),
        }
    }
}

/// Accepts `{"rules": [...]}` or a bare array of rules
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RulesDocument {
    Wrapped { rules: Vec<Value> },
    Bare(Vec<Value>),
}

#[derive(Debug, Deserialize)]
struct RawRule {
    #[serde(default)]
    condition: Option<Condition>,
    #[serde(default)]
    recommendation: Option<String>,
}

/// Configuration problem found in one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "problem", content = "detail", rename_all = "snake_case")]
pub enum RuleProblem {
    Malformed(String),
    MissingCondition,
    UnknownField(String),
    UnknownOperator(String),
    MissingRecommendation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDiagnostic {
    /// Position of the rule in the configuration, starting at 0
    pub index: usize,
    pub problem: RuleProblem,
}

impl fmt::Display for RuleDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule #{}: ", self.index + 1)?;
        match &self.problem {
            RuleProblem::Malformed(reason) => write!(f, "malformed entry ({})", reason),
            RuleProblem::MissingCondition => f.write_str("no condition, will never fire"),
            RuleProblem::UnknownField(field) => {
                write!(f, "unknown field {:?}, will never fire", field)
            }
            RuleProblem::UnknownOperator(op) => {
                write!(f, "unknown operator {:?}, will never fire", op)
            }
            RuleProblem::MissingRecommendation => f.write_str("empty recommendation text"),
        }
    }
}

fn content_problems(rule: &Rule) -> Vec<RuleProblem> {
    let mut problems = Vec::new();
    if let Field::Unknown(raw) = &rule.condition.field {
        problems.push(RuleProblem::UnknownField(raw.clone()));
    }
    // shop_has never consults the operator
    if rule.condition.field != Field::ShopHas && !rule.condition.operator.is_known() {
        problems.push(RuleProblem::UnknownOperator(
            rule.condition.operator.to_string(),
        ));
    }
    if rule.recommendation.trim().is_empty() {
        problems.push(RuleProblem::MissingRecommendation);
    }
    problems
}

/// Ordered, read-only rule set. Replace the whole engine to change rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleEngine {
    rules: Vec<Rule>,
    diagnostics: Vec<RuleDiagnostic>,
}

impl RuleEngine {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self::with_load_issues(rules, Vec::new())
    }

    fn with_load_issues(rules: Vec<Rule>, mut diagnostics: Vec<RuleDiagnostic>) -> Self {
        let flagged: HashSet<usize> = diagnostics.iter().map(|d| d.index).collect();
        for (index, rule) in rules.iter().enumerate() {
            if flagged.contains(&index) {
                continue;
            }
            diagnostics.extend(
                content_problems(rule)
                    .into_iter()
                    .map(|problem| RuleDiagnostic { index, problem }),
            );
        }
        diagnostics.sort_by_key(|d| d.index);
        Self { rules, diagnostics }
    }

    /// Parse rule configuration. Individual bad entries are kept as rules
    /// that never fire; only a document that is not a rule list is an error.
    pub fn from_json(json: &str) -> Result<Self, AdvisorError> {
        let document: RulesDocument =
            serde_json::from_str(json).map_err(|e| AdvisorError::RuleConfig(e.to_string()))?;
        let entries = match document {
            RulesDocument::Wrapped { rules } => rules,
            RulesDocument::Bare(rules) => rules,
        };

        let mut rules = Vec::with_capacity(entries.len());
        let mut issues = Vec::new();

        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<RawRule>(entry) {
                Ok(raw) => {
                    let condition = raw.condition.unwrap_or_else(|| {
                        issues.push(RuleDiagnostic {
                            index,
                            problem: RuleProblem::MissingCondition,
                        });
                        Condition::never()
                    });
                    rules.push(Rule::new(condition, raw.recommendation.unwrap_or_default()));
                }
                Err(e) => {
                    issues.push(RuleDiagnostic {
                        index,
                        problem: RuleProblem::Malformed(e.to_string()),
                    });
                    rules.push(Rule::new(Condition::never(), String::new()));
                }
            }
        }

        Ok(Self::with_load_issues(rules, issues))
    }

    /// Load rules from a JSON file, logging every configuration problem
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules {}", path.display()))?;
        let engine = Self::from_json(&content)
            .with_context(|| format!("Failed to parse rules {}", path.display()))?;

        info!("Loaded {} rule(s) from {}", engine.len(), path.display());
        for diagnostic in &engine.diagnostics {
            warn!("{}", diagnostic);
        }
        Ok(engine)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn diagnostics(&self) -> &[RuleDiagnostic] {
        &self.diagnostics
    }

    /// Recommendation text of every rule that fires, in declaration order.
    /// Redundant rules produce redundant advice.
    pub fn match_state(&self, state: &GameState) -> Vec<String> {
        self.recommendations(state)
            .into_iter()
            .map(|r| r.text)
            .collect()
    }

    pub fn recommendations(&self, state: &GameState) -> Vec<Recommendation> {
        let fired: Vec<Recommendation> = self
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.condition.evaluate(state))
            .map(|(index, rule)| Recommendation {
                text: rule.recommendation.clone(),
                source: RecommendationSource::Rule { index },
                priority: None,
            })
            .collect();
        debug!("{} of {} rule(s) fired", fired.len(), self.rules.len());
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn state() -> GameState {
        GameState {
            level: 5,
            gold: 45,
            health: 75,
            stage: "3-2".into(),
            available_shops: vec!["Lux".into()],
            ..GameState::default()
        }
    }

    #[test]
    fn test_rule_order_preserved() {
        let engine = RuleEngine::new(vec![
            Rule::new(Condition::new("gold", "gte", 40), "R1"),
            Rule::new(Condition::new("level", "gt", 8), "R2"),
            Rule::new(Condition::new("shop_has", "eq", "Lux"), "R3"),
        ]);
        assert_eq!(engine.match_state(&state()), vec!["R1", "R3"]);
    }

    #[test]
    fn test_redundant_rules_not_deduplicated() {
        let engine = RuleEngine::new(vec![
            Rule::new(Condition::new("gold", "gt", 10), "Save gold"),
            Rule::new(Condition::new("gold", "gt", 20), "Save gold"),
        ]);
        assert_eq!(engine.match_state(&state()), vec!["Save gold", "Save gold"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let engine = RuleEngine::new(vec![Rule::new(Condition::new("gold", "gt", 100), "x")]);
        assert!(engine.match_state(&state()).is_empty());
        assert!(RuleEngine::default().match_state(&state()).is_empty());
    }

    #[test]
    fn test_recommendations_carry_rule_index() {
        let engine = RuleEngine::new(vec![
            Rule::new(Condition::new("gold", "gt", 100), "never"),
            Rule::new(Condition::new("gold", "gt", 0), "always"),
        ]);
        let recs = engine.recommendations(&state());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].source, RecommendationSource::Rule { index: 1 });
        assert!(recs[0].priority.is_none());
    }

    #[test]
    fn test_from_json_with_bad_entries() {
        let json = r#"{"rules": [
            {"condition": {"field": "gold", "operator": "gte", "value": 40}, "recommendation": "Rich"},
            {"condition": {"field": "mana", "operator": "gt", "value": 1}, "recommendation": "Mana"},
            {"condition": {"field": 7}, "recommendation": "Broken"},
            {"recommendation": "No condition"},
            {"condition": {"field": "level", "operator": "between", "value": 3}, "recommendation": "Op"},
            {"condition": {"field": "level", "operator": "gte", "value": 5}, "recommendation": "Level five"}
        ]}"#;
        let engine = RuleEngine::from_json(json).unwrap();

        assert_eq!(engine.len(), 6);
        assert_eq!(engine.match_state(&state()), vec!["Rich", "Level five"]);

        let problems: Vec<(usize, &RuleProblem)> = engine
            .diagnostics()
            .iter()
            .map(|d| (d.index, &d.problem))
            .collect();
        assert_eq!(problems.len(), 4);
        assert_eq!(problems[0], (1, &RuleProblem::UnknownField("mana".into())));
        assert!(matches!(problems[1], (2, RuleProblem::Malformed(_))));
        assert_eq!(problems[2], (3, &RuleProblem::MissingCondition));
        assert_eq!(problems[3], (4, &RuleProblem::UnknownOperator("between".into())));
    }

    #[test]
    fn test_shop_has_operator_not_flagged() {
        let engine = RuleEngine::new(vec![Rule::new(
            Condition::new("shop_has", "", "Lux"),
            "Buy Lux",
        )]);
        assert!(engine.diagnostics().is_empty());
    }

    #[test]
    fn test_empty_recommendation_flagged() {
        let engine = RuleEngine::new(vec![Rule::new(Condition::new("gold", "gt", 1), "  ")]);
        assert_eq!(
            engine.diagnostics()[0].problem,
            RuleProblem::MissingRecommendation
        );
    }

    #[test]
    fn test_bare_array_document() {
        let json = r#"[{"condition": {"field": "level", "operator": "eq", "value": 5}, "recommendation": "Five"}]"#;
        let engine = RuleEngine::from_json(json).unwrap();
        assert_eq!(engine.match_state(&state()), vec!["Five"]);
    }

    #[test]
    fn test_invalid_document_is_error() {
        assert!(matches!(
            RuleEngine::from_json("not json"),
            Err(AdvisorError::RuleConfig(_))
        ));
        assert!(RuleEngine::from_json(r#"{"rules": 3}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"rules": [{"condition": {"field": "health", "operator": "lt", "value": 80}, "recommendation": "Careful"}]}"#,
        )
        .unwrap();
        let engine = RuleEngine::load(file.path()).unwrap();
        assert_eq!(engine.match_state(&state()), vec!["Careful"]);
        assert!(RuleEngine::load(Path::new("/nonexistent/rules.json")).is_err());
    }

    #[test]
    fn test_diagnostic_display() {
        let d = RuleDiagnostic {
            index: 0,
            problem: RuleProblem::UnknownField("mana".into()),
        };
        assert_eq!(d.to_string(), "rule #1: unknown field \"mana\", will never fire");
    }
}
