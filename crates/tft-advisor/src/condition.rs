use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use tft_state::{GameState, Unit};

/// State field a rule condition reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Round,
    Level,
    Gold,
    Health,
    Stage,
    /// `synergy.<name>`, active count of one trait (0 when absent)
    Synergy(String),
    /// Unit names on the bench
    Bench,
    /// Unit names on the board
    Board,
    /// Membership of the value in the shop; ignores the operator
    ShopHas,
    Unknown(String),
}

impl Field {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "round" => Field::Round,
            "level" => Field::Level,
            "gold" => Field::Gold,
            "health" => Field::Health,
            "stage" => Field::Stage,
            "bench" => Field::Bench,
            "board" => Field::Board,
            "shop_has" => Field::ShopHas,
            _ => match raw.strip_prefix("synergy.") {
                Some(name) => Field::Synergy(name.to_string()),
                None => Field::Unknown(raw.to_string()),
            },
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Field::Unknown(_))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Round => f.write_str("round"),
            Field::Level => f.write_str("level"),
            Field::Gold => f.write_str("gold"),
            Field::Health => f.write_str("health"),
            Field::Stage => f.write_str("stage"),
            Field::Synergy(name) => write!(f, "synergy.{}", name),
            Field::Bench => f.write_str("bench"),
            Field::Board => f.write_str("board"),
            Field::ShopHas => f.write_str("shop_has"),
            Field::Unknown(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Contains,
    Unknown(String),
}

impl Operator {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            "eq" => Operator::Eq,
            "contains" => Operator::Contains,
            other => Operator::Unknown(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Unknown(_))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Eq => "eq",
            Operator::Contains => "contains",
            Operator::Unknown(raw) => raw.as_str(),
        };
        f.write_str(s)
    }
}

/// `{field, operator, value}` as it appears in rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCondition {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: Value,
}

/// A parsed rule condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCondition", into = "RawCondition")]
pub struct Condition {
    pub field: Field,
    pub operator: Operator,
    pub value: Value,
}

impl From<RawCondition> for Condition {
    fn from(raw: RawCondition) -> Self {
        Self {
            field: Field::parse(&raw.field),
            operator: Operator::parse(&raw.operator),
            value: raw.value,
        }
    }
}

impl From<Condition> for RawCondition {
    fn from(condition: Condition) -> Self {
        Self {
            field: condition.field.to_string(),
            operator: condition.operator.to_string(),
            value: condition.value,
        }
    }
}

impl Condition {
    pub fn new(field: &str, operator: &str, value: impl Into<Value>) -> Self {
        Self {
            field: Field::parse(field),
            operator: Operator::parse(operator),
            value: value.into(),
        }
    }

    /// A condition that never holds, standing in for unparseable configuration
    pub fn never() -> Self {
        Self {
            field: Field::Unknown(String::new()),
            operator: Operator::Unknown(String::new()),
            value: Value::Null,
        }
    }

    pub fn evaluate(&self, state: &GameState) -> bool {
        evaluate(self, state)
    }
}

/// Value read out of the state for one field
#[derive(Debug, Clone, Copy)]
enum Actual<'a> {
    Number(i64),
    Text(&'a str),
    Names(&'a [String]),
    Units(&'a [Unit]),
}

/// Evaluate `condition` against `state`. Unknown fields, unknown operators
/// and type mismatches all evaluate to false.
pub fn evaluate(condition: &Condition, state: &GameState) -> bool {
    let actual = match &condition.field {
        Field::ShopHas => {
            return condition
                .value
                .as_str()
                .is_some_and(|wanted| state.available_shops.iter().any(|s| s == wanted));
        }
        Field::Unknown(_) => return false,
        Field::Round => Actual::Number(i64::from(state.round)),
        Field::Level => Actual::Number(i64::from(state.level)),
        Field::Gold => Actual::Number(i64::from(state.gold)),
        Field::Health => Actual::Number(i64::from(state.health)),
        Field::Synergy(name) => Actual::Number(i64::from(state.synergy_count(name))),
        Field::Stage => Actual::Text(&state.stage),
        Field::Bench => Actual::Names(&state.bench),
        Field::Board => Actual::Units(&state.current_board),
    };

    apply(&condition.operator, actual, &condition.value)
}

fn apply(operator: &Operator, actual: Actual<'_>, value: &Value) -> bool {
    let ordering = match operator {
        Operator::Contains => return contains(actual, value),
        Operator::Unknown(_) => return false,
        _ => match compare(actual, value) {
            Some(ordering) => ordering,
            None => return false,
        },
    };

    match operator {
        Operator::Gt => ordering == Ordering::Greater,
        Operator::Gte => ordering != Ordering::Less,
        Operator::Lt => ordering == Ordering::Less,
        Operator::Lte => ordering != Ordering::Greater,
        Operator::Eq => ordering == Ordering::Equal,
        Operator::Contains | Operator::Unknown(_) => false,
    }
}

fn compare(actual: Actual<'_>, value: &Value) -> Option<Ordering> {
    match (actual, value) {
        (Actual::Number(n), Value::Number(v)) => match v.as_i64() {
            Some(i) => Some(n.cmp(&i)),
            None => (n as f64).partial_cmp(&v.as_f64()?),
        },
        (Actual::Text(s), Value::String(v)) => Some(s.cmp(v.as_str())),
        _ => None,
    }
}

fn contains(actual: Actual<'_>, value: &Value) -> bool {
    let Some(wanted) = value.as_str() else {
        return false;
    };
    match actual {
        Actual::Names(names) => names.iter().any(|n| n == wanted),
        Actual::Units(units) => units.iter().any(|u| u.name == wanted),
        Actual::Text(text) => text.contains(wanted),
        Actual::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> GameState {
        GameState {
            round: 12,
            level: 5,
            gold: 45,
            health: 75,
            stage: "3-2".into(),
            current_board: vec![Unit::new("Ahri", 4, 1)],
            bench: vec!["Garen".into()],
            available_shops: vec!["Lux".into(), "Vi".into()],
            synergies: [("Mystic".to_string(), 2)].into_iter().collect(),
            ..GameState::default()
        }
    }

    #[test]
    fn test_numeric_operators() {
        let s = state();
        assert!(Condition::new("gold", "gt", 40).evaluate(&s));
        assert!(!Condition::new("gold", "gt", 45).evaluate(&s));
        assert!(Condition::new("gold", "gte", 45).evaluate(&s));
        assert!(Condition::new("level", "lt", 6).evaluate(&s));
        assert!(Condition::new("level", "lte", 5).evaluate(&s));
        assert!(!Condition::new("level", "lte", 4).evaluate(&s));
        assert!(Condition::new("health", "eq", 75).evaluate(&s));
        assert!(Condition::new("round", "gte", 10).evaluate(&s));
    }

    #[test]
    fn test_fractional_value() {
        let s = state();
        assert!(Condition::new("gold", "gt", 44.5).evaluate(&s));
        assert!(!Condition::new("gold", "eq", 44.5).evaluate(&s));
    }

    #[test]
    fn test_synergy_lookup_defaults_to_zero() {
        let s = state();
        assert!(Condition::new("synergy.Mystic", "gte", 2).evaluate(&s));
        assert!(Condition::new("synergy.Brawler", "eq", 0).evaluate(&s));
        assert!(!Condition::new("synergy.Brawler", "gt", 0).evaluate(&s));
    }

    #[test]
    fn test_synergy_name_keeps_dots() {
        assert_eq!(
            Field::parse("synergy.Star.Guardian"),
            Field::Synergy("Star.Guardian".into())
        );
        let mut s = state();
        s.synergies.insert("Star.Guardian".into(), 3);
        assert!(Condition::new("synergy.Star.Guardian", "eq", 3).evaluate(&s));
        assert!(!Condition::new("synergy.Star", "gt", 0).evaluate(&s));
    }

    #[test]
    fn test_shop_has_ignores_operator() {
        let s = state();
        assert!(Condition::new("shop_has", "gt", "Lux").evaluate(&s));
        assert!(Condition::new("shop_has", "whatever", "Vi").evaluate(&s));
        assert!(!Condition::new("shop_has", "eq", "Ahri").evaluate(&s));
        assert!(!Condition::new("shop_has", "eq", 3).evaluate(&s));
    }

    #[test]
    fn test_stage_comparisons() {
        let s = state();
        assert!(Condition::new("stage", "eq", "3-2").evaluate(&s));
        assert!(Condition::new("stage", "gte", "3-1").evaluate(&s));
        assert!(Condition::new("stage", "lt", "4-1").evaluate(&s));
        assert!(Condition::new("stage", "contains", "3-").evaluate(&s));
        assert!(!Condition::new("stage", "gt", 2).evaluate(&s));
    }

    #[test]
    fn test_contains_on_collections() {
        let s = state();
        assert!(Condition::new("bench", "contains", "Garen").evaluate(&s));
        assert!(!Condition::new("bench", "contains", "Ahri").evaluate(&s));
        assert!(Condition::new("board", "contains", "Ahri").evaluate(&s));
        assert!(!Condition::new("gold", "contains", "4").evaluate(&s));
    }

    #[test]
    fn test_unknown_field_and_operator_fail_closed() {
        let s = state();
        assert!(!Condition::new("mana", "gt", 0).evaluate(&s));
        assert!(!Condition::new("gold", "between", 10).evaluate(&s));
        assert!(!Condition::new("gold", "", 10).evaluate(&s));
        assert!(!Condition::never().evaluate(&s));
    }

    #[test]
    fn test_type_mismatch_is_false() {
        let s = state();
        assert!(!Condition::new("gold", "gt", "lots").evaluate(&s));
        assert!(!Condition::new("gold", "eq", json!(null)).evaluate(&s));
        assert!(!Condition::new("bench", "eq", "Garen").evaluate(&s));
    }

    #[test]
    fn test_parse_from_config() {
        let condition: Condition =
            serde_json::from_value(json!({"field": "synergy.Mystic", "operator": "gte", "value": 2}))
                .unwrap();
        assert_eq!(condition.field, Field::Synergy("Mystic".into()));
        assert_eq!(condition.operator, Operator::Gte);

        let back = serde_json::to_value(&condition).unwrap();
        assert_eq!(back["field"], "synergy.Mystic");
        assert_eq!(back["operator"], "gte");
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let s = state();
        let c = Condition::new("gold", "gte", 45);
        let first = c.evaluate(&s);
        assert!((0..10).all(|_| c.evaluate(&s) == first));
    }
}
