pub mod advisor;
pub mod board;
pub mod commentary;
pub mod composition;
pub mod condition;
pub mod economy;
pub mod error;
pub mod itemization;
pub mod positioning;
pub mod report;
pub mod rules;
pub mod threats;
pub mod win_probability;

pub use advisor::Advisor;
pub use board::{board_strength, unit_strength};
pub use condition::{evaluate, Condition, Field, Operator};
pub use error::{AdvisorError, SectionError};
pub use positioning::{counter_position, optimize, PositioningPlan};
pub use report::{Recommendation, RecommendationSource, Report, Section, SectionFault, SectionKind};
pub use rules::{Rule, RuleDiagnostic, RuleEngine, RuleProblem};
pub use win_probability::{estimate as estimate_win_probability, WinProbability};
