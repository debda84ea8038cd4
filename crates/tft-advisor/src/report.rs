use crate::commentary::{HealthAdvice, SynergyAdvice};
use crate::composition::CompositionAdvice;
use crate::economy::EconomyAdvice;
use crate::itemization::ItemizationAdvice;
use crate::positioning::PositioningPlan;
use crate::threats::ThreatReport;
use crate::win_probability::WinProbability;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecommendationSource {
    /// Fired configured rule, by position in the rule set
    Rule { index: usize },
    /// Meta composition heuristic
    Meta { comp: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    pub source: RecommendationSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Economy,
    Health,
    Synergy,
    Composition,
    WinProbability,
    Positioning,
    Itemization,
    Threats,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Economy => "Gold Economy",
            SectionKind::Health => "Health Status",
            SectionKind::Synergy => "Synergy Analysis",
            SectionKind::Composition => "Composition Strength",
            SectionKind::WinProbability => "Win Probability",
            SectionKind::Positioning => "Positioning",
            SectionKind::Itemization => "Itemization",
            SectionKind::Threats => "Threat Assessment",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One advisory block of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Economy(EconomyAdvice),
    Health(HealthAdvice),
    Synergy(SynergyAdvice),
    Composition(CompositionAdvice),
    WinProbability(WinProbability),
    Positioning(PositioningPlan),
    Itemization(ItemizationAdvice),
    Threats(ThreatReport),
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Economy(_) => SectionKind::Economy,
            Section::Health(_) => SectionKind::Health,
            Section::Synergy(_) => SectionKind::Synergy,
            Section::Composition(_) => SectionKind::Composition,
            Section::WinProbability(_) => SectionKind::WinProbability,
            Section::Positioning(_) => SectionKind::Positioning,
            Section::Itemization(_) => SectionKind::Itemization,
            Section::Threats(_) => SectionKind::Threats,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            Section::Economy(s) => s.lines(),
            Section::Health(s) => s.lines(),
            Section::Synergy(s) => s.lines(),
            Section::Composition(s) => s.lines(),
            Section::WinProbability(s) => s.lines(),
            Section::Positioning(s) => s.lines(),
            Section::Itemization(s) => s.lines(),
            Section::Threats(s) => s.lines(),
        }
    }
}

/// A section left out of the report, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFault {
    pub section: SectionKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Fired rules, in rule order
    pub recommendations: Vec<Recommendation>,
    pub sections: Vec<Section>,
    pub faults: Vec<SectionFault>,
}

impl Report {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind() == kind)
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.section(kind).is_some()
    }

    pub fn recommendation_texts(&self) -> Vec<&str> {
        self.recommendations.iter().map(|r| r.text.as_str()).collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.recommendations.is_empty() {
            writeln!(f, "No specific recommendations for current state.")?;
        } else {
            writeln!(f, "=== Strategic Recommendations ===")?;
            writeln!(f)?;
            for (i, rec) in self.recommendations.iter().enumerate() {
                writeln!(f, "{}. {}", i + 1, rec.text)?;
            }
        }

        if !self.sections.is_empty() {
            writeln!(f)?;
            writeln!(f, "=== Detailed Analysis ===")?;
            for section in &self.sections {
                writeln!(f)?;
                writeln!(f, "{}:", section.kind())?;
                for line in section.lines() {
                    writeln!(f, "- {}", line)?;
                }
            }
        }

        if !self.faults.is_empty() {
            writeln!(f)?;
            for fault in &self.faults {
                writeln!(f, "({} unavailable: {})", fault.section, fault.message)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::{HealthAdvice, HealthBand};

    #[test]
    fn test_empty_report_text() {
        let report = Report::default();
        assert_eq!(
            report.to_string(),
            "No specific recommendations for current state.\n"
        );
    }

    #[test]
    fn test_report_text_layout() {
        let report = Report {
            recommendations: vec![Recommendation {
                text: "Roll down".into(),
                source: RecommendationSource::Rule { index: 0 },
                priority: None,
            }],
            sections: vec![Section::Health(HealthAdvice {
                health: 20,
                band: HealthBand::Critical,
                commentary: "Critical health! Focus on board strength.".into(),
            })],
            faults: vec![SectionFault {
                section: SectionKind::Composition,
                message: "offline".into(),
            }],
        };
        let text = report.to_string();
        assert_eq!(
            text,
            "=== Strategic Recommendations ===\n\n\
             1. Roll down\n\n\
             === Detailed Analysis ===\n\n\
             Health Status:\n\
             - Critical health! Focus on board strength.\n\n\
             (Composition Strength unavailable: offline)\n"
        );
    }

    #[test]
    fn test_section_serializes_with_kind_tag() {
        let section = Section::Health(HealthAdvice {
            health: 90,
            band: HealthBand::Healthy,
            commentary: "ok".into(),
        });
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["kind"], "health");
        assert_eq!(json["band"], "healthy");
    }
}
