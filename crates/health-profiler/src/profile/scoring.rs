use super::factors::Factor;
use super::rubric::ProfileRubric;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and tier for a factor list, keeping the factors as rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub score: u32,
    pub rationale: Vec<Factor>,
}

pub(crate) fn score_factors(factors: &[Factor], rubric: &ProfileRubric) -> RiskAssessment {
    let score: u32 = factors.iter().map(|factor| rubric.weight(*factor)).sum();

    let level = if score >= rubric.high_threshold {
        RiskLevel::High
    } else if score >= rubric.medium_threshold {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    RiskAssessment {
        level,
        score,
        rationale: factors.to_vec(),
    }
}
