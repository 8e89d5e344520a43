//! Survey parsing, risk factor extraction, scoring, and recommendations.
//!
//! Every stage is a pure function of its input. [`ProfileEngine`] strings the
//! stages together under a [`ProfileRubric`]; the free functions below apply
//! the standard rubric.

mod factors;
mod normalizer;
pub mod ocr;
mod parser;
mod recommendations;
mod rubric;
pub mod router;
mod scoring;
pub mod service;

pub use factors::{extract_factors, Factor, FactorRule, FACTOR_RULES};
pub use normalizer::{normalize_value, AnswerValue};
pub use ocr::{OcrError, SurveyTextExtractor, TesseractExtractor};
pub use parser::{parse_survey, Answers, IncompleteProfile, SurveyField, INCOMPLETE_PROFILE_REASON};
pub use router::profile_router;
pub use rubric::ProfileRubric;
pub use scoring::{RiskAssessment, RiskLevel};
pub use service::{ProfileService, ProfileServiceError, SurveySubmission};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Score a factor list with the standard rubric.
pub fn calculate_risk(factors: &[Factor]) -> RiskAssessment {
    scoring::score_factors(factors, &ProfileRubric::standard())
}

/// Advice for a factor list using the standard rubric.
pub fn generate_recommendations(factors: &[Factor]) -> Vec<String> {
    recommendations::recommend(factors, &ProfileRubric::standard())
}

/// Stateless pipeline applying one rubric to survey text.
#[derive(Debug, Clone, Default)]
pub struct ProfileEngine {
    rubric: ProfileRubric,
}

impl ProfileEngine {
    pub fn new(rubric: ProfileRubric) -> Self {
        Self { rubric }
    }

    pub fn rubric(&self) -> &ProfileRubric {
        &self.rubric
    }

    pub fn score(&self, factors: &[Factor]) -> RiskAssessment {
        scoring::score_factors(factors, &self.rubric)
    }

    pub fn recommend(&self, factors: &[Factor]) -> Vec<String> {
        recommendations::recommend(factors, &self.rubric)
    }

    pub fn assess(&self, survey_text: &str) -> Result<HealthProfile, IncompleteProfile> {
        let answers = parse_survey(survey_text)?;
        let factors = extract_factors(&answers);
        let assessment = self.score(&factors);
        let recommendations = self.recommend(&factors);

        debug!(
            score = assessment.score,
            level = %assessment.level,
            factors = factors.len(),
            "survey assessed"
        );

        Ok(HealthProfile {
            risk_level: assessment.level,
            score: assessment.score,
            factors,
            recommendations,
        })
    }
}

/// Outcome of running a survey through the full pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthProfile {
    pub risk_level: RiskLevel,
    pub score: u32,
    pub factors: Vec<Factor>,
    pub recommendations: Vec<String>,
}
