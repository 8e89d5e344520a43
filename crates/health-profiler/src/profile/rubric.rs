use super::factors::Factor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scoring weights, level thresholds, and advice text applied to risk factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRubric {
    pub weights: BTreeMap<Factor, u32>,
    pub medium_threshold: u32,
    pub high_threshold: u32,
    pub advice: BTreeMap<Factor, String>,
    pub fallback_advice: String,
}

impl ProfileRubric {
    pub fn standard() -> Self {
        let weights = BTreeMap::from([
            (Factor::Smoking, 35),
            (Factor::PoorDiet, 25),
            (Factor::LowExercise, 20),
            (Factor::AdvancedAge, 10),
        ]);

        let advice = BTreeMap::from([
            (
                Factor::Smoking,
                "Consider resources for quitting smoking.".to_string(),
            ),
            (
                Factor::PoorDiet,
                "Try to incorporate more whole foods and reduce sugar intake.".to_string(),
            ),
            (
                Factor::LowExercise,
                "Aim for a 30-minute walk on most days of the week.".to_string(),
            ),
            (
                Factor::AdvancedAge,
                "Discuss regular health screenings with your doctor.".to_string(),
            ),
        ]);

        Self {
            weights,
            medium_threshold: 40,
            high_threshold: 70,
            advice,
            fallback_advice:
                "Maintain your healthy lifestyle and continue with regular check-ups.".to_string(),
        }
    }

    pub fn weight(&self, factor: Factor) -> u32 {
        self.weights.get(&factor).copied().unwrap_or(0)
    }

    pub fn advice_for(&self, factor: Factor) -> Option<&str> {
        self.advice.get(&factor).map(String::as_str)
    }
}

impl Default for ProfileRubric {
    fn default() -> Self {
        Self::standard()
    }
}
