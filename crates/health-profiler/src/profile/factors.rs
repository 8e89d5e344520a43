use super::normalizer::AnswerValue;
use super::parser::{Answers, SurveyField};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifestyle risk factor derived from survey answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Factor {
    #[serde(rename = "smoking")]
    Smoking,
    #[serde(rename = "poor diet")]
    PoorDiet,
    #[serde(rename = "low exercise")]
    LowExercise,
    #[serde(rename = "advanced age")]
    AdvancedAge,
}

impl Factor {
    pub fn label(&self) -> &'static str {
        match self {
            Factor::Smoking => "smoking",
            Factor::PoorDiet => "poor diet",
            Factor::LowExercise => "low exercise",
            Factor::AdvancedAge => "advanced age",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const POOR_DIETS: [&str; 3] = ["high sugar", "high fat", "processed"];
const LOW_EXERCISE_LEVELS: [&str; 2] = ["rarely", "never"];
const ADVANCED_AGE_ABOVE: u64 = 60;

/// A single extraction rule: the factor it contributes and when it applies.
pub struct FactorRule {
    pub factor: Factor,
    pub applies: fn(&Answers) -> bool,
}

/// Extraction rules in output order.
pub const FACTOR_RULES: [FactorRule; 4] = [
    FactorRule {
        factor: Factor::Smoking,
        applies: smokes,
    },
    FactorRule {
        factor: Factor::PoorDiet,
        applies: eats_poorly,
    },
    FactorRule {
        factor: Factor::LowExercise,
        applies: rarely_exercises,
    },
    FactorRule {
        factor: Factor::AdvancedAge,
        applies: is_advanced_age,
    },
];

pub fn extract_factors(answers: &Answers) -> Vec<Factor> {
    FACTOR_RULES
        .iter()
        .filter(|rule| (rule.applies)(answers))
        .map(|rule| rule.factor)
        .collect()
}

fn smokes(answers: &Answers) -> bool {
    answers.get(SurveyField::Smoker) == Some(&AnswerValue::Boolean(true))
}

fn eats_poorly(answers: &Answers) -> bool {
    text_in(answers, SurveyField::Diet, &POOR_DIETS)
}

fn rarely_exercises(answers: &Answers) -> bool {
    text_in(answers, SurveyField::Exercise, &LOW_EXERCISE_LEVELS)
}

fn is_advanced_age(answers: &Answers) -> bool {
    let age = match answers.get(SurveyField::Age) {
        Some(AnswerValue::Integer(years)) => *years,
        Some(AnswerValue::Boolean(flag)) => u64::from(*flag),
        _ => 0,
    };
    age > ADVANCED_AGE_ABOVE
}

fn text_in(answers: &Answers, field: SurveyField, accepted: &[&str]) -> bool {
    answers
        .get(field)
        .and_then(AnswerValue::as_text)
        .is_some_and(|value| accepted.contains(&value))
}
