use super::normalizer::{normalize_value, AnswerValue};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

lazy_static! {
    /// `key: value` on a single line; the key is letters only.
    static ref FIELD_LINE: Regex = Regex::new(r"^\s*([a-zA-Z]+)\s*:\s*(.+)$").unwrap();
}

pub const INCOMPLETE_PROFILE_REASON: &str = ">50% fields missing";

/// Share of required fields that may be absent before the survey is rejected.
const MAX_MISSING_RATIO: f64 = 0.5;

/// Survey questions the profiler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyField {
    Age,
    Smoker,
    Exercise,
    Diet,
}

impl SurveyField {
    /// Every field a complete survey answers, in canonical order.
    pub const REQUIRED: [SurveyField; 4] = [
        SurveyField::Age,
        SurveyField::Smoker,
        SurveyField::Exercise,
        SurveyField::Diet,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SurveyField::Age => "age",
            SurveyField::Smoker => "smoker",
            SurveyField::Exercise => "exercise",
            SurveyField::Diet => "diet",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::REQUIRED
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for SurveyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Normalized survey answers keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers {
    values: BTreeMap<SurveyField, AnswerValue>,
}

impl Answers {
    pub fn get(&self, field: SurveyField) -> Option<&AnswerValue> {
        self.values.get(&field)
    }

    pub fn contains(&self, field: SurveyField) -> bool {
        self.values.contains_key(&field)
    }

    pub fn insert(&mut self, field: SurveyField, value: AnswerValue) -> Option<AnswerValue> {
        self.values.insert(field, value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SurveyField, &AnswerValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    pub fn missing_fields(&self) -> Vec<SurveyField> {
        SurveyField::REQUIRED
            .into_iter()
            .filter(|field| !self.contains(*field))
            .collect()
    }
}

impl FromIterator<(SurveyField, AnswerValue)> for Answers {
    fn from_iter<T: IntoIterator<Item = (SurveyField, AnswerValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Raised when too few required fields could be recognized in the survey.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct IncompleteProfile {
    pub reason: String,
    pub missing: Vec<SurveyField>,
}

/// Parse raw survey text into answers, rejecting mostly-empty surveys.
pub fn parse_survey(text: &str) -> Result<Answers, IncompleteProfile> {
    let answers = collect_answers(text);
    let missing = answers.missing_fields();
    let ratio = missing.len() as f64 / SurveyField::REQUIRED.len() as f64;

    debug!(
        recognized = answers.len(),
        missing = missing.len(),
        "survey text parsed"
    );

    if ratio > MAX_MISSING_RATIO {
        return Err(IncompleteProfile {
            reason: INCOMPLETE_PROFILE_REASON.to_string(),
            missing,
        });
    }

    Ok(answers)
}

fn collect_answers(text: &str) -> Answers {
    // Surveys pasted as one line often carry escaped newlines.
    let unescaped = text.replace("\\n", "\n");
    let mut answers = Answers::default();

    // Split on bare newlines so a CRLF `key:\r` line still carries a value.
    for line in unescaped.split('\n') {
        let Some((key, value)) = split_field_line(line) else {
            continue;
        };
        if let Some(field) = SurveyField::from_key(key) {
            answers.insert(field, normalize_value(value));
        }
    }

    answers
}

fn split_field_line(line: &str) -> Option<(&str, &str)> {
    let captures = FIELD_LINE.captures(line)?;
    let key = captures.get(1)?.as_str();
    let value = captures.get(2)?.as_str().trim();
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn survey_with(fields: &[SurveyField]) -> String {
        fields
            .iter()
            .map(|field| match field {
                SurveyField::Age => "age: 42",
                SurveyField::Smoker => "smoker: no",
                SurveyField::Exercise => "exercise: daily",
                SurveyField::Diet => "diet: balanced",
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn parses_all_required_fields() {
        let answers = parse_survey("age: 70\nsmoker: yes\nexercise: never\ndiet: high sugar")
            .expect("complete survey parses");

        assert_eq!(answers.len(), 4);
        assert_eq!(answers.get(SurveyField::Age), Some(&AnswerValue::Integer(70)));
        assert_eq!(
            answers.get(SurveyField::Smoker),
            Some(&AnswerValue::Boolean(true))
        );
        assert_eq!(
            answers.get(SurveyField::Diet),
            Some(&AnswerValue::Text("high sugar".to_string()))
        );
    }

    #[test]
    fn keys_match_case_insensitively_and_unknown_keys_are_ignored() {
        let answers = parse_survey("SMOKER: yes\nweight: 80\nDiet : Processed")
            .expect("two fields recognized");

        assert_eq!(
            answers.get(SurveyField::Smoker),
            Some(&AnswerValue::Boolean(true))
        );
        assert_eq!(
            answers.get(SurveyField::Diet),
            Some(&AnswerValue::Text("processed".to_string()))
        );
        assert_eq!(answers.len(), 2);
    }

    #[test]
    fn escaped_newlines_split_single_line_input() {
        let answers = parse_survey("age:70\\nsmoker:yes").expect("two fields recognized");
        assert_eq!(answers.get(SurveyField::Age), Some(&AnswerValue::Integer(70)));
        assert_eq!(
            answers.get(SurveyField::Smoker),
            Some(&AnswerValue::Boolean(true))
        );
    }

    #[test]
    fn later_lines_overwrite_earlier_values() {
        let answers = parse_survey("age: 30\nsmoker: no\nage: 65").expect("parses");
        assert_eq!(answers.get(SurveyField::Age), Some(&AnswerValue::Integer(65)));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let answers = parse_survey(
            "favorite food: pizza\n: orphan value\nage 70\n  exercise\t:  rarely  \ndiet: high fat",
        )
        .expect("two fields recognized");
        assert_eq!(answers.len(), 2);
        assert_eq!(
            answers.get(SurveyField::Exercise),
            Some(&AnswerValue::Text("rarely".to_string()))
        );
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let answers = parse_survey("age: 61\r\nsmoker: n\r\n").expect("parses");
        assert_eq!(answers.get(SurveyField::Age), Some(&AnswerValue::Integer(61)));
        assert_eq!(
            answers.get(SurveyField::Smoker),
            Some(&AnswerValue::Boolean(false))
        );
    }

    #[test]
    fn half_missing_passes_the_guardrail() {
        let answers = parse_survey(&survey_with(&[SurveyField::Age, SurveyField::Diet]))
            .expect("50% missing is allowed");
        assert_eq!(
            answers.missing_fields(),
            vec![SurveyField::Smoker, SurveyField::Exercise]
        );
    }

    #[test]
    fn mostly_missing_trips_the_guardrail() {
        let error = parse_survey("age: 70").expect_err("three fields missing");
        assert_eq!(error.reason, INCOMPLETE_PROFILE_REASON);
        assert_eq!(error.to_string(), ">50% fields missing");
        assert_eq!(
            error.missing,
            vec![SurveyField::Smoker, SurveyField::Exercise, SurveyField::Diet]
        );
    }

    #[test]
    fn empty_input_trips_the_guardrail() {
        let error = parse_survey("").expect_err("nothing recognized");
        assert_eq!(error.missing.len(), 4);
    }

    #[test]
    fn split_field_line_trims_the_value() {
        assert_eq!(
            split_field_line("   diet :   high sugar   "),
            Some(("diet", "high sugar"))
        );
        assert_eq!(split_field_line("age2: 40"), None);
        assert_eq!(split_field_line("age:"), None);
    }

    #[test]
    fn crlf_line_with_empty_value_still_counts_as_present() {
        let answers = parse_survey("age:\r\nsmoker: no\r\n").expect("two fields present");
        assert_eq!(
            answers.get(SurveyField::Age),
            Some(&AnswerValue::Text(String::new()))
        );
        assert_eq!(answers.len(), 2);
    }

    #[test]
    fn oversized_age_is_still_numeric() {
        let answers =
            parse_survey("age: 100000000000000000000\nsmoker: no").expect("two fields present");
        assert_eq!(
            answers.get(SurveyField::Age),
            Some(&AnswerValue::Integer(u64::MAX))
        );
    }

    proptest! {
        #[test]
        fn guardrail_tracks_missing_count(mask in 0u8..16) {
            let present: Vec<SurveyField> = SurveyField::REQUIRED
                .into_iter()
                .enumerate()
                .filter(|(index, _)| mask & (1 << index) != 0)
                .map(|(_, field)| field)
                .collect();
            let missing = 4 - present.len();

            let result = parse_survey(&survey_with(&present));
            prop_assert_eq!(result.is_ok(), missing <= 2);
        }
    }
}
