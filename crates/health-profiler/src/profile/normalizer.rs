use serde::{Deserialize, Serialize};
use std::fmt;

/// A survey answer reduced to the narrowest type its text allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Boolean(bool),
    Integer(u64),
    Text(String),
}

impl AnswerValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            AnswerValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Boolean(value) => write!(f, "{value}"),
            AnswerValue::Integer(value) => write!(f, "{value}"),
            AnswerValue::Text(value) => f.write_str(value),
        }
    }
}

pub fn normalize_value(raw: &str) -> AnswerValue {
    let value = raw.trim().to_lowercase();

    match value.as_str() {
        "true" | "yes" | "y" => return AnswerValue::Boolean(true),
        "false" | "no" | "n" => return AnswerValue::Boolean(false),
        _ => {}
    }

    if !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit()) {
        // Digit runs past u64::MAX saturate so they still compare as huge numbers.
        let number = value.parse::<u64>().unwrap_or(u64::MAX);
        return AnswerValue::Integer(number);
    }

    AnswerValue::Text(value)
}
