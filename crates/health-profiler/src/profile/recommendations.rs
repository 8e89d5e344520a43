use super::factors::Factor;
use super::rubric::ProfileRubric;

pub(crate) fn recommend(factors: &[Factor], rubric: &ProfileRubric) -> Vec<String> {
    if factors.is_empty() {
        return vec![rubric.fallback_advice.clone()];
    }

    factors
        .iter()
        .filter_map(|factor| rubric.advice_for(*factor))
        .map(str::to_string)
        .collect()
}
