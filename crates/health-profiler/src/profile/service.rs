use std::sync::Arc;

use tracing::info;

use super::ocr::SurveyTextExtractor;
use super::parser::IncompleteProfile;
use super::rubric::ProfileRubric;
use super::{HealthProfile, ProfileEngine};

pub const MISSING_SURVEY_MESSAGE: &str = "Please provide either 'survey_text' or 'survey_image'.";

/// Raw survey input as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveySubmission {
    pub survey_text: Option<String>,
    pub survey_image: Option<Vec<u8>>,
}

impl SurveySubmission {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            survey_text: Some(text.into()),
            survey_image: None,
        }
    }

    pub fn image(bytes: Vec<u8>) -> Self {
        Self {
            survey_text: None,
            survey_image: Some(bytes),
        }
    }
}

/// Service composing image text extraction with the profiling engine.
pub struct ProfileService<X> {
    extractor: Arc<X>,
    engine: Arc<ProfileEngine>,
}

impl<X> ProfileService<X>
where
    X: SurveyTextExtractor + 'static,
{
    pub fn new(extractor: Arc<X>, rubric: ProfileRubric) -> Self {
        Self {
            extractor,
            engine: Arc::new(ProfileEngine::new(rubric)),
        }
    }

    pub fn engine(&self) -> &ProfileEngine {
        &self.engine
    }

    /// Resolve the survey text and run it through the engine.
    ///
    /// An uploaded image takes precedence over typed text.
    pub fn assess(
        &self,
        submission: SurveySubmission,
    ) -> Result<HealthProfile, ProfileServiceError> {
        let raw_text = self.resolve_text(submission)?;
        let profile = self.engine.assess(&raw_text)?;

        info!(
            risk_level = %profile.risk_level,
            score = profile.score,
            "health profile generated"
        );

        Ok(profile)
    }

    fn resolve_text(&self, submission: SurveySubmission) -> Result<String, ProfileServiceError> {
        let SurveySubmission {
            survey_text,
            survey_image,
        } = submission;

        let survey_text = survey_text.filter(|text| !text.is_empty());
        let survey_image = survey_image.filter(|bytes| !bytes.is_empty());

        match (survey_image, survey_text) {
            (Some(image), _) => Ok(self.extractor.extract_text(&image)),
            (None, Some(text)) => Ok(text),
            (None, None) => Err(ProfileServiceError::MissingSurvey),
        }
    }
}

/// Error raised by the profile service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error("{}", MISSING_SURVEY_MESSAGE)]
    MissingSurvey,
    #[error(transparent)]
    Incomplete(#[from] IncompleteProfile),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Factor, RiskLevel};
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedExtractor {
        text: String,
        calls: Mutex<Vec<usize>>,
    }

    impl ScriptedExtractor {
        fn returning(text: &str) -> Self {
            Self {
                text: text.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl SurveyTextExtractor for ScriptedExtractor {
        fn extract_text(&self, image: &[u8]) -> String {
            self.calls.lock().expect("calls mutex").push(image.len());
            self.text.clone()
        }
    }

    fn service(extractor: ScriptedExtractor) -> (ProfileService<ScriptedExtractor>, Arc<ScriptedExtractor>) {
        let extractor = Arc::new(extractor);
        let service = ProfileService::new(extractor.clone(), ProfileRubric::standard());
        (service, extractor)
    }

    #[test]
    fn assesses_typed_survey_text() {
        let (service, extractor) = service(ScriptedExtractor::default());
        let profile = service
            .assess(SurveySubmission::text(
                "age: 45\nsmoker: yes\nexercise: rarely\ndiet: balanced",
            ))
            .expect("profile generated");

        assert_eq!(profile.factors, vec![Factor::Smoking, Factor::LowExercise]);
        assert_eq!(profile.score, 55);
        assert_eq!(profile.risk_level, RiskLevel::Medium);
        assert!(extractor.calls.lock().expect("calls mutex").is_empty());
    }

    #[test]
    fn image_takes_precedence_over_text() {
        let (service, extractor) = service(ScriptedExtractor::returning(
            "age: 72\nsmoker: no\nexercise: daily\ndiet: balanced",
        ));
        let submission = SurveySubmission {
            survey_text: Some("age: 20".to_string()),
            survey_image: Some(vec![0x89, 0x50, 0x4e, 0x47]),
        };

        let profile = service.assess(submission).expect("profile generated");

        assert_eq!(profile.factors, vec![Factor::AdvancedAge]);
        assert_eq!(*extractor.calls.lock().expect("calls mutex"), vec![4]);
    }

    #[test]
    fn failed_ocr_surfaces_as_incomplete_profile() {
        let (service, _) = service(ScriptedExtractor::returning(""));
        let error = service
            .assess(SurveySubmission::image(vec![1, 2, 3]))
            .expect_err("empty OCR text is incomplete");

        match error {
            ProfileServiceError::Incomplete(incomplete) => {
                assert_eq!(incomplete.reason, ">50% fields missing");
            }
            other => panic!("expected incomplete profile, got {other:?}"),
        }
    }

    #[test]
    fn empty_submission_is_rejected() {
        let (service, _) = service(ScriptedExtractor::default());
        let submission = SurveySubmission {
            survey_text: Some(String::new()),
            survey_image: Some(Vec::new()),
        };

        let error = service.assess(submission).expect_err("nothing submitted");
        assert!(matches!(error, ProfileServiceError::MissingSurvey));
        assert_eq!(error.to_string(), MISSING_SURVEY_MESSAGE);
    }
}
