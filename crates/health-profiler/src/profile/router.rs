use std::sync::Arc;

use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::AppError;

use super::factors::Factor;
use super::ocr::SurveyTextExtractor;
use super::parser::IncompleteProfile;
use super::scoring::RiskLevel;
use super::service::{ProfileService, SurveySubmission};
use super::HealthProfile;

/// Successful profile payload returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub risk_level: RiskLevel,
    pub factors: Vec<Factor>,
    pub recommendations: Vec<String>,
    pub status: String,
}

impl From<HealthProfile> for ProfileResponse {
    fn from(profile: HealthProfile) -> Self {
        Self {
            risk_level: profile.risk_level,
            factors: profile.factors,
            recommendations: profile.recommendations,
            status: "ok".to_string(),
        }
    }
}

/// Structured rejection for surveys that trip the completeness guardrail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteProfileResponse {
    pub status: String,
    pub reason: String,
}

impl From<&IncompleteProfile> for IncompleteProfileResponse {
    fn from(error: &IncompleteProfile) -> Self {
        Self {
            status: "incomplete_profile".to_string(),
            reason: error.reason.clone(),
        }
    }
}

/// Router exposing survey profiling over HTTP.
pub fn profile_router<X>(service: Arc<ProfileService<X>>) -> Router
where
    X: SurveyTextExtractor + 'static,
{
    Router::new()
        .route("/profile", post(profile_handler::<X>))
        .with_state(service)
}

pub(crate) async fn profile_handler<X>(
    State(service): State<Arc<ProfileService<X>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProfileResponse>, AppError>
where
    X: SurveyTextExtractor + 'static,
{
    let multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "survey upload is not multipart");
        AppError::BadRequest(rejection.body_text())
    })?;

    let submission = read_submission(multipart).await.map_err(|err| {
        warn!(error = %err, "malformed survey upload");
        AppError::BadRequest(err.body_text())
    })?;

    // OCR shells out, so keep it off the async workers.
    let profile = tokio::task::spawn_blocking(move || service.assess(submission))
        .await
        .map_err(|join_error| {
            error!(error = %join_error, "profile assessment task failed");
            AppError::from(join_error)
        })??;

    Ok(Json(ProfileResponse::from(profile)))
}

async fn read_submission(mut multipart: Multipart) -> Result<SurveySubmission, MultipartError> {
    let mut submission = SurveySubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("survey_text") => submission.survey_text = Some(field.text().await?),
            Some("survey_image") => submission.survey_image = Some(field.bytes().await?.to_vec()),
            _ => {}
        }
    }

    Ok(submission)
}
