use crate::infra::profile_service;
use clap::{ArgGroup, Args};
use health_profiler::config::AppConfig;
use health_profiler::error::AppError;
use health_profiler::profile::router::{IncompleteProfileResponse, ProfileResponse};
use health_profiler::profile::{
    HealthProfile, IncompleteProfile, ProfileEngine, ProfileServiceError, SurveySubmission,
};
use std::path::PathBuf;

const SAMPLE_SURVEYS: [(&str, &str); 3] = [
    (
        "High-risk lifestyle",
        "age: 70\nsmoker: yes\nexercise: never\ndiet: high sugar",
    ),
    (
        "Healthy routine",
        "age: 30\nsmoker: no\nexercise: daily\ndiet: balanced",
    ),
    ("Incomplete submission", "age: 70"),
];

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["text", "file", "image"])
))]
pub(crate) struct AssessArgs {
    /// Survey text; literal `\n` sequences are treated as line breaks
    #[arg(long)]
    pub(crate) text: Option<String>,
    /// Read survey text from a file
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    /// Read the survey from an image through the configured OCR command
    #[arg(long)]
    pub(crate) image: Option<PathBuf>,
    /// Print the HTTP response body instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print each outcome as its HTTP response body
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        text,
        file,
        image,
        json,
    } = args;

    let submission = match (text, file, image) {
        (Some(text), _, _) => SurveySubmission::text(text),
        (None, Some(path), _) => SurveySubmission::text(std::fs::read_to_string(path)?),
        (None, None, Some(path)) => SurveySubmission::image(std::fs::read(path)?),
        (None, None, None) => SurveySubmission::default(),
    };

    let config = AppConfig::load()?;
    let service = profile_service(&config.ocr);

    match service.assess(submission) {
        Ok(profile) => {
            if json {
                println!("{}", render_json(&profile)?);
            } else {
                render_profile("Survey", &profile);
            }
            Ok(())
        }
        Err(ProfileServiceError::Incomplete(incomplete)) => {
            if json {
                println!("{}", render_incomplete_json(&incomplete)?);
            } else {
                render_incomplete("Survey", &incomplete);
            }
            Err(ProfileServiceError::Incomplete(incomplete).into())
        }
        Err(other) => Err(other.into()),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = ProfileEngine::default();

    println!("Health risk profiler demo");
    for (label, survey) in SAMPLE_SURVEYS {
        println!("\n{label}");
        for line in survey.lines() {
            println!("  > {line}");
        }

        match engine.assess(survey) {
            Ok(profile) if args.json => println!("{}", render_json(&profile)?),
            Ok(profile) => render_profile(label, &profile),
            Err(incomplete) if args.json => {
                println!("{}", render_incomplete_json(&incomplete)?)
            }
            Err(incomplete) => render_incomplete(label, &incomplete),
        }
    }

    Ok(())
}

fn render_json(profile: &HealthProfile) -> Result<String, AppError> {
    let body = ProfileResponse::from(profile.clone());
    Ok(serde_json::to_string_pretty(&body)?)
}

fn render_incomplete_json(incomplete: &IncompleteProfile) -> Result<String, AppError> {
    let body = IncompleteProfileResponse::from(incomplete);
    Ok(serde_json::to_string_pretty(&body)?)
}

fn render_profile(label: &str, profile: &HealthProfile) {
    println!(
        "{label}: {} risk (score {})",
        profile.risk_level, profile.score
    );

    if profile.factors.is_empty() {
        println!("Risk factors: none");
    } else {
        println!("Risk factors");
        for factor in &profile.factors {
            println!("- {factor}");
        }
    }

    println!("Recommendations");
    for recommendation in &profile.recommendations {
        println!("- {recommendation}");
    }
}

fn render_incomplete(label: &str, incomplete: &IncompleteProfile) {
    let missing = incomplete
        .missing
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(", ");
    println!("{label}: incomplete profile ({})", incomplete.reason);
    println!("Missing fields: {missing}");
}
