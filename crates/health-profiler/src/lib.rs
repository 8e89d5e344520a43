//! Lifestyle survey intake and health risk profiling.
//!
//! Survey text (typed or recovered from an image) is parsed into a handful of
//! structured answers, mapped onto risk factors, scored, and turned into
//! non-diagnostic recommendations.

pub mod config;
pub mod error;
pub mod profile;
pub mod telemetry;
