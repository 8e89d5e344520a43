use health_profiler::config::OcrConfig;
use health_profiler::profile::{ProfileRubric, ProfileService, TesseractExtractor};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn profile_service(ocr: &OcrConfig) -> ProfileService<TesseractExtractor> {
    ProfileService::new(Arc::new(ocr.extractor()), ProfileRubric::standard())
}
