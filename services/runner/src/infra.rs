use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use survey_runner::answers::AnswerSet;
use survey_runner::catalog::QuestionCatalog;
use survey_runner::config::SurveyConfig;
use survey_runner::error::AppError;
use survey_runner::scoring::{scored_question_ids, Assessment, ScoringEngine};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Read-only survey resources shared by every request.
#[derive(Debug)]
pub(crate) struct SurveyService {
    pub(crate) catalog: Arc<QuestionCatalog>,
    pub(crate) engine: ScoringEngine,
}

impl SurveyService {
    pub(crate) fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            catalog,
            engine: ScoringEngine::default(),
        }
    }

    pub(crate) fn score(&self, answers: &AnswerSet) -> Assessment {
        let assessment = self.engine.score(answers);
        log_assessment("http", &assessment);
        assessment
    }
}

/// Resolves the catalog from an explicit path, then the configured path, then the bundled copy.
pub(crate) fn load_catalog(
    override_path: Option<&Path>,
    config: &SurveyConfig,
) -> Result<Arc<QuestionCatalog>, AppError> {
    let catalog = match override_path.or(config.catalog_path.as_deref()) {
        Some(path) => QuestionCatalog::from_path(path)?,
        None => QuestionCatalog::bundled()?,
    };

    let missing = catalog.missing_ids(scored_question_ids());
    if !missing.is_empty() {
        warn!(?missing, "catalog omits scored questions; their rules will never fire");
    }

    Ok(Arc::new(catalog))
}

pub(crate) fn read_answers(path: &Path) -> Result<AnswerSet, AppError> {
    let reader = BufReader::new(File::open(path)?);
    let answers: AnswerSet = serde_json::from_reader(reader)?;
    info!(
        path = %path.display(),
        entries = answers.len(),
        answered = answers.answered_count(),
        "answers loaded"
    );
    Ok(answers)
}

pub(crate) fn log_assessment(source: &'static str, assessment: &Assessment) {
    info!(
        source,
        profile = assessment.profile.id.as_str(),
        risk = assessment.risk,
        fired_rules = assessment.components.len(),
        "assessment scored"
    );
}
