//! Self-assessment questionnaire core: catalog loading, answer capture, navigation, and
//! heuristic profile scoring.

pub mod answers;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod scoring;
pub mod session;
pub mod telemetry;

pub use answers::{AnswerSet, AnswerValue};
pub use catalog::{QuestionCatalog, QuestionKind};
pub use scoring::{Assessment, Profile, ScoreIndex, ScoreSet, ScoringEngine};
pub use session::SurveySession;
