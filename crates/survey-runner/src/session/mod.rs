//! Linear navigation over a question catalog, with direct section jumps and answer capture.

mod validation;

use crate::answers::{AnswerSet, AnswerValue};
use crate::catalog::{Question, QuestionCatalog, Section};
use crate::scoring::{Assessment, ScoringEngine};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

pub use validation::validate_answer;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("section {index} does not exist (catalog has {available})")]
    SectionOutOfRange { index: usize, available: usize },
    #[error("question '{question}' expects a {expected} answer, got {found}")]
    WrongAnswerType {
        question: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("'{value}' is not an option of question '{question}'")]
    UnknownOption { question: String, value: String },
    #[error("{value} is outside {min}..={max} for question '{question}'")]
    OutOfRange {
        question: String,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("'{row}' is not a row of question '{question}'")]
    UnknownRow { question: String, row: String },
}

/// Result of moving forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    /// The current question was the last one; the session is ready to be scored.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    pub percent: u8,
}

/// Cursor over the catalog plus the answers captured so far.
#[derive(Debug, Clone)]
pub struct SurveySession {
    catalog: Arc<QuestionCatalog>,
    answers: AnswerSet,
    section_index: usize,
    question_index: usize,
}

impl SurveySession {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            catalog,
            answers: AnswerSet::new(),
            section_index: 0,
            question_index: 0,
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn position(&self) -> (usize, usize) {
        (self.section_index, self.question_index)
    }

    pub fn current_section(&self) -> &Section {
        &self.catalog.sections()[self.section_index]
    }

    pub fn current_question(&self) -> &Question {
        let id = &self.current_section().question_ids[self.question_index];
        self.catalog
            .question(id)
            .expect("catalog validation guarantees section questions exist")
    }

    pub fn current_answer(&self) -> Option<&AnswerValue> {
        self.answers.get(&self.current_question().id)
    }

    /// Stores `value` for the current question after checking it fits the question type.
    pub fn record_answer(&mut self, value: AnswerValue) -> Result<(), SessionError> {
        let question = self.current_question();
        validate_answer(question, &value)?;
        let id = question.id.clone();
        debug!(question_id = %id, kind = value.kind_label(), "answer recorded");
        self.answers.insert(id, value);
        Ok(())
    }

    pub fn clear_answer(&mut self) {
        let id = self.current_question().id.clone();
        self.answers.mark_unanswered(id);
    }

    pub fn is_first_question(&self) -> bool {
        self.section_index == 0 && self.question_index == 0
    }

    pub fn is_last_question(&self) -> bool {
        let last_section = self.section_index + 1 == self.catalog.sections().len();
        let last_in_section = self.question_index + 1 == self.current_section().question_ids.len();
        last_section && last_in_section
    }

    pub fn next(&mut self) -> Advance {
        if self.is_last_question() {
            return Advance::Finished;
        }

        if self.question_index + 1 < self.current_section().question_ids.len() {
            self.question_index += 1;
        } else {
            self.section_index += 1;
            self.question_index = 0;
        }
        debug!(
            section = self.section_index,
            question = self.question_index,
            "advanced"
        );
        Advance::Moved
    }

    pub fn previous(&mut self) {
        if self.question_index > 0 {
            self.question_index -= 1;
        } else if self.section_index > 0 {
            self.section_index -= 1;
            self.question_index = self.current_section().question_ids.len() - 1;
        }
    }

    pub fn jump_to_section(&mut self, index: usize) -> Result<(), SessionError> {
        let available = self.catalog.sections().len();
        if index >= available {
            return Err(SessionError::SectionOutOfRange { index, available });
        }

        self.section_index = index;
        self.question_index = 0;
        debug!(section = index, "jumped to section");
        Ok(())
    }

    pub fn restart(&mut self) {
        self.answers.clear();
        self.section_index = 0;
        self.question_index = 0;
    }

    pub fn progress(&self) -> Progress {
        let total = self.catalog.total_questions();
        let done = self.catalog.sections()[..self.section_index]
            .iter()
            .map(|section| section.question_ids.len())
            .sum::<usize>()
            + self.question_index;
        let percent = if total == 0 {
            0
        } else {
            ((done as f64 / total as f64) * 100.0 + 0.5).floor() as u8
        };

        Progress {
            done,
            total,
            percent,
        }
    }

    pub fn finish(&self, engine: &ScoringEngine) -> Assessment {
        engine.score(&self.answers)
    }
}
