mod domain;

pub use domain::{
    ChoiceOption, JumpEntry, MatrixRow, Question, QuestionKind, Section, DEFAULT_SCALE_MAX,
    DEFAULT_SCALE_MIN,
};

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::info;

const BUNDLED_CATALOG: &str = include_str!("../../../../data/questions_core.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read question catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid question catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question catalog defines no sections")]
    NoSections,
    #[error("section '{section}' has no questions")]
    EmptySection { section: String },
    #[error("section '{section}' references unknown question '{question}'")]
    UnknownQuestion { section: String, question: String },
    #[error("question '{0}' is defined more than once")]
    DuplicateQuestion(String),
    #[error("scale question '{question}' has min {min} above max {max}")]
    InvalidScale { question: String, min: i64, max: i64 },
    #[error("question '{0}' defines no options")]
    MissingOptions(String),
    #[error("matrix question '{0}' defines no rows")]
    MissingRows(String),
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    title: Option<String>,
    sections: Vec<Section>,
    questions: Vec<Question>,
}

/// Validated, read-only question bank grouped into ordered sections.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionCatalog {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    sections: Vec<Section>,
    questions: Vec<Question>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl QuestionCatalog {
    /// Catalog shipped with the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(std::io::BufReader::new(file))?;
        info!(
            path = %path.display(),
            sections = catalog.sections.len(),
            questions = catalog.total_questions(),
            "question catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::from_document(document)
    }

    fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let CatalogDocument {
            title,
            sections,
            questions,
        } = document;

        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            validate_question(question)?;
            if index.insert(question.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
        }

        if sections.is_empty() {
            return Err(CatalogError::NoSections);
        }

        for section in &sections {
            if section.question_ids.is_empty() {
                return Err(CatalogError::EmptySection {
                    section: section.id.clone(),
                });
            }
            if let Some(missing) = section
                .question_ids
                .iter()
                .find(|id| !index.contains_key(id.as_str()))
            {
                return Err(CatalogError::UnknownQuestion {
                    section: section.id.clone(),
                    question: missing.clone(),
                });
            }
        }

        Ok(Self {
            title,
            sections,
            questions,
            index,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.index
            .get(id)
            .and_then(|position| self.questions.get(*position))
    }

    /// Number of question slots across all sections.
    pub fn total_questions(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.question_ids.len())
            .sum()
    }

    pub fn jump_list(&self) -> Vec<JumpEntry> {
        self.sections
            .iter()
            .enumerate()
            .map(|(index, section)| JumpEntry {
                index,
                section_id: section.id.clone(),
                title: section.title.clone(),
                question_count: section.question_ids.len(),
            })
            .collect()
    }

    /// Question ids from `wanted` that the catalog does not define.
    pub fn missing_ids<'a, I>(&self, wanted: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        wanted
            .into_iter()
            .filter(|id| seen.insert(*id) && !self.index.contains_key(*id))
            .collect()
    }
}

fn validate_question(question: &Question) -> Result<(), CatalogError> {
    match &question.kind {
        QuestionKind::Single { options } | QuestionKind::Multi { options } => {
            if options.is_empty() {
                return Err(CatalogError::MissingOptions(question.id.clone()));
            }
        }
        QuestionKind::Matrix { rows, options } => {
            if options.is_empty() {
                return Err(CatalogError::MissingOptions(question.id.clone()));
            }
            if rows.is_empty() {
                return Err(CatalogError::MissingRows(question.id.clone()));
            }
        }
        QuestionKind::Scale { .. } => {
            if let Some((min, max)) = question.kind.scale_bounds() {
                if min > max {
                    return Err(CatalogError::InvalidScale {
                        question: question.id.clone(),
                        min,
                        max,
                    });
                }
            }
        }
        QuestionKind::Text { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog_json(sections: serde_json::Value, questions: serde_json::Value) -> String {
        json!({ "sections": sections, "questions": questions }).to_string()
    }

    fn single(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "type": "single",
            "text": "Pick one",
            "options": [{ "value": "yes", "label": "Yes" }, { "value": "no", "label": "No" }]
        })
    }

    #[test]
    fn parses_every_question_type() {
        let raw = catalog_json(
            json!([{ "id": "s1", "title": "Basics", "questionIds": ["A", "B", "C", "D", "E"] }]),
            json!([
                single("A"),
                { "id": "B", "type": "multi", "text": "Pick many",
                  "options": [{ "value": "x", "label": "X" }] },
                { "id": "C", "type": "scale", "text": "Rate", "min": 1, "max": 5, "hint": "1 low" },
                { "id": "D", "type": "text", "text": "Describe", "rows": 4 },
                { "id": "E", "type": "matrix", "text": "Grid",
                  "rows": [{ "key": "r1", "label": "Row" }],
                  "options": [{ "value": "often", "label": "Often" }] }
            ]),
        );

        let catalog = QuestionCatalog::from_json_str(&raw).expect("catalog parses");

        assert_eq!(catalog.total_questions(), 5);
        assert_eq!(catalog.question("A").map(|q| q.kind.label()), Some("single"));
        assert_eq!(
            catalog.question("C").and_then(|q| q.kind.scale_bounds()),
            Some((1, 5))
        );
        assert!(matches!(
            catalog.question("D").map(|q| &q.kind),
            Some(QuestionKind::Text { rows: Some(4), .. })
        ));
        assert!(catalog.question("E").expect("matrix").kind.has_option("often"));
    }

    #[test]
    fn scale_defaults_to_zero_through_ten() {
        let raw = catalog_json(
            json!([{ "id": "s1", "title": "Scale", "questionIds": ["S"] }]),
            json!([{ "id": "S", "type": "scale", "text": "How much?" }]),
        );

        let catalog = QuestionCatalog::from_json_str(&raw).expect("catalog parses");
        assert_eq!(
            catalog.question("S").and_then(|q| q.kind.scale_bounds()),
            Some((0, 10))
        );
    }

    #[test]
    fn rejects_unknown_question_reference() {
        let raw = catalog_json(
            json!([{ "id": "s1", "title": "Basics", "questionIds": ["A", "Z"] }]),
            json!([single("A")]),
        );

        match QuestionCatalog::from_json_str(&raw) {
            Err(CatalogError::UnknownQuestion { section, question }) => {
                assert_eq!(section, "s1");
                assert_eq!(question, "Z");
            }
            other => panic!("expected unknown question error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_structural_problems() {
        let no_sections = catalog_json(json!([]), json!([single("A")]));
        assert!(matches!(
            QuestionCatalog::from_json_str(&no_sections),
            Err(CatalogError::NoSections)
        ));

        let empty_section = catalog_json(
            json!([{ "id": "s1", "title": "Empty", "questionIds": [] }]),
            json!([single("A")]),
        );
        assert!(matches!(
            QuestionCatalog::from_json_str(&empty_section),
            Err(CatalogError::EmptySection { .. })
        ));

        let duplicate = catalog_json(
            json!([{ "id": "s1", "title": "Dup", "questionIds": ["A"] }]),
            json!([single("A"), single("A")]),
        );
        assert!(matches!(
            QuestionCatalog::from_json_str(&duplicate),
            Err(CatalogError::DuplicateQuestion(id)) if id == "A"
        ));

        let inverted_scale = catalog_json(
            json!([{ "id": "s1", "title": "Scale", "questionIds": ["S"] }]),
            json!([{ "id": "S", "type": "scale", "text": "Rate", "min": 5, "max": 1 }]),
        );
        assert!(matches!(
            QuestionCatalog::from_json_str(&inverted_scale),
            Err(CatalogError::InvalidScale { min: 5, max: 1, .. })
        ));

        let no_options = catalog_json(
            json!([{ "id": "s1", "title": "Opts", "questionIds": ["M"] }]),
            json!([{ "id": "M", "type": "multi", "text": "Pick", "options": [] }]),
        );
        assert!(matches!(
            QuestionCatalog::from_json_str(&no_options),
            Err(CatalogError::MissingOptions(_))
        ));

        let no_rows = catalog_json(
            json!([{ "id": "s1", "title": "Grid", "questionIds": ["G"] }]),
            json!([{ "id": "G", "type": "matrix", "text": "Grid", "rows": [],
                     "options": [{ "value": "a", "label": "A" }] }]),
        );
        assert!(matches!(
            QuestionCatalog::from_json_str(&no_rows),
            Err(CatalogError::MissingRows(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            QuestionCatalog::from_json_str("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = QuestionCatalog::from_path("./does-not-exist.json").expect_err("io error");
        assert!(matches!(error, CatalogError::Io(_)));
    }

    #[test]
    fn bundled_catalog_is_valid_and_lists_sections() {
        let catalog = QuestionCatalog::bundled().expect("bundled catalog loads");
        let jump_list = catalog.jump_list();

        assert!(!jump_list.is_empty());
        assert_eq!(
            jump_list
                .iter()
                .map(|entry| entry.question_count)
                .sum::<usize>(),
            catalog.total_questions()
        );
        assert_eq!(jump_list[0].index, 0);
    }
}
