use serde::{Deserialize, Serialize};

/// Default bounds for scale questions that omit `min` / `max`.
pub const DEFAULT_SCALE_MIN: i64 = 0;
pub const DEFAULT_SCALE_MAX: i64 = 10;

/// Selectable option shared by single, multi, and matrix questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

/// Row of a matrix question; every row is answered with one of the question's options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub key: String,
    pub label: String,
}

/// Type-specific rendering metadata, tagged by the catalog's `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    Single {
        options: Vec<ChoiceOption>,
    },
    Multi {
        options: Vec<ChoiceOption>,
    },
    Scale {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rows: Option<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Matrix {
        rows: Vec<MatrixRow>,
        options: Vec<ChoiceOption>,
    },
}

impl QuestionKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Single { .. } => "single",
            Self::Multi { .. } => "multi",
            Self::Scale { .. } => "scale",
            Self::Text { .. } => "text",
            Self::Matrix { .. } => "matrix",
        }
    }

    pub fn options(&self) -> &[ChoiceOption] {
        match self {
            Self::Single { options } | Self::Multi { options } | Self::Matrix { options, .. } => {
                options
            }
            Self::Scale { .. } | Self::Text { .. } => &[],
        }
    }

    /// Inclusive bounds for scale questions.
    pub fn scale_bounds(&self) -> Option<(i64, i64)> {
        match self {
            Self::Scale { min, max, .. } => Some((
                min.unwrap_or(DEFAULT_SCALE_MIN),
                max.unwrap_or(DEFAULT_SCALE_MAX),
            )),
            _ => None,
        }
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options().iter().any(|option| option.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Ordered group of questions presented under one heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub question_ids: Vec<String>,
}

/// Entry of the section jump list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JumpEntry {
    pub index: usize,
    pub section_id: String,
    pub title: String,
    pub question_count: usize,
}
