use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::debug;

/// A captured answer, shaped by the type of question that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Selected option value of a `single` question.
    Choice(String),
    /// Selected option values of a `multi` question, in option order.
    Multi(Vec<String>),
    /// Integer picked on a `scale` question.
    Scale(i64),
    /// Free-form response to a `text` question.
    Text(String),
    /// Per-row selection of a `matrix` question.
    Matrix(BTreeMap<String, Option<String>>),
}

impl AnswerValue {
    pub fn choice(value: impl Into<String>) -> Self {
        Self::Choice(value.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Multi(values.into_iter().map(Into::into).collect())
    }

    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Choice(_) => "single",
            Self::Multi(_) => "multi",
            Self::Scale(_) => "scale",
            Self::Text(_) => "text",
            Self::Matrix(_) => "matrix",
        }
    }

    /// Textual reading used by phrase rules. Empty readings count as unanswered and
    /// matrix answers have no textual form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        let text = match self {
            Self::Choice(value) | Self::Text(value) => Cow::Borrowed(value.as_str()),
            Self::Multi(values) => Cow::Owned(values.join(",")),
            Self::Scale(value) => Cow::Owned(value.to_string()),
            Self::Matrix(_) => return None,
        };

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub const fn as_number(&self) -> Option<i64> {
        match self {
            Self::Scale(value) => Some(*value),
            _ => None,
        }
    }

    /// Decodes a loosely typed JSON answer. Shapes that match no variant yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Choice(text.clone())),
            Value::Number(number) => number.as_i64().map(Self::Scale).or_else(|| {
                number
                    .as_f64()
                    .filter(|raw| raw.fract() == 0.0 && raw.abs() < i64::MAX as f64)
                    .map(|raw| Self::Scale(raw as i64))
            }),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Self::Multi),
            Value::Object(rows) => rows
                .iter()
                .map(|(key, cell)| match cell {
                    Value::String(selected) => Some((key.clone(), Some(selected.clone()))),
                    Value::Null => Some((key.clone(), None)),
                    _ => None,
                })
                .collect::<Option<BTreeMap<_, _>>>()
                .map(Self::Matrix),
            Value::Null | Value::Bool(_) => None,
        }
    }
}

/// Answers keyed by question id. A `None` entry records a question that was shown but left
/// unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    entries: BTreeMap<String, Option<AnswerValue>>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question_id: impl Into<String>, value: AnswerValue) {
        self.entries.insert(question_id.into(), Some(value));
    }

    pub fn mark_unanswered(&mut self, question_id: impl Into<String>) {
        self.entries.insert(question_id.into(), None);
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.entries.get(question_id).and_then(Option::as_ref)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.entries.contains_key(question_id)
    }

    pub fn text(&self, question_id: &str) -> Option<Cow<'_, str>> {
        self.get(question_id).and_then(AnswerValue::as_text)
    }

    pub fn number(&self, question_id: &str) -> Option<i64> {
        self.get(question_id).and_then(AnswerValue::as_number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn answered_count(&self) -> usize {
        self.entries.values().filter(|value| value.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&AnswerValue>)> {
        self.entries
            .iter()
            .map(|(id, value)| (id.as_str(), value.as_ref()))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn from_json_map(raw: BTreeMap<String, Value>) -> Self {
        let entries = raw
            .into_iter()
            .map(|(id, value)| {
                let decoded = AnswerValue::from_json(&value);
                if decoded.is_none() && !value.is_null() {
                    debug!(question_id = %id, "ignoring answer with unrecognised shape");
                }
                (id, decoded)
            })
            .collect();

        Self { entries }
    }
}

impl<K: Into<String>> FromIterator<(K, AnswerValue)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (K, AnswerValue)>>(iter: T) -> Self {
        let mut answers = Self::new();
        for (id, value) in iter {
            answers.insert(id, value);
        }
        answers
    }
}

impl Serialize for AnswerSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_json_map(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_each_question_shape() {
        let answers: AnswerSet = serde_json::from_value(json!({
            "Q1": "often",
            "Q2": ["a", "b"],
            "Q3": 4,
            "Q4": { "row1": "yes", "row2": null },
            "Q5": null,
        }))
        .expect("answers decode");

        assert_eq!(answers.get("Q1"), Some(&AnswerValue::choice("often")));
        assert_eq!(answers.get("Q2"), Some(&AnswerValue::multi(["a", "b"])));
        assert_eq!(answers.number("Q3"), Some(4));
        assert!(matches!(answers.get("Q4"), Some(AnswerValue::Matrix(rows)) if rows.len() == 2));
        assert!(answers.contains("Q5"));
        assert_eq!(answers.get("Q5"), None);
        assert_eq!(answers.answered_count(), 4);
    }

    #[test]
    fn wrong_shapes_become_unanswered() {
        let answers: AnswerSet = serde_json::from_value(json!({
            "flag": true,
            "fraction": 2.5,
            "mixed": ["a", 3],
            "nested": { "row": { "deep": "x" } },
            "whole": 3.0,
        }))
        .expect("answers decode");

        assert_eq!(answers.len(), 5);
        assert_eq!(answers.answered_count(), 1);
        assert_eq!(answers.number("whole"), Some(3));
        assert!(answers.get("flag").is_none());
        assert!(answers.get("nested").is_none());
    }

    #[test]
    fn textual_reading_follows_answer_shape() {
        assert_eq!(
            AnswerValue::multi(["often", "never"]).as_text().as_deref(),
            Some("often,never")
        );
        assert_eq!(AnswerValue::Scale(7).as_text().as_deref(), Some("7"));
        assert!(AnswerValue::text("").as_text().is_none());
        assert!(AnswerValue::Matrix(BTreeMap::new()).as_text().is_none());
        assert!(AnswerValue::choice("7").as_number().is_none());
    }

    #[test]
    fn serializes_unanswered_entries_as_null() {
        let mut answers = AnswerSet::new();
        answers.insert("Q1", AnswerValue::choice("yes"));
        answers.mark_unanswered("Q2");

        let value = serde_json::to_value(&answers).expect("serialize");
        assert_eq!(value, json!({ "Q1": "yes", "Q2": null }));
    }
}
