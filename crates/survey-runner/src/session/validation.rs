use super::SessionError;
use crate::answers::AnswerValue;
use crate::catalog::{Question, QuestionKind};

/// Checks that `value` is a well-formed answer to `question`.
pub fn validate_answer(question: &Question, value: &AnswerValue) -> Result<(), SessionError> {
    match (&question.kind, value) {
        (QuestionKind::Single { .. }, AnswerValue::Choice(selected)) => {
            require_option(question, selected)
        }
        (QuestionKind::Multi { .. }, AnswerValue::Multi(selected)) => selected
            .iter()
            .try_for_each(|value| require_option(question, value)),
        (QuestionKind::Scale { .. }, AnswerValue::Scale(picked)) => {
            let (min, max) = question.kind.scale_bounds().unwrap_or((*picked, *picked));
            if (min..=max).contains(picked) {
                Ok(())
            } else {
                Err(SessionError::OutOfRange {
                    question: question.id.clone(),
                    value: *picked,
                    min,
                    max,
                })
            }
        }
        (QuestionKind::Text { .. }, AnswerValue::Text(_)) => Ok(()),
        (QuestionKind::Matrix { rows, .. }, AnswerValue::Matrix(cells)) => {
            for (row, selected) in cells {
                if !rows.iter().any(|candidate| &candidate.key == row) {
                    return Err(SessionError::UnknownRow {
                        question: question.id.clone(),
                        row: row.clone(),
                    });
                }
                if let Some(selected) = selected {
                    require_option(question, selected)?;
                }
            }
            Ok(())
        }
        (kind, value) => Err(SessionError::WrongAnswerType {
            question: question.id.clone(),
            expected: kind.label(),
            found: value.kind_label(),
        }),
    }
}

fn require_option(question: &Question, value: &str) -> Result<(), SessionError> {
    if question.kind.has_option(value) {
        Ok(())
    } else {
        Err(SessionError::UnknownOption {
            question: question.id.clone(),
            value: value.to_string(),
        })
    }
}
