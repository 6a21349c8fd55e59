use std::collections::BTreeMap;
use std::fmt;
use survey_runner::answers::AnswerValue;
use survey_runner::catalog::{ChoiceOption, Question, QuestionKind};

/// Colon-prefixed commands accepted at any prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Navigation {
    Back,
    /// Zero-based section index.
    Jump(usize),
    Sections,
    Restart,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Input {
    Navigate(Navigation),
    Skip,
    Answer(AnswerValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PromptError {
    UnknownCommand(String),
    InvalidSection(String),
    UnknownOption(String),
    NotAnInteger(String),
    RowCount { expected: usize, found: usize },
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::UnknownCommand(command) => write!(
                f,
                "unknown command ':{command}' (try :back, :jump N, :sections, :restart, :quit)"
            ),
            PromptError::InvalidSection(raw) => {
                write!(f, "'{raw}' is not a section number from the jump list")
            }
            PromptError::UnknownOption(raw) => {
                write!(f, "'{raw}' does not match any option number or value")
            }
            PromptError::NotAnInteger(raw) => write!(f, "'{raw}' is not a whole number"),
            PromptError::RowCount { expected, found } => write!(
                f,
                "expected {expected} comma-separated entries (one per row), got {found}"
            ),
        }
    }
}

impl std::error::Error for PromptError {}

/// Interprets one line typed at the prompt for `question`.
pub(crate) fn parse_input(question: &Question, line: &str) -> Result<Input, PromptError> {
    let trimmed = line.trim();
    if let Some(command) = trimmed.strip_prefix(':') {
        return parse_command(command).map(Input::Navigate);
    }
    if trimmed.is_empty() {
        return Ok(Input::Skip);
    }

    let value = match &question.kind {
        QuestionKind::Single { options } => AnswerValue::Choice(resolve_option(options, trimmed)?),
        QuestionKind::Multi { options } => {
            let mut selected: Vec<String> = Vec::new();
            for token in trimmed.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                let value = resolve_option(options, token)?;
                if !selected.contains(&value) {
                    selected.push(value);
                }
            }
            if selected.is_empty() {
                return Ok(Input::Skip);
            }
            AnswerValue::Multi(selected)
        }
        QuestionKind::Scale { .. } => AnswerValue::Scale(
            trimmed
                .parse::<i64>()
                .map_err(|_| PromptError::NotAnInteger(trimmed.to_string()))?,
        ),
        QuestionKind::Text { .. } => AnswerValue::Text(trimmed.to_string()),
        QuestionKind::Matrix { rows, options } => {
            let tokens: Vec<&str> = trimmed.split(',').map(str::trim).collect();
            if tokens.len() != rows.len() {
                return Err(PromptError::RowCount {
                    expected: rows.len(),
                    found: tokens.len(),
                });
            }

            let mut selections = BTreeMap::new();
            for (row, token) in rows.iter().zip(tokens) {
                let selected = if token.is_empty() {
                    None
                } else {
                    Some(resolve_option(options, token)?)
                };
                selections.insert(row.key.clone(), selected);
            }
            AnswerValue::Matrix(selections)
        }
    };

    Ok(Input::Answer(value))
}

fn parse_command(command: &str) -> Result<Navigation, PromptError> {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();

    match name.as_str() {
        "back" | "b" => Ok(Navigation::Back),
        "sections" | "s" => Ok(Navigation::Sections),
        "restart" => Ok(Navigation::Restart),
        "quit" | "q" => Ok(Navigation::Quit),
        "jump" | "j" => {
            let raw = parts.next().unwrap_or_default();
            match raw.parse::<usize>() {
                Ok(number) if number > 0 => Ok(Navigation::Jump(number - 1)),
                _ => Err(PromptError::InvalidSection(raw.to_string())),
            }
        }
        _ => Err(PromptError::UnknownCommand(command.trim().to_string())),
    }
}

/// Accepts a 1-based option number, an option value, or an option label.
fn resolve_option(options: &[ChoiceOption], token: &str) -> Result<String, PromptError> {
    let found = match token.parse::<usize>() {
        Ok(number) => number.checked_sub(1).and_then(|index| options.get(index)),
        Err(_) => options.iter().find(|option| {
            option.value.eq_ignore_ascii_case(token) || option.label.eq_ignore_ascii_case(token)
        }),
    };

    found
        .map(|option| option.value.clone())
        .ok_or_else(|| PromptError::UnknownOption(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_runner::catalog::MatrixRow;

    fn option(value: &str, label: &str) -> ChoiceOption {
        ChoiceOption {
            value: value.to_string(),
            label: label.to_string(),
        }
    }

    fn question(kind: QuestionKind) -> Question {
        Question {
            id: "Q1".to_string(),
            text: "How often?".to_string(),
            kind,
        }
    }

    fn frequency() -> Vec<ChoiceOption> {
        vec![
            option("never", "Never"),
            option("sometimes", "Sometimes"),
            option("often", "Often"),
        ]
    }

    #[test]
    fn single_choice_accepts_numbers_values_and_labels() {
        let single = question(QuestionKind::Single {
            options: frequency(),
        });

        assert_eq!(
            parse_input(&single, "3\n"),
            Ok(Input::Answer(AnswerValue::choice("often")))
        );
        assert_eq!(
            parse_input(&single, "Sometimes"),
            Ok(Input::Answer(AnswerValue::choice("sometimes")))
        );
        assert_eq!(
            parse_input(&single, "4"),
            Err(PromptError::UnknownOption("4".to_string()))
        );
        assert_eq!(
            parse_input(&single, "0"),
            Err(PromptError::UnknownOption("0".to_string()))
        );
    }

    #[test]
    fn multi_choice_dedupes_and_keeps_entry_order() {
        let multi = question(QuestionKind::Multi {
            options: frequency(),
        });

        assert_eq!(
            parse_input(&multi, "3, never, 3"),
            Ok(Input::Answer(AnswerValue::multi(["often", "never"])))
        );
        assert_eq!(parse_input(&multi, " , "), Ok(Input::Skip));
    }

    #[test]
    fn blank_line_skips_every_kind() {
        let scale = question(QuestionKind::Scale {
            min: Some(1),
            max: Some(5),
            hint: None,
        });
        assert_eq!(parse_input(&scale, "   \n"), Ok(Input::Skip));
        assert_eq!(
            parse_input(&scale, "4"),
            Ok(Input::Answer(AnswerValue::Scale(4)))
        );
        assert_eq!(
            parse_input(&scale, "four"),
            Err(PromptError::NotAnInteger("four".to_string()))
        );
    }

    #[test]
    fn matrix_takes_one_entry_per_row() {
        let matrix = question(QuestionKind::Matrix {
            rows: vec![
                MatrixRow {
                    key: "jealousy".to_string(),
                    label: "Jealousy".to_string(),
                },
                MatrixRow {
                    key: "relief".to_string(),
                    label: "Relief".to_string(),
                },
            ],
            options: frequency(),
        });

        let expected = BTreeMap::from([
            ("jealousy".to_string(), Some("often".to_string())),
            ("relief".to_string(), None),
        ]);
        assert_eq!(
            parse_input(&matrix, "3,"),
            Ok(Input::Answer(AnswerValue::Matrix(expected)))
        );
        assert_eq!(
            parse_input(&matrix, "1"),
            Err(PromptError::RowCount {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn commands_take_precedence_over_answers() {
        let text = question(QuestionKind::Text {
            rows: None,
            placeholder: None,
        });

        assert_eq!(
            parse_input(&text, ":back"),
            Ok(Input::Navigate(Navigation::Back))
        );
        assert_eq!(
            parse_input(&text, ":jump 2"),
            Ok(Input::Navigate(Navigation::Jump(1)))
        );
        assert_eq!(
            parse_input(&text, ":jump 0"),
            Err(PromptError::InvalidSection("0".to_string()))
        );
        assert!(matches!(
            parse_input(&text, ":dance"),
            Err(PromptError::UnknownCommand(_))
        ));
        assert_eq!(
            parse_input(&text, "  just words "),
            Ok(Input::Answer(AnswerValue::text("just words")))
        );
    }
}
