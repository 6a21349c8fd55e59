use crate::prompt::{parse_input, Input, Navigation};
use crate::report::{describe_answer, render_jump_list};
use std::io::{BufRead, Write};
use survey_runner::catalog::{Question, QuestionKind};
use survey_runner::error::AppError;
use survey_runner::scoring::{Assessment, ScoringEngine};
use survey_runner::session::{Advance, SurveySession};
use tracing::debug;

#[derive(Debug)]
pub(crate) enum SessionOutcome {
    Completed(Assessment),
    Quit,
}

/// Drives `session` from line-oriented input until the last question is answered, the
/// respondent quits, or input runs out.
pub(crate) fn run_session<R, W>(
    session: &mut SurveySession,
    engine: &ScoringEngine,
    mut input: R,
    mut output: W,
) -> Result<SessionOutcome, AppError>
where
    R: BufRead,
    W: Write,
{
    writeln!(
        output,
        "{}",
        session.catalog().title().unwrap_or("Self-assessment")
    )?;
    writeln!(
        output,
        "Leave a line blank to skip. Commands: :back, :jump N, :sections, :restart, :quit"
    )?;

    let mut line = String::new();
    loop {
        render_question(session, &mut output)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("input closed before the last question");
            return Ok(SessionOutcome::Quit);
        }

        let advance = match parse_input(session.current_question(), &line) {
            Ok(Input::Answer(value)) => match session.record_answer(value) {
                Ok(()) => session.next(),
                Err(err) => {
                    writeln!(output, "  ! {err}")?;
                    continue;
                }
            },
            Ok(Input::Skip) => {
                session.clear_answer();
                session.next()
            }
            Ok(Input::Navigate(Navigation::Quit)) => return Ok(SessionOutcome::Quit),
            Ok(Input::Navigate(command)) => {
                navigate(session, command, &mut output)?;
                continue;
            }
            Err(err) => {
                writeln!(output, "  ! {err}")?;
                continue;
            }
        };

        if advance == Advance::Finished {
            return Ok(SessionOutcome::Completed(session.finish(engine)));
        }
    }
}

fn navigate<W: Write>(
    session: &mut SurveySession,
    command: Navigation,
    output: &mut W,
) -> Result<(), AppError> {
    match command {
        Navigation::Back => session.previous(),
        Navigation::Sections => render_jump_list(&session.catalog().jump_list(), output)?,
        Navigation::Restart => {
            session.restart();
            writeln!(output, "Answers cleared.")?;
        }
        Navigation::Jump(index) => {
            if session.jump_to_section(index).is_err() {
                writeln!(
                    output,
                    "  ! no section {}; choose 1-{}",
                    index + 1,
                    session.catalog().sections().len()
                )?;
            }
        }
        Navigation::Quit => {}
    }
    Ok(())
}

fn render_question<W: Write>(session: &SurveySession, output: &mut W) -> std::io::Result<()> {
    let progress = session.progress();
    let question = session.current_question();

    writeln!(
        output,
        "\n[{}] {}/{} ({}%)",
        session.current_section().title,
        progress.done + 1,
        progress.total,
        progress.percent
    )?;
    writeln!(output, "{}. {}", question.id, question.text)?;
    render_choices(question, output)?;

    if let Some(answer) = session.current_answer() {
        writeln!(output, "  current answer: {}", describe_answer(answer))?;
    }
    write!(output, "> ")
}

fn render_choices<W: Write>(question: &Question, output: &mut W) -> std::io::Result<()> {
    match &question.kind {
        QuestionKind::Single { options } | QuestionKind::Multi { options } => {
            for (number, option) in options.iter().enumerate() {
                writeln!(output, "  {}) {}", number + 1, option.label)?;
            }
            if matches!(question.kind, QuestionKind::Multi { .. }) {
                writeln!(output, "  (separate several choices with commas)")?;
            }
        }
        QuestionKind::Scale { hint, .. } => {
            if let Some((min, max)) = question.kind.scale_bounds() {
                writeln!(output, "  whole number from {min} to {max}")?;
            }
            if let Some(hint) = hint {
                writeln!(output, "  {hint}")?;
            }
        }
        QuestionKind::Text { placeholder, .. } => {
            writeln!(output, "  {}", placeholder.as_deref().unwrap_or("free text"))?;
        }
        QuestionKind::Matrix { rows, options } => {
            let choices: Vec<String> = options
                .iter()
                .enumerate()
                .map(|(number, option)| format!("{}) {}", number + 1, option.label))
                .collect();
            writeln!(output, "  options: {}", choices.join("  "))?;
            let labels: Vec<&str> = rows.iter().map(|row| row.label.as_str()).collect();
            writeln!(output, "  one option per row, comma-separated: {}", labels.join(", "))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;
    use survey_runner::catalog::QuestionCatalog;
    use survey_runner::scoring::{ProfileId, ScoreIndex};

    const CATALOG: &str = r#"{
        "title": "Check-in",
        "sections": [
            { "id": "consent", "title": "Consent", "questionIds": ["Q212", "Q223"] },
            { "id": "secrecy", "title": "Secrecy", "questionIds": ["Q320", "Q321"] }
        ],
        "questions": [
            { "id": "Q212", "text": "Pressure?", "type": "single",
              "options": [{ "value": "never", "label": "Never" }, { "value": "often", "label": "Often" }] },
            { "id": "Q223", "text": "Consensual?", "type": "single",
              "options": [{ "value": "yes", "label": "Yes" }, { "value": "mixed", "label": "Mixed" }] },
            { "id": "Q320", "text": "Withheld details?", "type": "single",
              "options": [{ "value": "never", "label": "Never" }, { "value": "often", "label": "Often" }] },
            { "id": "Q321", "text": "Detail appetite", "type": "scale", "min": 0, "max": 10 }
        ]
    }"#;

    fn session() -> SurveySession {
        let catalog = QuestionCatalog::from_json_str(CATALOG).expect("fixture catalog");
        SurveySession::new(Arc::new(catalog))
    }

    fn drive(session: &mut SurveySession, script: &str) -> (SessionOutcome, String) {
        let mut output = Vec::new();
        let outcome = run_session(
            session,
            &ScoringEngine::default(),
            Cursor::new(script.as_bytes().to_vec()),
            &mut output,
        )
        .expect("session runs");
        (outcome, String::from_utf8(output).expect("utf8"))
    }

    #[test]
    fn scripted_answers_reach_results() {
        let mut session = session();
        let (outcome, transcript) = drive(&mut session, "2\nmixed\noften\n5\n");

        let assessment = match outcome {
            SessionOutcome::Completed(assessment) => assessment,
            SessionOutcome::Quit => panic!("expected completion"),
        };
        assert_eq!(assessment.profile.id, ProfileId::P3);
        assert_eq!(assessment.scores.get(ScoreIndex::Secrecy), 62);
        assert!(transcript.contains("[Secrecy] 4/4 (75%)"));
    }

    #[test]
    fn invalid_input_reprompts_without_moving() {
        let mut session = session();
        let (_, transcript) = drive(&mut session, "7\n:jump 9\n");

        assert!(transcript.contains("'7' does not match any option"));
        assert!(transcript.contains("no section 9; choose 1-2"));
        assert_eq!(session.position(), (0, 0));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn navigation_commands_move_the_cursor() {
        let mut session = session();
        let (outcome, transcript) = drive(&mut session, ":jump 2\n\n:back\n:back\n:sections\n:quit\n");

        assert!(matches!(outcome, SessionOutcome::Quit));
        assert_eq!(session.position(), (0, 1));
        assert!(session.answers().contains("Q320"));
        assert_eq!(session.answers().answered_count(), 0);
        assert!(transcript.contains(" 2. Secrecy (2 questions)"));
    }

    #[test]
    fn scale_out_of_range_is_rejected_and_restart_clears() {
        let mut session = session();
        let (_, transcript) = drive(&mut session, ":jump 2\noften\n11\n:restart\n");

        assert!(transcript.contains("11 is outside 0..=10"));
        assert!(transcript.contains("Answers cleared."));
        assert_eq!(session.position(), (0, 0));
        assert!(session.answers().is_empty());
    }
}
