use std::io::{self, Write};
use survey_runner::answers::AnswerValue;
use survey_runner::catalog::JumpEntry;
use survey_runner::scoring::Assessment;

pub(crate) fn render_assessment<W: Write>(assessment: &Assessment, output: &mut W) -> io::Result<()> {
    let profile = assessment.profile;

    writeln!(output, "\nResult: {} ({})", profile.title, profile.id.as_str())?;
    writeln!(output, "{}", profile.summary)?;

    writeln!(output, "\nScores")?;
    for (index, value) in assessment.scores.iter() {
        writeln!(output, "- {:<22} {:>3}", index.key(), value)?;
    }
    writeln!(output, "- {:<22} {:>6.2}", "composite risk", assessment.risk)?;

    writeln!(output, "\nNext steps")?;
    for step in profile.next_steps {
        writeln!(output, "- {step}")?;
    }
    Ok(())
}

pub(crate) fn render_jump_list<W: Write>(entries: &[JumpEntry], output: &mut W) -> io::Result<()> {
    for entry in entries {
        writeln!(
            output,
            "{:>2}. {} ({} questions)",
            entry.index + 1,
            entry.title,
            entry.question_count
        )?;
    }
    Ok(())
}

/// Short single-line rendering of a stored answer.
pub(crate) fn describe_answer(value: &AnswerValue) -> String {
    match value {
        AnswerValue::Matrix(rows) => rows
            .iter()
            .map(|(row, selected)| format!("{row}={}", selected.as_deref().unwrap_or("-")))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.as_text().map(|text| text.into_owned()).unwrap_or_default(),
    }
}
