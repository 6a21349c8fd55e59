use crate::answers::AnswerSet;
use crate::scoring::{Assessment, Profile, ScoreSet};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const DEFAULT_EXPORT_FILE: &str = "assessment_results.json";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode export JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode score CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One-shot export of a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub profile: &'static Profile,
    pub scores: ScoreSet,
    pub answers: AnswerSet,
}

impl ExportDocument {
    pub fn new(assessment: &Assessment, answers: AnswerSet) -> Self {
        Self::at(Utc::now(), assessment, answers)
    }

    pub fn at(timestamp: DateTime<Utc>, assessment: &Assessment, answers: AnswerSet) -> Self {
        Self {
            timestamp,
            profile: assessment.profile,
            scores: assessment.scores,
            answers,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_pretty()?)?;
        info!(path = %path.display(), profile = self.profile.id.as_str(), "assessment exported");
        Ok(())
    }
}

fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    metric: &'a str,
    value: String,
}

/// Writes `metric,value` rows: one per score index, then `risk` and `profile`.
pub fn write_csv_summary<W: Write>(assessment: &Assessment, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for (index, value) in assessment.scores.iter() {
        csv_writer.serialize(SummaryRow {
            metric: index.key(),
            value: value.to_string(),
        })?;
    }
    csv_writer.serialize(SummaryRow {
        metric: "risk",
        value: format!("{:.2}", assessment.risk),
    })?;
    csv_writer.serialize(SummaryRow {
        metric: "profile",
        value: assessment.profile.id.as_str().to_string(),
    })?;

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerValue;
    use crate::scoring::score;
    use chrono::TimeZone;

    #[test]
    fn export_document_carries_all_four_fields() {
        let mut answers = AnswerSet::new();
        answers.insert("Q212", AnswerValue::choice("often"));
        answers.mark_unanswered("Q213");
        let assessment = score(&answers);
        let timestamp = Utc
            .with_ymd_and_hms(2025, 9, 24, 10, 0, 0)
            .single()
            .expect("valid timestamp");

        let document = ExportDocument::at(timestamp, &assessment, answers);
        let value: serde_json::Value =
            serde_json::from_str(&document.to_json_pretty().expect("encode")).expect("json");

        assert_eq!(value["timestamp"], "2025-09-24T10:00:00.000Z");
        assert_eq!(value["profile"]["id"], "P2");
        assert_eq!(value["scores"]["CONSENT"], 40);
        assert_eq!(value["answers"]["Q212"], "often");
        assert!(value["answers"]["Q213"].is_null());
        assert!(value.get("components").is_none());
    }

    #[test]
    fn csv_summary_lists_scores_then_risk_and_profile() {
        let assessment = score(&AnswerSet::new());
        let mut buffer = Vec::new();

        write_csv_summary(&assessment, &mut buffer).expect("csv written");
        let text = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "metric,value");
        assert_eq!(lines[1], "CONSENT,50");
        assert_eq!(lines[8], "risk,50.00");
        assert_eq!(lines[9], "profile,P2");
    }
}
