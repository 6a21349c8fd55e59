mod config;
mod profile;
mod rules;
mod scores;

pub use config::{CompositeWeights, ScoringConfig};
pub use profile::{Profile, ProfileId, ProfileThresholds};
pub use rules::Adjustment;
pub use scores::{ScoreIndex, ScoreSet, BASELINE_SCORE, MAX_SCORE, MIN_SCORE};

use crate::answers::AnswerSet;
use rules::RULES;
use serde::Serialize;
use tracing::debug;

/// Stateless scorer applying the rule table, then the composite profile bands.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores a completed answer set. Never fails: absent or unexpected answers only leave
    /// the affected indices at their prior value.
    pub fn score(&self, answers: &AnswerSet) -> Assessment {
        let (raw, components) = RULES.iter().fold(
            (ScoreSet::baseline(), Vec::new()),
            |(mut scores, mut components), rule| {
                if let Some(firing) = rule.evaluate(answers) {
                    firing.adjustment.apply(&mut scores, rule.target);
                    debug!(rule = rule.name, target = %rule.target, note = %firing.note, "rule fired");
                    components.push(ScoreComponent {
                        rule: rule.name,
                        index: rule.target,
                        questions: rule.questions(),
                        adjustment: firing.adjustment,
                        notes: firing.note,
                    });
                }
                (scores, components)
            },
        );

        let scores = raw.clamped();
        let risk = self.composite_risk(&scores);
        let profile = self.config.thresholds.select(risk).profile();

        Assessment {
            scores,
            profile,
            risk,
            components,
        }
    }

    /// Weighted combination of CONSENT (inverted), SECRECY, AVOIDANCE, and ATTACH_RISK.
    pub fn composite_risk(&self, scores: &ScoreSet) -> f64 {
        let weights = &self.config.weights;
        f64::from(MAX_SCORE - scores.get(ScoreIndex::Consent)) * weights.consent_gap
            + f64::from(scores.get(ScoreIndex::Secrecy)) * weights.secrecy
            + f64::from(scores.get(ScoreIndex::Avoidance)) * weights.avoidance
            + f64::from(scores.get(ScoreIndex::AttachRisk)) * weights.attach_risk
    }
}

/// Scores `answers` with the default configuration.
pub fn score(answers: &AnswerSet) -> Assessment {
    ScoringEngine::default().score(answers)
}

/// Question ids read by the rule table, in rule order without repeats.
pub fn scored_question_ids() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = Vec::new();
    for id in RULES.iter().flat_map(|rule| rule.questions()) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// One fired rule, kept so results can be audited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub rule: &'static str,
    pub index: ScoreIndex,
    pub questions: Vec<&'static str>,
    pub adjustment: Adjustment,
    pub notes: String,
}

/// Output of a scoring run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub scores: ScoreSet,
    pub profile: &'static Profile,
    pub risk: f64,
    pub components: Vec<ScoreComponent>,
}

impl Assessment {
    pub fn profile_id(&self) -> ProfileId {
        self.profile.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerValue;

    #[test]
    fn empty_answers_land_on_neutral_profile() {
        let assessment = score(&AnswerSet::new());

        assert_eq!(assessment.scores, ScoreSet::baseline());
        assert_eq!(assessment.risk, 50.0);
        assert_eq!(assessment.profile_id(), ProfileId::P2);
        assert!(assessment.components.is_empty());
    }

    #[test]
    fn custom_thresholds_change_the_band() {
        let engine = ScoringEngine::new(ScoringConfig {
            thresholds: ProfileThresholds {
                stable_below: 60.0,
                ..ProfileThresholds::default()
            },
            ..ScoringConfig::default()
        });

        assert_eq!(engine.score(&AnswerSet::new()).profile_id(), ProfileId::P1);
    }

    #[test]
    fn likert_replacement_precedes_increments() {
        let answers: AnswerSet = [
            ("Q391", AnswerValue::Scale(1)),
            ("Q403", AnswerValue::choice("definitely not")),
        ]
        .into_iter()
        .collect();

        let assessment = score(&answers);
        assert_eq!(assessment.scores.get(ScoreIndex::SelfJustify), 30);
        assert_eq!(assessment.components.len(), 2);
        assert_eq!(assessment.components[0].adjustment, Adjustment::Replace(20));
    }

    #[test]
    fn scored_question_ids_cover_the_rule_table() {
        let ids = scored_question_ids();
        assert_eq!(ids.first(), Some(&"Q212"));
        assert!(ids.contains(&"Q402"));
        assert!(ids.contains(&"Q435"));
        assert_eq!(ids.iter().filter(|id| **id == "Q312").count(), 1);
    }
}
