use super::scores::{ScoreIndex, ScoreSet, MAX_SCORE, MIN_SCORE};
use crate::answers::AnswerSet;
use serde::Serialize;
use super::scores::ScoreIndex::{
    AttachRisk, Avoidance, Consent, ReclaimBonding, Secrecy, SelfJustify, SexDetailIntensity,
};

const CONSENT_FLAGS: &[&str] = &[
    "often",
    "always",
    "yes",
    "felt pressured",
    "not consensual",
    "no",
    "not really",
    "mixed",
];
const SECRECY_FLAGS: &[&str] = &["often", "always", "vague", "avoid"];
const FULL_TRUTH: &[&str] = &["full truth"];
const INTENSITY_HIGH: &[&str] = &["essential", "central", "strong"];
const INTENSITY_LOW: &[&str] = &["not at all", "not important"];
const BONDING: &[&str] = &["bonding", "connection"];
const OBLIGATION: &[&str] = &["duty", "prevent", "manage"];
const CLOSER: &[&str] = &["closer", "aroused"];
const DISTANT: &[&str] = &["disconnected", "irritated", "guilty"];
const AVOIDANT: &[&str] = &["often", "almost always", "always"];
const NEVER: &[&str] = &["never"];
const ATTACHED: &[&str] = &["attached"];
const ATTACH_STRONG: &[&str] = &["strongly", "yes"];
const NOT_AT_ALL: &[&str] = &["not at all"];
const COUNTERFACTUAL: &[&str] = &["definitely not"];
const MORE_COVER: &[&str] = &["more", "much more"];

const SELF_JUSTIFY_LIKERTS: &[&str] = &["Q391", "Q392", "Q394", "Q395", "Q398", "Q402"];
const LIE_PAIR: &[&str] = &["Q434", "Q435"];

/// How a fired rule changes its target score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Adjustment {
    Delta(i32),
    Replace(i32),
}

impl Adjustment {
    pub(crate) fn apply(self, scores: &mut ScoreSet, index: ScoreIndex) {
        match self {
            Adjustment::Delta(delta) => scores.add(index, delta),
            Adjustment::Replace(value) => scores.set(index, value),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Trigger {
    /// Case-insensitive substring match; the first phrase found wins.
    Contains(&'static [&'static str]),
    AtLeast(i64),
    AtMost(i64),
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum RuleKind {
    Answer {
        question: &'static str,
        trigger: Trigger,
        delta: i32,
    },
    /// Every listed answer is numeric and at least `minimum`.
    AllAtLeast {
        questions: &'static [&'static str],
        minimum: i64,
        delta: i32,
    },
    /// Replaces the target with the 1-5 average of the numeric answers, rescaled to 0-100.
    LikertAverage { questions: &'static [&'static str] },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Rule {
    pub name: &'static str,
    pub target: ScoreIndex,
    pub kind: RuleKind,
}

pub(crate) struct Firing {
    pub adjustment: Adjustment,
    pub note: String,
}

const fn phrase(
    name: &'static str,
    question: &'static str,
    target: ScoreIndex,
    phrases: &'static [&'static str],
    delta: i32,
) -> Rule {
    Rule {
        name,
        target,
        kind: RuleKind::Answer {
            question,
            trigger: Trigger::Contains(phrases),
            delta,
        },
    }
}

const fn threshold(
    name: &'static str,
    question: &'static str,
    target: ScoreIndex,
    trigger: Trigger,
    delta: i32,
) -> Rule {
    Rule {
        name,
        target,
        kind: RuleKind::Answer {
            question,
            trigger,
            delta,
        },
    }
}

/// Ordered rule table. Only the Likert average depends on position: it must run before the
/// other SELF_JUSTIFY rules, which increment the replaced value.
pub(crate) static RULES: &[Rule] = &[
    phrase("leverage_used", "Q212", Consent, CONSENT_FLAGS, -10),
    phrase("pressure_felt", "Q213", Consent, CONSENT_FLAGS, -10),
    phrase("consent_felt", "Q223", Consent, CONSENT_FLAGS, -12),
    phrase("reclaim_pressure", "Q334", Consent, CONSENT_FLAGS, -8),
    phrase("framed_optional", "Q207", Consent, CONSENT_FLAGS, -6),
    phrase("free_to_decline", "Q238", Consent, CONSENT_FLAGS, -10),
    phrase("vague_details", "Q312", Secrecy, SECRECY_FLAGS, 8),
    phrase("vague_details_full_truth", "Q312", Secrecy, FULL_TRUTH, -8),
    phrase("debrief_style", "Q316", Secrecy, SECRECY_FLAGS, 10),
    phrase("debrief_style_full_truth", "Q316", Secrecy, FULL_TRUTH, -10),
    phrase("withheld_details", "Q320", Secrecy, SECRECY_FLAGS, 12),
    phrase("withheld_details_full_truth", "Q320", Secrecy, FULL_TRUTH, -12),
    phrase("unexpected_events", "Q360", Secrecy, SECRECY_FLAGS, 6),
    phrase("unexpected_events_full_truth", "Q360", Secrecy, FULL_TRUTH, -6),
    Rule {
        name: "self_justification_average",
        target: SelfJustify,
        kind: RuleKind::LikertAverage {
            questions: SELF_JUSTIFY_LIKERTS,
        },
    },
    phrase("counterfactual", "Q403", SelfJustify, COUNTERFACTUAL, 10),
    phrase("cover_reason_trend", "Q404", SelfJustify, MORE_COVER, 8),
    Rule {
        name: "cover_story_pair",
        target: SelfJustify,
        kind: RuleKind::AllAtLeast {
            questions: LIE_PAIR,
            minimum: 4,
            delta: 10,
        },
    },
    phrase("attribute_importance", "Q296", SexDetailIntensity, INTENSITY_HIGH, 8),
    phrase("attribute_importance_low", "Q296", SexDetailIntensity, INTENSITY_LOW, -8),
    phrase("dominance_preference", "Q303", SexDetailIntensity, INTENSITY_HIGH, 8),
    phrase("dominance_preference_low", "Q303", SexDetailIntensity, INTENSITY_LOW, -8),
    phrase("media_influence", "Q304", SexDetailIntensity, INTENSITY_HIGH, 6),
    phrase("media_influence_low", "Q304", SexDetailIntensity, INTENSITY_LOW, -6),
    threshold("group_interest", "Q321", SexDetailIntensity, Trigger::AtLeast(7), 8),
    threshold("group_interest_low", "Q321", SexDetailIntensity, Trigger::AtMost(3), -6),
    phrase("reclaim_purpose", "Q330", ReclaimBonding, BONDING, 12),
    phrase("reclaim_purpose_obligation", "Q330", ReclaimBonding, OBLIGATION, -10),
    phrase("reclaim_feeling", "Q336", ReclaimBonding, CLOSER, 10),
    phrase("reclaim_feeling_distant", "Q336", ReclaimBonding, DISTANT, -10),
    phrase("avoid_problems", "Q344", Avoidance, AVOIDANT, 10),
    phrase("avoid_problems_never", "Q344", Avoidance, NEVER, -5),
    phrase("cover_reasons", "Q385", Avoidance, AVOIDANT, 12),
    phrase("cover_reasons_never", "Q385", Avoidance, NEVER, -6),
    phrase("postponed_check_ins", "Q364", Avoidance, AVOIDANT, 8),
    phrase("postponed_check_ins_never", "Q364", Avoidance, NEVER, -4),
    phrase("substitution", "Q346", Avoidance, AVOIDANT, 8),
    phrase("substitution_never", "Q346", Avoidance, NEVER, -4),
    phrase("outside_attachment", "Q233", AttachRisk, ATTACHED, 10),
    phrase("replacement_worry", "Q234", AttachRisk, ATTACH_STRONG, 10),
    phrase("replacement_worry_low", "Q234", AttachRisk, NOT_AT_ALL, -6),
];

impl Rule {
    pub(crate) fn questions(&self) -> Vec<&'static str> {
        match self.kind {
            RuleKind::Answer { question, .. } => vec![question],
            RuleKind::AllAtLeast { questions, .. } | RuleKind::LikertAverage { questions } => {
                questions.to_vec()
            }
        }
    }

    /// Returns the adjustment this rule makes for `answers`, if any. Missing or mismatched
    /// answers never fire.
    pub(crate) fn evaluate(&self, answers: &AnswerSet) -> Option<Firing> {
        match self.kind {
            RuleKind::Answer {
                question,
                trigger,
                delta,
            } => {
                let note = match trigger {
                    Trigger::Contains(phrases) => {
                        let text = answers.text(question)?;
                        let matched = first_match(&text, phrases)?;
                        format!("{question} mentions '{matched}'")
                    }
                    Trigger::AtLeast(minimum) => {
                        let value = answers.number(question).filter(|v| *v >= minimum)?;
                        format!("{question} = {value} (>= {minimum})")
                    }
                    Trigger::AtMost(maximum) => {
                        let value = answers.number(question).filter(|v| *v <= maximum)?;
                        format!("{question} = {value} (<= {maximum})")
                    }
                };
                Some(Firing {
                    adjustment: Adjustment::Delta(delta),
                    note,
                })
            }
            RuleKind::AllAtLeast {
                questions,
                minimum,
                delta,
            } => {
                let all_high = questions
                    .iter()
                    .map(|question| answers.number(question))
                    .all(|value| value.is_some_and(|v| v >= minimum));
                all_high.then(|| Firing {
                    adjustment: Adjustment::Delta(delta),
                    note: format!("{} all >= {minimum}", questions.join(", ")),
                })
            }
            RuleKind::LikertAverage { questions } => {
                let numeric: Vec<i64> = questions
                    .iter()
                    .filter_map(|question| answers.number(question))
                    .collect();
                if numeric.is_empty() {
                    return None;
                }

                let average =
                    numeric.iter().map(|value| *value as f64).sum::<f64>() / numeric.len() as f64;
                let scaled = round_half_up(20.0 + (average - 1.0) * 20.0)
                    .clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE));
                Some(Firing {
                    adjustment: Adjustment::Replace(scaled as i32),
                    note: format!(
                        "average {average:.2} across {} of {} answers",
                        numeric.len(),
                        questions.len()
                    ),
                })
            }
        }
    }
}

fn first_match(text: &str, phrases: &'static [&'static str]) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    phrases
        .iter()
        .copied()
        .find(|candidate| lowered.contains(candidate))
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
