use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BASELINE_SCORE: i32 = 50;
pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// The seven indices produced by a scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreIndex {
    Consent,
    Secrecy,
    SelfJustify,
    SexDetailIntensity,
    ReclaimBonding,
    Avoidance,
    AttachRisk,
}

impl ScoreIndex {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Consent,
            Self::Secrecy,
            Self::SelfJustify,
            Self::SexDetailIntensity,
            Self::ReclaimBonding,
            Self::Avoidance,
            Self::AttachRisk,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Consent => "CONSENT",
            Self::Secrecy => "SECRECY",
            Self::SelfJustify => "SELF_JUSTIFY",
            Self::SexDetailIntensity => "SEX_DETAIL_INTENSITY",
            Self::ReclaimBonding => "RECLAIM_BONDING",
            Self::Avoidance => "AVOIDANCE",
            Self::AttachRisk => "ATTACH_RISK",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ScoreIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Score per index. Values may drift outside `[0, 100]` while rules are applied and are
/// bounded by [`ScoreSet::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSet {
    values: [i32; 7],
}

impl Default for ScoreSet {
    fn default() -> Self {
        Self::baseline()
    }
}

impl ScoreSet {
    pub const fn baseline() -> Self {
        Self {
            values: [BASELINE_SCORE; 7],
        }
    }

    pub const fn get(&self, index: ScoreIndex) -> i32 {
        self.values[index.slot()]
    }

    pub fn set(&mut self, index: ScoreIndex, value: i32) {
        self.values[index.slot()] = value;
    }

    pub fn add(&mut self, index: ScoreIndex, delta: i32) {
        self.values[index.slot()] += delta;
    }

    pub fn clamped(mut self) -> Self {
        for value in &mut self.values {
            *value = (*value).clamp(MIN_SCORE, MAX_SCORE);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoreIndex, i32)> + '_ {
        ScoreIndex::ordered()
            .into_iter()
            .map(|index| (index, self.get(index)))
    }
}

impl Serialize for ScoreSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (index, value) in self.iter() {
            map.serialize_entry(index.key(), &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_each_index_independently() {
        let mut scores = ScoreSet::baseline();
        scores.add(ScoreIndex::Consent, -80);
        scores.add(ScoreIndex::Secrecy, 75);

        let clamped = scores.clamped();
        assert_eq!(clamped.get(ScoreIndex::Consent), 0);
        assert_eq!(clamped.get(ScoreIndex::Secrecy), 100);
        assert_eq!(clamped.get(ScoreIndex::Avoidance), 50);
    }

    #[test]
    fn serializes_in_fixed_key_order() {
        let json = serde_json::to_string(&ScoreSet::baseline()).expect("serialize");
        assert_eq!(
            json,
            "{\"CONSENT\":50,\"SECRECY\":50,\"SELF_JUSTIFY\":50,\"SEX_DETAIL_INTENSITY\":50,\
\"RECLAIM_BONDING\":50,\"AVOIDANCE\":50,\"ATTACH_RISK\":50}"
        );
    }
}
