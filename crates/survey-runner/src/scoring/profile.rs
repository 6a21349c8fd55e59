use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileId {
    P1,
    P2,
    P3,
    P4,
}

impl ProfileId {
    pub const fn ordered() -> [Self; 4] {
        [Self::P1, Self::P2, Self::P3, Self::P4]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
        }
    }

    pub const fn profile(self) -> &'static Profile {
        match self {
            Self::P1 => &STABLE,
            Self::P2 => &NEEDS_STRUCTURE,
            Self::P3 => &HIGH_DRIFT,
            Self::P4 => &HIGH_RISK,
        }
    }
}

/// Fixed narrative outcome selected by the composite risk value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub title: &'static str,
    pub summary: &'static str,
    pub next_steps: &'static [&'static str],
}

static STABLE: Profile = Profile {
    id: ProfileId::P1,
    title: "Stable / High-clarity dynamic",
    summary: "Your answers point to generally solid consent integrity, manageable secrecy load, and relatively stable after-effects.",
    next_steps: &[
        "Codify boundaries (including stop-words) and review them monthly.",
        "Keep debriefs consistent (pick 'full truth' or a defined 'curated truth' rule—don’t freestyle).",
        "If you want more intensity, increase structure first (not spontaneity).",
    ],
};

static NEEDS_STRUCTURE: Profile = Profile {
    id: ProfileId::P2,
    title: "Works, but needs structure",
    summary: "You’re getting value from the dynamic, but volatility risk rises when logistics, debrief style, or reassurance pressure is inconsistent.",
    next_steps: &[
        "Define post-encounter rules (reclaim expectations, timing, and whether it’s optional).",
        "Reduce ambiguity: one agreed debrief format and one safety checklist.",
        "Track 'avoidance' moments—name the real reason within 24 hours.",
    ],
};

static HIGH_DRIFT: Profile = Profile {
    id: ProfileId::P3,
    title: "High drift / Curated-truth risk",
    summary: "Your answers suggest elevated secrecy/softening, increasing the chance of jealousy spirals, resentment, or long-run instability.",
    next_steps: &[
        "Stop relying on 'cover reasons' (stress/tired) as the default—replace with a neutral truth script.",
        "Move to slower escalation: add rules before adding intensity.",
        "Consider a short 'truth boundary' agreement: what must be shared vs what stays private.",
    ],
};

static HIGH_RISK: Profile = Profile {
    id: ProfileId::P4,
    title: "High risk flags (consent / pressure / attachment)",
    summary: "Multiple signals suggest the dynamic may be crossing into pressure, coercion, or destabilizing attachment/avoidance patterns.",
    next_steps: &[
        "Pause escalation. Rebuild consent integrity first (explicit opt-outs, no consequences for 'no').",
        "If MM involvement or humiliation is present, re-check that it’s clearly consensual—not leverage.",
        "If anyone feels unsafe, stop and seek qualified help.",
    ],
};

/// Upper bounds (exclusive) of the P1, P2, and P3 risk bands; anything above is P4.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileThresholds {
    pub stable_below: f64,
    pub needs_structure_below: f64,
    pub high_drift_below: f64,
}

impl Default for ProfileThresholds {
    fn default() -> Self {
        Self {
            stable_below: 35.0,
            needs_structure_below: 55.0,
            high_drift_below: 70.0,
        }
    }
}

impl ProfileThresholds {
    pub fn select(&self, risk: f64) -> ProfileId {
        if risk < self.stable_below {
            ProfileId::P1
        } else if risk < self.needs_structure_below {
            ProfileId::P2
        } else if risk < self.high_drift_below {
            ProfileId::P3
        } else {
            ProfileId::P4
        }
    }
}
