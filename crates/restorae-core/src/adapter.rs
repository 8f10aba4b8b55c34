//! Converts external content definitions -- SOS preset phases, program-day
//! activity definitions -- into the uniform [`Activity`] shape the session
//! controller consumes.
//!
//! Conversions never fail on missing reference data: an unknown breathing
//! pattern or grounding technique degrades to a sensible default, since the
//! content is user-facing guidance rather than safety-critical control.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::activity::{
    Activity, ActivityKind, ActivityPayload, BreathingPattern, Phase, PhaseRole, Tone,
};
use crate::error::SessionError;
use crate::presets::{self, SosPreset};
use crate::sequence::Sequence;

/// An activity as authored in program content, before resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDef {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub duration_secs: u64,
    #[serde(default)]
    pub tone: Tone,
    /// Named breathing pattern reference.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Embedded custom pattern, used when the named reference does not
    /// resolve.
    #[serde(default)]
    pub breathing: Option<BreathingPattern>,
    /// Named grounding technique reference.
    #[serde(default)]
    pub technique: Option<String>,
    #[serde(default)]
    pub steps: Option<Vec<String>>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// One day of a wellness program: the source material for a ritual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDay {
    pub title: String,
    pub activities: Vec<ActivityDef>,
}

/// Resolution order: named pattern, then the embedded custom pattern, then
/// the fixed 4-4-4-4 default.
pub fn resolve_breathing(
    pattern_ref: Option<&str>,
    embedded: Option<BreathingPattern>,
) -> BreathingPattern {
    pattern_ref
        .and_then(presets::breathing_pattern)
        .or(embedded)
        .unwrap_or_default()
}

/// Resolution order: named technique, then the provided step list, then a
/// single step carrying the activity's own description.
pub fn resolve_grounding(
    technique_ref: Option<&str>,
    steps: Option<Vec<String>>,
    description: &str,
) -> Vec<String> {
    technique_ref
        .and_then(presets::grounding_steps)
        .or(steps)
        .unwrap_or_else(|| vec![description.to_string()])
}

pub fn activity_from_def(def: &ActivityDef) -> Activity {
    let payload = match def.kind {
        ActivityKind::Breathing => ActivityPayload::Breathing {
            pattern: resolve_breathing(def.pattern.as_deref(), def.breathing),
        },
        ActivityKind::Grounding => ActivityPayload::Grounding {
            steps: resolve_grounding(def.technique.as_deref(), def.steps.clone(), &def.description),
        },
        ActivityKind::Journal => ActivityPayload::Journal {
            prompt: def
                .prompt
                .clone()
                .unwrap_or_else(|| def.description.clone()),
        },
        _ => ActivityPayload::None,
    };
    Activity {
        id: def.id.clone(),
        kind: def.kind,
        title: def.title.clone(),
        description: def.description.clone(),
        duration_secs: def.duration_secs,
        tone: def.tone,
        payload,
    }
}

pub fn activity_from_phase(phase: &Phase) -> Activity {
    let tone = match phase.role {
        PhaseRole::Interrupt | PhaseRole::Ground => Tone::Calm,
        PhaseRole::Reassure => Tone::Soothe,
        PhaseRole::NextStep => Tone::Neutral,
    };
    // A phase with a breathing pattern plays as a breathing activity
    // whatever its role; otherwise the role picks the kind.
    let (kind, payload) = match (phase.breathing, phase.role) {
        (Some(pattern), _) => (
            ActivityKind::Breathing,
            ActivityPayload::Breathing { pattern },
        ),
        (None, PhaseRole::Ground) => (
            ActivityKind::Grounding,
            ActivityPayload::Grounding {
                steps: resolve_grounding(None, None, &phase.instruction),
            },
        ),
        (None, PhaseRole::Interrupt) => (ActivityKind::Reset, ActivityPayload::None),
        (None, PhaseRole::Reassure) => (ActivityKind::Focus, ActivityPayload::None),
        (None, PhaseRole::NextStep) => (ActivityKind::Other, ActivityPayload::None),
    };
    Activity {
        id: phase.id.clone(),
        kind,
        title: phase.title.clone(),
        description: phase.instruction.clone(),
        duration_secs: phase.duration_secs,
        tone,
        payload,
    }
}

/// Turn an SOS preset into a playable sequence.
pub fn sequence_from_preset(preset: &SosPreset) -> Result<Sequence, SessionError> {
    let activities = preset.phases.iter().map(activity_from_phase).collect();
    Sequence::new(preset.id.clone(), preset.name.clone(), activities)
}

/// Build a ritual -- a named sequence with a generated id -- from one day of
/// a wellness program.
pub fn ritual_from_program_day(day: &ProgramDay) -> Result<Sequence, SessionError> {
    let activities = day.activities.iter().map(activity_from_def).collect();
    Sequence::new(Uuid::new_v4().to_string(), day.title.clone(), activities)
}
