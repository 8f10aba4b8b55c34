use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Breathing,
    Grounding,
    Reset,
    Focus,
    Journal,
    Other,
}

/// Presentation hint for the hosting UI. Has no effect on playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Calm,
    Soothe,
    Energize,
    #[default]
    Neutral,
}

/// Paced breathing parameters, all in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPattern {
    pub inhale_secs: u64,
    pub hold_in_secs: u64,
    pub exhale_secs: u64,
    pub hold_out_secs: u64,
    pub cycles: u32,
}

impl BreathingPattern {
    /// Duration of one full breath cycle.
    pub fn cycle_secs(&self) -> u64 {
        self.inhale_secs + self.hold_in_secs + self.exhale_secs + self.hold_out_secs
    }

    /// Duration of the whole exercise.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn total_secs(&self) -> u64 {
        self.cycle_secs().saturating_mul(self.cycles as u64)
    }
}

/// The fallback when no authored pattern resolves: 4-4-4-4 box breathing,
/// four cycles.
impl Default for BreathingPattern {
    fn default() -> Self {
        Self {
            inhale_secs: 4,
            hold_in_secs: 4,
            exhale_secs: 4,
            hold_out_secs: 4,
            cycles: 4,
        }
    }
}

/// Kind-specific content carried by an activity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "content", rename_all = "lowercase")]
pub enum ActivityPayload {
    Breathing { pattern: BreathingPattern },
    Grounding { steps: Vec<String> },
    Journal { prompt: String },
    #[default]
    None,
}

/// One playable unit of a guided session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Duration in seconds.
    pub duration_secs: u64,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub payload: ActivityPayload,
}

/// Role a phase plays inside an SOS preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseRole {
    Interrupt,
    Ground,
    Reassure,
    NextStep,
}

/// One step of an SOS preset. Phases are ordered and exhaustive: a preset
/// is complete only after every phase has finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,
    pub role: PhaseRole,
    pub title: String,
    pub instruction: String,
    /// Duration in seconds.
    pub duration_secs: u64,
    #[serde(default)]
    pub breathing: Option<BreathingPattern>,
}
