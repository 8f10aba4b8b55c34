//! Built-in SOS presets and the reference tables for breathing patterns and
//! grounding techniques.
//!
//! Preset content is static: an SOS preset is a fixed, ordered run of phases
//! that the adapter turns into a playable sequence.

use serde::{Deserialize, Serialize};

use crate::activity::{BreathingPattern, Phase, PhaseRole};

/// A pre-authored emergency sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SosPreset {
    pub id: String,
    pub name: String,
    pub phases: Vec<Phase>,
}

impl SosPreset {
    pub fn total_duration_secs(&self) -> u64 {
        self.phases.iter().map(|p| p.duration_secs).sum()
    }
}

/// Resolve a named breathing pattern.
pub fn breathing_pattern(id: &str) -> Option<BreathingPattern> {
    match id {
        "box-breathing" => Some(BreathingPattern {
            inhale_secs: 4,
            hold_in_secs: 4,
            exhale_secs: 4,
            hold_out_secs: 4,
            cycles: 4,
        }),
        "four-seven-eight" => Some(BreathingPattern {
            inhale_secs: 4,
            hold_in_secs: 7,
            exhale_secs: 8,
            hold_out_secs: 0,
            cycles: 4,
        }),
        "coherent-breathing" => Some(BreathingPattern {
            inhale_secs: 5,
            hold_in_secs: 0,
            exhale_secs: 5,
            hold_out_secs: 0,
            cycles: 6,
        }),
        _ => None,
    }
}

/// Resolve a named grounding technique to its step list.
pub fn grounding_steps(id: &str) -> Option<Vec<String>> {
    match id {
        "five-senses" => Some(vec![
            "Name 5 things you can see".into(),
            "Name 4 things you can touch".into(),
            "Name 3 things you can hear".into(),
            "Name 2 things you can smell".into(),
            "Name 1 thing you can taste".into(),
        ]),
        "body-scan" => Some(vec![
            "Notice the weight of your body where you sit".into(),
            "Relax your jaw and shoulders".into(),
            "Follow your attention down to your hands".into(),
            "Let your feet rest heavy on the floor".into(),
        ]),
        "cold-water" => Some(vec![
            "Run cold water over your wrists".into(),
            "Splash your face, or hold something cool".into(),
            "Notice the temperature pull you back".into(),
        ]),
        _ => None,
    }
}

/// The built-in SOS preset library.
pub fn sos_presets() -> Vec<SosPreset> {
    vec![panic_attack(), anxiety_spiral(), overwhelm()]
}

pub fn find_preset(id: &str) -> Option<SosPreset> {
    sos_presets().into_iter().find(|p| p.id == id)
}

fn panic_attack() -> SosPreset {
    SosPreset {
        id: "panic-attack".into(),
        name: "Panic Attack".into(),
        phases: vec![
            Phase {
                id: "interrupt".into(),
                role: PhaseRole::Interrupt,
                title: "Catch Your Breath".into(),
                instruction: "Breathe with the pattern. Long exhales tell your body the alarm is over.".into(),
                duration_secs: 30,
                breathing: breathing_pattern("four-seven-eight"),
            },
            Phase {
                id: "ground".into(),
                role: PhaseRole::Ground,
                title: "Come Back to the Room".into(),
                instruction: "Look around slowly. Name what you can see, touch, and hear.".into(),
                duration_secs: 45,
                breathing: None,
            },
            Phase {
                id: "reassure".into(),
                role: PhaseRole::Reassure,
                title: "This Will Pass".into(),
                instruction: "A panic wave peaks and falls on its own. You are safe while it does.".into(),
                duration_secs: 30,
                breathing: None,
            },
            Phase {
                id: "next-step".into(),
                role: PhaseRole::NextStep,
                title: "One Small Step".into(),
                instruction: "Pick one gentle thing to do next: water, fresh air, or a message to someone.".into(),
                duration_secs: 20,
                breathing: None,
            },
        ],
    }
}

fn anxiety_spiral() -> SosPreset {
    SosPreset {
        id: "anxiety-spiral".into(),
        name: "Anxiety Spiral".into(),
        phases: vec![
            Phase {
                id: "interrupt".into(),
                role: PhaseRole::Interrupt,
                title: "Slow Everything Down".into(),
                instruction: "Even breaths in and out. Count each side of the square.".into(),
                duration_secs: 60,
                breathing: breathing_pattern("box-breathing"),
            },
            Phase {
                id: "ground".into(),
                role: PhaseRole::Ground,
                title: "Five Senses".into(),
                instruction: "Work through your senses, one at a time, without rushing.".into(),
                duration_secs: 60,
                breathing: None,
            },
            Phase {
                id: "reassure".into(),
                role: PhaseRole::Reassure,
                title: "Thoughts Are Not Facts".into(),
                instruction: "Notice the spiral as a loop of thoughts, not a prediction.".into(),
                duration_secs: 30,
                breathing: None,
            },
            Phase {
                id: "next-step".into(),
                role: PhaseRole::NextStep,
                title: "Park It".into(),
                instruction: "Write the worry down to deal with later, then set it aside.".into(),
                duration_secs: 30,
                breathing: None,
            },
        ],
    }
}

fn overwhelm() -> SosPreset {
    SosPreset {
        id: "overwhelm".into(),
        name: "Overwhelm".into(),
        phases: vec![
            Phase {
                id: "interrupt".into(),
                role: PhaseRole::Interrupt,
                title: "Step Away".into(),
                instruction: "Put everything down. Nothing needs you for the next two minutes.".into(),
                duration_secs: 20,
                breathing: None,
            },
            Phase {
                id: "ground".into(),
                role: PhaseRole::Ground,
                title: "Settle Your Body".into(),
                instruction: "Drop your shoulders, unclench your jaw, feel your feet.".into(),
                duration_secs: 40,
                breathing: breathing_pattern("coherent-breathing"),
            },
            Phase {
                id: "next-step".into(),
                role: PhaseRole::NextStep,
                title: "Just One Thing".into(),
                instruction: "Choose the single smallest next task. The rest can wait.".into(),
                duration_secs: 30,
                breathing: None,
            },
        ],
    }
}
