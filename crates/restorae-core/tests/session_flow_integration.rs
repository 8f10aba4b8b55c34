//! End-to-end session flow tests.
//!
//! Runs whole presets and rituals through the public API, the way the CLI
//! and a GUI shell drive the core.

use restorae_core::adapter::{ritual_from_program_day, sequence_from_preset};
use restorae_core::{
    ActivityKind, ActivityPayload, Event, ProgramDay, SessionController, SessionError,
    SessionState,
};

#[test]
fn panic_attack_preset_runs_to_completion() {
    let preset = restorae_core::presets::find_preset("panic-attack").unwrap();
    let sequence = sequence_from_preset(&preset).unwrap();
    let total_secs = sequence.total_duration_secs();

    let mut ctrl = SessionController::new(sequence);
    let started = ctrl.start().unwrap();
    assert!(matches!(started, Some(Event::SessionStarted { .. })));

    let mut phase_completions = 0;
    let mut last_percent = 0.0;
    let mut completed = None;
    for _ in 0..total_secs {
        if let Some(event) = ctrl.tick() {
            match event {
                Event::PhaseCompleted { .. } => phase_completions += 1,
                Event::SessionCompleted { .. } => {
                    completed = Some(event);
                    break;
                }
                other => panic!("unexpected event while ticking: {other:?}"),
            }
        }
        let percent = ctrl.progress().percent_complete;
        assert!(percent >= last_percent, "percent went backwards");
        last_percent = percent;
    }

    assert_eq!(phase_completions, preset.phases.len() - 1);
    match completed {
        Some(Event::SessionCompleted {
            sequence_id,
            duration_actual_secs,
            ..
        }) => {
            assert_eq!(sequence_id, "panic-attack");
            assert_eq!(duration_actual_secs, total_secs);
        }
        other => panic!("expected SessionCompleted, got {other:?}"),
    }
    assert_eq!(ctrl.state(), SessionState::Complete);
    assert_eq!(ctrl.progress().percent_complete, 100.0);
    assert!(matches!(
        ctrl.advance(),
        Err(SessionError::AlreadyComplete)
    ));
}

#[test]
fn pause_mid_phase_then_resume_and_jump_back() {
    let preset = restorae_core::presets::find_preset("anxiety-spiral").unwrap();
    let mut ctrl = SessionController::new(sequence_from_preset(&preset).unwrap());
    ctrl.start().unwrap();

    for _ in 0..10 {
        ctrl.tick();
    }
    let before_pause = ctrl.remaining_secs();
    ctrl.pause().unwrap();
    assert_eq!(ctrl.state(), SessionState::Paused);
    assert!(ctrl.tick().is_none());
    ctrl.resume().unwrap();
    assert_eq!(ctrl.remaining_secs(), before_pause);

    ctrl.advance().unwrap();
    assert_eq!(ctrl.cursor(), 1);
    ctrl.jump_to(0).unwrap();
    assert_eq!(ctrl.cursor(), 0);
    // Timer reloads the full phase duration on a jump.
    assert_eq!(ctrl.remaining_secs(), preset.phases[0].duration_secs);
}

#[test]
fn authored_ritual_plays_with_resolved_content() {
    let json = r#"{
        "title": "Day 3: Slow Morning",
        "activities": [
            {
                "id": "wake-breath",
                "kind": "breathing",
                "title": "Wake Up Breathing",
                "duration_secs": 90,
                "pattern": "not-a-known-pattern"
            },
            {
                "id": "senses",
                "kind": "grounding",
                "title": "Five Senses",
                "duration_secs": 60,
                "technique": "five-senses"
            },
            {
                "id": "pages",
                "kind": "journal",
                "title": "Morning Pages",
                "duration_secs": 120,
                "prompt": "What would make today feel gentle?"
            }
        ]
    }"#;
    let day: ProgramDay = serde_json::from_str(json).unwrap();
    let ritual = ritual_from_program_day(&day).unwrap();
    assert_eq!(ritual.title(), "Day 3: Slow Morning");

    // Unknown pattern reference degrades to the 4-4-4-4 default.
    match &ritual.activities()[0].payload {
        ActivityPayload::Breathing { pattern } => {
            assert_eq!(pattern.inhale_secs, 4);
            assert_eq!(pattern.cycles, 4);
        }
        other => panic!("expected breathing payload, got {other:?}"),
    }
    match &ritual.activities()[1].payload {
        ActivityPayload::Grounding { steps } => assert_eq!(steps.len(), 5),
        other => panic!("expected grounding payload, got {other:?}"),
    }

    let mut ctrl = SessionController::new(ritual);
    ctrl.start().unwrap();
    assert_eq!(ctrl.current_activity().unwrap().kind, ActivityKind::Breathing);

    // Skip through the whole ritual manually.
    ctrl.advance().unwrap();
    ctrl.advance().unwrap();
    let last = ctrl.advance().unwrap();
    assert!(matches!(last, Event::SessionCompleted { .. }));
}

#[test]
fn reset_after_completion_replays_the_preset() {
    let preset = restorae_core::presets::find_preset("overwhelm").unwrap();
    let mut ctrl = SessionController::new(sequence_from_preset(&preset).unwrap());
    ctrl.start().unwrap();
    for _ in 0..preset.phases.len() {
        ctrl.advance().unwrap();
    }
    assert!(ctrl.is_complete());

    ctrl.reset();
    assert_eq!(ctrl.state(), SessionState::Running);
    assert_eq!(ctrl.cursor(), 0);
    assert_eq!(ctrl.remaining_secs(), preset.phases[0].duration_secs);
    assert_eq!(ctrl.progress().percent_complete, 0.0);
}
