use clap::Subcommand;
use restorae_core::presets;

#[derive(Subcommand)]
pub enum PresetAction {
    /// List available SOS presets
    List,
    /// Show a preset's phases
    Show {
        /// Preset id (e.g. "panic-attack")
        id: String,
    },
}

pub fn run(action: PresetAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PresetAction::List => {
            let summaries: Vec<_> = presets::sos_presets()
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "id": p.id,
                        "name": p.name,
                        "phases": p.phases.len(),
                        "duration_secs": p.total_duration_secs(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        PresetAction::Show { id } => match presets::find_preset(&id) {
            Some(preset) => println!("{}", serde_json::to_string_pretty(&preset)?),
            None => {
                eprintln!("unknown preset: {id}");
                std::process::exit(1);
            }
        },
    }
    Ok(())
}
