use clap::Subcommand;
use restorae_core::storage::Database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Session counts and practice time, today and all-time
    Show,
    /// Recently completed sessions
    History {
        /// Maximum number of sessions to list
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        StatsAction::Show => {
            let stats = db.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::History { limit } => {
            let records = db.recent_sessions(limit)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}
