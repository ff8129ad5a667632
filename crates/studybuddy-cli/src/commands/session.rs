use clap::Subcommand;
use studybuddy_core::Database;

use super::{print_json, short_id, CliResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// List completed sessions, oldest first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Session totals
    Stats {
        /// Only count sessions completed today (UTC)
        #[arg(long)]
        today: bool,
    },
}

pub fn run(action: SessionAction) -> CliResult {
    let db = Database::open()?;

    match action {
        SessionAction::List { json } => {
            let sessions = db.sessions()?;
            if json {
                print_json(&sessions)?;
            } else if sessions.is_empty() {
                println!("No study sessions yet. Start your first session!");
            } else {
                for s in &sessions {
                    println!(
                        "{}  {} session - {} minutes  {}",
                        short_id(&s.id),
                        s.session_type,
                        s.duration_minutes,
                        s.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
        SessionAction::Stats { today } => {
            let stats = if today { db.stats_today()? } else { db.stats_all()? };
            print_json(&stats)?;
        }
    }
    Ok(())
}
