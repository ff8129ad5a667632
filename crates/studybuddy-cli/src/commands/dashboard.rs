use studybuddy_core::{Dashboard, Database, NoteBook, TaskList};

use super::{print_json, CliResult};

pub fn run(json: bool) -> CliResult {
    let db = Database::open()?;
    let dashboard = Dashboard::build(&TaskList::load(&db), &NoteBook::load(&db), &db.sessions()?);

    if json {
        return print_json(&dashboard);
    }

    println!("Tasks:      {}/{} completed", dashboard.completed_tasks, dashboard.total_tasks);
    println!("Notes:      {}", dashboard.note_count);
    println!("Study time: {}m", dashboard.total_study_minutes);
    println!();
    println!("Recent activity:");
    if dashboard.recent_sessions.is_empty() {
        println!("  No study sessions yet. Start your first session!");
    }
    for s in &dashboard.recent_sessions {
        println!(
            "  {} session - {} minutes  {}",
            s.session_type,
            s.duration_minutes,
            s.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S")
        );
    }
    Ok(())
}
