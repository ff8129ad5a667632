//! Note commands for CLI.

use clap::Subcommand;
use studybuddy_core::{Config, Database, NoteBook, Notification};

use super::{print_json, short_id, toast, CliResult};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Save a new note
    Add {
        /// Note title
        title: String,
        /// Note body
        content: String,
    },
    /// List notes
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change the title and/or content of a note
    Edit {
        /// Note ID or unique ID prefix
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New content
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
}

pub fn run(action: NoteAction) -> CliResult {
    let config = Config::load()?;
    let mut db = Database::open()?;
    let mut notes = NoteBook::load(&db);

    match action {
        NoteAction::Add { title, content } => {
            let note = notes.add(&title, &content)?;
            println!("{}", note.id);
            notes.save(&mut db)?;
            toast(&config, Notification::note_saved());
        }
        NoteAction::List { json } => {
            if json {
                print_json(notes.list())?;
            } else if notes.is_empty() {
                println!("No notes yet. Create your first note with `studybuddy note add`.");
            } else {
                for note in notes.list() {
                    println!(
                        "{}  {} ({})",
                        short_id(&note.id),
                        note.title,
                        note.created_at.format("%Y-%m-%d")
                    );
                    println!("    {}", note.content);
                }
            }
        }
        NoteAction::Edit { id, title, content } => {
            if title.is_none() && content.is_none() {
                return Err("nothing to change: pass --title and/or --content".into());
            }
            let note = notes.update(&id, title.as_deref(), content.as_deref())?;
            print_json(note)?;
            notes.save(&mut db)?;
            toast(&config, Notification::note_updated());
        }
        NoteAction::Delete { id } => {
            let note = notes.delete(&id)?;
            println!("{}", note.id);
            notes.save(&mut db)?;
            toast(&config, Notification::note_deleted());
        }
    }
    Ok(())
}
