//! Task list commands for CLI.

use clap::Subcommand;
use studybuddy_core::{Config, Database, Notification, TaskList};

use super::{print_json, short_id, toast, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the end of the list
    Add {
        /// Task text
        text: String,
    },
    /// List tasks
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task done, or not done again
    Toggle {
        /// Task ID or unique ID prefix
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID or unique ID prefix
        id: String,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    let config = Config::load()?;
    let mut db = Database::open()?;
    let mut tasks = TaskList::load(&db);

    match action {
        TaskAction::Add { text } => {
            let task = tasks.add(&text)?;
            println!("{}", task.id);
            tasks.save(&mut db)?;
            toast(&config, Notification::task_added());
        }
        TaskAction::List { json } => {
            if json {
                print_json(tasks.list())?;
            } else if tasks.is_empty() {
                println!("No tasks yet. Add your first task with `studybuddy task add`.");
            } else {
                for task in tasks.list() {
                    let mark = if task.completed { "x" } else { " " };
                    println!("[{mark}] {}  {}", short_id(&task.id), task.text);
                }
            }
        }
        TaskAction::Toggle { id } => {
            let task = tasks.toggle(&id)?;
            print_json(task)?;
            tasks.save(&mut db)?;
        }
        TaskAction::Delete { id } => {
            let task = tasks.delete(&id)?;
            println!("{}", task.id);
            tasks.save(&mut db)?;
            toast(&config, Notification::task_deleted());
        }
    }
    Ok(())
}
