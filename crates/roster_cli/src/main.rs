//! CLI entry point for the roster record manager.
//!
//! # Responsibility
//! - Map the four record commands (add/update/remove/list) onto core
//!   service calls.
//! - Validate raw user input before any store access.
//! - Render every outcome as one status line; never panic at the boundary.

use clap::{Parser, Subcommand};
use roster_core::db::open_db;
use roster_core::{
    default_log_level, init_logging, Person, PersonService, RepoError, SqlitePersonRepository,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "roster", version, about = "Local person record manager")]
struct Cli {
    /// Database file path
    #[arg(long, global = true, default_value = "pessoas.sqlite3")]
    db: PathBuf,

    /// Directory for rolling log files (logging stays off when absent)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new person; fails when the name already exists
    Add { name: String, age: String },

    /// Overwrite the age of an existing person
    Update { name: String, age: String },

    /// Remove a person by name
    Remove { name: String },

    /// List all registered persons
    List {
        /// Render records as JSON instead of text lines
        #[arg(long)]
        json: bool,
    },
}

/// Command with validated inputs, ready for dispatch.
#[derive(Debug)]
enum Action {
    Add { name: String, age: u32 },
    Update { name: String, age: u32 },
    Remove { name: String },
    List { json: bool },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, String> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or_else(|| default_log_level());
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| "log directory must be valid UTF-8".to_string())?;
        init_logging(level, log_dir)?;
    }

    // Input validation happens before the database is touched.
    let action = validate_command(cli.command)?;

    let conn = open_db(&cli.db).map_err(|err| format!("failed to open database: {err}"))?;
    let repo = SqlitePersonRepository::try_new(&conn)
        .map_err(|err| format!("failed to open record store: {err}"))?;
    let service = PersonService::new(repo);

    dispatch(&service, action)
}

fn validate_command(command: Commands) -> Result<Action, String> {
    match command {
        Commands::Add { name, age } => Ok(Action::Add {
            name: required_name(&name)?,
            age: parse_age(&age)?,
        }),
        Commands::Update { name, age } => Ok(Action::Update {
            name: required_name(&name)?,
            age: parse_age(&age)?,
        }),
        Commands::Remove { name } => Ok(Action::Remove {
            name: required_name(&name)?,
        }),
        Commands::List { json } => Ok(Action::List { json }),
    }
}

fn dispatch<R: roster_core::PersonRepository>(
    service: &PersonService<R>,
    action: Action,
) -> Result<String, String> {
    match action {
        Action::Add { name, age } => match service.add_person(name, age) {
            Ok(person) => Ok(format!("Person added: {}, age {}", person.name, person.age)),
            Err(RepoError::Conflict(name)) => {
                Err(format!("Person \"{name}\" already exists; use update."))
            }
            Err(err) => Err(format!("failed to add person: {err}")),
        },
        Action::Update { name, age } => match service.update_person(name, age) {
            Ok(person) => Ok(format!(
                "Person updated: {}, age {}",
                person.name, person.age
            )),
            Err(RepoError::NotFound(name)) => {
                Err(format!("Person \"{name}\" does not exist; use add."))
            }
            Err(err) => Err(format!("failed to update person: {err}")),
        },
        Action::Remove { name } => match service.remove_person(&name) {
            Ok(()) => Ok(format!("Person \"{name}\" removed.")),
            Err(RepoError::NotFound(_)) => Err(format!("No person found with name \"{name}\".")),
            Err(err) => Err(format!("failed to remove person: {err}")),
        },
        Action::List { json } => {
            let persons = service
                .list_persons()
                .map_err(|err| format!("failed to list persons: {err}"))?;
            if json {
                serde_json::to_string_pretty(&persons)
                    .map_err(|err| format!("failed to render JSON: {err}"))
            } else if persons.is_empty() {
                Ok("No data in the database.".to_string())
            } else {
                Ok(render_list(&persons))
            }
        }
    }
}

fn required_name(raw: &str) -> Result<String, String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err("Please insert a name.".to_string());
    }
    Ok(name.to_string())
}

fn parse_age(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(age) if age > 0 => Ok(age),
        _ => Err("Please insert a valid age.".to_string()),
    }
}

fn render_list(persons: &[Person]) -> String {
    let mut out = String::from("Registered persons:");
    for person in persons {
        out.push_str(&format!("\nName: {}, Age: {}", person.name, person.age));
    }
    out
}
