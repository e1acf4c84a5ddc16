//! Command line parsing and dispatch.

use crate::models::Student;
use crate::output::{print_expansion, print_records, print_report};
use crate::processing::{classify, Expander};
use crate::registry::AddressRegistry;
use crate::store::MemoryStore;
use colored::Colorize;
use std::error::Error;
use uuid::Uuid;

pub const USAGE: &str = r#"usage: student-ip-registry <command> [args]
  classify <input>
  validate <input>
  expand <input>
  create <input> [description]
  update <id> [--address <input>] [--description <text>] [--active <true|false>]
  delete <id>
  list [--all]
  unassigned [--ipv4]
  search <term>
  assign <student_id> <id>...
  assign-random <student_id>
  add-student <student_id> <name> <surname>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Classify(String),
    Validate(String),
    Expand(String),
    Create {
        input: String,
        description: Option<String>,
    },
    Update {
        id: Uuid,
        input: Option<String>,
        description: Option<String>,
        is_active: Option<bool>,
    },
    Delete(Uuid),
    List {
        all: bool,
    },
    Unassigned {
        ipv4_only: bool,
    },
    Search(String),
    Assign {
        student_id: i32,
        ids: Vec<Uuid>,
    },
    AssignRandom(i32),
    AddStudent(Student),
}

impl Command {
    /// Whether the command changes the store.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Create { .. }
                | Command::Update { .. }
                | Command::Delete(_)
                | Command::Assign { .. }
                | Command::AssignRandom(_)
                | Command::AddStudent(_)
        )
    }
}

/// Parse arguments following the program name.
pub fn parse_args(args: &[String]) -> Result<Command, Box<dyn Error>> {
    let (name, rest) = args.split_first().ok_or(USAGE)?;
    log::trace!("parse_args name={name} rest={rest:?}");

    let command = match name.as_str() {
        "classify" => Command::Classify(required(rest, 0, "input")?),
        "validate" => Command::Validate(required(rest, 0, "input")?),
        "expand" => Command::Expand(required(rest, 0, "input")?),
        "create" => Command::Create {
            input: required(rest, 0, "input")?,
            description: rest.get(1).cloned(),
        },
        "update" => parse_update(rest)?,
        "delete" => Command::Delete(parse_id(&required(rest, 0, "id")?)?),
        "list" => Command::List {
            all: rest.iter().any(|a| a == "--all"),
        },
        "unassigned" => Command::Unassigned {
            ipv4_only: rest.iter().any(|a| a == "--ipv4"),
        },
        "search" => Command::Search(rest.first().cloned().unwrap_or_default()),
        "assign" => {
            let student_id = parse_student_id(&required(rest, 0, "student_id")?)?;
            let ids = rest[1..]
                .iter()
                .map(|id| parse_id(id))
                .collect::<Result<Vec<Uuid>, _>>()?;
            if ids.is_empty() {
                return Err("assign needs at least one record id".into());
            }
            Command::Assign { student_id, ids }
        }
        "assign-random" => Command::AssignRandom(parse_student_id(&required(
            rest,
            0,
            "student_id",
        )?)?),
        "add-student" => Command::AddStudent(Student {
            id: parse_student_id(&required(rest, 0, "student_id")?)?,
            name: required(rest, 1, "name")?,
            surname: required(rest, 2, "surname")?,
        }),
        other => return Err(format!("Unknown command '{other}'\n{USAGE}").into()),
    };
    Ok(command)
}

fn parse_update(rest: &[String]) -> Result<Command, Box<dyn Error>> {
    let id = parse_id(&required(rest, 0, "id")?)?;
    let mut input = None;
    let mut description = None;
    let mut is_active = None;

    let mut flags = rest[1..].iter();
    while let Some(flag) = flags.next() {
        let value = flags
            .next()
            .ok_or_else(|| format!("Missing value for {flag}"))?
            .clone();
        match flag.as_str() {
            "--address" => input = Some(value),
            "--description" => description = Some(value),
            "--active" => {
                is_active = Some(
                    value
                        .parse::<bool>()
                        .map_err(|_| format!("Invalid --active value '{value}'"))?,
                )
            }
            other => return Err(format!("Unknown update flag '{other}'").into()),
        }
    }
    Ok(Command::Update {
        id,
        input,
        description,
        is_active,
    })
}

fn required(args: &[String], index: usize, what: &str) -> Result<String, Box<dyn Error>> {
    args.get(index)
        .cloned()
        .ok_or_else(|| format!("Missing argument <{what}>\n{USAGE}").into())
}

fn parse_id(id: &str) -> Result<Uuid, Box<dyn Error>> {
    Uuid::parse_str(id.trim()).map_err(|e| format!("Invalid record id '{id}': {e}").into())
}

fn parse_student_id(id: &str) -> Result<i32, Box<dyn Error>> {
    id.trim()
        .parse()
        .map_err(|e| format!("Invalid student id '{id}': {e}").into())
}

/// Execute a command against the registry, printing results to stdout.
pub fn run_command(
    command: Command,
    registry: &mut AddressRegistry<MemoryStore>,
    expander: &Expander,
) -> Result<(), Box<dyn Error>> {
    log::info!("run_command({command:?})");
    match command {
        Command::Classify(input) => {
            let kind = classify(&input);
            println!("{kind} ({})", kind.label());
        }
        Command::Validate(input) => print_report(&registry.validate(&input)?),
        Command::Expand(input) => print_expansion(&expander.expand(&input)),
        Command::Create { input, description } => {
            let view = registry.create(&input, description.as_deref())?;
            print_records(&[view]);
        }
        Command::Update {
            id,
            input,
            description,
            is_active,
        } => {
            let view = registry.update(id, input.as_deref(), description.as_deref(), is_active)?;
            print_records(&[view]);
        }
        Command::Delete(id) => {
            let count = registry.delete(id)?;
            println!("{} {count} record(s)", "deleted".on_red());
        }
        Command::List { all } => {
            let views = if all {
                registry.find_all()
            } else {
                registry.find_all_active()
            };
            print_records(&views);
        }
        Command::Unassigned { ipv4_only } => {
            let views = if ipv4_only {
                registry.find_unassigned_active_ipv4()
            } else {
                registry.find_unassigned_active()
            };
            print_records(&views);
        }
        Command::Search(term) => print_records(&registry.search(&term)),
        Command::Assign { student_id, ids } => {
            let count = registry.assign_to_student(student_id, &ids)?;
            println!("{count} record(s) assigned to student {student_id}");
        }
        Command::AssignRandom(student_id) => {
            let view = registry.assign_random(student_id)?;
            print_records(&[view]);
        }
        Command::AddStudent(student) => {
            println!("student {} {}", student.id, student.full_name());
            registry.store_mut().add_student(student);
        }
    }
    Ok(())
}
