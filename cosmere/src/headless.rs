//! Headless mode for the character creator.
//!
//! A line-oriented protocol on stdin, suitable for scripting and automated
//! testing. Each line is one command; a leading `#` is accepted and ignored.
//! Replies are prefixed with a tag such as `[OK]`, `[ERROR]` or `[SAVED]`.

use cosmere_core::catalog::{self, CatalogEntry};
use cosmere_core::{
    Attribute, BuildSnapshot, CharacterReader, PersistenceApplier, StoreError, Wizard,
};
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// A parsed headless command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Name(String),
    Ancestry(Option<String>),
    Culture(String),
    Heroic(Option<String>),
    Radiant(Option<String>),
    Item(String),
    Attr(Attribute, i32),
    Skill(String, i32),
    /// Zero-based slot index.
    Expertise(usize, String),
    List(Option<String>),
    Preview,
    Save,
    Help,
    Quit,
}

/// Errors from parsing a command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}. Type help for help.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Not a number: {0}")]
    NotANumber(String),
}

/// Errors from applying a command to the draft.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    #[error("No {catalog} entry with id {id}")]
    UnknownEntry { catalog: &'static str, id: String },

    #[error("At most two cultures may be selected")]
    CultureLimit,

    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error("No expertise slot {0} (Intellect sets the slot count)")]
    NoSlot(usize),
}

fn clearing(arg: &str) -> Option<String> {
    match arg {
        "" | "-" | "none" => None,
        other => Some(other.to_string()),
    }
}

fn number(s: &str) -> Result<i32, CommandError> {
    s.parse()
        .map_err(|_| CommandError::NotANumber(s.to_string()))
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let line = line.strip_prefix('#').unwrap_or(line).trim_start();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "name" => Ok(Command::Name(rest.to_string())),
        "ancestry" => Ok(Command::Ancestry(clearing(rest))),
        "heroic" => Ok(Command::Heroic(clearing(rest))),
        "radiant" => Ok(Command::Radiant(clearing(rest))),
        "culture" if !rest.is_empty() => Ok(Command::Culture(rest.to_string())),
        "culture" => Err(CommandError::Usage("culture <id>")),
        "item" if !rest.is_empty() => Ok(Command::Item(rest.to_string())),
        "item" => Err(CommandError::Usage("item <id>")),
        "attr" => {
            let (key, value) = rest
                .split_once(char::is_whitespace)
                .ok_or(CommandError::Usage("attr <attribute> <value>"))?;
            let attribute = Attribute::parse(key)
                .ok_or_else(|| CommandError::UnknownAttribute(key.to_string()))?;
            Ok(Command::Attr(attribute, number(value.trim())?))
        }
        "skill" => {
            // Skill names may contain spaces, so the value is the last word
            let (name, value) = rest
                .rsplit_once(char::is_whitespace)
                .ok_or(CommandError::Usage("skill <name> <value>"))?;
            Ok(Command::Skill(name.trim().to_string(), number(value)?))
        }
        "expertise" => {
            let (slot, text) = match rest.split_once(char::is_whitespace) {
                Some((slot, text)) => (slot, text.trim()),
                None => (rest, ""),
            };
            let slot = number(slot)?;
            if slot < 1 {
                return Err(CommandError::Usage("expertise <slot, from 1> <text>"));
            }
            Ok(Command::Expertise((slot - 1) as usize, text.to_string()))
        }
        "list" => Ok(Command::List(clearing(rest))),
        "preview" | "status" => Ok(Command::Preview),
        "save" => Ok(Command::Save),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn lookup(
    entries: &[CatalogEntry],
    catalog: &'static str,
    id: &str,
) -> Result<CatalogEntry, ApplyError> {
    catalog::find(entries, id)
        .cloned()
        .ok_or_else(|| ApplyError::UnknownEntry {
            catalog,
            id: id.to_string(),
        })
}

fn pick(
    entries: &[CatalogEntry],
    catalog: &'static str,
    id: Option<&str>,
) -> Result<Option<CatalogEntry>, ApplyError> {
    id.map(|id| lookup(entries, catalog, id)).transpose()
}

/// Apply a command to the draft and describe the result.
///
/// `save`, `help` and `quit` need the caller and yield an empty reply.
pub fn apply_command(wizard: &mut Wizard, command: Command) -> Result<String, ApplyError> {
    match &command {
        Command::List(which) => return Ok(format_catalogs(wizard, which.as_deref())),
        Command::Preview => return Ok(format_snapshot(&wizard.snapshot())),
        _ => {}
    }

    let catalogs = &wizard.catalogs;
    let selection = &mut wizard.selection;

    match command {
        Command::Name(name) => {
            selection.set_name(name);
            Ok(format!("Name: {}", selection.display_name()))
        }
        Command::Ancestry(id) => {
            let entry = pick(&catalogs.ancestries, "ancestry", id.as_deref())?;
            selection.set_ancestry(entry);
            Ok(format!("Ancestry: {}", label(selection.ancestry())))
        }
        Command::Heroic(id) => {
            let entry = pick(&catalogs.heroic_paths, "heroic path", id.as_deref())?;
            selection.set_heroic_path(entry);
            Ok(format!("Heroic path: {}", label(selection.heroic_path())))
        }
        Command::Radiant(id) => {
            let entry = pick(&catalogs.radiant_paths, "radiant path", id.as_deref())?;
            selection.set_radiant_path(entry);
            Ok(format!("Radiant path: {}", label(selection.radiant_path())))
        }
        Command::Culture(id) => {
            let entry = lookup(&catalogs.cultures, "culture", &id)?;
            if !selection.toggle_culture(entry) {
                return Err(ApplyError::CultureLimit);
            }
            let names: Vec<&str> = selection.cultures().iter().map(|c| c.name.as_str()).collect();
            Ok(format!("Cultures: {}", names.join(", ")))
        }
        Command::Item(id) => {
            let entry = lookup(&catalogs.items, "item", &id)?;
            let name = entry.name.clone();
            selection.toggle_item(entry);
            let state = if selection.has_item(&id) { "added" } else { "removed" };
            Ok(format!("Item {name} {state}"))
        }
        Command::Attr(attribute, value) => {
            let held = selection.set_attribute(attribute, value);
            Ok(format!(
                "{attribute}: {held} ({} points left, {} expertise slots)",
                selection.attributes().remaining(),
                selection.expertise().len()
            ))
        }
        Command::Skill(name, value) => {
            let held = selection
                .set_skill(&name, value)
                .ok_or_else(|| ApplyError::UnknownSkill(name.clone()))?;
            Ok(format!(
                "{name}: {held} ({} points left)",
                selection.skills().remaining()
            ))
        }
        Command::Expertise(index, text) => {
            if !selection.set_expertise(index, text) {
                return Err(ApplyError::NoSlot(index + 1));
            }
            Ok(format!(
                "Expertise {}: {}",
                index + 1,
                selection.expertise().get(index).unwrap_or_default()
            ))
        }
        Command::List(_) | Command::Preview | Command::Save | Command::Help | Command::Quit => {
            Ok(String::new())
        }
    }
}

fn label(entry: Option<&CatalogEntry>) -> &str {
    entry.map(|e| e.name.as_str()).unwrap_or("none")
}

fn entry_lines(title: &str, entries: &[CatalogEntry]) -> Vec<String> {
    let mut lines = vec![format!("{title}:")];
    if entries.is_empty() {
        lines.push("  (empty)".to_string());
    }
    lines.extend(entries.iter().map(|e| format!("  {} - {}", e.id, e.name)));
    lines
}

/// Describe one catalog, or all of them when `which` is `None`.
pub fn format_catalogs(wizard: &Wizard, which: Option<&str>) -> String {
    let c = &wizard.catalogs;
    let mut lines = Vec::new();
    let wants = |name: &str| which.map_or(true, |w| w.eq_ignore_ascii_case(name));

    if wants("ancestries") {
        lines.extend(entry_lines("Ancestries", &c.ancestries));
    }
    if wants("cultures") {
        lines.extend(entry_lines("Cultures", &c.cultures));
    }
    if wants("heroic") {
        lines.extend(entry_lines("Heroic paths", &c.heroic_paths));
    }
    if wants("radiant") {
        lines.extend(entry_lines("Radiant paths", &c.radiant_paths));
    }
    if wants("items") {
        lines.extend(entry_lines("Items", &c.items));
    }
    if wants("skills") {
        lines.push("Skills:".to_string());
        lines.extend(c.skills.iter().map(|s| format!("  {s}")));
    }
    if lines.is_empty() {
        lines.push("Catalogs: ancestries, cultures, heroic, radiant, items, skills".to_string());
    }
    lines.join("\n")
}

/// Render the preview as plain text.
pub fn format_snapshot(snap: &BuildSnapshot) -> String {
    let mut lines = vec![
        format!("  Name: {}", snap.name),
        format!("  Ancestry: {}", snap.ancestry),
        format!("  Cultures: {}", snap.cultures),
        format!("  Heroic Path: {}", snap.heroic_path),
        format!("  Radiant Path: {}", snap.radiant_path),
    ];

    let attributes: Vec<String> = snap
        .attributes
        .iter()
        .map(|(a, v)| format!("{} {v}", a.key().to_uppercase()))
        .collect();
    lines.push(format!(
        "  Attributes: {} ({} left)",
        attributes.join(", "),
        snap.attribute_points_remaining
    ));

    let skills: Vec<String> = snap
        .skills
        .iter()
        .map(|s| format!("{} {}", s.name, s.value))
        .collect();
    lines.push(format!(
        "  Skills: {} ({} left)",
        if skills.is_empty() { "none".to_string() } else { skills.join(", ") },
        snap.skill_points_remaining
    ));

    if !snap.expertise.is_empty() {
        lines.push(format!("  Expertise: {}", snap.expertise.join(", ")));
    }
    if !snap.items.is_empty() {
        lines.push(format!("  Items: {}", snap.items.join(", ")));
    }
    lines.join("\n")
}

fn print_help() {
    println!("[HELP]");
    println!("  name <text>              - Set the character name");
    println!("  ancestry <id|none>       - Choose an ancestry");
    println!("  culture <id>             - Toggle a culture (at most two)");
    println!("  heroic <id|none>         - Choose a heroic path");
    println!("  radiant <id|none>        - Choose a radiant path");
    println!("  item <id>                - Toggle a starting item");
    println!("  attr <attribute> <n>     - Set an attribute (0-3, 12 points total)");
    println!("  skill <name> <n>         - Set a skill rank (0-2, 4 points total)");
    println!("  expertise <slot> <text>  - Fill an expertise slot");
    println!("  list [catalog]           - Show catalog entries");
    println!("  preview                  - Show the current build");
    println!("  save                     - Write the character");
    println!("  quit                     - Exit");
}

/// Run the creator in headless mode until `quit` or end of input.
pub async fn run_headless<S>(mut wizard: Wizard, store: &S) -> Result<(), StoreError>
where
    S: CharacterReader + PersistenceApplier,
{
    println!("=== Cosmere Character Creator (headless) ===");
    match wizard.selection.target() {
        Some(id) => println!("Editing: {} ({id})", wizard.selection.display_name()),
        None => println!("Creating a new character"),
    }
    println!("Type help for commands.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(c) => c,
            Err(e) => {
                println!("[ERROR] {e}");
                continue;
            }
        };

        match command {
            Command::Quit => {
                println!("Goodbye!");
                break;
            }
            Command::Help => print_help(),
            Command::Save => match wizard.submit(store, store).await {
                Ok(build) => {
                    let id = wizard
                        .selection
                        .target()
                        .map(|id| id.to_string())
                        .unwrap_or_default();
                    println!(
                        "[SAVED] {} {id} (created {}, retracted {}, kept {})",
                        build.identity.name,
                        build.create.len(),
                        build.retract.len(),
                        build.keep.len()
                    );
                }
                Err(e) => println!("[ERROR] Save failed: {e}"),
            },
            Command::Preview => {
                println!("[PREVIEW]");
                println!("{}", format_snapshot(&wizard.snapshot()));
            }
            Command::List(which) => {
                println!("[LIST]");
                println!("{}", format_catalogs(&wizard, which.as_deref()));
            }
            edit => match apply_command(&mut wizard, edit) {
                Ok(message) => println!("[OK] {message}"),
                Err(e) => println!("[ERROR] {e}"),
            },
        }
        stdout.flush().ok();
    }

    Ok(())
}
