//! Cosmere RPG character creator.
//!
//! A terminal wizard that walks through name, ancestry, cultures, paths,
//! attributes, skills, expertise and starting items, then writes the
//! character to a JSON store.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripting:
//!
//! ```bash
//! printf 'name Kaladin\nattr str 3\nsave\n' | cargo run -p cosmere -- --headless
//! ```

mod creator;
mod headless;
mod logging;

use cosmere_core::{
    CachedCatalog, CharacterId, CreatorPaths, CreatorSettings, JsonCatalogDir,
    JsonCharacterStore, Wizard,
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Duration;
use thiserror::Error;

use creator::{Creator, StatusKind};

/// Command line options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Options {
    help: bool,
    headless: bool,
    list: bool,
    write_settings: bool,
    character: Option<CharacterId>,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum ArgsError {
    #[error("--character needs a character id")]
    MissingCharacter,

    #[error("Invalid character id: {0}")]
    InvalidCharacter(String),

    #[error("Unknown option: {0}")]
    Unknown(String),
}

fn parse_args(args: &[String]) -> Result<Options, ArgsError> {
    let mut options = Options::default();
    let mut rest = args.iter().skip(1);

    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "-h" | "--help" => options.help = true,
            "--headless" => options.headless = true,
            "--list" => options.list = true,
            "--write-settings" => options.write_settings = true,
            "--character" => {
                let id = rest.next().ok_or(ArgsError::MissingCharacter)?;
                let id = id
                    .parse()
                    .map_err(|_| ArgsError::InvalidCharacter(id.clone()))?;
                options.character = Some(id);
            }
            other => return Err(ArgsError::Unknown(other.to_string())),
        }
    }
    Ok(options)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let options = match parse_args(&args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    if options.help {
        print_help();
        return Ok(());
    }

    logging::init_tracing(options.headless)?;

    let paths = CreatorPaths::from_env();
    tracing::info!(
        settings = %paths.settings.display(),
        catalogs = %paths.catalog_dir.display(),
        characters = %paths.character_dir.display(),
        "starting creator"
    );

    if options.write_settings {
        if paths.settings.exists() {
            eprintln!("Settings file {} already exists", paths.settings.display());
        } else {
            CreatorSettings::conventional().save(&paths.settings).await?;
            println!("Wrote {}", paths.settings.display());
        }
        return Ok(());
    }

    let store = JsonCharacterStore::new(&paths.character_dir);

    if options.list {
        for summary in store.list().await? {
            println!("{}  {} ({} items)", summary.id, summary.name, summary.item_count);
        }
        return Ok(());
    }

    let settings = CreatorSettings::load(&paths.settings).await?;
    let catalogs = CachedCatalog::new(JsonCatalogDir::new(&paths.catalog_dir));
    let wizard = Wizard::open(&catalogs, &store, settings, options.character).await?;

    if options.headless {
        return headless::run_headless(wizard, &store)
            .await
            .map_err(|e| e.into());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_creator(&mut terminal, Creator::new(wizard), &store).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    match result {
        Ok(Some(id)) => println!("Saved character {id}"),
        Ok(None) => {}
        Err(e) => eprintln!("Error: {e}"),
    }

    Ok(())
}

/// Run the creation wizard until the player quits or cancels.
///
/// Returns the id of the last saved character, if any save succeeded.
async fn run_creator<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut creator: Creator,
    store: &JsonCharacterStore,
) -> io::Result<Option<CharacterId>> {
    let mut saved = None;

    loop {
        terminal.draw(|f| {
            let area = f.area();
            creator.render(f, area);
        })?;

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            creator.handle_event(ev);
        }

        if creator.cancelled || creator.finished {
            return Ok(saved);
        }

        if creator.submit_requested {
            creator.submit_requested = false;
            creator.set_status("Saving...", StatusKind::Info);
            terminal.draw(|f| {
                let area = f.area();
                creator.render(f, area);
            })?;

            match creator.wizard.submit(store, store).await {
                Ok(build) => {
                    saved = creator.wizard.selection.target();
                    creator.set_status(
                        format!(
                            "Saved {} (created {}, retracted {}, kept {}). Press Q to quit.",
                            build.identity.name,
                            build.create.len(),
                            build.retract.len(),
                            build.keep.len()
                        ),
                        StatusKind::Info,
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "save failed");
                    creator.set_status(format!("Save failed: {e}"), StatusKind::Error);
                }
            }
        }
    }
}

fn print_help() {
    println!("Cosmere Character Creator - build Cosmere RPG heroes");
    println!();
    println!("USAGE:");
    println!("  cosmere [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help            Show this help message");
    println!("  --headless            Run in headless mode (line commands on stdin)");
    println!("  --character <ID>      Edit an existing character");
    println!("  --list                List stored characters");
    println!("  --write-settings      Write a settings file using the conventional catalog names");
    println!();
    println!("ENVIRONMENT (also read from .env):");
    println!("  COSMERE_SETTINGS      Settings file (default: cosmere-settings.json)");
    println!("  COSMERE_CATALOG_DIR   Catalog directory (default: catalogs)");
    println!("  COSMERE_CHARACTER_DIR Character directory (default: characters)");
    println!("  COSMERE_LOG_FILE      Log file for the TUI");
    println!("  RUST_LOG              Log filter");
    println!();
    println!("EXAMPLES:");
    println!("  cosmere                                # Interactive TUI mode");
    println!("  cosmere --headless                     # Headless mode");
    println!("  cosmere --character <ID>               # Edit a saved character");
}
