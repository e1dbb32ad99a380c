mod console;
mod input;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use poiedit_application::{EditorContext, EditorService};
use poiedit_core::fields::Attribute;
use poiedit_infrastructure::{
    ConfigIdentityProvider, ConfigService, FsPhotoStore, PoieditPaths, TomlCatalogStore,
    TomlTextResolver, TracingNotifier,
};

use crate::console::ConsoleGateway;
use crate::input::translate;

/// Edit the POI catalog from the terminal.
#[derive(Parser, Debug)]
#[command(name = "poiedit", version, about)]
struct Args {
    /// Path to config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// User id the session runs as
    #[arg(short, long, default_value = "local")]
    user: String,

    /// Log filter, e.g. `poiedit=debug`; overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

/// Completion and hints for editor commands.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        let mut commands: Vec<String> = [
            "/new", "/edit", "/look", "/undelete", "/msg", "/ephoto", "/eout",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        commands.extend(Attribute::iter().map(|attr| format!("/{}", attr.command())));
        Self { commands }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else if line.starts_with('#') || line.starts_with('@') || line.starts_with('!') {
            Owned(line.bright_yellow().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("poiedit=info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    // ===== Configuration =====
    let config_service = match &args.config {
        Some(path) => ConfigService::new(path),
        None => ConfigService::default_location()?,
    };
    let config = config_service
        .get_config()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;

    let catalog_path = PoieditPaths::resolve_data_path(&config.catalog_path)?;
    let photos_dir = PoieditPaths::resolve_data_path(&config.photos_dir)?;
    let texts = match &config.strings_path {
        Some(path) => TomlTextResolver::with_overrides(path)?,
        None => TomlTextResolver::builtin()?,
    };
    tracing::info!(
        "Catalog {}, photos in {}",
        catalog_path.display(),
        photos_dir.display()
    );

    // ===== Backend Initialization =====
    let gateway = Arc::new(ConsoleGateway::new(photos_dir.clone()));
    let identity = Arc::new(ConfigIdentityProvider::new(&config));
    let ctx = EditorContext::new(
        Arc::new(TomlCatalogStore::new(catalog_path)),
        gateway.clone(),
        Arc::new(texts),
        Arc::new(TracingNotifier),
        Arc::new(FsPhotoStore::new(photos_dir)),
        Arc::new(config),
    );
    let service = EditorService::new(Arc::new(ctx), identity);

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== POI editor ===".bright_magenta().bold());
    println!(
        "{}",
        "/new or /edit <id> to start, #<n> to pick an option, @lat,lon to send a location, \
         !photo <path> to upload, 'quit' to exit."
            .bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}", format!("Error: {:?}", e).red());
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(&line);

        let event = match translate(trimmed, &gateway.last_choices()) {
            Ok(event) => event,
            Err(e) => {
                println!("{}", e.to_string().red());
                continue;
            }
        };
        if let Err(e) = service.handle(&args.user, event).await {
            eprintln!("{}", format!("Session ended: {}", e).red());
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}
