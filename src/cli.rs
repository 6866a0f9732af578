//! Command-line interface for fontpair.
//!
//! Each subcommand drives one `App` operation and prints the result to
//! stdout. Diagnostics go to the debug log (see [`crate::debug`]).

use crate::app::App;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fontpair_favorites::PersistOutcome;
use fontpair_selection::{FieldUpdate, Preset, Role, SelectionState};
use fontpair_style::{Document, SharedDocument, weight_name};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// fontpair - Try font pairings and get the CSS to use them
#[derive(Parser)]
#[command(name = "fontpair")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Don't contact the catalog endpoint; use the cached catalog if any
    #[arg(long, global = true)]
    pub offline: bool,

    /// Start from a built-in preset (see `fontpair presets`)
    #[arg(long, value_name = "INDEX", global = true)]
    pub preset: Option<usize>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the built-in presets
    Presets,

    /// Apply a random preset
    Random,

    /// Apply a built-in preset by index
    Apply {
        index: usize,
    },

    /// Change one field of one role
    Set {
        /// display, heading or body
        role: Role,
        /// fontId, weight or size
        field: String,
        value: String,
    },

    /// Print the generated stylesheet for the current selection
    Preview {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Print npm and CDN install instructions for the current selection
    Install,

    /// Manage saved favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// List catalog fonts
    Catalog {
        /// Case-insensitive filter on family or id
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List saved favorites
    List,
    /// Save the current selection
    Add,
    /// Remove the current selection from favorites
    Remove,
    /// Save or unsave the current selection
    Toggle,
    /// Load a saved favorite into the selection
    Apply {
        index: usize,
    },
}

/// Run the parsed command against `app`.
pub fn run(cli: &Cli, app: &mut App, runtime: &Runtime) -> Result<()> {
    if let Some(index) = cli.preset {
        app.apply_preset(index)?;
    }

    match &cli.command {
        None => print!("{}", format_selection(app.selection())),
        Some(Commands::Presets) => {
            print!(
                "{}",
                format_presets(app.presets(), app.active_preset(), |p| {
                    app.favorites().contains(p)
                })
            );
        }
        Some(Commands::Random) => {
            let mut rng = rand::rng();
            if let Some(index) = app.randomize(&mut rng) {
                println!("Preset #{index}");
            }
            print!("{}", format_selection(app.selection()));
        }
        Some(Commands::Apply { index }) => {
            app.apply_preset(*index)?;
            print!("{}", format_selection(app.selection()));
        }
        Some(Commands::Set { role, field, value }) => {
            let update = FieldUpdate::parse(field, value)?;
            if matches!(update, FieldUpdate::FontId(_)) {
                load_catalog(app, runtime);
            }
            app.update(*role, update)?;
            print!("{}", format_selection(app.selection()));
        }
        Some(Commands::Preview { out }) => {
            load_catalog(app, runtime);
            let doc: SharedDocument = Arc::new(Mutex::new(Document::new()));
            let preview = app.mount_preview(Arc::clone(&doc));
            let css = doc.lock().render();
            drop(preview);

            match out {
                Some(path) => {
                    std::fs::write(path, &css)
                        .with_context(|| format!("Failed to write stylesheet to {:?}", path))?;
                    println!("Wrote {} bytes to {}", css.len(), path.display());
                }
                None => print!("{css}"),
            }
        }
        Some(Commands::Install) => {
            load_catalog(app, runtime);
            let text = app.with_install_snippets(|s| {
                format!(
                    "# Install\n{}\n\n# Import\n{}\n\n# Usage\n{}\n\n# CDN\n{}\n",
                    s.npm_install_lines(),
                    s.import_lines(),
                    s.usage_css(),
                    s.cdn_css()
                )
            });
            print!("{text}");
        }
        Some(Commands::Favorites {
            action: FavoritesAction::Apply { index },
        }) => {
            app.apply_favorite(*index)?;
            print!("{}", format_selection(app.selection()));
        }
        Some(Commands::Favorites { action }) => run_favorites(action, app),
        Some(Commands::Catalog { search }) => {
            let catalog = load_catalog(app, runtime);
            let fonts = catalog.search(search.as_deref().unwrap_or(""));
            for font in &fonts {
                let weights: Vec<String> = font.weights.iter().map(u16::to_string).collect();
                println!(
                    "{:<28} {:<28} {:<12} {}{}",
                    font.id,
                    font.family,
                    font.category,
                    weights.join(","),
                    if font.variable { " (variable)" } else { "" }
                );
            }
            println!("{} of {} fonts", fonts.len(), catalog.len());
        }
    }
    Ok(())
}

fn run_favorites(action: &FavoritesAction, app: &mut App) {
    let outcome = match action {
        FavoritesAction::List => {
            let favorites = app.favorites().list();
            if favorites.is_empty() {
                println!("No favorites yet");
            }
            for (i, favorite) in favorites.iter().enumerate() {
                println!("[{i}] {}", summarize(favorite));
            }
            return;
        }
        FavoritesAction::Add => app.add_favorite(),
        FavoritesAction::Remove => app.remove_favorite(),
        FavoritesAction::Toggle => app.toggle_favorite(),
        FavoritesAction::Apply { .. } => return,
    };

    let saved = app.is_favorite();
    match outcome {
        PersistOutcome::Saved if saved => println!("Saved {}", summarize(app.selection())),
        PersistOutcome::Saved => println!("Removed {}", summarize(app.selection())),
        PersistOutcome::Unchanged => println!("Favorites unchanged"),
        PersistOutcome::Failed(e) => {
            eprintln!("fontpair: warning: favorites changed but could not be saved: {e}")
        }
    }
}

/// Load the catalog, telling the user when it is unavailable.
fn load_catalog(app: &App, runtime: &Runtime) -> Arc<fontpair_catalog::Catalog> {
    let catalog = runtime.block_on(app.load_catalog());
    if let Some(e) = app.catalog_error() {
        eprintln!("fontpair: {}", e.user_message());
    }
    catalog
}

/// One line per role: `display  bitter  700 Bold  48px`.
pub fn format_selection(state: &SelectionState) -> String {
    let mut out = String::new();
    for (role, settings) in state.roles() {
        let font = if settings.is_unset() {
            "(none)"
        } else {
            settings.font_id.as_str()
        };
        let weight = match weight_name(settings.weight) {
            Some(name) => format!("{} {}", settings.weight, name),
            None => settings.weight.to_string(),
        };
        out.push_str(&format!(
            "{:<8} {:<24} {:<16} {}px\n",
            role.as_str(),
            font,
            weight,
            settings.size
        ));
    }
    out
}

/// `bitter / inter / inter`
fn summarize(state: &SelectionState) -> String {
    state
        .roles()
        .iter()
        .map(|(_, s)| if s.is_unset() { "-" } else { s.font_id.as_str() })
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Numbered preset list; `*` marks the active preset and `♥` favorites.
pub fn format_presets(
    presets: &[Preset],
    active: Option<usize>,
    is_favorite: impl Fn(&Preset) -> bool,
) -> String {
    let mut out = String::new();
    for (i, p) in presets.iter().enumerate() {
        let marker = if Some(i) == active { '*' } else { ' ' };
        let heart = if is_favorite(p) { " ♥" } else { "" };
        out.push_str(&format!("{marker} [{i:>2}] {}{heart}\n", summarize(p)));
    }
    out
}
