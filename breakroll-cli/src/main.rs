mod color;
mod render;
mod storage;

use anyhow::{Context, Result, bail};
use breakroll_core::constants::STORAGE_KEY;
use breakroll_core::{BreakSession, Catalog, SettingField, SettingUpdate, ViewMode};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::io::{Write, stdout};
use std::path::{Path, PathBuf};

use color::normalize_color;
use storage::{FileSlot, image_data_url};

#[derive(Debug, Parser)]
#[command(name = "breakroll", version)]
#[command(about = "Run a live draw: hand out catalog items to participants one at a time")]
struct Args {
    /// Path of the saved-state file [default: .breakroll/card_break_roller_state.json]
    #[arg(long, env = "BREAKROLL_STATE")]
    state: Option<PathBuf>,

    /// JSON catalog to use instead of the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Seed for a reproducible draw sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Draw a random available item for a participant
    Draw {
        /// Participant name (blank uses a placeholder)
        name: Vec<String>,
    },
    /// Clear all draws and history, keeping theme and branding
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,

        /// Settings to keep instead of theme and branding (fields or groups, comma-separated)
        #[arg(long, value_delimiter = ',')]
        keep: Option<Vec<String>>,
    },
    /// Render the board or the history, following the saved view mode
    Show,
    /// Render the board
    Grid,
    /// Render the draw history
    History,
    /// List catalog items and who holds them
    Catalog,
    /// Print the saved snapshot as JSON
    Export,
    /// Change an operator setting
    #[command(subcommand)]
    Set(SetCommand),
}

#[derive(Debug, Subcommand)]
enum SetCommand {
    /// Banner label
    Label { text: Vec<String> },
    /// Banner image file, or `none`
    Image { source: String },
    /// Icon image file, or `none`
    Icon { source: String },
    /// Theme color override, e.g. `primary '#2563eb'` (sets `--primary`)
    Color {
        #[arg(allow_hyphen_values = true)]
        key: String,
        value: String,
    },
    /// Remove a theme color override
    ClearColor {
        #[arg(allow_hyphen_values = true)]
        key: String,
    },
    /// Page background color
    Background { value: String },
    /// Use a gradient background (on/off)
    Gradient {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        enabled: bool,
    },
    /// Which view `show` renders (primary/summary)
    View { mode: ViewMode },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    if args.no_color {
        colored::control::set_override(false);
    }

    let catalog = load_catalog(args.catalog.as_ref())?;
    let slot = FileSlot::new(args.state.unwrap_or_else(default_state_path));
    log::debug!("using state file {}", slot.path().display());
    let mut session = match args.seed {
        Some(seed) => BreakSession::open_seeded(catalog, slot, seed),
        None => BreakSession::open(catalog, slot),
    };
    if session.catalog().len() > session.placer().capacity() {
        log::warn!(
            "catalog has {} items but the board only fits {}",
            session.catalog().len(),
            session.placer().capacity()
        );
    }

    let mut out = stdout().lock();
    match args.command {
        Command::Draw { name } => run_draw(&mut session, &name.join(" "), &mut out)?,
        Command::Reset { yes, keep } => run_reset(&mut session, yes, keep.as_deref(), &mut out)?,
        Command::Show => match session.state().settings.view_mode {
            ViewMode::Primary => write_board(&mut out, &session)?,
            ViewMode::Summary => render::write_history(&mut out, &session.state().history)?,
        },
        Command::Grid => write_board(&mut out, &session)?,
        Command::History => render::write_history(&mut out, &session.state().history)?,
        Command::Catalog => render::write_catalog(&mut out, session.catalog(), session.state())?,
        Command::Export => {
            let snapshot = breakroll_core::Snapshot::from_state(session.state());
            let json = serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?;
            writeln!(out, "{json}")?;
        }
        Command::Set(command) => {
            let update = setting_update(command)?;
            let field = session.update_settings(update);
            writeln!(out, "Updated {field}.")?;
        }
    }
    out.flush()?;

    if let Some(err) = session.last_save_error() {
        bail!("failed to save state: {err}");
    }
    Ok(())
}

fn default_state_path() -> PathBuf {
    Path::new(".breakroll").join(format!("{STORAGE_KEY}.json"))
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::builtin());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read catalog {}", path.display()))?;
    Catalog::from_json(&json).with_context(|| format!("parse catalog {}", path.display()))
}

fn write_board<W: Write>(out: &mut W, session: &BreakSession<FileSlot>) -> std::io::Result<()> {
    render::write_grid(out, session.state(), session.placer(), &session.placements())
}

fn run_draw<W: Write>(
    session: &mut BreakSession<FileSlot>,
    name: &str,
    out: &mut W,
) -> Result<()> {
    match session.draw(name) {
        Ok(record) => {
            writeln!(out, "🎲 {}", record.summary_line().bright_green().bold())?;
            let state = session.state();
            writeln!(
                out,
                "{} of {} items remain.",
                state.available_count(),
                state.items.len()
            )?;
        }
        Err(exhausted) => {
            let message = format!("{exhausted}.");
            writeln!(out, "{}", message.yellow())?;
        }
    }
    Ok(())
}

fn run_reset<W: Write>(
    session: &mut BreakSession<FileSlot>,
    confirmed: bool,
    keep: Option<&[String]>,
    out: &mut W,
) -> Result<()> {
    if !confirmed {
        bail!("reset clears every draw; re-run with --yes to confirm");
    }
    match keep {
        None => session.reset(),
        Some(names) => {
            let mut fields = Vec::new();
            for name in names.iter().filter(|n| !n.trim().is_empty()) {
                let Some(expanded) = SettingField::expand(name) else {
                    bail!("unknown settings field `{name}`");
                };
                fields.extend(expanded);
            }
            fields.sort();
            fields.dedup();
            session.reset_preserving(&fields);
        }
    }
    writeln!(out, "{}", "Break reset.".cyan())?;
    Ok(())
}

fn image_payload(source: &str) -> Result<Option<String>> {
    if source.eq_ignore_ascii_case("none") || source.trim().is_empty() {
        return Ok(None);
    }
    image_data_url(Path::new(source)).map(Some)
}

/// Theme keys are custom-property names; `primary` and `--primary` are the same key.
fn color_key(key: &str) -> String {
    format!("--{}", key.trim().trim_start_matches('-'))
}

fn setting_update(command: SetCommand) -> Result<SettingUpdate> {
    let update = match command {
        SetCommand::Label { text } => SettingUpdate::Label(text.join(" ")),
        SetCommand::Image { source } => SettingUpdate::Image(image_payload(&source)?),
        SetCommand::Icon { source } => SettingUpdate::Icon(image_payload(&source)?),
        SetCommand::Color { key, value } => {
            if key.trim().trim_start_matches('-').is_empty() {
                bail!("color key cannot be blank");
            }
            SettingUpdate::Color {
                key: color_key(&key),
                value: normalize_color(&value),
            }
        }
        SetCommand::ClearColor { key } => SettingUpdate::ClearColor(color_key(&key)),
        SetCommand::Background { value } => SettingUpdate::Background(normalize_color(&value)),
        SetCommand::Gradient { enabled } => SettingUpdate::Gradient(enabled),
        SetCommand::View { mode } => SettingUpdate::ViewMode(mode),
    };
    Ok(update)
}
