//! The `photocat tag` command: keyboard-driven tagging session.
//!
//! One photo at a time: the screen shows its file, dimensions, EXIF fields
//! and the pending tags, and each keystroke is forwarded to the session.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use console::{style, Key, Style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use photocat_core::tagging::PendingTags;
use photocat_core::{
    CategoryMap, CatalogStore, Config, LabelMode, NavOutcome, SessionPhase, SqliteCatalog,
    TaggingSession,
};

/// Label mode accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Single,
    Multi,
}

impl From<ModeArg> for LabelMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Single => LabelMode::Single,
            ModeArg::Multi => LabelMode::Multi,
        }
    }
}

/// Arguments for the `tag` command.
#[derive(Args, Debug)]
pub struct TagArgs {
    /// Library root (defaults to `[library] root` from config)
    pub root: Option<PathBuf>,

    /// Catalog database (defaults to `[catalog] path` from config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Label mode for this catalog (defaults to `[tagging] mode`)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
}

/// What one keystroke asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Mutate(char),
    Save,
    Next,
    Previous,
    Quit,
    Ignore,
}

fn command_for(key: &Key) -> Command {
    match key {
        Key::Enter => Command::Save,
        Key::ArrowRight => Command::Next,
        Key::ArrowLeft => Command::Previous,
        Key::Escape | Key::Char('q') | Key::Char('Q') => Command::Quit,
        Key::Char(c) => Command::Mutate(*c),
        _ => Command::Ignore,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Info,
    Warn,
    Error,
}

/// Status line shown under the photo.
struct Notice {
    text: String,
    tone: Tone,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Info,
        }
    }

    fn warn(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Warn,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Error,
        }
    }
}

fn notice_for(outcome: NavOutcome) -> Option<Notice> {
    match outcome {
        NavOutcome::Viewing { skipped: 0, .. } => None,
        NavOutcome::Viewing { skipped, .. } => Some(Notice::warn(format!(
            "Skipped {skipped} unreadable photo(s); recorded as \"{}\"",
            photocat_core::UNREADABLE_LABEL
        ))),
        NavOutcome::AtStart => Some(Notice::info("Already at the first photo")),
        NavOutcome::Exhausted { .. } => Some(Notice::info("No more photos")),
        NavOutcome::Stalled { .. } => Some(Notice::error(
            "Saved, but the next photo could not be recorded; press Enter to retry",
        )),
    }
}

pub fn execute(args: TagArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(root) = args.root {
        config.library.root = root;
    }
    if let Some(catalog) = args.catalog {
        config.catalog.path = catalog;
    }
    if let Some(mode) = args.mode {
        config.tagging.mode = mode.into();
    }

    let term = Term::stderr();
    if !term.is_term() {
        anyhow::bail!("`photocat tag` needs an interactive terminal");
    }

    let store = SqliteCatalog::open(&config.catalog_path())?;
    let mut session = TaggingSession::start(&config, &config.library_root(), store)?;

    let mut notice = match session.load_current() {
        Ok(outcome) => notice_for(outcome),
        Err(e) => Some(Notice::error(e.to_string())),
    };

    loop {
        if session.state().phase == SessionPhase::Exhausted {
            render_summary(&term, &session)?;
            break;
        }
        render(&term, &session, notice.as_ref())?;

        let key = term.read_key()?;
        notice = match command_for(&key) {
            Command::Save if session.state().phase == SessionPhase::Idle => {
                // A failed load left nothing on screen; Enter retries it
                report(session.load_current())
            }
            Command::Save => report(session.save()),
            Command::Next => report(session.navigate_next()),
            Command::Previous => report(session.navigate_previous()),
            Command::Mutate(c) => match session.press(c) {
                Ok(_) => None,
                Err(e) => Some(Notice::warn(e.to_string())),
            },
            Command::Quit => {
                if !session.has_unsaved_changes() || confirm_discard()? {
                    break;
                }
                None
            }
            Command::Ignore => None,
        };
    }

    let saved = session.store().count()?;
    tracing::info!("Session ended; catalog holds {} records", saved);
    Ok(())
}

fn report(result: photocat_core::SessionResult<NavOutcome>) -> Option<Notice> {
    match result {
        Ok(outcome) => notice_for(outcome),
        Err(e) => Some(Notice::error(format!("{e}; pending tags kept, try again"))),
    }
}

fn confirm_discard() -> anyhow::Result<bool> {
    let theme = ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().yellow(),
        ..ColorfulTheme::default()
    };
    confirmed(
        Confirm::with_theme(&theme)
            .with_prompt("Discard unsaved tags and quit?")
            .default(false)
            .interact_opt(),
    )
}

/// Escape or Ctrl+C at the prompt counts as "no".
fn confirmed(answer: dialoguer::Result<Option<bool>>) -> anyhow::Result<bool> {
    match answer {
        Ok(answer) => Ok(answer.unwrap_or(false)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn render<S: CatalogStore>(
    term: &Term,
    session: &TaggingSession<S>,
    notice: Option<&Notice>,
) -> anyhow::Result<()> {
    let bold = Style::new().for_stderr().bold();
    let dim = Style::new().for_stderr().dim();
    let cyan = Style::new().for_stderr().cyan();

    term.clear_screen()?;

    let total = session.list_photos().len();
    let index = session.state().index;
    let path = session
        .current_path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    term.write_line(&format!(
        "  {} {}",
        cyan.apply_to(format!("[{}/{}]", index + 1, total)),
        bold.apply_to(path)
    ))?;

    match session.current() {
        Some(photo) => {
            let (dw, dh) = photo.display_dimensions();
            term.write_line(&format!(
                "  {}x{} {}",
                photo.source_width,
                photo.source_height,
                dim.apply_to(format!("(display {dw}x{dh}, {:?} decode)", photo.decode_path))
            ))?;
            let exif = &photo.exif;
            for (label, value) in [
                ("Taken", &exif.date_created),
                ("Camera", &exif.camera_model),
                ("Exposure", &exif.shutter_speed),
                ("Aperture", &exif.aperture),
            ] {
                term.write_line(&format!(
                    "  {:<10}{}",
                    dim.apply_to(label),
                    value.as_deref().unwrap_or("-")
                ))?;
            }
        }
        None => term.write_line(&format!(
            "  {}",
            dim.apply_to("No photo loaded; press Enter to retry")
        ))?,
    }

    term.write_line("")?;
    term.write_line(&format!(
        "  {} {}",
        bold.apply_to(format!("Pending ({}):", session.mode())),
        pending_summary(session.pending(), session.vocabulary())
    ))?;

    term.write_line("")?;
    for row in legend(session.vocabulary()).chunks(5) {
        term.write_line(&format!("  {}", dim.apply_to(row.join("   "))))?;
    }
    term.write_line(&format!(
        "  {}",
        dim.apply_to("0-4 rating · d delete · k keep · Enter save · ←/→ navigate · q quit")
    ))?;

    if let Some(notice) = notice {
        let style = match notice.tone {
            Tone::Info => Style::new().for_stderr().green(),
            Tone::Warn => Style::new().for_stderr().yellow(),
            Tone::Error => Style::new().for_stderr().red(),
        };
        term.write_line("")?;
        term.write_line(&format!("  {}", style.apply_to(&notice.text)))?;
    }
    Ok(())
}

fn render_summary<S: CatalogStore>(term: &Term, session: &TaggingSession<S>) -> anyhow::Result<()> {
    let green = Style::new().for_stderr().green();
    term.clear_screen()?;
    term.write_line(&format!(
        "  {} {} photos visited; {} catalog records",
        green.apply_to("✓ All photos handled."),
        session.list_photos().len(),
        session.store().count()?
    ))?;
    Ok(())
}

/// One-line rendering of the pending tags.
fn pending_summary(pending: &PendingTags, vocabulary: &CategoryMap) -> String {
    let labels: Vec<String> = pending
        .labels
        .iter()
        .map(|c| vocabulary.display_label(c))
        .collect();
    let labels = if labels.is_empty() {
        "(no categories)".to_string()
    } else {
        labels.join(", ")
    };

    let mut parts = vec![labels, stars(pending.rating)];
    if pending.marked_for_deletion {
        parts.push("DELETE".to_string());
    }
    if pending.do_not_delete {
        parts.push("KEEP".to_string());
    }
    parts.join("  ")
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(photocat_core::types::MAX_RATING));
    let empty = usize::from(photocat_core::types::MAX_RATING) - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

fn legend(vocabulary: &CategoryMap) -> Vec<String> {
    vocabulary
        .categories()
        .map(|c| vocabulary.display_label(c))
        .collect()
}
