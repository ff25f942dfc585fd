//! binary coverage tool
//!
//! Reads a font file, counts how many characters of each CJK encoding standard
//! and Unicode block it supports, and prints or saves the result.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cjk_coverage::{
    Catalogue, CopyMode, FontFile, Label, LoadError, LoadedFont, Locale, Report,
    ReportError, Repertoire, Section, Session, SessionError, SettingsError, SettingsPatch,
    SettingsStore, Theme,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Display language (en, zhs or zht); defaults to the saved language
    #[arg(long, global = true)]
    lang: Option<Locale>,

    /// Settings file to use instead of the one in the user config directory
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct FontArgs {
    /// The font or font collection file
    font: PathBuf,

    /// Which font of a collection to use
    #[arg(short, long)]
    index: Option<u32>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Print per-table and per-block counts
    Count {
        #[command(flatten)]
        font: FontArgs,
        /// Print the raw counts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save the counts as a report file
    Report {
        #[command(flatten)]
        font: FontArgs,
        /// Where to write the report; defaults to cjk_report/<font name>.txt
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the characters of one table or block the font is missing, or has
    Export {
        #[command(flatten)]
        font: FontArgs,
        /// Id of an encoding table or Unicode block, as listed by `tables`
        id: String,
        /// missing or overlap; defaults to the saved copy mode
        #[arg(short, long)]
        mode: Option<CopyMode>,
    },
    /// List the fonts in a file
    Fonts {
        /// The font or font collection file
        font: PathBuf,
    },
    /// List every encoding table and Unicode block
    Tables,
    /// Change and print the saved settings
    Settings {
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long)]
        language: Option<Locale>,
        #[arg(long)]
        copy_mode: Option<CopyMode>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("the file is a font collection, use --index to pick a font")]
    IndexRequired,
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("failed to encode counts: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// The message shown to the user.
    fn message(&self, locale: Locale) -> String {
        match self {
            CliError::Load(e) | CliError::Session(SessionError::Load(e))
                if matches!(
                    e,
                    LoadError::NotAFont | LoadError::DamagedFont(_) | LoadError::DamagedWebFont(_)
                ) =>
            {
                format!("{} ({e})", locale.label(Label::NotAValidFontMessage))
            }
            CliError::IndexRequired => {
                format!("{} --index <N>", locale.label(Label::PickFontForCounting))
            }
            other => other.to_string(),
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let store = SettingsStore::load(
        args.settings
            .clone()
            .unwrap_or_else(SettingsStore::default_path),
    );
    let locale = args.lang.unwrap_or(store.settings().language);

    let stdout = std::io::stdout();
    if let Err(e) = run(args.command, store, locale, &mut stdout.lock()) {
        eprintln!("{}", e.message(locale));
        std::process::exit(1);
    }
}

fn run(
    command: Command,
    mut store: SettingsStore,
    locale: Locale,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let catalogue = Catalogue::load();
    let mut session = Session::new(&catalogue);
    match command {
        Command::Count { font, json } => {
            let loaded = load(&mut session, &font, locale, out)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&loaded.result)?)?;
            } else {
                print_counts(&catalogue, &loaded, locale, out)?;
            }
        }
        Command::Report { font, output } => {
            let loaded = load(&mut session, &font, locale, out)?;
            let path = output.unwrap_or_else(|| default_report_path(&font.font));
            session.report(locale)?.save(&path)?;
            writeln!(out, "{}", locale.label(Label::ReportSaved))?;
            writeln!(
                out,
                "{}",
                locale
                    .label(Label::ReportSavedMessage)
                    .replace("{}", &path.display().to_string())
            )?;
            log::debug!("report for '{}' written", loaded.font_name);
        }
        Command::Export { font, id, mode } => {
            load(&mut session, &font, locale, out)?;
            let mode = mode.unwrap_or(store.settings().copy_mode);
            writeln!(out, "{}", session.export(&id, mode)?)?;
        }
        Command::Fonts { font } => {
            let file = FontFile::open(&font)?;
            print_font_list(&file.sub_font_names(), out)?;
        }
        Command::Tables => print_tables(&catalogue, locale, out)?,
        Command::Settings {
            theme,
            language,
            copy_mode,
        } => {
            let patch = SettingsPatch {
                theme,
                language,
                copy_mode,
            };
            if !patch.is_empty() {
                store.update(patch)?;
            }
            let settings = store.settings();
            writeln!(out, "theme: {}", settings.theme)?;
            writeln!(out, "language: {}", settings.language)?;
            writeln!(out, "copy_mode: {}", settings.copy_mode)?;
            writeln!(out, "# {}", store.path().display())?;
        }
    }
    Ok(())
}

/// Load the requested font into `session`.
///
/// Without `--index`, a collection is not loaded; its fonts are listed instead.
fn load(
    session: &mut Session<'_>,
    args: &FontArgs,
    locale: Locale,
    out: &mut impl Write,
) -> Result<Arc<LoadedFont>, CliError> {
    let mut listing = Ok(());
    let loaded = session.load_file(&args.font, |names| {
        if args.index.is_none() {
            listing = writeln!(out, "{}", locale.label(Label::CollectionSelection))
                .and_then(|_| print_font_list(names, out));
        }
        args.index
    });
    listing?;
    let loaded = match loaded {
        Err(SessionError::NoSelection) => return Err(CliError::IndexRequired),
        other => other?,
    };
    if args.index.is_some_and(|index| index > 0) && loaded.sub_font == 0 {
        log::warn!("{} is not a collection, ignoring --index", args.font.display());
    }
    Ok(loaded)
}

fn print_font_list(names: &[String], out: &mut impl Write) -> std::io::Result<()> {
    for (index, name) in names.iter().enumerate() {
        writeln!(out, "{index}: {name}")?;
    }
    Ok(())
}

fn print_counts(
    catalogue: &Catalogue,
    loaded: &LoadedFont,
    locale: Locale,
    out: &mut impl Write,
) -> std::io::Result<()> {
    writeln!(out, "{}{}", locale.label(Label::FontCaption), loaded.font_name)?;
    if let Some(path) = &loaded.path {
        writeln!(out, "{}{}", locale.label(Label::FileCaption), path.display())?;
    }
    for section in Report::build(catalogue, &loaded.result, locale).sections {
        writeln!(out)?;
        writeln!(out, "{}", section.title)?;
        for row in section.rows {
            writeln!(out, "  {}: {}/{}", row.name, row.count, row.full_size)?;
        }
    }
    writeln!(out)?;
    writeln!(out, "UVS: {}", loaded.characters.variation_pairs().len())
}

fn print_tables(catalogue: &Catalogue, locale: Locale, out: &mut impl Write) -> std::io::Result<()> {
    for section in locale.section_order() {
        writeln!(out, "{}", locale.section_title(section))?;
        let entries: Vec<&dyn Repertoire> = match section {
            Section::Encodings(group) => catalogue
                .tables_in_group(group)
                .map(|table| table as &dyn Repertoire)
                .collect(),
            Section::UnicodeBlocks => catalogue
                .blocks_ordered()
                .iter()
                .map(|block| block as &dyn Repertoire)
                .collect(),
        };
        for entry in entries {
            writeln!(
                out,
                "  {:<24} {:>6}  {}",
                entry.id(),
                entry.len(),
                entry.name().get(locale)
            )?;
        }
    }
    Ok(())
}

/// `cjk_report/<file stem>.txt`, relative to the working directory.
fn default_report_path(font: &Path) -> PathBuf {
    let stem = font
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    Path::new("cjk_report").join(format!("{stem}.txt"))
}
