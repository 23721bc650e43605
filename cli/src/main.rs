//! orgsheet CLI - organization/event spreadsheet tool
//!
//! Flattens the sheet into a plain-text seed document or upserts it into the
//! `organizations` table of a REST backend.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use orgsheet::import::{
    build_payload, BatchUpserter, ImportConfig, RestClient, DEFAULT_BATCH_SIZE,
    DEFAULT_INPUT_PATH,
};
use orgsheet::render::{to_json, to_seed_text, JsonFormat};
use orgsheet::sheet::SheetParser;
use orgsheet::xlsx::XlsxReader;
use orgsheet::{Organization, TagFormat};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Seed text written by `flatten` when no output is given.
const DEFAULT_SEED_PATH: &str = "data/backboard_seed.txt";

/// Organization/event spreadsheets to seed text and REST upserts
#[derive(Parser)]
#[command(
    name = "orgsheet",
    author = "cultura",
    version,
    about = "Flatten or import an organization/event spreadsheet",
    long_about = "orgsheet - organization/event spreadsheet tool.\n\n\
                  Reads the active sheet of an XLSX workbook (banner row, header row, data rows)\n\
                  and writes a plain-text seed document or upserts the organizations over REST."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the plain-text seed document
    Flatten {
        /// Input workbook, resolved against the working directory
        #[arg(default_value = DEFAULT_INPUT_PATH)]
        input: PathBuf,

        /// Output text file (overwritten)
        #[arg(short, long, default_value = DEFAULT_SEED_PATH)]
        output: PathBuf,
    },

    /// Upsert organizations into the backend
    Import {
        /// Input workbook (overrides IMPORT_XLSX_PATH; default Organization_Event.xlsx in the working directory)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Records per request
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Print the request payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the parsed organizations as JSON
    Json {
        /// Input workbook
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tag representation
        #[arg(long, default_value = "list")]
        tags: TagMode,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show workbook and column information
    Info {
        /// Input workbook
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Tag representation
#[derive(Clone, ValueEnum)]
enum TagMode {
    /// Cell text as written
    Raw,
    /// Comma-separated list
    List,
}

impl From<TagMode> for TagFormat {
    fn from(mode: TagMode) -> Self {
        match mode {
            TagMode::Raw => TagFormat::Raw,
            TagMode::List => TagFormat::List,
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        if let Some(orgsheet::Error::RemoteWrite { committed, .. }) =
            e.downcast_ref::<orgsheet::Error>()
        {
            if *committed > 0 {
                eprintln!(
                    "{} {} organizations were upserted before the failure",
                    "!".yellow().bold(),
                    committed
                );
            }
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Flatten { input, output } => {
            let pb = create_spinner("Flattening workbook...");
            let result = flatten(&input, &output);
            pb.finish_and_clear();
            let count = result?;

            println!("{} Wrote {}", "✓".green().bold(), output.display());
            println!("Organizations: {}", count);
        }

        Commands::Import {
            input,
            batch_size,
            dry_run,
        } => {
            dotenvy::dotenv().ok();
            let config = ImportConfig::from_lookup(|key| env::var(key).ok(), input)?;
            tracing::debug!(?config, "import configuration loaded");

            let pb = create_spinner("Parsing workbook...");
            let orgs = orgsheet::parse_file(&config.input_path, TagFormat::List)?;
            let payload = build_payload(&orgs, &config.owner_id);

            if dry_run {
                pb.finish_and_clear();
                write_output(None, &to_json(&payload, JsonFormat::Pretty)?)?;
                return Ok(());
            }

            pb.set_message(format!("Upserting {} organizations...", payload.len()));
            let upserter = BatchUpserter::new(RestClient::new(&config)?).with_batch_size(batch_size);
            let result = upserter.upsert_all(&payload);
            pb.finish_and_clear();

            let report = result?;
            println!("Upserted {} organizations.", report.upserted);
        }

        Commands::Json {
            input,
            output,
            tags,
            compact,
        } => {
            let pb = create_spinner("Parsing workbook...");
            let orgs = orgsheet::parse_file(&input, tags.into())?;
            pb.set_message("Rendering to JSON...");

            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let json = to_json(&orgs, format)?;

            pb.finish_and_clear();
            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!(
                    "{} Converted to JSON: {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing workbook...");

            let reader = XlsxReader::open(&input)?;
            let sheet = reader.active_sheet()?;
            let layout = SheetParser::layout(&sheet.rows)?;
            let orgs = SheetParser::new(TagFormat::List).parse(&sheet.rows)?;

            pb.finish_and_clear();

            println!("{}", "Workbook Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Sheets".bold(), reader.sheet_names().join(", "));
            println!("{}: {}", "Active sheet".bold(), sheet.name);
            println!("{}: {}", "Rows".bold(), sheet.rows.len());

            println!("\n{}", "Columns".cyan().bold());
            println!("{}", "─".repeat(40));
            for (label, col) in [
                ("Organization name", layout.name),
                ("Organization description", layout.org_description),
                ("Organization tags", layout.org_tags),
                ("Event title", layout.title),
                ("Event description", layout.event_description),
                ("Event date", layout.date),
                ("Event tags", layout.event_tags),
            ] {
                println!("{}: {}", label.bold(), column_letter(col));
            }

            println!("\n{}", "Content Statistics".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Organizations".bold(), orgs.len());
            println!("{}: {}", "Events".bold(), Organization::event_count(&orgs));
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "orgsheet".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Organization/event spreadsheets to seed text and REST upserts");
}

/// Write the seed text of `input` to `output` and return the organization count.
///
/// The workbook is parsed in full first; on any error nothing is written.
fn flatten(input: &Path, output: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    require_file(input)?;
    let orgs = orgsheet::parse_file(input, TagFormat::Raw)?;
    let text = to_seed_text(&orgs);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, text)?;
    Ok(orgs.len())
}

fn require_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(())
    } else {
        Err(format!("Missing {}", path.display()).into())
    }
}

/// Zero-based column index to its spreadsheet letter (`0` → `A`, `26` → `AA`).
fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
