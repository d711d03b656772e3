mod config;
mod pipe;
mod pretty;

use config::Config;

use std::io::{self, IsTerminal, Read};

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Parser;
use colored::{control::set_override, Colorize};
use datemark_core::{segments_for, Datemark};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

const LONG_ABOUT: &str = r##"
Datemark finds natural-language dates in short texts like task titles.

Type the task the way you would say it and dmark tells you what the task is
and when it is due. Shorthands are understood and reported in your own words:
"call mom tom" is the task "call mom", due tomorrow, and the date is "tom".

RECOGNIZED DATES:
  Shorthands:   tod, tom, yes, mon, tue, wed, thu, fri, sat, sun
  Relative:     today, tonight, tomorrow, yesterday, the day after tomorrow
  Weekdays:     friday, on friday, next friday, last tuesday
  Periods:      next week, last month, this year
  Offsets:      in 3 days, 2 weeks ago, a month from now, in 2 hours
  Calendar:     dec 15, 15 march, jan 3, 2025, 2024-03-01, 4/15
  Holidays:     christmas, new year's eve, halloween, valentine's day
  Boundaries:   end of month, start of the week
  Times:        tomorrow at 5pm, 9am friday, at 3pm

EXAMPLES:
  dmark "call mom tom"                 Task and due date
  dmark --task "pay rent fri"          Markdown checklist line
  dmark -j "meeting mon and tue"       JSON output
  dmark --segments "lunch tom at noon" Highlight segments

PIPED INPUT:
  Piped text is read when no input argument is given:
    echo "call mom tom" | dmark

TEE MODE:
  Pass through input while annotating dates (like tee):
    cat todo.txt | dmark --tee         Annotate every line
    cat todo.txt | dmark -T -H         Highlight dates inline
    cat todo.txt | dmark -T -j         One JSON object per line

CONFIGURATION:
  Settings can be configured via CLI flags, environment variables, or config file.
  Precedence: CLI args > Environment vars > Config file > Defaults

  Setting      | CLI flag         | Env var             | Default
  -------------|------------------|---------------------|---------
  no_color     | -C, --no-color   | DMARK_NO_COLOR      | false
  highlight    | -H, --highlight  | DMARK_HIGHLIGHT     | false
  forward_date | -n, --nearest    | DMARK_FORWARD_DATE  | true

  Custom shorthands go in the [shorthands] table of the config file.

  Config file location: dmark --config-path
  Generate default config: dmark --config-init

  Note: NO_COLOR env var is also respected (https://no-color.org/)"##;

#[derive(Parser)]
#[command(name = "dmark")]
#[command(version)]
#[command(about = "Find natural-language dates in text")]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    /// The text to search for dates
    ///
    /// Usually a task title like "call mom tom" or "pay rent fri".
    /// When omitted, text is read from piped stdin.
    #[arg(value_name = "TEXT")]
    input: Option<String>,

    /// Output the result as JSON (for scripting/piping)
    #[arg(long, short = 'j')]
    json: bool,

    /// Output a Markdown checklist line with the due date
    #[arg(long)]
    task: bool,

    /// Output highlight segments (text and dates in order)
    ///
    /// With --json, segments are added to the JSON object.
    #[arg(long, short = 's')]
    segments: bool,

    // === Tee mode options ===
    /// Tee mode: pass through stdin while annotating dates
    ///
    /// Like Unix `tee`, but annotates every date under the line it was found in.
    #[arg(long, short = 'T')]
    tee: bool,

    /// Highlight dates inline with color
    ///
    /// In tee mode, highlights dates with background color.
    #[arg(long, short = 'H')]
    highlight: bool,

    /// Force tee mode even when stdin is a TTY (for testing)
    #[arg(long, hide = true)]
    force_tee: bool,

    /// Resolve ambiguous dates to the nearest occurrence instead of the next one
    ///
    /// Without this, "fri" on a Monday is the coming Friday; with it, the
    /// Friday three days ago.
    #[arg(long, short = 'n')]
    nearest: bool,

    /// Resolve relative dates against this instant instead of now
    ///
    /// Format: YYYY-MM-DD, YYYY-MM-DDTHH:MM or YYYY-MM-DD HH:MM[:SS]
    #[arg(long, short = 'r', value_name = "WHEN")]
    reference: Option<String>,

    /// Disable colored output
    #[arg(long, short = 'C')]
    no_color: bool,

    /// Enable verbose logging (use multiple times for more detail)
    ///
    /// -v shows debug messages, -vv shows trace messages.
    /// Useful for understanding why something was or wasn't matched.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Show config file path
    #[arg(long)]
    config_path: bool,

    /// Generate default config file (see --config-path for location)
    #[arg(long)]
    config_init: bool,
}

/// Parse a reference instant like "2024-01-15" or "2024-01-15T10:00".
fn parse_reference(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| {
            format!(
                "Invalid reference '{}'. Use YYYY-MM-DD or YYYY-MM-DDTHH:MM",
                s
            )
        })
}

/// Print an error line and exit.
fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), message);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    // Handle --config-path
    if cli.config_path {
        match Config::path() {
            Some(path) => println!("{}", path.display()),
            None => fail("Cannot determine config directory"),
        }
        return;
    }

    // Handle --config-init
    if cli.config_init {
        match config::init_config() {
            Ok(path) => println!("Created config file: {}", path.display()),
            Err(e) => fail(e),
        }
        return;
    }

    // Initialize tracing based on verbosity level (before config loading for logging)
    let level = match cli.verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    if level != LevelFilter::OFF {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    // Load config file and merge with CLI args
    // Precedence: CLI args > Environment vars > Config file > Defaults
    let file_config = Config::load();

    if let Some(path) = Config::path() {
        if path.exists() {
            tracing::debug!("Loaded config from: {}", path.display());
        } else {
            tracing::trace!("No config file at: {}", path.display());
        }
    }

    let no_color = cli.no_color || file_config.no_color();
    if no_color {
        set_override(false);
    }

    let highlight = cli.highlight || file_config.highlight();
    let forward_date = !cli.nearest && file_config.forward_date();
    tracing::debug!(highlight, forward_date, no_color, "settings");

    let shorthands = file_config.shorthand_table().unwrap_or_else(|e| fail(e));
    if shorthands.len() != datemark_core::shorthand::BUILTIN_SHORTHANDS.len() {
        tracing::debug!("{} shorthands (custom entries from config)", shorthands.len());
    }

    let reference = match cli.reference.as_deref() {
        Some(s) => parse_reference(s).unwrap_or_else(|e| fail(e)),
        None => Local::now().naive_local(),
    };
    tracing::debug!("reference = {}", reference);

    let dm = Datemark::new()
        .set_shorthands(shorthands)
        .forward_date(forward_date);

    // Tee mode passes through stdin while annotating dates
    let stdin_is_pipe = !io::stdin().is_terminal();
    if cli.tee || cli.force_tee {
        if !stdin_is_pipe && !cli.force_tee {
            fail("--tee requires piped input (e.g., cat todo.txt | dmark --tee)");
        }

        let tee_config = pipe::TeeConfig {
            highlight,
            json: cli.json,
            reference,
        };

        if let Err(e) = pipe::run_tee_mode(&dm, &tee_config) {
            fail(format!("Failed to read stdin: {}", e));
        }
        return;
    }

    let input = if let Some(input) = cli.input {
        input
    } else if stdin_is_pipe {
        let mut buffer = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buffer) {
            fail(format!("Failed to read stdin: {}", e));
        }
        buffer.trim().to_string()
    } else {
        // No input provided
        eprintln!("{}: No input provided", "error".red().bold());
        eprintln!();
        eprintln!("Usage: {} <TEXT>", "dmark".bold());
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  dmark \"call mom tom\"          Task and due date");
        eprintln!("  dmark --task \"pay rent fri\"   Markdown checklist line");
        eprintln!("  echo \"gym sat\" | dmark        Pipe text input");
        eprintln!();
        eprintln!("Tee mode (pass-through with annotations):");
        eprintln!("  cat todo.txt | dmark -T -H   Annotate and highlight every line");
        eprintln!();
        eprintln!("Run {} for more information.", "dmark --help".bold());
        std::process::exit(1);
    };

    let result = dm
        .extract_at(&input, reference)
        .unwrap_or_else(|e| fail(e));
    let segments = segments_for(&input, &result);

    // Handle --json output
    if cli.json {
        let mut output = match serde_json::to_value(&result) {
            Ok(value) => value,
            Err(e) => fail(format!("Failed to serialize result: {}", e)),
        };
        if cli.segments {
            match serde_json::to_value(&segments) {
                Ok(value) => output["segments"] = value,
                Err(e) => fail(format!("Failed to serialize segments: {}", e)),
            }
        }
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(format!("Failed to serialize result: {}", e)),
        }
        return;
    }

    // Handle --task output
    if cli.task {
        println!("{}", result.task_line());
        return;
    }

    // Handle --segments output
    if cli.segments {
        for segment in &segments {
            println!("{}", pretty::segment_line(segment));
        }
        return;
    }

    // Standard human-readable output
    for line in pretty::render_result(&segments, &result, reference.date()) {
        println!("{}", line);
    }
}
