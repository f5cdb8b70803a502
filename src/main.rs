use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use committee_assign::{assign, read_roster_path, report, CommitteeTable, CostConfig, RosterFormat};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "committee-assign")]
#[command(about = "Assign people to committee seats by ranked preference")]
#[command(version)]
struct Cli {
    /// Preference form export (CSV)
    preferences: PathBuf,

    /// Committee table (TOML, `[[committee]]` entries); built-in table if omitted
    #[arg(long, short = 'c')]
    committees: Option<PathBuf>,

    /// Number of ranked choices per person
    #[arg(long, default_value_t = 6)]
    choices: usize,

    /// Cost of a committee the person did not rank (defaults to --choices)
    #[arg(long)]
    penalty: Option<i64>,

    /// 0-based column holding the person's name
    #[arg(long, default_value_t = 2)]
    name_column: usize,

    /// 0-based column holding the first choice
    #[arg(long, default_value_t = 5)]
    first_choice_column: usize,

    /// The CSV has no header row
    #[arg(long)]
    no_header: bool,

    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "committee_assign=info",
        1 => "committee_assign=debug",
        _ => "committee_assign=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let table = match &cli.committees {
        Some(path) => CommitteeTable::load(path)
            .with_context(|| format!("loading committees from {}", path.display()))?,
        None => CommitteeTable::default(),
    };

    let format = RosterFormat {
        name_column: cli.name_column,
        first_choice_column: cli.first_choice_column,
        num_choices: cli.choices,
        has_header: !cli.no_header,
    };
    let people = read_roster_path(&cli.preferences, &format)
        .with_context(|| format!("reading {}", cli.preferences.display()))?;

    let config = CostConfig {
        num_choices: cli.choices,
        unranked_penalty: cli.penalty,
    };
    let assignment = assign(&people, table.committees(), config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        Format::Text => report::write_text(&mut out, &assignment)?,
        Format::Json => report::write_json(&mut out, &assignment)?,
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
