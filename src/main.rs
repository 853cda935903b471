//! Command-line front end: read a race config and events file, write the
//! audit log and print the final standings.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use biathlon_results::{ingest, render_standings, Race, RaceConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "biathlon", about = "Compute biathlon race results from an event log", version)]
struct Cli {
    /// Race configuration (JSON, or TOML with a .toml extension)
    #[arg(short, long, default_value = "config/config.json")]
    config: PathBuf,

    /// Events file, one event per line
    #[arg(short, long, default_value = "config/events")]
    events: PathBuf,

    /// Directory for events.log and errors.log
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase diagnostic verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = RaceConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    let mut race = Race::new(&config).context("setting up race")?;

    let events = File::open(&cli.events)
        .with_context(|| format!("opening events {}", cli.events.display()))?;
    let summary = ingest(&mut race, BufReader::new(events))
        .with_context(|| format!("reading events {}", cli.events.display()))?;

    fs::create_dir_all(&cli.log_dir)
        .with_context(|| format!("creating log directory {}", cli.log_dir.display()))?;

    let events_log = cli.log_dir.join("events.log");
    let mut writer = BufWriter::new(File::create(&events_log)?);
    for entry in race.journal() {
        writeln!(writer, "{}", entry)?;
    }
    writer.flush()?;

    let errors_log = cli.log_dir.join("errors.log");
    if !summary.rejected.is_empty() {
        let mut writer = BufWriter::new(File::create(&errors_log)?);
        for rejected in &summary.rejected {
            writeln!(writer, "{}", rejected)?;
        }
        writer.flush()?;
    } else if errors_log.exists() {
        fs::remove_file(&errors_log)?;
    }

    let standings = race.final_standings();
    match cli.format {
        OutputFormat::Text => print!("{}", render_standings(&standings)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&standings)?),
    }

    eprintln!("Audit log written to {}", events_log.display());
    if !summary.rejected.is_empty() {
        eprintln!(
            "{} malformed lines written to {}",
            summary.rejected.len(),
            errors_log.display()
        );
    }

    Ok(())
}
