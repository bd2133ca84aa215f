use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::{error, LevelFilter};
use seiscore::recording::{Recording, RecordingOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seiscore", about = "Inspect Baikal-7, Baikal-8 and Sigma seismic recordings")]
struct Cli {
    /// Log decoder activity (repeat for field-level tracing)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the decoded header summary of one or more recordings
    Info {
        #[arg(required = true, num_args = 1..)]
        input: Vec<PathBuf>,
        /// Target frequency in Hz (0 = native)
        #[arg(short, long, default_value = "0")]
        resample: u16,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Map a time window onto sample indices
    Window {
        input: PathBuf,
        /// Window start, RFC 3339 (e.g. 2022-01-20T08:21:05Z)
        #[arg(long)]
        start: DateTime<Utc>,
        /// Window stop, RFC 3339
        #[arg(long)]
        stop: DateTime<Utc>,
        #[arg(short, long, default_value = "0")]
        resample: u16,
    },
}

fn main() {
    let cli = Cli::parse();
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .format_timestamp_secs()
        .init();

    if let Err(e) = run(cli.command) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input, resample, json } => {
            let mut infos = Vec::with_capacity(input.len());
            for path in &input {
                let rec = open_recording(path, resample);
                rec.resample_frequency()?;
                infos.push(rec.file_info()?);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&infos)?);
                return Ok(());
            }

            println!("{:<40} {:<8} {:>6} {:<32} {:<32} {:>12} {:>11} {:>11}",
                     "Name", "Format", "Hz", "Start", "Stop", "Duration", "Longitude", "Latitude");
            for info in &infos {
                println!("{:<40} {:<8} {:>6} {:<32} {:<32} {:>12} {:>11.5} {:>11.5}",
                    info.name(), info.format_type, info.frequency,
                    info.start_time.to_rfc3339(), info.stop_time.to_rfc3339(),
                    info.formatted_duration(),
                    info.coordinate.longitude, info.coordinate.latitude);
            }
        }

        // ── Window ───────────────────────────────────────────────────────────
        Commands::Window { input, start, stop, resample } => {
            let rec = open_recording(&input, resample);
            let range = rec.sample_index_range(start, stop)?;
            let factor = rec.resample_factor()?;
            println!("Recording       {}", input.display());
            println!("Start index     {}", range.start_index);
            println!("Stop index      {}", range.stop_index);
            println!("Native samples  {}", range.len());
            println!("Output samples  {}", range.len() / u64::from(factor));
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn open_recording(path: &PathBuf, resample: u16) -> Recording {
    Recording::with_options(path, RecordingOptions {
        resample_frequency: resample,
        ..Default::default()
    })
}
