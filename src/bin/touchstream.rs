//! Touchstream CLI
//!
//! Commands:
//! - run: stream sensor lines from a file or stdin through the pipeline,
//!   printing one snapshot per line as NDJSON and optionally writing the
//!   continuous CSV log on exit
//! - config: print the effective processor configuration as JSON

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::Duration;

use touchstream::{
    ContinuousLogger, IngestSession, LogRecord, ProcessorConfig, SnapshotCell, StreamProcessor,
    ThresholdMode, TOUCHSTREAM_VERSION,
};

/// Touchstream - capacitive touch stream processor
#[derive(Parser)]
#[command(name = "touchstream")]
#[command(version = TOUCHSTREAM_VERSION)]
#[command(about = "Classify capacitive touch events from a sensor line stream", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream sensor lines through the pipeline
    Run {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Write the continuous log as CSV to this path on exit
        #[arg(long)]
        log_csv: Option<PathBuf>,

        /// Continuous-log sampling interval in milliseconds
        #[arg(long, default_value = "100")]
        interval_ms: u64,

        /// Suppress per-line snapshot output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the effective processor configuration as JSON
    Config {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// Number of tracked electrodes (each line carries 2x this many fields)
    #[arg(long, default_value = "1")]
    electrodes: usize,

    /// Touch threshold applied to smoothed deltas
    #[arg(long, default_value = "10")]
    threshold: f64,

    /// Moving-average window size
    #[arg(long, default_value = "2")]
    window: usize,

    /// Rolling-history capacity in samples
    #[arg(long, default_value = "40")]
    history: usize,

    /// Monitored channel indices, e.g. "0,0" or "3,7"
    #[arg(long, default_value = "0,0")]
    channels: String,

    /// Threshold comparison mode
    #[arg(long, value_enum, default_value = "inclusive")]
    mode: ModeArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Touch when value >= threshold
    Inclusive,
    /// Touch when value > threshold
    Strict,
}

impl From<ModeArg> for ThresholdMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Inclusive => ThresholdMode::Inclusive,
            ModeArg::Strict => ThresholdMode::Strict,
        }
    }
}

impl ConfigArgs {
    fn build(&self) -> Result<ProcessorConfig, String> {
        let channels = parse_channels(&self.channels)?;
        let config = ProcessorConfig {
            electrode_count: self.electrodes,
            threshold: self.threshold,
            smoothing_window: self.window,
            history_capacity: self.history,
            channels,
            threshold_mode: self.mode.into(),
        };
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

fn parse_channels(spec: &str) -> Result<(usize, usize), String> {
    let parts: Vec<&str> = spec.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("expected two channel indices, got '{spec}'"));
    }
    let first = parts[0]
        .trim()
        .parse()
        .map_err(|_| format!("invalid channel index '{}'", parts[0]))?;
    let second = parts[1]
        .trim()
        .parse()
        .map_err(|_| format!("invalid channel index '{}'", parts[1]))?;
    Ok((first, second))
}

fn open_input(path: &PathBuf) -> io::Result<Box<dyn BufRead + Send>> {
    if path.as_os_str() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "refusing to read from a terminal; pipe sensor lines in or pass --input",
            ));
        }
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

fn write_log_csv(path: &PathBuf, records: &[LogRecord]) -> io::Result<()> {
    let mut out = String::with_capacity((records.len() + 1) * 64);
    out.push_str(LogRecord::CSV_HEADER);
    out.push('\n');
    for record in records {
        out.push_str(&record.csv_row());
        out.push('\n');
    }
    fs::write(path, out)
}

fn cmd_run(
    input: PathBuf,
    config: ConfigArgs,
    log_csv: Option<PathBuf>,
    interval_ms: u64,
    quiet: bool,
) -> Result<(), String> {
    let config = config.build()?;
    let processor = StreamProcessor::new(config).map_err(|e| e.to_string())?;
    let reader = open_input(&input).map_err(|e| e.to_string())?;

    let cell = SnapshotCell::new();
    let (tx, rx) = mpsc::channel();
    let session = IngestSession::spawn(reader, processor, cell.clone(), Some(tx));

    let logger = log_csv
        .as_ref()
        .map(|_| ContinuousLogger::with_interval(cell, Duration::from_millis(interval_ms)));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for snapshot in rx {
        if quiet {
            continue;
        }
        let json = serde_json::to_string(&snapshot).map_err(|e| e.to_string())?;
        if writeln!(out, "{json}").is_err() {
            // Downstream closed; keep ingesting so the final state and the
            // continuous log stay complete.
            break;
        }
    }

    let processor = session.join().map_err(|e| e.to_string())?;

    if let (Some(path), Some(logger)) = (log_csv, logger) {
        let records = logger.stop();
        write_log_csv(&path, &records).map_err(|e| e.to_string())?;
        eprintln!("wrote {} log records to {}", records.len(), path.display());
    }

    eprintln!(
        "channel 1: {} touches, {:.2}s; channel 2: {} touches, {:.2}s",
        processor.channel1().activation_count,
        processor.channel1().cumulative_active_seconds,
        processor.channel2().activation_count,
        processor.channel2().cumulative_active_seconds,
    );
    Ok(())
}

fn cmd_config(config: ConfigArgs) -> Result<(), String> {
    let config = config.build()?;
    let json = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            config,
            log_csv,
            interval_ms,
            quiet,
        } => cmd_run(input, config, log_csv, interval_ms, quiet),
        Commands::Config { config } => cmd_config(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
