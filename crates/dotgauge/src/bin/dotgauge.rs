//! dotgauge CLI — run the extensometer over recorded frames, or rescale a
//! recorded CSV into physical units.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use dotgauge::convert::convert_csv;
use dotgauge::detect::DirFrameSource;
use dotgauge::sink::CsvSink;
use dotgauge::{Extensometer, Strategy};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "dotgauge")]
#[command(about = "Track two red dots across frames and measure their separation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging.
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a directory of frames into a measurement CSV.
    Run(RunArgs),

    /// Rescale a recorded pixel-distance CSV into physical units.
    Convert(ConvertArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Directory of frame images, processed in name order.
    #[arg(long)]
    frames: PathBuf,

    /// Output measurement CSV.
    #[arg(long)]
    out: PathBuf,

    /// Detection strategy (contour, moments, hough, enclosing-circle,
    /// radial-symmetry, least-squares).
    #[arg(long, default_value = "moments")]
    strategy: String,

    /// Initial dot spacing in physical units (the calibration reference).
    #[arg(long)]
    reference: f64,

    /// Nominal frame rate used to synthesize timestamps.
    #[arg(long, default_value = "30.0")]
    fps: f64,
}

#[derive(Debug, Clone, Args)]
struct ConvertArgs {
    /// Input CSV produced by `dotgauge run`.
    #[arg(long)]
    input: PathBuf,

    /// Output CSV with distances in physical units.
    #[arg(long)]
    out: PathBuf,

    /// Initial dot spacing in physical units.
    #[arg(long)]
    reference: f64,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = dotgauge::core::init_with_level(level);

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Convert(args) => cmd_convert(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn cmd_run(args: RunArgs) -> CliResult<()> {
    // Strategy names fail here, before any frame is touched.
    let strategy: Strategy = args.strategy.parse()?;
    let mut ext = Extensometer::with_defaults(strategy, args.reference)?;

    let mut source = DirFrameSource::open(&args.frames, args.fps)?;
    if source.is_empty() {
        return Err(format!("no frames found in {}", args.frames.display()).into());
    }
    log::info!(
        "processing {} frames with strategy {strategy}",
        source.len()
    );

    let mut sink = CsvSink::new(BufWriter::new(File::create(&args.out)?))?;
    let stop = AtomicBool::new(false);
    let stats = ext.run(&mut source, &mut sink, &stop)?;
    sink.into_inner()?;

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> CliResult<()> {
    let reader = BufReader::new(File::open(&args.input)?);
    let writer = BufWriter::new(File::create(&args.out)?);
    let rows = convert_csv(reader, writer, args.reference)?;
    log::info!("wrote {rows} rows to {}", args.out.display());
    Ok(())
}
