use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use sievealign::smith_waterman::WindowScorer;
use sievealign::{
    Alignment, Config, Error, FILL_1, FILL_2, Sequence, Strategy, search, search::write_header,
};

/// Exit status for unreadable input files
const EXIT_INPUT: u8 = 7;

#[derive(Parser)]
#[command(name = "sievealign")]
#[command(about = "Best 50 byte window alignment of every offset of SEQ1 against SEQ2", long_about = None)]
#[command(version)]
struct Cli {
    /// First sequence, one result line per offset
    #[arg(value_name = "SEQ1")]
    seq1: PathBuf,

    /// Second sequence
    #[arg(value_name = "SEQ2")]
    seq2: PathBuf,

    /// Number of worker threads
    #[arg(value_name = "THREADS")]
    threads: usize,

    /// Minimum score to report
    #[arg(value_name = "THRESHOLD")]
    threshold: u16,

    /// Output file
    #[arg(value_name = "OUT")]
    out: PathBuf,

    /// Skip map representation
    #[arg(short, long, value_enum, default_value_t = Strategy::default())]
    strategy: Strategy,

    /// Rows below the current one a skip may reach, for the ring based strategies
    #[arg(short, long, value_name = "INT", default_value_t = 16)]
    lookahead: usize,

    /// Count scored and skipped cells
    #[arg(long)]
    stats: bool,

    /// Verbose level: 1=error, 2=warning, 3=message, 4=debug, 5+=trace
    #[arg(short, long, value_name = "INT", default_value = "3")]
    verbosity: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            match err.downcast_ref::<Error>() {
                Some(Error::Input { .. }) => ExitCode::from(EXIT_INPUT),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config {
        threads: cli.threads,
        threshold: cli.threshold,
        strategy: cli.strategy,
        lookahead: cli.lookahead,
        stats: cli.stats,
    };
    config.validate()?;

    let scorer = WindowScorer::new();
    log::info!("Using threshold {}", config.threshold);
    log::info!("Using {} threads", config.threads);
    log::info!(
        "Using {} skip map, lookahead {}",
        config.strategy,
        config.lookahead
    );
    log::info!("Using {} bit window scorer", scorer.width());

    let load_start = Instant::now();
    let seq1 = Sequence::load(&cli.seq1, FILL_1)?;
    let seq2 = Sequence::load(&cli.seq2, FILL_2)?;
    log::info!("Loaded sequences in {:.2?}", load_start.elapsed());

    let out = File::create(&cli.out)
        .with_context(|| format!("could not create output file {}", cli.out.display()))?;
    let mut out = BufWriter::new(out);
    write_header(&mut out, &cli.seq1, &cli.seq2)?;

    let cells = Alignment::new(&seq1, &seq2, scorer);
    let summary = search(&cells, &config, &mut out)?;

    println!("Result hash: {:08X}", summary.hash);
    if let Some(stats) = summary.stats {
        println!("{stats}");
    }
    Ok(())
}
