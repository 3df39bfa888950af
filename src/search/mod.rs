//! Row-parallel search. The rows of the matrix are split into near-equal contiguous bands, one
//! per thread. Each thread owns its skip map and streams its row results into one shared
//! [`ResultCollector`], so output lines arrive in no particular row order while the checksum
//! stays the same for any thread count.

use std::io::{self, Write};
use std::ops::Range;
use std::thread;

use itertools::Itertools;

mod cells;
mod collector;
mod result;
mod worker;

pub use cells::{Alignment, Cells};
pub use collector::{ResultCollector, SkipStats, Summary, write_header};
pub use result::SearchResult;

use crate::skip::{ChainMap, CounterMap, DottedMap, FlagMap, Skipper, Strategy, WindowMap};
use crate::{Config, Result};
use worker::Worker;

/// Searches every row of `cells`, writing one line per row with a valid result to `writer`
pub fn search<C, W>(cells: &C, config: &Config, writer: W) -> Result<Summary>
where
    C: Cells + ?Sized,
    W: Write + Send,
{
    dispatch(cells, config, writer, false).map(|(summary, _)| summary)
}

/// Searches every row of `cells`, returning the valid results in ascending row order
pub fn search_rows<C>(cells: &C, config: &Config) -> Result<Vec<SearchResult>>
where
    C: Cells + ?Sized,
{
    dispatch(cells, config, io::sink(), true).map(|(_, results)| results)
}

fn dispatch<C, W>(
    cells: &C,
    config: &Config,
    writer: W,
    keep: bool,
) -> Result<(Summary, Vec<SearchResult>)>
where
    C: Cells + ?Sized,
    W: Write + Send,
{
    config.validate()?;
    match config.strategy {
        Strategy::FlagMap => run::<FlagMap, _, _>(cells, config, writer, keep),
        Strategy::CounterMap => run::<CounterMap, _, _>(cells, config, writer, keep),
        Strategy::WindowMap => run::<WindowMap, _, _>(cells, config, writer, keep),
        Strategy::IntervalChain => run::<ChainMap, _, _>(cells, config, writer, keep),
        Strategy::DottedList => run::<DottedMap, _, _>(cells, config, writer, keep),
    }
}

/// Rows `rows * band / bands .. rows * (band + 1) / bands`. Bands are empty when there are
/// more threads than rows.
fn band(rows: usize, bands: usize, band: usize) -> Range<usize> {
    rows * band / bands..rows * (band + 1) / bands
}

fn run<K, C, W>(
    cells: &C,
    config: &Config,
    writer: W,
    keep: bool,
) -> Result<(Summary, Vec<SearchResult>)>
where
    K: Skipper,
    C: Cells + ?Sized,
    W: Write + Send,
{
    let rows = cells.rows();
    let threads = config.threads;
    let collector = ResultCollector::new(writer, rows);

    let outcomes: Vec<io::Result<Vec<SearchResult>>> = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|index| {
                let rows = band(rows, threads, index);
                let collector = &collector;
                s.spawn(move || {
                    log::debug!("Worker {index} scanning rows {}..{}", rows.start, rows.end);
                    let mut worker = Worker::<C, K>::new(cells, config);
                    let outcome = worker.run(rows.clone(), collector, keep);
                    if let Some(stats) = worker.stats() {
                        collector.record_stats(stats);
                    }
                    log::debug!("Worker {index} finished {} rows", rows.len());
                    outcome
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    // Every worker has been joined, report the first failure
    let bands = outcomes.into_iter().collect::<io::Result<Vec<_>>>()?;
    let results = bands.into_iter().kmerge().collect();

    let summary = collector.finish();
    log::info!(
        "Searched {} rows in {:.2?}, {} results",
        summary.rows,
        summary.elapsed,
        summary.results
    );
    Ok((summary, results))
}
