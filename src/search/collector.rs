use std::fmt;
use std::io::{self, Write};
use std::ops::AddAssign;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::SearchResult;
use crate::r#const::PROGRESS_INTERVAL;

/// Cell counts of one run, split by how each cell was handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkipStats {
    /// Cells handed to the scorer
    pub scored: u64,
    /// Cells jumped over within a row after a failing score
    pub horizontal: u64,
    /// Cells the skip map reported as skipped
    pub vertical: u64,
}

impl AddAssign for SkipStats {
    fn add_assign(&mut self, other: Self) {
        self.scored += other.scored;
        self.horizontal += other.horizontal;
        self.vertical += other.vertical;
    }
}

impl fmt::Display for SkipStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.scored + self.horizontal + self.vertical;
        let scored_pct = if total == 0 {
            0.0
        } else {
            self.scored as f64 * 100.0 / total as f64
        };
        write!(
            f,
            "Scored {} cells ({scored_pct:.3}%), skipped {} horizontally and {} vertically",
            self.scored, self.horizontal, self.vertical
        )
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Summary {
    pub hash: u32,
    /// Number of valid results written
    pub results: usize,
    /// Number of rows scanned
    pub rows: usize,
    pub elapsed: Duration,
    /// Present when the run counted cells
    pub stats: Option<SkipStats>,
}

#[derive(Debug)]
struct Sink<W> {
    writer: W,
    hash: u32,
    results: usize,
    stats: Option<SkipStats>,
}

/// Shared by every worker: writes valid results, folds them into the checksum and reports
/// progress. Writing and hashing share one lock, progress is a separate atomic.
#[derive(Debug)]
pub struct ResultCollector<W> {
    sink: Mutex<Sink<W>>,
    completed: AtomicUsize,
    total: usize,
    start: Instant,
}

impl<W: Write> ResultCollector<W> {
    pub fn new(writer: W, total: usize) -> Self {
        ResultCollector {
            sink: Mutex::new(Sink {
                writer,
                hash: 0,
                results: 0,
                stats: None,
            }),
            completed: AtomicUsize::new(0),
            total,
            start: Instant::now(),
        }
    }

    /// Writes and hashes the result if valid, flushing after every line
    pub fn add(&self, result: &SearchResult) -> io::Result<()> {
        if !result.is_valid() {
            return Ok(());
        }

        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(sink.writer, "{result}")?;
        sink.writer.flush()?;
        sink.hash = sink.hash.wrapping_add(result.hash());
        sink.results += 1;
        Ok(())
    }

    /// Counts `rows` more rows as done, logging progress whenever the count crosses a multiple of
    /// the reporting interval
    pub fn complete(&self, rows: usize) {
        if rows == 0 {
            return;
        }
        let before = self.completed.fetch_add(rows, Ordering::Relaxed);
        let done = before + rows;
        if before / PROGRESS_INTERVAL == done / PROGRESS_INTERVAL {
            return;
        }

        let elapsed = self.start.elapsed().as_secs_f64();
        let pct = done as f64 * 100.0 / self.total.max(1) as f64;
        let speed = if elapsed > 0.0 { done as f64 / elapsed } else { 0.0 };
        log::info!("{done} / {} ({pct:.2}%, {speed:.0} rows/s)", self.total);
    }

    pub fn record_stats(&self, stats: SkipStats) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        *sink.stats.get_or_insert_default() += stats;
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn hash(&self) -> u32 {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner).hash
    }

    pub fn finish(self) -> Summary {
        let elapsed = self.start.elapsed();
        let rows = self.completed.into_inner();
        let sink = self.sink.into_inner().unwrap_or_else(PoisonError::into_inner);
        Summary {
            hash: sink.hash,
            results: sink.results,
            rows,
            elapsed,
            stats: sink.stats,
        }
    }
}

/// Writes the column header naming both inputs
pub fn write_header<W: Write>(mut writer: W, seq1: &Path, seq2: &Path) -> io::Result<()> {
    writeln!(
        writer,
        "start in {},start in {},score,",
        seq1.display(),
        seq2.display()
    )
}
