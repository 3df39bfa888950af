use std::io::{self, Write};
use std::ops::Range;

use super::{Cells, ResultCollector, SearchResult, SkipStats};
use crate::Config;
use crate::r#const::{MAX_STEP_GAIN, PROGRESS_BATCH};
use crate::skip::Skipper;

/// Scans one band of rows against every column, owning the skip map for its band
pub(crate) struct Worker<'a, C: ?Sized, K> {
    cells: &'a C,
    threshold: u16,
    skipper: K,
    stats: Option<SkipStats>,
}

impl<'a, C: Cells + ?Sized, K: Skipper> Worker<'a, C, K> {
    pub fn new(cells: &'a C, config: &Config) -> Self {
        Worker {
            cells,
            threshold: config.threshold,
            skipper: K::new(cells.cols(), config.lookahead),
            stats: config.stats.then(SkipStats::default),
        }
    }

    pub fn stats(&self) -> Option<SkipStats> {
        self.stats
    }

    /// Best cell of `row`, scoring only cells the skip map could not rule out
    fn scan_row(&mut self, row: usize) -> SearchResult {
        let cols = self.cells.cols();
        let mut best = SearchResult::new(row);
        let mut col = 0;

        while col < cols {
            let from = col;
            let found = self.skipper.find_unskipped(row, &mut col);
            if let Some(stats) = &mut self.stats {
                let reached = if found { col } else { cols };
                stats.vertical += (reached - from) as u64;
            }
            if !found {
                break;
            }

            let score = self.cells.score(row, col);
            if let Some(stats) = &mut self.stats {
                stats.scored += 1;
            }

            if score >= self.threshold {
                // Winning cells do not prune
                best.improve(col, score);
                col += 1;
                continue;
            }

            let skip = ((self.threshold - score - 1) / MAX_STEP_GAIN) as usize;
            if skip > 0 {
                self.skipper.skip_range(row, col, skip);
                if let Some(stats) = &mut self.stats {
                    stats.horizontal += skip.min(cols - 1 - col) as u64;
                }
            }
            col += skip + 1;
        }

        self.skipper.finish_row(row);
        best
    }

    /// Scans `rows`, streaming every valid row result into the collector. Results are also
    /// returned, in row order, when `keep` is set.
    pub fn run<W: Write>(
        &mut self,
        rows: Range<usize>,
        collector: &ResultCollector<W>,
        keep: bool,
    ) -> io::Result<Vec<SearchResult>> {
        let mut kept = Vec::new();
        let mut pending = 0;

        for row in rows {
            let best = self.scan_row(row);
            collector.add(&best)?;
            if keep && best.is_valid() {
                kept.push(best);
            }

            pending += 1;
            if pending == PROGRESS_BATCH {
                collector.complete(pending);
                pending = 0;
            }
        }
        collector.complete(pending);

        Ok(kept)
    }
}
