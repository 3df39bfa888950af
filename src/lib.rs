//! Sievealign finds, for every offset of a long sequence, the best scoring fixed-width local
//! alignment against every offset of a second sequence. Each cell `(i, j)` of the comparison
//! matrix is the Smith-Waterman score of the 50 byte window starting at `i` in sequence 1 against
//! the 50 byte window starting at `j` in sequence 2, and a row reports its leftmost best cell when
//! that cell reaches the threshold.
//!
//! Scoring every cell is O(len1 * len2) window comparisons, which is far too slow for sequences
//! in the tens of millions. The window score grows by at most 3 per step, so a cell that misses
//! the threshold by `delta` proves that its neighbours within `(delta - 1) / 3` steps miss it too.
//! The search skips those neighbours in the current row and remembers them for the rows below in
//! a skip map. Five interchangeable skip maps are provided, see [`skip`].
//!
//! # Example: searching two sequences
//!
//! ```rust
//! use sievealign::{Alignment, Config, Sequence, search_rows};
//! use sievealign::smith_waterman::WindowScorer;
//!
//! let bases = b"ACGTTGCAAGCTTAGCCGATAGGCTAACGTTAGCATCGGATCTAGGCTAACGATCGTAGCTAGGCATCG";
//! let seq1 = Sequence::new(bases, sievealign::FILL_1);
//! let seq2 = Sequence::new(bases, sievealign::FILL_2);
//!
//! let config = Config {
//!     threads: 2,
//!     threshold: 100,
//!     ..Config::default()
//! };
//! let cells = Alignment::new(&seq1, &seq2, WindowScorer::new());
//! let results = search_rows(&cells, &config).unwrap();
//!
//! // The first window matches itself perfectly: 50 matches, +2 each
//! assert_eq!((results[0].row, results[0].col, results[0].score), (0, 0, 100));
//! ```
//!
//! # Example: custom cells
//!
//! Anything implementing [`Cells`] can be searched, which is useful for testing pruning against
//! synthetic score matrices.
//!
//! ```rust
//! use sievealign::{Cells, Config, Strategy, search_rows};
//!
//! struct Diagonal;
//! impl Cells for Diagonal {
//!     fn rows(&self) -> usize { 64 }
//!     fn cols(&self) -> usize { 64 }
//!     fn score(&self, row: usize, col: usize) -> u16 {
//!         90u16.saturating_sub(3 * row.abs_diff(col) as u16)
//!     }
//! }
//!
//! let config = Config { threshold: 90, strategy: Strategy::DottedList, ..Config::default() };
//! let results = search_rows(&Diagonal, &config).unwrap();
//! assert_eq!(results.len(), 64);
//! assert!(results.iter().all(|r| r.row == r.col));
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod r#const;
mod error;
pub mod search;
pub mod sequence;
pub mod skip;
pub mod smith_waterman;

pub use error::{Error, Result};
pub use r#const::{FILL_1, FILL_2, MAX_LOOKAHEAD, MAX_SKIP, PADDING, WINDOW};
pub use search::{
    Alignment, Cells, ResultCollector, SearchResult, SkipStats, Summary, search, search_rows,
};
pub use sequence::Sequence;
pub use skip::{Skipper, Strategy};

use r#const::*;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Number of worker threads, each scanning one contiguous band of rows
    pub threads: usize,
    /// Minimum score for a cell to be reported
    pub threshold: u16,
    /// Skip map representation used by every worker
    pub strategy: Strategy,
    /// Number of rows below the current one that a skip decision may cascade into.
    /// Only the ring based strategies ([`Strategy::FlagMap`], [`Strategy::IntervalChain`])
    /// are bounded by it, the aging strategies cascade until the skipped range runs out.
    pub lookahead: usize,
    /// Count scored and skipped cells. Adds a few increments to the hot loop.
    pub stats: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            threads: DEFAULT_THREADS,
            threshold: DEFAULT_THRESHOLD,
            strategy: Strategy::default(),
            lookahead: DEFAULT_LOOKAHEAD,
            stats: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(Error::Config("thread count must be positive".into()));
        }
        if self.lookahead > MAX_LOOKAHEAD {
            return Err(Error::Config(format!(
                "lookahead {} exceeds the maximum of {MAX_LOOKAHEAD}",
                self.lookahead
            )));
        }
        Ok(())
    }
}
