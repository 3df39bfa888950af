//! Skip maps record which cells of the current and upcoming rows are proven to miss the
//! threshold. A skip of `s` issued at `(i, j)` covers, for every `d` in `0..s`, the columns
//! `j - (s - 1 - d) ..= j + (s - 1 - d)` of row `i + d`, a triangle narrowing by one column on
//! each side per row. Skips saturate at [`MAX_SKIP`].
//!
//! Two families exist and differ only in how far down a triangle reaches:
//!
//! - Ring maps ([`FlagMap`], [`ChainMap`]) keep `lookahead + 1` rows and write the triangle into
//!   rows `i ..= i + lookahead`. Finishing row `i` recycles its slot for row `i + lookahead + 1`.
//! - Aging maps ([`CounterMap`], [`WindowMap`], [`DottedMap`]) keep a single row of state and
//!   shrink it by one step on every finished row, so triangles reach their full depth.
//!
//! Both families describe the same set whenever `lookahead >= s - 1` for every skip issued.
//! Marking fewer cells than proven is always sound, so a shallow ring only costs speed.
//!
//! Callers must issue skips only on the current row, visit columns left to right within a row,
//! and call [`Skipper::finish_row`] once per row in increasing order.

mod aligned;
mod chain;
mod counter_map;
mod dotted;
mod flag_map;
mod kernels;
mod pool;
mod window_map;

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use chain::ChainMap;
pub use counter_map::CounterMap;
pub use dotted::DottedMap;
pub use flag_map::FlagMap;
pub use window_map::WindowMap;

use crate::r#const::MAX_SKIP;

pub trait Skipper: Send {
    /// Creates an empty map for rows of `cols` columns. Ring maps keep `lookahead + 1` rows,
    /// aging maps ignore `lookahead`.
    fn new(cols: usize, lookahead: usize) -> Self
    where
        Self: Sized;

    /// Marks the triangle of a skip of `skip` centred on column `col` of the current row `row`.
    /// A skip of 0 marks nothing.
    fn skip_range(&mut self, row: usize, col: usize, skip: usize);

    fn is_skipped(&self, row: usize, col: usize) -> bool;

    /// Advances `col` to the first column of `row` at or after it that is not skipped. Returns
    /// false when none remains, leaving `col` unspecified.
    fn find_unskipped(&mut self, row: usize, col: &mut usize) -> bool;

    /// Declares `row` complete, discarding its state and stepping the map to `row + 1`
    fn finish_row(&mut self, row: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Strategy {
    /// One byte per cell for `lookahead + 1` rows
    FlagMap,
    /// One decaying counter per column, raised to a triangle on every skip
    #[default]
    CounterMap,
    /// One decaying counter per column, holding only the skip centre
    WindowMap,
    /// Linked lists of unskipped intervals for `lookahead + 1` rows
    IntervalChain,
    /// A single list of skipped intervals, shrunk on every row
    DottedList,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::FlagMap,
        Strategy::CounterMap,
        Strategy::WindowMap,
        Strategy::IntervalChain,
        Strategy::DottedList,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::FlagMap => "flag-map",
            Strategy::CounterMap => "counter-map",
            Strategy::WindowMap => "window-map",
            Strategy::IntervalChain => "interval-chain",
            Strategy::DottedList => "dotted-list",
        }
    }

    /// Whether the strategy keeps a ring of rows bounded by the lookahead
    pub fn is_ring(&self) -> bool {
        matches!(self, Strategy::FlagMap | Strategy::IntervalChain)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| crate::Error::Config(format!("unknown skip strategy {s:?}")))
    }
}

/// Columns of row `current + depth` covered by a skip of `skip` at `col`, clamped to the row.
/// None once the triangle has run out.
#[inline]
pub(crate) fn cascade_span(
    col: usize,
    skip: usize,
    depth: usize,
    cols: usize,
) -> Option<(usize, usize)> {
    let margin = skip.min(MAX_SKIP).checked_sub(depth + 1)?;
    if col >= cols {
        return None;
    }
    Some((col.saturating_sub(margin), (col + margin).min(cols - 1)))
}
