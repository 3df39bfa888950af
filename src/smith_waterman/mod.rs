//! Fixed window [Smith Waterman](https://en.wikipedia.org/wiki/Smith%E2%80%93Waterman_algorithm)
//! scoring. The search treats the scorer as a pure function of two windows, so any
//! implementation of [`Scorer`] may be plugged into [`crate::Alignment`].
//!
//! The recurrence has no substitution or gap penalties beyond a decay of 1 per step:
//!
//! ```text
//! cur[x] = max(1, up, diag + omega, left) - 1     omega = 3 on a byte match, else 0
//! ```
//!
//! so every step along a matching diagonal gains 2 and every other step loses 1. The score of a
//! window pair is the maximum over the matrix, at most `2 * WINDOW`.
//!
//! ```text
//! a: "AAT"  b: "AGA"
//!
//!       A   G   A
//!   A [ 2   1   2 ]
//!   A [ 2   1   3 ]
//!   T [ 1   1   2 ]      score = 3
//! ```

pub mod reference;
#[cfg(target_arch = "x86_64")]
pub mod x86_64;

use crate::r#const::WINDOW;

/// Scores a window of `a` against a window of `b`. Both slices start at the window and hold at
/// least [`Scorer::window`] bytes, usually more, which implementations may use for over-reads.
/// Must be safe to call concurrently.
pub trait Scorer: Sync {
    fn window(&self) -> usize;
    fn score(&self, a: &[u8], b: &[u8]) -> u16;
}

/// The 50 byte window scorer, choosing the fastest implementation via runtime feature detection
#[derive(Debug, Clone, Copy)]
pub enum WindowScorer {
    #[cfg(target_arch = "x86_64")]
    SSE(x86_64::WindowScorerSSE),
    Scalar,
}

impl WindowScorer {
    pub fn new() -> Self {
        #[cfg(target_arch = "x86_64")]
        if x86_64::WindowScorerSSE::is_available() {
            return Self::SSE(x86_64::WindowScorerSSE);
        }
        Self::Scalar
    }

    /// Operation width in bits, for reporting
    pub fn width(&self) -> usize {
        match self {
            #[cfg(target_arch = "x86_64")]
            Self::SSE(_) => 128,
            Self::Scalar => 64,
        }
    }
}

impl Default for WindowScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer for WindowScorer {
    fn window(&self) -> usize {
        WINDOW
    }

    #[inline]
    fn score(&self, a: &[u8], b: &[u8]) -> u16 {
        match self {
            #[cfg(target_arch = "x86_64")]
            Self::SSE(scorer) => {
                use x86_64::LANES;

                // Sequences carry enough padding for the wide load, copy only when handed a
                // bare window
                match b.first_chunk::<LANES>() {
                    Some(lanes) => unsafe { scorer.score(a, lanes) },
                    None => {
                        let mut lanes = [0u8; LANES];
                        lanes[..WINDOW].copy_from_slice(&b[..WINDOW]);
                        unsafe { scorer.score(a, &lanes) }
                    }
                }
            }
            Self::Scalar => reference::smith_waterman(a, b, WINDOW),
        }
    }
}
