use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Best cell found so far in one row. Starts out invalid, with a score of -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchResult {
    pub row: usize,
    pub col: usize,
    pub score: i32,
}

impl SearchResult {
    pub fn new(row: usize) -> Self {
        SearchResult {
            row,
            col: 0,
            score: -1,
        }
    }

    /// Keeps the higher score, and the leftmost column on ties
    #[inline]
    pub fn improve(&mut self, col: usize, score: u16) {
        let score = score as i32;
        if score > self.score || (score == self.score && col < self.col) {
            self.col = col;
            self.score = score;
        }
    }

    pub fn is_valid(&self) -> bool {
        self.score >= 0
    }

    /// Contribution to the run checksum. Summed with wrapping addition, so the checksum does not
    /// depend on the order results arrive in.
    pub fn hash(&self) -> u32 {
        ((self.row as u32) << 20) | ((self.col as u32) << 8) | self.score as u32
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},", self.row, self.col, self.score)
    }
}
