use super::aligned::AlignedBytes;
use super::{Skipper, cascade_span};

/// A ring of `lookahead + 1` byte rows, one flag per cell. Marking a triangle is one fill per
/// row it touches, finishing a row clears its slot for reuse.
#[derive(Debug)]
pub struct FlagMap {
    cols: usize,
    ring: usize,
    flags: AlignedBytes,
}

impl FlagMap {
    fn slot(&self, row: usize) -> &[u8] {
        let start = (row % self.ring) * self.cols;
        &self.flags[start..start + self.cols]
    }

    fn slot_mut(&mut self, row: usize) -> &mut [u8] {
        let start = (row % self.ring) * self.cols;
        &mut self.flags[start..start + self.cols]
    }
}

impl Skipper for FlagMap {
    fn new(cols: usize, lookahead: usize) -> Self {
        let ring = lookahead + 1;
        FlagMap {
            cols,
            ring,
            flags: AlignedBytes::zeroed(ring * cols),
        }
    }

    fn skip_range(&mut self, row: usize, col: usize, skip: usize) {
        for depth in 0..self.ring {
            let Some((lo, hi)) = cascade_span(col, skip, depth, self.cols) else {
                break;
            };
            self.slot_mut(row + depth)[lo..=hi].fill(1);
        }
    }

    fn is_skipped(&self, row: usize, col: usize) -> bool {
        self.slot(row)[col] != 0
    }

    fn find_unskipped(&mut self, row: usize, col: &mut usize) -> bool {
        if *col >= self.cols {
            return false;
        }
        match self.slot(row)[*col..].iter().position(|&flag| flag == 0) {
            Some(offset) => {
                *col += offset;
                true
            }
            None => false,
        }
    }

    fn finish_row(&mut self, row: usize) {
        self.slot_mut(row).fill(0);
    }
}
