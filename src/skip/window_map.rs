use super::aligned::AlignedBytes;
use super::kernels::{self, CENTRE, FALLOFF};
use super::Skipper;
use crate::r#const::MAX_SKIP;

/// Guard columns on each side of the row, wide enough for the widest triangle
const GUARD: usize = MAX_SKIP - 1;

/// One counter per column holding the largest skip centred there. Issuing a skip is a single
/// store, the triangle is recovered on query: column `c` is skipped when some centre `c + k`
/// holds a value above `|k|`. Finishing a row decrements every centre.
///
/// Queries scan `2 * reach - 1` centres, where `reach` tracks the largest live skip.
#[derive(Debug)]
pub struct WindowMap {
    cols: usize,
    centres: AlignedBytes,
    reach: usize,
}

impl Skipper for WindowMap {
    fn new(cols: usize, _lookahead: usize) -> Self {
        WindowMap {
            cols,
            centres: AlignedBytes::zeroed(GUARD + cols + GUARD),
            reach: 0,
        }
    }

    fn skip_range(&mut self, _row: usize, col: usize, skip: usize) {
        let skip = skip.min(MAX_SKIP);
        if skip == 0 || col >= self.cols {
            return;
        }
        let centre = &mut self.centres[GUARD + col];
        *centre = (*centre).max(skip as u8);
        self.reach = self.reach.max(skip);
    }

    fn is_skipped(&self, _row: usize, col: usize) -> bool {
        let Some(radius) = self.reach.checked_sub(1) else {
            return false;
        };
        let window = &self.centres[GUARD + col - radius..=GUARD + col + radius];
        kernels::exceeds(window, &FALLOFF[CENTRE - radius..=CENTRE + radius])
    }

    fn find_unskipped(&mut self, row: usize, col: &mut usize) -> bool {
        while *col < self.cols {
            if !self.is_skipped(row, *col) {
                return true;
            }
            *col += 1;
        }
        false
    }

    fn finish_row(&mut self, _row: usize) {
        kernels::decay(&mut self.centres);
        self.reach = self.reach.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_store_per_skip() {
        let mut map = WindowMap::new(30, 0);
        map.skip_range(0, 10, 5);
        assert_eq!(map.centres.iter().filter(|&&c| c != 0).count(), 1);
        assert!(map.is_skipped(0, 6));
        assert!(!map.is_skipped(0, 5));
        assert!(map.is_skipped(0, 14));
        assert!(!map.is_skipped(0, 15));
    }

    #[test]
    fn test_reach_shrinks_with_rows() {
        let mut map = WindowMap::new(10, 0);
        map.skip_range(0, 0, 2);
        assert_eq!(map.reach, 2);
        map.finish_row(0);
        assert_eq!(map.reach, 1);
        assert!(map.is_skipped(1, 0));
        assert!(!map.is_skipped(1, 1));
        map.finish_row(1);
        assert_eq!(map.reach, 0);
        assert!(!map.is_skipped(2, 0));
    }

    #[test]
    fn test_edge_centres_cover_clamped_columns() {
        let mut map = WindowMap::new(4, 0);
        map.skip_range(0, 3, 255);
        assert!((0..4).all(|col| map.is_skipped(0, col)));
    }
}
