use super::aligned::AlignedBytes;
use super::kernels::{self, CENTRE, FALLOFF};
use super::{Skipper, cascade_span};

/// One skip counter per column: a cell is skipped while its counter is non-zero, and the counter
/// tells how many later columns of the row are skipped too. A skip raises the counters under its
/// triangle to `skip - |c - col|`. Finishing a row decrements every counter, which narrows all
/// triangles by one column on each side.
#[derive(Debug)]
pub struct CounterMap {
    cols: usize,
    counters: AlignedBytes,
}

impl Skipper for CounterMap {
    fn new(cols: usize, _lookahead: usize) -> Self {
        CounterMap {
            cols,
            counters: AlignedBytes::zeroed(cols),
        }
    }

    fn skip_range(&mut self, _row: usize, col: usize, skip: usize) {
        let Some((lo, hi)) = cascade_span(col, skip, 0, self.cols) else {
            return;
        };
        let peak = skip.min(u8::MAX as usize) as u8;
        let profile = &FALLOFF[CENTRE + lo - col..=CENTRE + hi - col];
        kernels::raise(&mut self.counters[lo..=hi], profile, peak);
    }

    fn is_skipped(&self, _row: usize, col: usize) -> bool {
        self.counters[col] != 0
    }

    fn find_unskipped(&mut self, _row: usize, col: &mut usize) -> bool {
        while *col < self.cols {
            match self.counters[*col] {
                0 => return true,
                run => *col += run as usize,
            }
        }
        false
    }

    fn finish_row(&mut self, _row: usize) {
        kernels::decay(&mut self.counters);
    }
}
