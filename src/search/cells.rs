use crate::r#const::PADDING;
use crate::sequence::Sequence;
use crate::smith_waterman::Scorer;

/// The comparison matrix scanned by the search. Row `i` and column `j` are free to mean
/// anything, so long as neighbouring cells differ by at most 3.
pub trait Cells: Sync {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    fn score(&self, row: usize, col: usize) -> u16;
}

/// Window alignment of two sequences: cell `(i, j)` scores the window of `seq1` starting at `i`
/// against the window of `seq2` starting at `j`
#[derive(Debug, Clone)]
pub struct Alignment<'a, S> {
    seq1: &'a Sequence,
    seq2: &'a Sequence,
    scorer: S,
}

impl<'a, S: Scorer> Alignment<'a, S> {
    pub fn new(seq1: &'a Sequence, seq2: &'a Sequence, scorer: S) -> Self {
        assert!(
            scorer.window() <= PADDING,
            "window of {} exceeds the sequence padding",
            scorer.window()
        );
        Alignment { seq1, seq2, scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }
}

impl<S: Scorer> Cells for Alignment<'_, S> {
    fn rows(&self) -> usize {
        self.seq1.len()
    }

    fn cols(&self) -> usize {
        self.seq2.len()
    }

    #[inline]
    fn score(&self, row: usize, col: usize) -> u16 {
        self.scorer
            .score(&self.seq1.padded()[row..], &self.seq2.padded()[col..])
    }
}
