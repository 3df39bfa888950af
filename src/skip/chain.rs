use super::pool::{NodeId, Pool};
use super::{Skipper, cascade_span};

/// Inclusive range of columns not yet skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChainNode {
    lo: usize,
    hi: usize,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

enum Seek {
    /// First interval ending at or after the column
    At(NodeId),
    /// Every interval ends before the column; holds the last one
    Past(NodeId),
}

/// The unskipped columns of one row as a doubly linked list of disjoint intervals in ascending
/// order. Starts as the single interval covering the row. The cursor sits near the last touched
/// interval so that left to right access stays close to O(1).
#[derive(Debug)]
pub(crate) struct IntervalChain {
    cols: usize,
    head: Option<NodeId>,
    cursor: Option<NodeId>,
}

impl IntervalChain {
    pub fn new(cols: usize, pool: &mut Pool<ChainNode>) -> Self {
        let mut chain = IntervalChain {
            cols,
            head: None,
            cursor: None,
        };
        chain.fill(pool);
        chain
    }

    fn fill(&mut self, pool: &mut Pool<ChainNode>) {
        if self.cols > 0 {
            let id = pool.alloc(ChainNode {
                lo: 0,
                hi: self.cols - 1,
                prev: None,
                next: None,
            });
            self.head = Some(id);
            self.cursor = Some(id);
        }
    }

    /// Frees every interval and starts over with the full row
    pub fn reset(&mut self, pool: &mut Pool<ChainNode>) {
        let mut node = self.head;
        while let Some(id) = node {
            node = pool[id].next;
            pool.free(id);
        }
        self.head = None;
        self.cursor = None;
        self.fill(pool);
    }

    pub fn rewind(&mut self) {
        self.cursor = self.head;
    }

    fn seek(&self, pool: &Pool<ChainNode>, col: usize) -> Option<Seek> {
        let mut id = self.cursor?;
        if pool[id].hi >= col {
            while let Some(prev) = pool[id].prev {
                if pool[prev].hi < col {
                    break;
                }
                id = prev;
            }
            return Some(Seek::At(id));
        }
        while let Some(next) = pool[id].next {
            id = next;
            if pool[id].hi >= col {
                return Some(Seek::At(id));
            }
        }
        Some(Seek::Past(id))
    }

    fn unlink(&mut self, pool: &mut Pool<ChainNode>, id: NodeId) {
        let ChainNode { prev, next, .. } = pool[id];
        match prev {
            Some(prev) => pool[prev].next = next,
            None => self.head = next,
        }
        if let Some(next) = next {
            pool[next].prev = prev;
        }
        pool.free(id);
    }

    /// Removes columns `lo..=hi` from the unskipped set
    pub fn skip(&mut self, pool: &mut Pool<ChainNode>, lo: usize, hi: usize) {
        debug_assert!(lo <= hi && hi < self.cols);

        let mut id = match self.seek(pool, lo) {
            None => return,
            Some(Seek::Past(last)) => {
                self.cursor = Some(last);
                return;
            }
            Some(Seek::At(id)) => id,
        };

        let mut kept = pool[id].prev;
        loop {
            let node = pool[id];
            if node.lo > hi {
                kept = Some(id);
                break;
            }

            if node.lo < lo && node.hi > hi {
                // Skip falls strictly inside, split in two
                let tail = pool.alloc(ChainNode {
                    lo: hi + 1,
                    hi: node.hi,
                    prev: Some(id),
                    next: node.next,
                });
                if let Some(next) = node.next {
                    pool[next].prev = Some(tail);
                }
                let head = &mut pool[id];
                head.hi = lo - 1;
                head.next = Some(tail);
                kept = Some(id);
                break;
            } else if node.lo < lo {
                pool[id].hi = lo - 1;
                kept = Some(id);
            } else if node.hi > hi {
                pool[id].lo = hi + 1;
                kept = Some(id);
                break;
            } else {
                self.unlink(pool, id);
            }

            match node.next {
                Some(next) => id = next,
                None => break,
            }
        }

        self.cursor = kept.or(self.head);
    }

    pub fn find_unskipped(&mut self, pool: &Pool<ChainNode>, col: &mut usize) -> bool {
        if *col >= self.cols {
            return false;
        }
        match self.seek(pool, *col) {
            None => false,
            Some(Seek::Past(last)) => {
                self.cursor = Some(last);
                false
            }
            Some(Seek::At(id)) => {
                self.cursor = Some(id);
                *col = (*col).max(pool[id].lo);
                true
            }
        }
    }

    pub fn is_skipped(&self, pool: &Pool<ChainNode>, col: usize) -> bool {
        match self.seek(pool, col) {
            Some(Seek::At(id)) => pool[id].lo > col,
            _ => true,
        }
    }

    /// Walks the chain checking links and ordering
    #[cfg(test)]
    pub fn check_integrity(&self, pool: &Pool<ChainNode>) -> usize {
        let mut prev: Option<NodeId> = None;
        let mut node = self.head;
        let mut count = 0;
        while let Some(id) = node {
            let current = pool[id];
            assert_eq!(current.prev, prev, "broken back link");
            assert!(current.lo <= current.hi && current.hi < self.cols);
            if let Some(prev) = prev {
                assert!(pool[prev].hi + 1 < current.lo, "intervals touch or overlap");
            }
            prev = Some(id);
            node = current.next;
            count += 1;
        }
        count
    }
}

/// A ring of `lookahead + 1` interval chains, one per upcoming row, sharing one node pool.
/// Finishing a row rewinds every cursor and refills the finished slot with the full row.
#[derive(Debug)]
pub struct ChainMap {
    cols: usize,
    chains: Vec<IntervalChain>,
    pool: Pool<ChainNode>,
}

impl Skipper for ChainMap {
    fn new(cols: usize, lookahead: usize) -> Self {
        let mut pool = Pool::new();
        let chains = (0..=lookahead)
            .map(|_| IntervalChain::new(cols, &mut pool))
            .collect();
        ChainMap { cols, chains, pool }
    }

    fn skip_range(&mut self, row: usize, col: usize, skip: usize) {
        let ring = self.chains.len();
        for depth in 0..ring {
            let Some((lo, hi)) = cascade_span(col, skip, depth, self.cols) else {
                break;
            };
            self.chains[(row + depth) % ring].skip(&mut self.pool, lo, hi);
        }
    }

    fn is_skipped(&self, row: usize, col: usize) -> bool {
        self.chains[row % self.chains.len()].is_skipped(&self.pool, col)
    }

    fn find_unskipped(&mut self, row: usize, col: &mut usize) -> bool {
        let ring = self.chains.len();
        self.chains[row % ring].find_unskipped(&self.pool, col)
    }

    fn finish_row(&mut self, row: usize) {
        let ring = self.chains.len();
        for chain in &mut self.chains {
            chain.rewind();
        }
        self.chains[row % ring].reset(&mut self.pool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intervals(chain: &IntervalChain, pool: &Pool<ChainNode>) -> Vec<(usize, usize)> {
        let mut out = vec![];
        let mut node = chain.head;
        while let Some(id) = node {
            out.push((pool[id].lo, pool[id].hi));
            node = pool[id].next;
        }
        out
    }

    #[test]
    fn test_split_trim_and_remove() {
        let mut pool = Pool::new();
        let mut chain = IntervalChain::new(20, &mut pool);

        chain.skip(&mut pool, 5, 7);
        assert_eq!(intervals(&chain, &pool), vec![(0, 4), (8, 19)]);

        chain.skip(&mut pool, 3, 9);
        assert_eq!(intervals(&chain, &pool), vec![(0, 2), (10, 19)]);

        chain.skip(&mut pool, 12, 12);
        chain.skip(&mut pool, 0, 14);
        assert_eq!(intervals(&chain, &pool), vec![(15, 19)]);

        chain.skip(&mut pool, 15, 19);
        assert_eq!(intervals(&chain, &pool), vec![]);
        assert_eq!(pool.live(), 0);

        let mut col = 0;
        assert!(!chain.find_unskipped(&pool, &mut col));
        assert!(chain.is_skipped(&pool, 3));
    }

    #[test]
    fn test_cursor_walks_back() {
        let mut pool = Pool::new();
        let mut chain = IntervalChain::new(30, &mut pool);
        for centre in [5, 15, 25] {
            chain.skip(&mut pool, centre - 1, centre + 1);
        }
        // Cursor now sits near the end, earlier columns are still found
        assert!(!chain.is_skipped(&pool, 0));
        assert!(chain.is_skipped(&pool, 4));
        chain.skip(&mut pool, 0, 2);
        assert_eq!(
            intervals(&chain, &pool),
            vec![(3, 3), (7, 13), (17, 23), (27, 29)]
        );
        assert_eq!(chain.check_integrity(&pool), 4);
    }

    #[test]
    fn test_random_skips_keep_integrity() {
        use rand::{Rng, SeedableRng, rngs::StdRng};

        let mut rng = StdRng::seed_from_u64(99);
        let mut pool = Pool::new();
        let mut chain = IntervalChain::new(200, &mut pool);
        let mut skipped = [false; 200];
        for _ in 0..300 {
            let lo = rng.random_range(0..200);
            let hi = rng.random_range(lo..(lo + 10).min(200));
            chain.skip(&mut pool, lo, hi);
            skipped[lo..=hi].fill(true);
            let count = chain.check_integrity(&pool);
            assert_eq!(count, pool.live());
        }
        for (col, &expected) in skipped.iter().enumerate() {
            assert_eq!(chain.is_skipped(&pool, col), expected);
        }
    }

    #[test]
    fn test_finished_slot_is_refilled() {
        let mut map = ChainMap::new(10, 2);
        map.skip_range(0, 5, 2);
        map.finish_row(0);
        assert!(map.is_skipped(1, 5));
        // Row 3 takes the slot of row 0
        assert!((0..10).all(|col| !map.is_skipped(3, col)));
        assert_eq!(map.pool.live(), 4);
    }
}
