use super::Skipper;
use super::pool::{NodeId, Pool};
use crate::r#const::MAX_SKIP;

/// Inclusive range of skipped columns. Bounds are not clamped to the row, since clamping before
/// shrinking would end the triangle early at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DottedNode {
    lo: i64,
    hi: i64,
    next: Option<NodeId>,
}

/// The skipped columns of the current row as a singly linked list of intervals. Both `lo` and
/// `hi` strictly ascend along the list: an interval contained in another is absorbed, while
/// crossing intervals stay separate so that every interval shrinks on its own.
///
/// The cursor is either None (start from the head) or a node preceding every interval still
/// relevant to the columns visited in this row.
#[derive(Debug, Default)]
pub(crate) struct DottedList {
    head: Option<NodeId>,
    cursor: Option<NodeId>,
}

impl DottedList {
    pub fn skip(&mut self, pool: &mut Pool<DottedNode>, lo: i64, hi: i64) {
        debug_assert!(lo <= hi);

        // Last interval starting before lo
        let (mut prev, from_cursor) = match self.cursor {
            Some(cursor) if pool[cursor].lo < lo => (Some(cursor), true),
            _ => (None, false),
        };
        let mut next = match prev {
            Some(prev) => pool[prev].next,
            None => self.head,
        };
        while let Some(id) = next {
            if pool[id].lo >= lo {
                break;
            }
            prev = Some(id);
            next = pool[id].next;
        }

        if prev.is_some_and(|prev| pool[prev].hi >= hi)
            || next.is_some_and(|next| pool[next].lo == lo && pool[next].hi >= hi)
        {
            return;
        }

        // Intervals inside the new one are dropped, the first one donates its slot
        let mut reuse = None;
        while let Some(id) = next {
            let node = pool[id];
            if node.hi > hi {
                break;
            }
            next = node.next;
            match reuse {
                None => reuse = Some(id),
                Some(_) => pool.free(id),
            }
        }

        let node = DottedNode { lo, hi, next };
        let id = match reuse {
            Some(id) => {
                pool[id] = node;
                id
            }
            None => pool.alloc(node),
        };
        match prev {
            Some(prev) => pool[prev].next = Some(id),
            None => self.head = Some(id),
        }

        if !from_cursor && self.cursor.is_some() {
            self.cursor = Some(id);
        }
    }

    pub fn find_unskipped(
        &mut self,
        pool: &Pool<DottedNode>,
        col: &mut usize,
        cols: usize,
    ) -> bool {
        let mut query = *col as i64;
        let mut node = self.cursor.or(self.head);
        while let Some(id) = node {
            let current = pool[id];
            self.cursor = Some(id);
            if current.hi >= query {
                if current.lo > query {
                    break;
                }
                query = current.hi + 1;
            }
            node = current.next;
        }
        *col = query.max(0) as usize;
        *col < cols
    }

    pub fn is_skipped(&self, pool: &Pool<DottedNode>, col: usize) -> bool {
        let col = col as i64;
        let mut node = self.head;
        while let Some(id) = node {
            let current = pool[id];
            if current.hi >= col {
                return current.lo <= col;
            }
            node = current.next;
        }
        false
    }

    /// Shrinks every interval by one column on each side and drops the empty ones
    pub fn next_row(&mut self, pool: &mut Pool<DottedNode>) {
        self.cursor = None;

        let mut prev: Option<NodeId> = None;
        let mut node = self.head;
        while let Some(id) = node {
            let current = {
                let current = &mut pool[id];
                current.lo += 1;
                current.hi -= 1;
                *current
            };
            node = current.next;

            if current.lo > current.hi {
                match prev {
                    Some(prev) => pool[prev].next = current.next,
                    None => self.head = current.next,
                }
                pool.free(id);
                continue;
            }

            match prev {
                Some(prev_id) if pool[prev_id].lo >= current.lo => {
                    debug_assert!(false, "interval order broken while shrinking");
                    let merged = &mut pool[prev_id];
                    merged.lo = merged.lo.min(current.lo);
                    merged.hi = merged.hi.max(current.hi);
                    merged.next = current.next;
                    pool.free(id);
                }
                _ => prev = Some(id),
            }
        }
    }

    #[cfg(test)]
    fn intervals(&self, pool: &Pool<DottedNode>) -> Vec<(i64, i64)> {
        let mut out = vec![];
        let mut node = self.head;
        while let Some(id) = node {
            out.push((pool[id].lo, pool[id].hi));
            node = pool[id].next;
        }
        out
    }
}

/// A single [`DottedList`] aged on every finished row. Memory follows the number of live
/// skips rather than the row width.
#[derive(Debug)]
pub struct DottedMap {
    cols: usize,
    list: DottedList,
    pool: Pool<DottedNode>,
}

impl Skipper for DottedMap {
    fn new(cols: usize, _lookahead: usize) -> Self {
        DottedMap {
            cols,
            list: DottedList::default(),
            pool: Pool::new(),
        }
    }

    fn skip_range(&mut self, _row: usize, col: usize, skip: usize) {
        let skip = skip.min(MAX_SKIP);
        if skip == 0 || col >= self.cols {
            return;
        }
        let (col, margin) = (col as i64, skip as i64 - 1);
        self.list.skip(&mut self.pool, col - margin, col + margin);
    }

    fn is_skipped(&self, _row: usize, col: usize) -> bool {
        self.list.is_skipped(&self.pool, col)
    }

    fn find_unskipped(&mut self, _row: usize, col: &mut usize) -> bool {
        if *col >= self.cols {
            return false;
        }
        self.list.find_unskipped(&self.pool, col, self.cols)
    }

    fn finish_row(&mut self, _row: usize) {
        self.list.next_row(&mut self.pool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containment_is_absorbed() {
        let mut pool = Pool::new();
        let mut list = DottedList::default();
        list.skip(&mut pool, 10, 20);
        list.skip(&mut pool, 12, 18);
        list.skip(&mut pool, 10, 15);
        assert_eq!(list.intervals(&pool), vec![(10, 20)]);

        list.skip(&mut pool, 30, 31);
        list.skip(&mut pool, 33, 34);
        list.skip(&mut pool, 5, 40);
        assert_eq!(list.intervals(&pool), vec![(5, 40)]);
        assert_eq!(pool.live(), 1);
    }

    #[test]
    fn test_crossing_intervals_shrink_independently() {
        let mut pool = Pool::new();
        let mut list = DottedList::default();
        list.skip(&mut pool, 0, 10);
        list.skip(&mut pool, 8, 12);
        assert_eq!(list.intervals(&pool), vec![(0, 10), (8, 12)]);

        for _ in 0..3 {
            list.next_row(&mut pool);
        }
        // Merged into (0, 12) this would be (3, 9), claiming columns 8 and 9
        assert_eq!(list.intervals(&pool), vec![(3, 7)]);
    }

    #[test]
    fn test_unclamped_bounds_keep_edge_triangles() {
        let mut map = DottedMap::new(10, 0);
        map.skip_range(0, 0, 4);
        map.finish_row(0);
        map.finish_row(1);
        // Row 2 of a skip of 4 at column 0 still covers column 0 and 1
        assert!(map.is_skipped(2, 1));
        assert!(!map.is_skipped(2, 2));
    }

    #[test]
    fn test_find_unskipped_hops_crossing_intervals() {
        let mut pool = Pool::new();
        let mut list = DottedList::default();
        list.skip(&mut pool, 2, 6);
        list.skip(&mut pool, 4, 9);
        list.skip(&mut pool, 12, 13);

        let mut col = 3;
        assert!(list.find_unskipped(&pool, &mut col, 20));
        assert_eq!(col, 10);
        col = 12;
        assert!(list.find_unskipped(&pool, &mut col, 20));
        assert_eq!(col, 14);
        col = 15;
        assert!(list.find_unskipped(&pool, &mut col, 16));
        assert_eq!(col, 15);

        list.skip(&mut pool, 14, 30);
        col = 14;
        assert!(!list.find_unskipped(&pool, &mut col, 16));
    }

    #[test]
    fn test_cursor_survives_skips_behind_it() {
        let mut pool = Pool::new();
        let mut list = DottedList::default();
        list.skip(&mut pool, 20, 22);
        let mut col = 25;
        assert!(list.find_unskipped(&pool, &mut col, 40));

        // Inserted before the cursor node, then queried further right
        list.skip(&mut pool, 18, 30);
        col = 26;
        assert!(list.find_unskipped(&pool, &mut col, 40));
        assert_eq!(col, 31);
        assert_eq!(list.intervals(&pool), vec![(18, 30)]);
    }
}
