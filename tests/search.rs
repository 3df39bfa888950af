use std::io::{self, Write};

use rand::{Rng, SeedableRng, rngs::StdRng};
use sievealign::smith_waterman::{Scorer, WindowScorer};
use sievealign::{
    Alignment, Cells, Config, FILL_1, FILL_2, SearchResult, Sequence, Strategy, search,
    search_rows,
};

/// Counts matching bytes of a short window, changing by at most one per step
struct Hamming(usize);

impl Scorer for Hamming {
    fn window(&self) -> usize {
        self.0
    }

    fn score(&self, a: &[u8], b: &[u8]) -> u16 {
        a[..self.0]
            .iter()
            .zip(&b[..self.0])
            .filter(|(x, y)| x == y)
            .count() as u16
    }
}

/// Sum of two bounded random walks, so neighbouring cells differ by at most 3
struct Lipschitz {
    row_walk: Vec<i32>,
    col_walk: Vec<i32>,
}

impl Lipschitz {
    fn random(rng: &mut StdRng, rows: usize, cols: usize) -> Self {
        let walk = |rng: &mut StdRng, len: usize| -> Vec<i32> {
            let mut value: i32 = rng.random_range(0..60);
            (0..len)
                .map(|_| {
                    value = (value + rng.random_range(-2..=1)).clamp(0, 75);
                    value
                })
                .collect()
        };
        Lipschitz {
            row_walk: walk(rng, rows),
            col_walk: walk(rng, cols),
        }
    }
}

impl Cells for Lipschitz {
    fn rows(&self) -> usize {
        self.row_walk.len()
    }
    fn cols(&self) -> usize {
        self.col_walk.len()
    }
    fn score(&self, row: usize, col: usize) -> u16 {
        (self.row_walk[row] + self.col_walk[col]).clamp(0, 150) as u16
    }
}

fn brute_force(cells: &impl Cells, threshold: u16) -> Vec<SearchResult> {
    (0..cells.rows())
        .filter_map(|row| {
            let mut best = SearchResult::new(row);
            for col in 0..cells.cols() {
                let score = cells.score(row, col);
                if score >= threshold {
                    best.improve(col, score);
                }
            }
            best.is_valid().then_some(best)
        })
        .collect()
}

fn random_bases(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| b"ACGT"[rng.random_range(0..4)]).collect()
}

#[test]
fn test_identical_short_sequences() {
    let seq1 = Sequence::new(b"AAAA", FILL_1);
    let seq2 = Sequence::new(b"AAAA", FILL_2);
    let cells = Alignment::new(&seq1, &seq2, Hamming(4));

    for strategy in Strategy::ALL {
        let config = Config {
            threads: 2,
            threshold: 4,
            strategy,
            ..Config::default()
        };
        let results = search_rows(&cells, &config).unwrap();
        let results: Vec<_> = results.iter().map(|r| (r.row, r.col, r.score)).collect();
        assert_eq!(results, vec![(0, 0, 4)], "{strategy}");
    }
}

#[test]
fn test_unreachable_threshold_has_empty_hash() {
    let mut rng = StdRng::seed_from_u64(5);
    let seq1 = Sequence::new(&random_bases(&mut rng, 300), FILL_1);
    let seq2 = Sequence::new(&random_bases(&mut rng, 300), FILL_2);
    let cells = Alignment::new(&seq1, &seq2, WindowScorer::new());

    let mut out = Vec::new();
    let config = Config {
        threshold: 150,
        ..Config::default()
    };
    let summary = search(&cells, &config, &mut out).unwrap();
    assert_eq!(summary.hash, 0);
    assert_eq!(summary.results, 0);
    assert_eq!(summary.rows, 300);
    assert!(out.is_empty());
}

#[test]
fn test_hash_is_independent_of_thread_count() {
    let mut rng = StdRng::seed_from_u64(11);
    let bases = random_bases(&mut rng, 600);
    // Second sequence shares a mutated stretch with the first
    let mut other = random_bases(&mut rng, 200);
    other.extend(bases[150..450].iter().enumerate().map(|(i, &b)| {
        if i % 17 == 0 { b'N' } else { b }
    }));
    other.extend(random_bases(&mut rng, 200));

    let seq1 = Sequence::new(&bases, FILL_1);
    let seq2 = Sequence::new(&other, FILL_2);
    let cells = Alignment::new(&seq1, &seq2, WindowScorer::new());

    let hash = |threads| {
        let config = Config {
            threads,
            threshold: 60,
            ..Config::default()
        };
        search(&cells, &config, io::sink()).unwrap()
    };
    let single = hash(1);
    let many = hash(8);
    assert_eq!(single.hash, many.hash);
    assert_eq!(single.results, many.results);
    assert!(single.results > 0);
}

#[test]
fn test_pruning_never_drops_a_winner() {
    let mut rng = StdRng::seed_from_u64(2024);
    for round in 0..12 {
        let cells = Lipschitz::random(&mut rng, 90, 160);
        let threshold = rng.random_range(40..140);
        let expected = brute_force(&cells, threshold);

        for strategy in Strategy::ALL {
            for lookahead in [0, 3, 16] {
                let config = Config {
                    threads: 3,
                    threshold,
                    strategy,
                    lookahead,
                    ..Config::default()
                };
                assert_eq!(
                    search_rows(&cells, &config).unwrap(),
                    expected,
                    "round {round}, {strategy}, lookahead {lookahead}, threshold {threshold}"
                );
            }
        }
    }
}

#[test]
fn test_pruned_search_matches_brute_force_on_sequences() {
    let mut rng = StdRng::seed_from_u64(77);
    let bases = random_bases(&mut rng, 220);
    let mut other = bases[40..180].to_vec();
    for i in (0..other.len()).step_by(9) {
        other[i] = b"ACGT"[rng.random_range(0..4)];
    }
    let seq1 = Sequence::new(&bases, FILL_1);
    let seq2 = Sequence::new(&other, FILL_2);
    let cells = Alignment::new(&seq1, &seq2, WindowScorer::new());
    let expected = brute_force(&cells, 70);
    assert!(!expected.is_empty());

    for strategy in Strategy::ALL {
        let config = Config {
            threads: 4,
            threshold: 70,
            strategy,
            ..Config::default()
        };
        assert_eq!(search_rows(&cells, &config).unwrap(), expected, "{strategy}");
    }
}

#[test]
fn test_stats_account_for_every_cell() {
    let mut rng = StdRng::seed_from_u64(3);
    let cells = Lipschitz::random(&mut rng, 50, 120);
    let config = Config {
        threshold: 120,
        stats: true,
        ..Config::default()
    };
    let summary = search(&cells, &config, io::sink()).unwrap();
    let stats = summary.stats.unwrap();
    assert_eq!(stats.scored + stats.horizontal + stats.vertical, 50 * 120);
    assert!(stats.scored < 50 * 120);
}

#[test]
fn test_output_lines() {
    let seq1 = Sequence::new(b"AAAA", FILL_1);
    let seq2 = Sequence::new(b"CAAAA", FILL_2);
    let cells = Alignment::new(&seq1, &seq2, Hamming(4));
    let config = Config {
        threads: 3,
        threshold: 3,
        ..Config::default()
    };

    let mut file = tempfile::NamedTempFile::new().unwrap();
    sievealign::search::write_header(&mut file, "one.fas".as_ref(), "two.fas".as_ref()).unwrap();
    let summary = search(&cells, &config, &mut file).unwrap();
    file.flush().unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let mut lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.remove(0), "start in one.fas,start in two.fas,score,");
    lines.sort();
    assert_eq!(lines, vec!["0,1,4,", "1,1,3,"]);

    let expected = ((0u32 << 20) | (1 << 8) | 4).wrapping_add((1 << 20) | (1 << 8) | 3);
    assert_eq!(summary.hash, expected);
    assert_eq!(format!("{:08X}", summary.hash), "00100207");
}
