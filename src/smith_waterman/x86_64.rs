use std::arch::x86_64::*;

use crate::r#const::{MATCH_SCORE, WINDOW};

/// Lanes of the `b` side covered by the four 16 byte chunks. Lanes past [`WINDOW`] are
/// computed but never influence lanes inside the window, since data only flows to higher lanes.
pub const LANES: usize = 64;
const CHUNKS: usize = LANES / 16;

#[derive(Debug, Clone, Copy)]
pub struct WindowScorerSSE;

impl WindowScorerSSE {
    pub fn is_available() -> bool {
        raw_cpuid::CpuId::new()
            .get_feature_info()
            .is_some_and(|info| info.has_ssse3() && info.has_sse41())
    }

    /// Scores the [`WINDOW`] bytes of `a` against the [`WINDOW`] bytes of `b`, where `b` is
    /// read as [`LANES`] bytes. Row-wise parallelism: each row of the matrix is four vectors,
    /// the left dependency is resolved with log-step shifted maxima.
    ///
    /// # Safety
    /// Caller must ensure that SSSE3 and SSE4.1 are available
    #[target_feature(enable = "ssse3,sse4.1")]
    pub unsafe fn score(&self, a: &[u8], b: &[u8; LANES]) -> u16 {
        unsafe {
            let one = _mm_set1_epi8(1);
            let omega_score = _mm_set1_epi8(MATCH_SCORE as i8);
            let ramp = _mm_setr_epi8(1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16);
            let last_lane = _mm_set1_epi8(15);
            // Only lanes 48 and 49 of the final chunk belong to the window
            let tail_mask = _mm_setr_epi8(-1, -1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0);

            let b_chunks: [__m128i; CHUNKS] = std::array::from_fn(|chunk| {
                _mm_loadu_si128(b.as_ptr().add(chunk * 16) as *const __m128i)
            });
            let mut prev_row = [_mm_setzero_si128(); CHUNKS];
            let mut max_scores = _mm_setzero_si128();

            for &a_byte in &a[..WINDOW] {
                let a_byte = _mm_set1_epi8(a_byte as i8);
                // Previous row, previous chunk (diagonal carry)
                let mut up_left = _mm_setzero_si128();
                // Current row, previous chunk (horizontal carry)
                let mut left = _mm_setzero_si128();

                for chunk in 0..CHUNKS {
                    let up = prev_row[chunk];
                    let omega =
                        _mm_and_si128(_mm_cmpeq_epi8(a_byte, b_chunks[chunk]), omega_score);
                    let diag = _mm_alignr_epi8::<15>(up, up_left);

                    // max(1, up, diag + omega) - 1
                    let mut row_scores =
                        _mm_subs_epu8(_mm_max_epu8(up, _mm_adds_epu8(diag, omega)), one);

                    // Propagate left within the chunk, decaying by the distance travelled
                    let shifted = _mm_subs_epu8(_mm_slli_si128::<1>(row_scores), one);
                    row_scores = _mm_max_epu8(row_scores, shifted);
                    let shifted = _mm_subs_epu8(_mm_slli_si128::<2>(row_scores), _mm_set1_epi8(2));
                    row_scores = _mm_max_epu8(row_scores, shifted);
                    let shifted = _mm_subs_epu8(_mm_slli_si128::<4>(row_scores), _mm_set1_epi8(4));
                    row_scores = _mm_max_epu8(row_scores, shifted);
                    let shifted = _mm_subs_epu8(_mm_slli_si128::<8>(row_scores), _mm_set1_epi8(8));
                    row_scores = _mm_max_epu8(row_scores, shifted);

                    // Propagate the last lane of the previous chunk
                    let carried = _mm_subs_epu8(_mm_shuffle_epi8(left, last_lane), ramp);
                    row_scores = _mm_max_epu8(row_scores, carried);

                    up_left = up;
                    left = row_scores;
                    prev_row[chunk] = row_scores;

                    let in_window = if chunk == CHUNKS - 1 {
                        _mm_and_si128(row_scores, tail_mask)
                    } else {
                        row_scores
                    };
                    max_scores = _mm_max_epu8(max_scores, in_window);
                }
            }

            let max_scores = _mm_max_epu8(max_scores, _mm_srli_si128::<8>(max_scores));
            let max_scores = _mm_max_epu8(max_scores, _mm_srli_si128::<4>(max_scores));
            let max_scores = _mm_max_epu8(max_scores, _mm_srli_si128::<2>(max_scores));
            let max_scores = _mm_max_epu8(max_scores, _mm_srli_si128::<1>(max_scores));
            _mm_extract_epi8::<0>(max_scores) as u8 as u16
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smith_waterman::reference;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn score_simd(a: &[u8], b: &[u8]) -> u16 {
        let mut lanes = [b'2'; LANES];
        lanes[..WINDOW].copy_from_slice(&b[..WINDOW]);
        unsafe { WindowScorerSSE.score(a, &lanes) }
    }

    #[test]
    fn test_matches_reference_on_random_windows() {
        if !WindowScorerSSE::is_available() {
            return;
        }

        let mut rng = StdRng::seed_from_u64(7);
        for alphabet in [b"AC".as_slice(), b"ACGT", b"ACGTNRYKMS"] {
            for _ in 0..200 {
                let a: Vec<u8> = (0..WINDOW)
                    .map(|_| alphabet[rng.random_range(0..alphabet.len())])
                    .collect();
                let b: Vec<u8> = (0..WINDOW)
                    .map(|_| alphabet[rng.random_range(0..alphabet.len())])
                    .collect();
                assert_eq!(
                    score_simd(&a, &b),
                    reference::smith_waterman(&a, &b, WINDOW),
                    "SIMD and reference scores differ for {:?} / {:?}",
                    String::from_utf8_lossy(&a),
                    String::from_utf8_lossy(&b)
                );
            }
        }
    }

    #[test]
    fn test_ignores_lanes_past_window() {
        if !WindowScorerSSE::is_available() {
            return;
        }

        let a = [b'A'; WINDOW];
        let mut lanes = [b'A'; LANES];
        lanes[..WINDOW].fill(b'C');
        assert_eq!(unsafe { WindowScorerSSE.score(&a, &lanes) }, 0);
    }

    #[test]
    fn test_identical_windows() {
        if !WindowScorerSSE::is_available() {
            return;
        }

        let a: Vec<u8> = (0..WINDOW).map(|i| b"ACGT"[i % 4]).collect();
        assert_eq!(score_simd(&a, &a), 100);
    }
}
