use crate::r#const::MATCH_SCORE;

/// Straightforward two row implementation of the window recurrence, used as the fallback on
/// CPUs without SSE4.1 and as the ground truth for the SIMD version.
///
/// `cur[x] = max(1, up, diag + omega, left) - 1` where omega is [`MATCH_SCORE`] on a byte match
/// and 0 otherwise. The score is the maximum over the whole matrix.
pub fn smith_waterman(a: &[u8], b: &[u8], window: usize) -> u16 {
    let a = &a[..window];
    let b = &b[..window];

    let mut prev_row = vec![0u16; window + 1];
    let mut curr_row = vec![0u16; window + 1];
    let mut max_score = 0;

    for &a_char in a {
        for (x, &b_char) in b.iter().enumerate().map(|(x, c)| (x + 1, c)) {
            let omega = if a_char == b_char { MATCH_SCORE as u16 } else { 0 };

            let up = prev_row[x];
            let diag = prev_row[x - 1] + omega;
            let left = curr_row[x - 1];

            let score = up.max(diag).max(left).saturating_sub(1);
            curr_row[x] = score;
            max_score = max_score.max(score);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    max_score
}
