//! Byte kernels shared by the byte map skippers. Written as plain loops over slices and compiled
//! once per SIMD target, with the best version picked at runtime.

use multiversion::multiversion;

use crate::r#const::MAX_SKIP;

/// Index of distance zero in [`FALLOFF`]
pub(crate) const CENTRE: usize = MAX_SKIP - 1;

/// `FALLOFF[CENTRE + k] == |k|` for `|k| < MAX_SKIP`. Slicing it gives the distance profile of
/// any window around a skip centre.
pub(crate) static FALLOFF: [u8; 2 * MAX_SKIP - 1] = falloff();

const fn falloff() -> [u8; 2 * MAX_SKIP - 1] {
    let mut table = [0u8; 2 * MAX_SKIP - 1];
    let mut x = 0;
    while x < table.len() {
        let distance = if x < CENTRE { CENTRE - x } else { x - CENTRE };
        table[x] = distance as u8;
        x += 1;
    }
    table
}

/// Saturating decrement of every byte
#[multiversion(targets = "simd")]
pub(crate) fn decay(bytes: &mut [u8]) {
    for byte in bytes.iter_mut() {
        *byte = byte.saturating_sub(1);
    }
}

/// `dst[x] = max(dst[x], peak - profile[x])`, saturating at zero
#[multiversion(targets = "simd")]
pub(crate) fn raise(dst: &mut [u8], profile: &[u8], peak: u8) {
    for (byte, &distance) in dst.iter_mut().zip(profile) {
        *byte = (*byte).max(peak.saturating_sub(distance));
    }
}

/// Whether any `window[x] > profile[x]`
#[multiversion(targets = "simd")]
pub(crate) fn exceeds(window: &[u8], profile: &[u8]) -> bool {
    window
        .iter()
        .zip(profile)
        .fold(0u8, |acc, (&value, &distance)| acc | value.saturating_sub(distance))
        != 0
}
