/// Width of the scoring window on both sequences
pub const WINDOW: usize = 50;
/// Gain for a matching byte on the diagonal, before the per-step decay of 1
pub const MATCH_SCORE: u8 = 3;
/// Upper bound on the per-step growth of a window score, which bounds how far a
/// losing cell can be from the nearest possible winner
pub const MAX_STEP_GAIN: u16 = 3;

/// Bytes appended to every loaded sequence: one window for reads past the end, plus
/// one 256-bit vector of SIMD over-read
pub const PADDING: usize = WINDOW + 32;
pub const FILL_1: u8 = b'1';
pub const FILL_2: u8 = b'2';

/// Skip counts saturate here so that byte counters can hold them
pub const MAX_SKIP: usize = u8::MAX as usize;
/// Deepest cascade a saturated skip count can produce
pub const MAX_LOOKAHEAD: usize = MAX_SKIP - 1;
pub const DEFAULT_LOOKAHEAD: usize = 16;
pub const DEFAULT_THRESHOLD: u16 = 70;
pub const DEFAULT_THREADS: usize = 4;

/// Nodes allocated at once when the pool runs dry
pub const POOL_BATCH: usize = 1000;

/// Rows a worker finishes before reporting them to the collector
pub const PROGRESS_BATCH: usize = 1000;
/// Completed rows between two progress lines
pub const PROGRESS_INTERVAL: usize = 100_000;
