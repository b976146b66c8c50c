//! Level derivation from points.
//!
//! Levels are a pure function of total points: 100 points per level,
//! starting at level 1. The engine applies derived levels monotonically
//! (a recomputation never lowers a level), so the progress fraction here
//! clamps defensively even though the formula is exact under that
//! invariant.

/// Points required to advance one level.
pub const POINTS_PER_LEVEL: u64 = 100;

/// Level derived from total points: `max(1, points / 100 + 1)`.
pub fn level_for_points(points: u64) -> u32 {
    let derived = points / POINTS_PER_LEVEL + 1;
    u32::try_from(derived).unwrap_or(u32::MAX).max(1)
}

/// Total points at which `level` begins: `(level - 1) * 100`.
pub fn points_for_level(level: u32) -> u64 {
    u64::from(level.saturating_sub(1)) * POINTS_PER_LEVEL
}

/// Points still needed to reach the next level, given current totals.
pub fn points_to_next_level(points: u64, level: u32) -> u64 {
    points_for_level(level.saturating_add(1)).saturating_sub(points)
}

/// Fraction of the way through the current level, clamped to [0, 1].
pub fn level_progress(points: u64, level: u32) -> f64 {
    let floor = points_for_level(level);
    let ceiling = points_for_level(level.saturating_add(1));
    let span = ceiling.saturating_sub(floor);
    if span == 0 {
        return 1.0;
    }
    let into_level = points.saturating_sub(floor);
    (into_level as f64 / span as f64).clamp(0.0, 1.0)
}
