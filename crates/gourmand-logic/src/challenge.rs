//! Challenge completion and schedule math.
//!
//! A challenge is a bundle of recipe ids: progress is the fraction of the
//! bundle present in the user's completed set. A challenge with no recipes
//! is defined as fully complete (progress 0.0, completed true) rather than
//! dividing by zero.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Fraction of the challenge's recipes the user has completed, in [0, 1].
/// Zero-recipe challenges report 0.0.
pub fn completion_fraction(recipe_ids: &[String], completed: &HashSet<String>) -> f64 {
    if recipe_ids.is_empty() {
        return 0.0;
    }
    let done = recipe_ids.iter().filter(|id| completed.contains(*id)).count();
    done as f64 / recipe_ids.len() as f64
}

/// True once every recipe in the challenge is completed. Vacuously true for
/// a zero-recipe challenge.
pub fn is_completed(recipe_ids: &[String], completed: &HashSet<String>) -> bool {
    recipe_ids.iter().all(|id| completed.contains(id))
}

/// Whole days left until the challenge window closes; 0 once past the end.
pub fn days_remaining(now: DateTime<Utc>, ends_at: DateTime<Utc>) -> i64 {
    if now > ends_at {
        return 0;
    }
    (ends_at - now).num_days()
}

/// How far through the challenge window `now` falls, clamped to [0, 1].
/// A degenerate window (end at or before start) reads as fully elapsed.
pub fn schedule_progress(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> f64 {
    let total = (ends_at - starts_at).num_seconds();
    if total <= 0 {
        return 1.0;
    }
    let elapsed = (now - starts_at).num_seconds();
    (elapsed as f64 / total as f64).clamp(0.0, 1.0)
}
