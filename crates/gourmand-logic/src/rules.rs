//! Badge unlock rule evaluation.
//!
//! The evaluator is pure: it reads progress state and badge definitions and
//! reports which locked badges now qualify, in catalog definition order.
//! It never mutates anything — the engine applies the unlocks.
//!
//! Threshold rules read the counts [`ProgressState`] maintains
//! incrementally, so evaluation is O(badge count) regardless of how many
//! recipes have been completed.

use crate::catalog::{BadgeDefinition, UnlockRule};
use crate::progress::ProgressState;

/// Whether a rule is currently satisfied by the given state.
///
/// `ManualFlag` is never satisfied here — those badges unlock only through
/// the engine's explicit force-unlock path.
pub fn rule_satisfied(rule: UnlockRule, state: &ProgressState) -> bool {
    match rule {
        UnlockRule::CountThreshold { n } => state.completed_count() >= n as usize,
        UnlockRule::DistinctCuisineThreshold { n } => {
            state.distinct_cuisine_count() >= n as usize
        }
        UnlockRule::ManualFlag => false,
    }
}

/// Ids of badges whose rule is satisfied and which are not yet unlocked,
/// in definition order. Definition order makes simultaneous unlocks
/// deterministic.
pub fn newly_eligible(state: &ProgressState, definitions: &[BadgeDefinition]) -> Vec<String> {
    definitions
        .iter()
        .filter(|def| !state.is_unlocked(&def.id))
        .filter(|def| rule_satisfied(def.rule, state))
        .map(|def| def.id.clone())
        .collect()
}

/// Points awarded when a badge unlocks: base points scaled by the rarity
/// multiplier, rounded half-up to an integer.
pub fn bonus_points(definition: &BadgeDefinition) -> u64 {
    let scaled = f64::from(definition.points) * definition.rarity.points_multiplier();
    scaled.round() as u64
}
