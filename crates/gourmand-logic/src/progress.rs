//! Mutable per-user progression state.
//!
//! [`ProgressState`] is the single aggregate the engine owns. All mutation
//! goes through the primitives here, which enforce the core invariants:
//! recipe completion is idempotent, the unlocked-badge map is add-only,
//! points never decrease, and level never regresses — except through
//! [`ProgressState::reset`], which returns to the empty initial state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::catalog::BadgeDefinition;

/// A badge the user has earned, with its definition snapshot and the moment
/// it unlocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockedBadge {
    pub badge: BadgeDefinition,
    pub unlocked_at: DateTime<Utc>,
}

/// The user's full progression state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Ids of every recipe the user has completed.
    pub completed_recipe_ids: HashSet<String>,
    /// Distinct cuisines among completed recipes, maintained incrementally
    /// on every completion so rule evaluation never rescans the catalog.
    pub completed_cuisines: HashSet<String>,
    /// Earned badges, keyed by badge id. Add-only outside `reset`.
    pub unlocked_badges: BTreeMap<String, UnlockedBadge>,
    /// Total points. Never decreases outside `reset`.
    pub points: u64,
    /// Current level, >= 1. Never decreases outside `reset`.
    pub level: u32,
    /// Challenge the user has joined, if any. A pointer into the catalog
    /// with no ownership implications.
    pub active_challenge_id: Option<String>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressState {
    /// Empty initial state: nothing completed, no badges, level 1.
    pub fn new() -> Self {
        Self {
            completed_recipe_ids: HashSet::new(),
            completed_cuisines: HashSet::new(),
            unlocked_badges: BTreeMap::new(),
            points: 0,
            level: 1,
            active_challenge_id: None,
        }
    }

    /// Initial state with the seed badge already unlocked. The seed badge
    /// awards no points; a fresh user starts at 0 points, level 1.
    pub fn seeded(seed: BadgeDefinition, unlocked_at: DateTime<Utc>) -> Self {
        let mut state = Self::new();
        state.add_unlocked_badge(seed, unlocked_at);
        state
    }

    /// Record a recipe completion. Returns `false` (and mutates nothing)
    /// when the recipe was already completed.
    pub fn mark_recipe_completed(&mut self, recipe_id: &str, cuisine: &str) -> bool {
        if !self.completed_recipe_ids.insert(recipe_id.to_string()) {
            return false;
        }
        self.completed_cuisines.insert(cuisine.to_string());
        true
    }

    /// Add a badge to the unlocked set. Returns `false` (and mutates
    /// nothing) when the badge id is already present — an unlocked badge is
    /// never overwritten, so each id appears at most once with its original
    /// unlock timestamp.
    pub fn add_unlocked_badge(
        &mut self,
        badge: BadgeDefinition,
        unlocked_at: DateTime<Utc>,
    ) -> bool {
        if self.unlocked_badges.contains_key(&badge.id) {
            return false;
        }
        let id = badge.id.clone();
        self.unlocked_badges
            .insert(id, UnlockedBadge { badge, unlocked_at });
        true
    }

    pub fn add_points(&mut self, n: u64) {
        self.points = self.points.saturating_add(n);
    }

    /// Raise the level. A value at or below the current level is ignored —
    /// level recomputation must never regress the level.
    pub fn set_level(&mut self, level: u32) {
        if level > self.level {
            self.level = level;
        }
    }

    pub fn set_active_challenge(&mut self, challenge_id: Option<String>) {
        self.active_challenge_id = challenge_id;
    }

    /// Return to the empty initial state. The caller re-seeds the seed
    /// badge with a fresh timestamp.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn completed_count(&self) -> usize {
        self.completed_recipe_ids.len()
    }

    pub fn distinct_cuisine_count(&self) -> usize {
        self.completed_cuisines.len()
    }

    pub fn is_completed(&self, recipe_id: &str) -> bool {
        self.completed_recipe_ids.contains(recipe_id)
    }

    pub fn is_unlocked(&self, badge_id: &str) -> bool {
        self.unlocked_badges.contains_key(badge_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BadgeCategory, BadgeRarity, UnlockRule};

    fn badge(id: &str) -> BadgeDefinition {
        BadgeDefinition {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            icon: "star".into(),
            requirement: String::new(),
            category: BadgeCategory::Achievement,
            rarity: BadgeRarity::Common,
            points: 10,
            rule: UnlockRule::ManualFlag,
        }
    }

    #[test]
    fn fresh_state_is_level_one() {
        let state = ProgressState::new();
        assert_eq!(state.points, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.completed_count(), 0);
        assert!(state.unlocked_badges.is_empty());
        assert!(state.active_challenge_id.is_none());
    }

    #[test]
    fn seeded_state_has_one_badge_and_no_points() {
        let state = ProgressState::seeded(badge("welcome"), Utc::now());
        assert!(state.is_unlocked("welcome"));
        assert_eq!(state.unlocked_badges.len(), 1);
        assert_eq!(state.points, 0);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn completion_is_idempotent() {
        let mut state = ProgressState::new();
        assert!(state.mark_recipe_completed("r1", "Italian"));
        assert!(!state.mark_recipe_completed("r1", "Italian"));
        assert_eq!(state.completed_count(), 1);
        assert_eq!(state.distinct_cuisine_count(), 1);
    }

    #[test]
    fn cuisine_cache_counts_distinct_only() {
        let mut state = ProgressState::new();
        state.mark_recipe_completed("r1", "Italian");
        state.mark_recipe_completed("r2", "Italian");
        state.mark_recipe_completed("r3", "Thai");
        assert_eq!(state.completed_count(), 3);
        assert_eq!(state.distinct_cuisine_count(), 2);
    }

    #[test]
    fn unlocked_badge_never_overwritten() {
        let mut state = ProgressState::new();
        let first = Utc::now();
        assert!(state.add_unlocked_badge(badge("b1"), first));
        assert!(!state.add_unlocked_badge(badge("b1"), Utc::now()));
        assert_eq!(state.unlocked_badges.len(), 1);
        assert_eq!(state.unlocked_badges["b1"].unlocked_at, first);
    }

    #[test]
    fn level_never_regresses() {
        let mut state = ProgressState::new();
        state.set_level(4);
        state.set_level(2);
        assert_eq!(state.level, 4);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut state = ProgressState::new();
        state.mark_recipe_completed("r1", "Italian");
        state.add_unlocked_badge(badge("b1"), Utc::now());
        state.add_points(500);
        state.set_level(6);
        state.set_active_challenge(Some("c1".into()));
        state.reset();
        assert_eq!(state, ProgressState::new());
    }
}
