//! The progression engine.
//!
//! Single owner of [`ProgressState`]: every mutating operation runs under
//! one lock (single-writer), bumps a version stamp, and hands the new
//! snapshot to the persistence adapter before returning it to the caller.
//! Read queries take the same lock briefly, so they always observe a
//! consistent snapshot across the recipe set, points, and level.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, info};

use gourmand_logic::catalog::{BadgeCategory, BadgeDefinition, Catalog};
use gourmand_logic::progress::{ProgressState, UnlockedBadge};
use gourmand_logic::{challenge, level, rules};

use crate::error::EngineError;
use crate::persistence::PersistenceAdapter;

/// Base points awarded for completing any recipe, before badge bonuses.
pub const RECIPE_COMPLETION_POINTS: u64 = 10;

struct Inner {
    state: ProgressState,
    /// Monotonic mutation counter; stamps every persistence write.
    version: u64,
    persistence: PersistenceAdapter,
}

/// Owns user progression for one profile. Construct once and inject where
/// needed; all methods take `&self`.
pub struct ProgressionEngine<C: Catalog> {
    catalog: C,
    inner: Mutex<Inner>,
}

impl<C: Catalog> ProgressionEngine<C> {
    /// Load persisted progress (falling back to the seeded initial state)
    /// and wrap it with the given catalog.
    pub fn new(catalog: C, persistence: PersistenceAdapter) -> Self {
        let mut state = match persistence.load(&catalog) {
            Some(loaded) => loaded,
            None => Self::seeded_state(&catalog),
        };
        // Stored level may lag the stored points; derive forward, never back.
        state.set_level(level::level_for_points(state.points));
        info!(
            points = state.points,
            level = state.level,
            completed = state.completed_count(),
            badges = state.unlocked_badges.len(),
            "progression engine ready"
        );
        Self {
            catalog,
            inner: Mutex::new(Inner {
                state,
                version: 0,
                persistence,
            }),
        }
    }

    fn seeded_state(catalog: &C) -> ProgressState {
        match catalog.badge_definitions().first() {
            Some(seed) => ProgressState::seeded(seed.clone(), Utc::now()),
            None => ProgressState::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a recipe completion.
    ///
    /// Awards the base completion reward, unlocks every badge whose rule
    /// the new state satisfies (with its rarity-scaled bonus), recomputes
    /// the level, persists, and returns the updated snapshot. Completing an
    /// already-completed recipe is a no-op returning the current snapshot.
    pub fn complete_recipe(&self, recipe_id: &str) -> Result<ProgressState, EngineError> {
        let recipe = self
            .catalog
            .recipe(recipe_id)
            .ok_or_else(|| EngineError::UnknownRecipe(recipe_id.to_string()))?
            .clone();

        let mut inner = self.lock();
        if !inner.state.mark_recipe_completed(&recipe.id, &recipe.cuisine) {
            debug!(recipe = %recipe.id, "recipe already completed, no-op");
            return Ok(inner.state.clone());
        }
        inner.state.add_points(RECIPE_COMPLETION_POINTS);
        self.unlock_eligible(&mut inner.state);
        Self::finish_mutation(&mut inner);
        Ok(inner.state.clone())
    }

    /// Unlock a badge through an external trigger (social sharing, seasonal
    /// challenge completion, ...). The only path that unlocks `ManualFlag`
    /// badges. No-op snapshot return when already unlocked.
    pub fn force_unlock(&self, badge_id: &str) -> Result<ProgressState, EngineError> {
        let definition = self
            .catalog
            .badge(badge_id)
            .ok_or_else(|| EngineError::UnknownBadge(badge_id.to_string()))?
            .clone();

        let mut inner = self.lock();
        if !self.apply_unlock(&mut inner.state, definition) {
            return Ok(inner.state.clone());
        }
        Self::finish_mutation(&mut inner);
        Ok(inner.state.clone())
    }

    /// Join a challenge. Purely a pointer into the catalog — no points or
    /// badge side effects.
    pub fn join_challenge(&self, challenge_id: &str) -> Result<ProgressState, EngineError> {
        let challenge = self
            .catalog
            .challenge(challenge_id)
            .ok_or_else(|| EngineError::UnknownChallenge(challenge_id.to_string()))?;
        let id = challenge.id.clone();

        let mut inner = self.lock();
        inner.state.set_active_challenge(Some(id));
        Self::finish_mutation(&mut inner);
        Ok(inner.state.clone())
    }

    /// Clear the active challenge pointer.
    pub fn leave_challenge(&self) -> ProgressState {
        let mut inner = self.lock();
        inner.state.set_active_challenge(None);
        Self::finish_mutation(&mut inner);
        inner.state.clone()
    }

    /// Fraction of the challenge's recipes completed, in [0, 1]. A
    /// zero-recipe challenge reports 0.
    pub fn challenge_progress(&self, challenge_id: &str) -> Result<f64, EngineError> {
        let challenge = self
            .catalog
            .challenge(challenge_id)
            .ok_or_else(|| EngineError::UnknownChallenge(challenge_id.to_string()))?;
        let inner = self.lock();
        Ok(challenge::completion_fraction(
            &challenge.recipe_ids,
            &inner.state.completed_recipe_ids,
        ))
    }

    /// True once every recipe in the challenge is completed; vacuously true
    /// for a zero-recipe challenge.
    pub fn is_challenge_completed(&self, challenge_id: &str) -> Result<bool, EngineError> {
        let challenge = self
            .catalog
            .challenge(challenge_id)
            .ok_or_else(|| EngineError::UnknownChallenge(challenge_id.to_string()))?;
        let inner = self.lock();
        Ok(challenge::is_completed(
            &challenge.recipe_ids,
            &inner.state.completed_recipe_ids,
        ))
    }

    /// Wipe all progress back to the seeded initial state: points 0,
    /// level 1, no completions, only the seed badge (fresh timestamp), no
    /// active challenge.
    pub fn reset(&self) -> ProgressState {
        let mut inner = self.lock();
        inner.state = Self::seeded_state(&self.catalog);
        Self::finish_mutation(&mut inner);
        info!("progress reset to seeded state");
        inner.state.clone()
    }

    /// Current state snapshot.
    pub fn state(&self) -> ProgressState {
        self.lock().state.clone()
    }

    /// Points still needed to reach the next level.
    pub fn points_to_next_level(&self) -> u64 {
        let inner = self.lock();
        level::points_to_next_level(inner.state.points, inner.state.level)
    }

    /// Fraction of the way through the current level, in [0, 1].
    pub fn level_progress(&self) -> f64 {
        let inner = self.lock();
        level::level_progress(inner.state.points, inner.state.level)
    }

    /// Earned badges, ordered by badge id.
    pub fn unlocked_badges(&self) -> Vec<UnlockedBadge> {
        self.lock().state.unlocked_badges.values().cloned().collect()
    }

    /// Catalog badges not yet earned, in definition order.
    pub fn locked_badges(&self) -> Vec<BadgeDefinition> {
        let inner = self.lock();
        self.catalog
            .badge_definitions()
            .iter()
            .filter(|def| !inner.state.is_unlocked(&def.id))
            .cloned()
            .collect()
    }

    /// All catalog badges in the given category, in definition order.
    pub fn badges_by_category(&self, category: BadgeCategory) -> Vec<BadgeDefinition> {
        self.catalog
            .badge_definitions()
            .iter()
            .filter(|def| def.category == category)
            .cloned()
            .collect()
    }

    /// Unlock every badge whose rule the state now satisfies, in catalog
    /// definition order.
    fn unlock_eligible(&self, state: &mut ProgressState) {
        for id in rules::newly_eligible(state, self.catalog.badge_definitions()) {
            if let Some(definition) = self.catalog.badge(&id) {
                self.apply_unlock(state, definition.clone());
            }
        }
    }

    /// Transition a badge Locked → Unlocked and award its bonus. Returns
    /// false when it was already unlocked.
    fn apply_unlock(&self, state: &mut ProgressState, definition: BadgeDefinition) -> bool {
        let bonus = rules::bonus_points(&definition);
        let id = definition.id.clone();
        if !state.add_unlocked_badge(definition, Utc::now()) {
            return false;
        }
        state.add_points(bonus);
        info!(badge = %id, bonus, "badge unlocked");
        true
    }

    /// Recompute the level (monotonically), bump the version, persist.
    fn finish_mutation(inner: &mut Inner) {
        inner
            .state
            .set_level(level::level_for_points(inner.state.points));
        inner.version += 1;
        let version = inner.version;
        inner.persistence.save(&inner.state, version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PersistenceAdapter;
    use gourmand_logic::sample::sample_catalog;

    fn engine() -> ProgressionEngine<gourmand_logic::catalog::StaticCatalog> {
        ProgressionEngine::new(sample_catalog(), PersistenceAdapter::in_memory())
    }

    #[test]
    fn fresh_engine_is_seeded() {
        let engine = engine();
        let state = engine.state();
        assert_eq!(state.points, 0);
        assert_eq!(state.level, 1);
        assert!(state.is_unlocked("welcome-aboard"));
        assert_eq!(state.unlocked_badges.len(), 1);
    }

    #[test]
    fn unknown_ids_rejected() {
        let engine = engine();
        assert_eq!(
            engine.complete_recipe("nope"),
            Err(EngineError::UnknownRecipe("nope".into()))
        );
        assert_eq!(
            engine.force_unlock("nope"),
            Err(EngineError::UnknownBadge("nope".into()))
        );
        assert_eq!(
            engine.join_challenge("nope"),
            Err(EngineError::UnknownChallenge("nope".into()))
        );
    }

    #[test]
    fn first_completion_awards_base_and_first_steps_bonus() {
        let engine = engine();
        let state = engine.complete_recipe("margherita-pizza").expect("known recipe");
        // 10 base + round(10 × 1.0) bonus for First Steps.
        assert_eq!(state.points, 20);
        assert_eq!(state.level, 1);
        assert!(state.is_unlocked("first-steps"));
    }

    #[test]
    fn force_unlock_is_idempotent() {
        let engine = engine();
        let first = engine.force_unlock("social-butterfly").expect("known badge");
        // round(75 × 1.5) = 113
        assert_eq!(first.points, 113);
        let second = engine.force_unlock("social-butterfly").expect("known badge");
        assert_eq!(second, first);
    }

    #[test]
    fn level_progress_queries() {
        let engine = engine();
        engine.complete_recipe("margherita-pizza").expect("known recipe");
        assert_eq!(engine.points_to_next_level(), 80);
        assert!((engine.level_progress() - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn badge_list_queries() {
        let engine = engine();
        assert_eq!(engine.unlocked_badges().len(), 1);
        let locked = engine.locked_badges();
        assert!(locked.iter().all(|b| b.id != "welcome-aboard"));
        assert_eq!(locked.len(), 5);
        let seasonal = engine.badges_by_category(BadgeCategory::Seasonal);
        assert_eq!(seasonal.len(), 1);
        assert_eq!(seasonal[0].id, "seasonal-specialist");
    }

    #[test]
    fn join_and_leave_challenge() {
        let engine = engine();
        let joined = engine.join_challenge("october-harvest").expect("known challenge");
        assert_eq!(joined.active_challenge_id.as_deref(), Some("october-harvest"));
        // Joining awards nothing.
        assert_eq!(joined.points, 0);
        let left = engine.leave_challenge();
        assert!(left.active_challenge_id.is_none());
    }
}
