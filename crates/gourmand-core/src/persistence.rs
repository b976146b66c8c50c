//! Key-value persistence for progression state.
//!
//! The engine writes four namespaced keys after every mutation and reads
//! them back on startup. Storage is pluggable through [`KvStore`]; the
//! bundled backends are an in-memory map (tests, harnesses) and a single
//! JSON document on disk.
//!
//! Failures never propagate to engine callers: a failed save is logged and
//! the in-memory state stays authoritative; a corrupt read falls back to
//! the seeded initial state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use gourmand_logic::catalog::Catalog;
use gourmand_logic::progress::{ProgressState, UnlockedBadge};

/// Storage keys, all namespaced to the progression engine.
pub mod keys {
    pub const UNLOCKED_BADGES: &str = "progress.unlockedBadges";
    pub const COMPLETED_RECIPES: &str = "progress.completedRecipes";
    pub const POINTS: &str = "progress.points";
    pub const LEVEL: &str = "progress.level";
    pub const ACTIVE_CHALLENGE: &str = "progress.activeChallenge";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Minimal key-value storage surface the engine persists through.
pub trait KvStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Durable store holding all keys in one JSON document on disk.
///
/// The whole document is rewritten on every put. A document that fails to
/// parse on open is treated as empty (and logged), so a corrupted file
/// degrades to a fresh profile instead of a crash.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            match serde_json::from_str::<HashMap<String, String>>(&contents) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = %path.display(), %err, "store document corrupt, starting empty");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };
        Ok(Self { path, entries })
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Wire shape of the completed-recipe list.
#[derive(Serialize, Deserialize)]
struct CompletedRecipes(Vec<String>);

/// Translates [`ProgressState`] to and from the key-value layout, and
/// sequences writes: every save carries a monotonic version stamp, and a
/// save at or below the last stamp written is dropped so a stale snapshot
/// can never overwrite a newer one.
pub struct PersistenceAdapter {
    store: Box<dyn KvStore>,
    last_saved_version: u64,
}

impl PersistenceAdapter {
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self {
            store,
            last_saved_version: 0,
        }
    }

    /// Convenience constructor for a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Reconstruct progression state from storage.
    ///
    /// Returns `None` when nothing is stored or when any key fails to
    /// parse — in both cases the engine starts from the seeded initial
    /// state. The distinct-cuisine cache is rebuilt from the catalog;
    /// completed ids that no longer resolve keep counting toward count
    /// thresholds but contribute no cuisine.
    pub fn load<C: Catalog>(&self, catalog: &C) -> Option<ProgressState> {
        let any_present = [
            keys::UNLOCKED_BADGES,
            keys::COMPLETED_RECIPES,
            keys::POINTS,
            keys::LEVEL,
            keys::ACTIVE_CHALLENGE,
        ]
        .iter()
        .any(|key| self.store.get(key).is_some());
        if !any_present {
            return None;
        }

        let badges: Vec<UnlockedBadge> = match self.store.get(keys::UNLOCKED_BADGES) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(list) => list,
                Err(err) => {
                    warn!(%err, "stored badges corrupt, falling back to seeded state");
                    return None;
                }
            },
            None => Vec::new(),
        };

        let recipe_ids: Vec<String> = match self.store.get(keys::COMPLETED_RECIPES) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(CompletedRecipes(list)) => list,
                Err(err) => {
                    warn!(%err, "stored recipes corrupt, falling back to seeded state");
                    return None;
                }
            },
            None => Vec::new(),
        };

        let points: u64 = match self.store.get(keys::POINTS) {
            Some(raw) => match raw.trim().parse() {
                Ok(n) => n,
                Err(err) => {
                    warn!(%err, "stored points corrupt, falling back to seeded state");
                    return None;
                }
            },
            None => 0,
        };

        // Level 0 or absent reads as level 1.
        let level: u32 = match self.store.get(keys::LEVEL) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) => n.max(1),
                Err(err) => {
                    warn!(%err, "stored level corrupt, falling back to seeded state");
                    return None;
                }
            },
            None => 1,
        };

        let active_challenge: Option<String> = match self.store.get(keys::ACTIVE_CHALLENGE) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(id) => id,
                Err(err) => {
                    warn!(%err, "stored challenge pointer corrupt, falling back to seeded state");
                    return None;
                }
            },
            None => None,
        };
        // Drop a pointer to a challenge the catalog no longer knows.
        let active_challenge = active_challenge.filter(|id| {
            let known = catalog.challenge(id).is_some();
            if !known {
                warn!(challenge = %id, "stored challenge no longer in catalog, clearing");
            }
            known
        });

        let mut state = ProgressState::new();
        for id in recipe_ids {
            if let Some(recipe) = catalog.recipe(&id) {
                state.completed_cuisines.insert(recipe.cuisine.clone());
            }
            state.completed_recipe_ids.insert(id);
        }
        for unlocked in badges {
            state.add_unlocked_badge(unlocked.badge, unlocked.unlocked_at);
        }
        state.add_points(points);
        state.set_level(level);
        state.set_active_challenge(active_challenge);
        Some(state)
    }

    /// Write the full state under all four keys.
    ///
    /// Saves are versioned: a stamp at or below the last successful save is
    /// ignored. Write failures are logged and absorbed.
    pub fn save(&mut self, state: &ProgressState, version: u64) {
        if version <= self.last_saved_version {
            debug!(version, last = self.last_saved_version, "skipping stale save");
            return;
        }
        if let Err(err) = self.write_state(state) {
            warn!(%err, "progress save failed, in-memory state remains authoritative");
            return;
        }
        self.last_saved_version = version;
    }

    fn write_state(&mut self, state: &ProgressState) -> Result<(), StoreError> {
        let badges: Vec<&UnlockedBadge> = state.unlocked_badges.values().collect();
        let mut recipes: Vec<&String> = state.completed_recipe_ids.iter().collect();
        recipes.sort();

        self.store
            .put(keys::UNLOCKED_BADGES, &serde_json::to_string(&badges)?)?;
        self.store
            .put(keys::COMPLETED_RECIPES, &serde_json::to_string(&recipes)?)?;
        self.store.put(keys::POINTS, &state.points.to_string())?;
        self.store.put(keys::LEVEL, &state.level.to_string())?;
        self.store.put(
            keys::ACTIVE_CHALLENGE,
            &serde_json::to_string(&state.active_challenge_id)?,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gourmand_logic::sample::sample_catalog;
    use gourmand_logic::catalog::StaticCatalog;

    fn sample_state(catalog: &StaticCatalog) -> ProgressState {
        let mut state = ProgressState::new();
        state.mark_recipe_completed("margherita-pizza", "Italian");
        state.mark_recipe_completed("pad-thai", "Thai");
        let badge = catalog.badge_definitions()[1].clone();
        state.add_unlocked_badge(badge, Utc::now());
        state.add_points(120);
        state.set_level(2);
        state.set_active_challenge(Some("october-harvest".into()));
        state
    }

    #[test]
    fn empty_store_loads_nothing() {
        let catalog = sample_catalog();
        let adapter = PersistenceAdapter::in_memory();
        assert!(adapter.load(&catalog).is_none());
    }

    #[test]
    fn round_trip_through_memory_store() {
        let catalog = sample_catalog();
        let state = sample_state(&catalog);
        let mut adapter = PersistenceAdapter::in_memory();
        adapter.save(&state, 1);
        let loaded = adapter.load(&catalog).expect("state present");
        assert_eq!(loaded, state);
    }

    #[test]
    fn stale_save_is_dropped() {
        let catalog = sample_catalog();
        let mut adapter = PersistenceAdapter::in_memory();
        let newer = sample_state(&catalog);
        adapter.save(&newer, 2);
        // A lagging save for an earlier mutation must not clobber version 2.
        adapter.save(&ProgressState::new(), 1);
        let loaded = adapter.load(&catalog).expect("state present");
        assert_eq!(loaded, newer);
    }

    #[test]
    fn corrupt_badges_fall_back_to_none() {
        let catalog = sample_catalog();
        let mut store = MemoryStore::new();
        store.put(keys::UNLOCKED_BADGES, "not json").expect("put");
        let adapter = PersistenceAdapter::new(Box::new(store));
        assert!(adapter.load(&catalog).is_none());
    }

    #[test]
    fn corrupt_points_fall_back_to_none() {
        let catalog = sample_catalog();
        let mut store = MemoryStore::new();
        store.put(keys::POINTS, "a lot").expect("put");
        let adapter = PersistenceAdapter::new(Box::new(store));
        assert!(adapter.load(&catalog).is_none());
    }

    #[test]
    fn level_zero_reads_as_one() {
        let catalog = sample_catalog();
        let mut store = MemoryStore::new();
        store.put(keys::COMPLETED_RECIPES, "[]").expect("put");
        store.put(keys::LEVEL, "0").expect("put");
        let adapter = PersistenceAdapter::new(Box::new(store));
        let loaded = adapter.load(&catalog).expect("state present");
        assert_eq!(loaded.level, 1);
    }

    #[test]
    fn unresolvable_recipe_keeps_count_not_cuisine() {
        let catalog = sample_catalog();
        let mut store = MemoryStore::new();
        store
            .put(keys::COMPLETED_RECIPES, r#"["margherita-pizza","gone-recipe"]"#)
            .expect("put");
        let adapter = PersistenceAdapter::new(Box::new(store));
        let loaded = adapter.load(&catalog).expect("state present");
        assert_eq!(loaded.completed_count(), 2);
        assert_eq!(loaded.distinct_cuisine_count(), 1);
    }

    #[test]
    fn dangling_challenge_pointer_cleared() {
        let catalog = sample_catalog();
        let mut store = MemoryStore::new();
        store
            .put(keys::ACTIVE_CHALLENGE, r#""retired-challenge""#)
            .expect("put");
        let adapter = PersistenceAdapter::new(Box::new(store));
        let loaded = adapter.load(&catalog).expect("state present");
        assert!(loaded.active_challenge_id.is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("progress.json");
        let catalog = sample_catalog();
        let state = sample_state(&catalog);

        let store = FileStore::open(&path).expect("open");
        let mut adapter = PersistenceAdapter::new(Box::new(store));
        adapter.save(&state, 1);

        let reopened = FileStore::open(&path).expect("reopen");
        let adapter = PersistenceAdapter::new(Box::new(reopened));
        let loaded = adapter.load(&catalog).expect("state present");
        assert_eq!(loaded, state);
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("progress.json");
        fs::write(&path, "{{{ not json").expect("write");
        let store = FileStore::open(&path).expect("open");
        assert!(store.get(keys::POINTS).is_none());
    }
}
