//! Gourmand progression engine.
//!
//! Owns the user's progression state (completed recipes, badges, points,
//! level, active challenge), evaluates badge unlock rules on every recipe
//! completion, and persists the state to a local key-value store after each
//! mutation. All rule and level math lives in `gourmand-logic`; this crate
//! adds ownership, serialization at the storage boundary, and typed errors.
//!
//! The engine is an explicitly constructed instance — inject a [`Catalog`]
//! and a [`persistence::PersistenceAdapter`], keep it wherever your
//! composition root lives. No globals.

pub mod engine;
pub mod error;
pub mod persistence;

pub use engine::ProgressionEngine;
pub use error::EngineError;
pub use gourmand_logic::catalog::Catalog;
pub use gourmand_logic::progress::{ProgressState, UnlockedBadge};
