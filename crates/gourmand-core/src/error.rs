//! Typed failures at the engine boundary.
//!
//! Only id-resolution failures reach callers. Persistence problems are
//! absorbed inside the engine: the in-memory state stays authoritative and
//! a warning is logged.

use thiserror::Error;

/// Rejections returned by [`crate::ProgressionEngine`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown recipe id: {0}")]
    UnknownRecipe(String),

    #[error("unknown badge id: {0}")]
    UnknownBadge(String),

    #[error("unknown challenge id: {0}")]
    UnknownChallenge(String),
}
