//! Pure progression logic for Gourmand.
//!
//! This crate contains all badge, level, and challenge logic that is
//! independent of any storage, clock, or UI. Functions take plain data and
//! return results, making them unit-testable and portable — the engine in
//! `gourmand-core` is a thin orchestration layer over these modules.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Recipe, badge, and challenge definitions + catalog lookup |
//! | [`challenge`] | Challenge completion fraction and schedule windows |
//! | [`level`] | Points-to-level derivation and level progress fractions |
//! | [`progress`] | Mutable per-user progression state and its primitives |
//! | [`rules`] | Badge unlock rule evaluation and bonus point rewards |
//! | [`sample`] | Built-in sample catalog (recipes, badges, one challenge) |

pub mod catalog;
pub mod challenge;
pub mod level;
pub mod progress;
pub mod rules;
pub mod sample;
