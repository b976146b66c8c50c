//! Gourmand Headless Validation Harness
//!
//! Validates progression logic and the engine without any UI.
//! Runs entirely in-process — no app shell, no rendering.
//!
//! Usage:
//!   cargo run -p gourmand-simtest
//!   cargo run -p gourmand-simtest -- --verbose

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use tracing_subscriber::EnvFilter;

use gourmand_core::engine::{ProgressionEngine, RECIPE_COMPLETION_POINTS};
use gourmand_core::persistence::{FileStore, PersistenceAdapter};
use gourmand_logic::catalog::{Catalog, StaticCatalog, UnlockRule};
use gourmand_logic::progress::ProgressState;
use gourmand_logic::sample::sample_catalog;
use gourmand_logic::{challenge, level, rules};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed,
        detail: detail.into(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Gourmand Progression Harness ===\n");

    let mut results = Vec::new();

    // 1. Sample catalog consistency
    results.extend(validate_catalog(verbose));

    // 2. Rule evaluator sweep
    results.extend(validate_rules(verbose));

    // 3. Level math sweep
    results.extend(validate_level_math(verbose));

    // 4. Challenge math
    results.extend(validate_challenge_math(verbose));

    // 5. Engine end-to-end flow
    results.extend(validate_engine_flow(verbose));

    // 6. Persistence reload
    results.extend(validate_persistence(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Sample Catalog ───────────────────────────────────────────────────

fn validate_catalog(_verbose: bool) -> Vec<TestResult> {
    println!("--- Sample Catalog ---");
    let mut results = Vec::new();
    let catalog = sample_catalog();

    let badge_ids: HashSet<_> = catalog
        .badge_definitions()
        .iter()
        .map(|b| b.id.as_str())
        .collect();
    results.push(check(
        "badge_ids_unique",
        badge_ids.len() == catalog.badge_definitions().len(),
        format!("{} badges", catalog.badge_definitions().len()),
    ));

    let seed = catalog.badge_definitions().first();
    results.push(check(
        "seed_badge_worth_nothing",
        seed.map(|b| b.points == 0 && b.rule == UnlockRule::ManualFlag)
            .unwrap_or(false),
        seed.map(|b| b.id.clone()).unwrap_or_default(),
    ));

    let cuisines: HashSet<_> = catalog.recipes().iter().map(|r| r.cuisine.as_str()).collect();
    results.push(check(
        "cuisine_variety",
        cuisines.len() >= 5,
        format!("{} distinct cuisines", cuisines.len()),
    ));

    let dangling = catalog
        .challenges()
        .iter()
        .flat_map(|c| c.recipe_ids.iter())
        .filter(|id| catalog.recipe(id).is_none())
        .count();
    results.push(check(
        "challenge_recipes_resolve",
        dangling == 0,
        format!("{} dangling ids", dangling),
    ));

    results
}

// ── 2. Rule Evaluator ───────────────────────────────────────────────────

fn validate_rules(verbose: bool) -> Vec<TestResult> {
    println!("--- Rule Evaluator ---");
    let mut results = Vec::new();
    let catalog = sample_catalog();

    let mut state = ProgressState::new();
    state.mark_recipe_completed("margherita-pizza", "Italian");
    let eligible = rules::newly_eligible(&state, catalog.badge_definitions());
    results.push(check(
        "first_completion_unlocks_first_steps",
        eligible == vec!["first-steps".to_string()],
        format!("{:?}", eligible),
    ));

    // Manual badges must stay locked no matter how much is completed.
    for (i, cuisine) in ["a", "b", "c", "d", "e", "f"].iter().enumerate() {
        state.mark_recipe_completed(&format!("synthetic-{i}"), cuisine);
    }
    let eligible = rules::newly_eligible(&state, catalog.badge_definitions());
    let manual_eligible = eligible
        .iter()
        .any(|id| id == "social-butterfly" || id == "seasonal-specialist" || id == "welcome-aboard");
    results.push(check(
        "manual_badges_never_auto_unlock",
        !manual_eligible,
        format!("{:?}", eligible),
    ));

    if verbose {
        println!("  state: {} recipes, {} cuisines", state.completed_count(), state.distinct_cuisine_count());
    }

    // Bonus points follow rarity multipliers with half-up rounding.
    let all_rounded = catalog
        .badge_definitions()
        .iter()
        .all(|def| {
            let expected =
                (f64::from(def.points) * def.rarity.points_multiplier()).round() as u64;
            rules::bonus_points(def) == expected
        });
    results.push(check("bonus_points_rounding", all_rounded, "half-up over catalog"));

    results
}

// ── 3. Level Math ───────────────────────────────────────────────────────

fn validate_level_math(_verbose: bool) -> Vec<TestResult> {
    println!("--- Level Math ---");
    let mut results = Vec::new();

    let mut consistent = true;
    let mut monotonic = true;
    let mut last_level = 0;
    for points in 0..=2500u64 {
        let lvl = level::level_for_points(points);
        if lvl < last_level {
            monotonic = false;
        }
        last_level = lvl;
        if points < level::points_for_level(lvl)
            || points >= level::points_for_level(lvl + 1)
            || !(0.0..=1.0).contains(&level::level_progress(points, lvl))
        {
            consistent = false;
        }
    }
    results.push(check("level_derivation_consistent", consistent, "0..=2500 sweep"));
    results.push(check("level_monotonic_in_points", monotonic, "0..=2500 sweep"));
    results.push(check(
        "level_floor_is_one",
        level::level_for_points(0) == 1 && level::level_for_points(99) == 1,
        "points < 100",
    ));

    results
}

// ── 4. Challenge Math ───────────────────────────────────────────────────

fn validate_challenge_math(_verbose: bool) -> Vec<TestResult> {
    println!("--- Challenge Math ---");
    let mut results = Vec::new();

    let recipes: Vec<String> = vec!["r1".into(), "r2".into()];
    let mut completed = HashSet::new();
    completed.insert("r1".to_string());
    let half = challenge::completion_fraction(&recipes, &completed);
    results.push(check(
        "half_completed_is_half",
        (half - 0.5).abs() < f64::EPSILON,
        format!("{half}"),
    ));

    let empty: Vec<String> = vec![];
    results.push(check(
        "empty_challenge_guarded",
        challenge::completion_fraction(&empty, &completed) == 0.0
            && challenge::is_completed(&empty, &completed),
        "progress 0, vacuously complete",
    ));

    let start = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).single().unwrap_or_default();
    let end = Utc.with_ymd_and_hms(2025, 10, 31, 0, 0, 0).single().unwrap_or_default();
    let window_ok = challenge::schedule_progress(start, end, start) == 0.0
        && challenge::schedule_progress(start, end, end) == 1.0
        && challenge::days_remaining(end, end) == 0;
    results.push(check("schedule_window_clamped", window_ok, "october window"));

    results
}

// ── 5. Engine Flow ──────────────────────────────────────────────────────

fn validate_engine_flow(verbose: bool) -> Vec<TestResult> {
    println!("--- Engine Flow ---");
    let mut results = Vec::new();
    let engine = ProgressionEngine::new(sample_catalog(), PersistenceAdapter::in_memory());

    let state = match engine.complete_recipe("margherita-pizza") {
        Ok(s) => s,
        Err(e) => {
            results.push(check("complete_recipe", false, e.to_string()));
            return results;
        }
    };
    results.push(check(
        "first_completion_scores_twenty",
        state.points == 2 * RECIPE_COMPLETION_POINTS && state.is_unlocked("first-steps"),
        format!("{} points", state.points),
    ));

    let repeat = engine.complete_recipe("margherita-pizza").ok();
    results.push(check(
        "repeat_completion_noop",
        repeat.as_ref() == Some(&state),
        "state unchanged",
    ));

    let tour = [
        "chicken-tikka-masala",
        "beef-tacos",
        "pad-thai",
        "salmon-sushi-rolls",
    ];
    let mut last = state;
    for id in tour {
        match engine.complete_recipe(id) {
            Ok(s) => last = s,
            Err(e) => results.push(check("cuisine_tour", false, e.to_string())),
        }
    }
    results.push(check(
        "global_explorer_after_five_cuisines",
        last.is_unlocked("global-explorer") && last.points == 135 && last.level == 2,
        format!("{} points, level {}", last.points, last.level),
    ));

    results.push(check(
        "unknown_recipe_rejected",
        engine.complete_recipe("ghost-recipe").is_err(),
        "UnknownRecipe",
    ));

    let reset = engine.reset();
    results.push(check(
        "reset_reseeds",
        reset.points == 0
            && reset.level == 1
            && reset.unlocked_badges.len() == 1
            && reset.is_unlocked("welcome-aboard"),
        format!("{} badges", reset.unlocked_badges.len()),
    ));

    if verbose {
        match serde_json::to_string_pretty(&engine.state()) {
            Ok(json) => println!("  final state:\n{json}"),
            Err(e) => println!("  state serialization failed: {e}"),
        }
    }

    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let path = std::env::temp_dir().join(format!(
        "gourmand-simtest-{}.json",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let open_engine = |path: &std::path::Path| -> Option<ProgressionEngine<StaticCatalog>> {
        let store = FileStore::open(path).ok()?;
        Some(ProgressionEngine::new(
            sample_catalog(),
            PersistenceAdapter::new(Box::new(store)),
        ))
    };

    let before = match open_engine(&path) {
        Some(engine) => {
            let _ = engine.complete_recipe("margherita-pizza");
            let _ = engine.complete_recipe("pad-thai");
            let _ = engine.force_unlock("social-butterfly");
            engine.state()
        }
        None => {
            results.push(check("file_store_open", false, path.display().to_string()));
            return results;
        }
    };

    match open_engine(&path) {
        Some(engine) => {
            let after = engine.state();
            results.push(check(
                "state_survives_restart",
                after == before,
                format!("{} points across restart", after.points),
            ));
        }
        None => results.push(check("file_store_reopen", false, path.display().to_string())),
    }

    // A corrupted document degrades to the seeded initial state.
    if std::fs::write(&path, "corrupted beyond recognition").is_ok() {
        if let Some(engine) = open_engine(&path) {
            let state = engine.state();
            results.push(check(
                "corrupt_store_reseeds",
                state.points == 0 && state.is_unlocked("welcome-aboard"),
                "seeded fallback",
            ));
        }
    }

    let _ = std::fs::remove_file(&path);
    results
}
