//! Built-in sample catalog.
//!
//! A small fixed catalog used by the simtest harness and integration tests:
//! recipes spanning seven cuisines, the full badge ladder, and one seasonal
//! challenge. The first badge definition is the zero-point seed badge every
//! fresh profile starts with.

use chrono::{DateTime, TimeZone, Utc};

use crate::catalog::{
    BadgeCategory, BadgeDefinition, BadgeRarity, ChallengeDefinition, RecipeRef, StaticCatalog,
    UnlockRule,
};

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn sample_recipes() -> Vec<RecipeRef> {
    vec![
        RecipeRef::new("margherita-pizza", "Italian"),
        RecipeRef::new("spaghetti-carbonara", "Italian"),
        RecipeRef::new("chicken-tikka-masala", "Indian"),
        RecipeRef::new("beef-tacos", "Mexican"),
        RecipeRef::new("pad-thai", "Thai"),
        RecipeRef::new("salmon-sushi-rolls", "Japanese"),
        RecipeRef::new("miso-ramen", "Japanese"),
        RecipeRef::new("french-onion-soup", "French"),
        RecipeRef::new("greek-salad", "Greek"),
        RecipeRef::new("pumpkin-risotto", "Italian"),
        RecipeRef::new("apple-crumble", "French"),
    ]
}

fn sample_badges() -> Vec<BadgeDefinition> {
    vec![
        // Seed badge: unlocked on first launch, worth nothing.
        BadgeDefinition {
            id: "welcome-aboard".into(),
            name: "Welcome Aboard".into(),
            description: "Start your cooking journey".into(),
            icon: "hand.wave.fill".into(),
            requirement: "Open the app".into(),
            category: BadgeCategory::Achievement,
            rarity: BadgeRarity::Common,
            points: 0,
            rule: UnlockRule::ManualFlag,
        },
        BadgeDefinition {
            id: "first-steps".into(),
            name: "First Steps".into(),
            description: "Complete your first recipe".into(),
            icon: "star.fill".into(),
            requirement: "Cook 1 recipe".into(),
            category: BadgeCategory::Achievement,
            rarity: BadgeRarity::Common,
            points: 10,
            rule: UnlockRule::CountThreshold { n: 1 },
        },
        BadgeDefinition {
            id: "global-explorer".into(),
            name: "Global Explorer".into(),
            description: "Try recipes from 5 different cuisines".into(),
            icon: "globe".into(),
            requirement: "Cook recipes from 5 cuisines".into(),
            category: BadgeCategory::Exploration,
            rarity: BadgeRarity::Uncommon,
            points: 50,
            rule: UnlockRule::DistinctCuisineThreshold { n: 5 },
        },
        BadgeDefinition {
            id: "master-chef".into(),
            name: "Master Chef".into(),
            description: "Complete 50 recipes successfully".into(),
            icon: "crown.fill".into(),
            requirement: "Cook 50 recipes".into(),
            category: BadgeCategory::Cooking,
            rarity: BadgeRarity::Rare,
            points: 200,
            rule: UnlockRule::CountThreshold { n: 50 },
        },
        BadgeDefinition {
            id: "social-butterfly".into(),
            name: "Social Butterfly".into(),
            description: "Share 10 recipes with friends".into(),
            icon: "heart.fill".into(),
            requirement: "Share 10 recipes".into(),
            category: BadgeCategory::Social,
            rarity: BadgeRarity::Uncommon,
            points: 75,
            rule: UnlockRule::ManualFlag,
        },
        BadgeDefinition {
            id: "seasonal-specialist".into(),
            name: "Seasonal Specialist".into(),
            description: "Complete all seasonal challenges in a year".into(),
            icon: "calendar".into(),
            requirement: "Complete 4 seasonal challenges".into(),
            category: BadgeCategory::Seasonal,
            rarity: BadgeRarity::Legendary,
            points: 500,
            rule: UnlockRule::ManualFlag,
        },
    ]
}

fn sample_challenges() -> Vec<ChallengeDefinition> {
    vec![ChallengeDefinition {
        id: "october-harvest".into(),
        name: "October Harvest Festival".into(),
        description: "Celebrate autumn with seasonal recipes featuring pumpkins, \
                      apples, and warming spices"
            .into(),
        starts_at: date(2025, 10, 1),
        ends_at: date(2025, 10, 31),
        recipe_ids: vec!["pumpkin-risotto".into(), "apple-crumble".into()],
        participants: 1247,
    }]
}

/// The full sample catalog.
pub fn sample_catalog() -> StaticCatalog {
    StaticCatalog::new(sample_recipes(), sample_badges(), sample_challenges())
}
