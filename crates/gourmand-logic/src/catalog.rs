//! Recipe, badge, and challenge definitions.
//!
//! The catalog is the read-only reference the progression engine evaluates
//! against. Definitions are immutable: a badge id maps to exactly one
//! definition, and the definition order within the catalog is stable (it is
//! the tie-break order for simultaneous unlocks).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A recipe identity as the progression engine sees it: just an id and a
/// cuisine tag for "distinct cuisines cooked" rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRef {
    pub id: String,
    pub cuisine: String,
}

impl RecipeRef {
    pub fn new(id: impl Into<String>, cuisine: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cuisine: cuisine.into(),
        }
    }
}

/// Grouping for badge display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Cooking,
    Exploration,
    Social,
    Achievement,
    Seasonal,
}

impl BadgeCategory {
    /// All categories in display order.
    pub const ALL: [BadgeCategory; 5] = [
        BadgeCategory::Cooking,
        BadgeCategory::Exploration,
        BadgeCategory::Social,
        BadgeCategory::Achievement,
        BadgeCategory::Seasonal,
    ];

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Cooking => "Cooking",
            Self::Exploration => "Exploration",
            Self::Social => "Social",
            Self::Achievement => "Achievement",
            Self::Seasonal => "Seasonal",
        }
    }
}

/// Badge rarity tier. Each tier carries a fixed multiplier applied to the
/// badge's base points when it unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl BadgeRarity {
    /// All rarities from most to least common.
    pub const ALL: [BadgeRarity; 5] = [
        BadgeRarity::Common,
        BadgeRarity::Uncommon,
        BadgeRarity::Rare,
        BadgeRarity::Epic,
        BadgeRarity::Legendary,
    ];

    /// Bonus point multiplier for this rarity.
    pub const fn points_multiplier(self) -> f64 {
        match self {
            Self::Common => 1.0,
            Self::Uncommon => 1.5,
            Self::Rare => 2.0,
            Self::Epic => 3.0,
            Self::Legendary => 5.0,
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }
}

/// Unlock condition for a badge. Each badge carries exactly one rule,
/// dispatched structurally — never by badge name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnlockRule {
    /// Satisfied once at least `n` recipes have been completed.
    CountThreshold { n: u32 },
    /// Satisfied once completed recipes span at least `n` distinct cuisines.
    DistinctCuisineThreshold { n: u32 },
    /// Never auto-satisfied; unlocked only through an explicit external
    /// trigger (social sharing, seasonal challenge completion, ...).
    ManualFlag,
}

/// An awardable achievement definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Icon asset name for display.
    pub icon: String,
    /// Human-readable requirement text ("Cook recipes from 5 cuisines").
    pub requirement: String,
    pub category: BadgeCategory,
    pub rarity: BadgeRarity,
    /// Base points awarded on unlock, before the rarity multiplier.
    pub points: u32,
    pub rule: UnlockRule,
}

/// A named bundle of recipes with a completion window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Recipes that must all be completed to finish the challenge.
    /// Treated as a set; order is display order only.
    pub recipe_ids: Vec<String>,
    pub participants: u32,
}

/// Read-only catalog lookup consumed by the progression engine.
///
/// `badge_definitions` must return a stable order — it doubles as the
/// evaluation order for simultaneous unlocks and as the seed-badge choice
/// (the first definition seeds fresh progress).
pub trait Catalog {
    fn recipe(&self, id: &str) -> Option<&RecipeRef>;
    fn badge_definitions(&self) -> &[BadgeDefinition];
    fn badge(&self, id: &str) -> Option<&BadgeDefinition>;
    fn challenge(&self, id: &str) -> Option<&ChallengeDefinition>;
}

/// In-memory catalog backed by definition vectors with id indices.
///
/// Duplicate ids keep the first definition encountered; a given id never
/// resolves to two different definitions.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    recipes: Vec<RecipeRef>,
    badges: Vec<BadgeDefinition>,
    challenges: Vec<ChallengeDefinition>,
    recipe_index: HashMap<String, usize>,
    badge_index: HashMap<String, usize>,
    challenge_index: HashMap<String, usize>,
}

impl StaticCatalog {
    pub fn new(
        recipes: Vec<RecipeRef>,
        badges: Vec<BadgeDefinition>,
        challenges: Vec<ChallengeDefinition>,
    ) -> Self {
        let mut catalog = Self {
            recipes,
            badges,
            challenges,
            recipe_index: HashMap::new(),
            badge_index: HashMap::new(),
            challenge_index: HashMap::new(),
        };
        for (i, r) in catalog.recipes.iter().enumerate() {
            catalog.recipe_index.entry(r.id.clone()).or_insert(i);
        }
        for (i, b) in catalog.badges.iter().enumerate() {
            catalog.badge_index.entry(b.id.clone()).or_insert(i);
        }
        for (i, c) in catalog.challenges.iter().enumerate() {
            catalog.challenge_index.entry(c.id.clone()).or_insert(i);
        }
        catalog
    }

    pub fn recipes(&self) -> &[RecipeRef] {
        &self.recipes
    }

    pub fn challenges(&self) -> &[ChallengeDefinition] {
        &self.challenges
    }
}

impl Catalog for StaticCatalog {
    fn recipe(&self, id: &str) -> Option<&RecipeRef> {
        self.recipe_index.get(id).map(|&i| &self.recipes[i])
    }

    fn badge_definitions(&self) -> &[BadgeDefinition] {
        &self.badges
    }

    fn badge(&self, id: &str) -> Option<&BadgeDefinition> {
        self.badge_index.get(id).map(|&i| &self.badges[i])
    }

    fn challenge(&self, id: &str) -> Option<&ChallengeDefinition> {
        self.challenge_index.get(id).map(|&i| &self.challenges[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn badge(id: &str, rule: UnlockRule) -> BadgeDefinition {
        BadgeDefinition {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            icon: "star".into(),
            requirement: String::new(),
            category: BadgeCategory::Achievement,
            rarity: BadgeRarity::Common,
            points: 10,
            rule,
        }
    }

    #[test]
    fn rarity_multipliers() {
        assert_eq!(BadgeRarity::Common.points_multiplier(), 1.0);
        assert_eq!(BadgeRarity::Uncommon.points_multiplier(), 1.5);
        assert_eq!(BadgeRarity::Rare.points_multiplier(), 2.0);
        assert_eq!(BadgeRarity::Epic.points_multiplier(), 3.0);
        assert_eq!(BadgeRarity::Legendary.points_multiplier(), 5.0);
    }

    #[test]
    fn lookup_by_id() {
        let catalog = StaticCatalog::new(
            vec![RecipeRef::new("r1", "Italian")],
            vec![badge("b1", UnlockRule::ManualFlag)],
            vec![],
        );
        assert_eq!(catalog.recipe("r1").map(|r| r.cuisine.as_str()), Some("Italian"));
        assert!(catalog.recipe("missing").is_none());
        assert_eq!(catalog.badge("b1").map(|b| b.points), Some(10));
        assert!(catalog.challenge("missing").is_none());
    }

    #[test]
    fn duplicate_id_keeps_first_definition() {
        let mut first = badge("b1", UnlockRule::ManualFlag);
        first.points = 10;
        let mut second = badge("b1", UnlockRule::ManualFlag);
        second.points = 99;
        let catalog = StaticCatalog::new(vec![], vec![first, second], vec![]);
        assert_eq!(catalog.badge("b1").map(|b| b.points), Some(10));
        // Definition order still lists both entries.
        assert_eq!(catalog.badge_definitions().len(), 2);
    }

    #[test]
    fn definition_order_is_stable() {
        let catalog = StaticCatalog::new(
            vec![],
            vec![
                badge("z", UnlockRule::ManualFlag),
                badge("a", UnlockRule::ManualFlag),
            ],
            vec![],
        );
        let ids: Vec<_> = catalog
            .badge_definitions()
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn unlock_rule_serde_tagged() {
        let rule = UnlockRule::CountThreshold { n: 5 };
        let json = serde_json::to_string(&rule).expect("serialize");
        assert!(json.contains("count_threshold"));
        let back: UnlockRule = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, rule);
    }
}
