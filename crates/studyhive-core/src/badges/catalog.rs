//! Badge catalog types.
//!
//! Catalog entries are created and updated by administrators and are
//! read-only to the engine. Criteria are stored as a tagged union of
//! known kinds; entries whose criteria type this build does not know
//! deserialize to [`BadgeCriteria::Unknown`], which is never satisfied.

use serde::{Deserialize, Serialize};

use crate::events::ActivityAction;

/// How a badge qualifies, with a typed threshold per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BadgeCriteria {
    /// Current streak reaches the threshold.
    StreakDays { threshold: u32 },
    /// Total notes uploaded reaches the threshold (from event payload).
    NoteCount { threshold: u64 },
    /// Total ratings given reaches the threshold (from event payload).
    RatingCount { threshold: u64 },
    /// Total downloads received reaches the threshold (from event payload).
    DownloadCount { threshold: u64 },
    /// Lifetime XP reaches the threshold.
    XpTotal { threshold: u64 },
    /// Level reaches the threshold.
    Level { threshold: u32 },
    /// Lifetime AI summaries reaches the threshold.
    SummariesGenerated { threshold: u64 },
    /// Lifetime AI flashcard sets reaches the threshold.
    FlashcardsGenerated { threshold: u64 },
    /// First occurrence of a given action.
    FirstAction { action: ActivityAction },
    /// Criteria type not implemented by this build; never satisfied.
    #[serde(other)]
    Unknown,
}

impl BadgeCriteria {
    /// Display string recorded on the earned badge as `criteria_met`.
    pub fn description(&self) -> String {
        match self {
            BadgeCriteria::StreakDays { threshold } => {
                format!("Reached a {threshold}-day streak")
            }
            BadgeCriteria::NoteCount { threshold } => format!("Uploaded {threshold} notes"),
            BadgeCriteria::RatingCount { threshold } => format!("Rated {threshold} notes"),
            BadgeCriteria::DownloadCount { threshold } => {
                format!("Notes downloaded {threshold} times")
            }
            BadgeCriteria::XpTotal { threshold } => format!("Earned {threshold} XP"),
            BadgeCriteria::Level { threshold } => format!("Reached level {threshold}"),
            BadgeCriteria::SummariesGenerated { threshold } => {
                format!("Generated {threshold} AI summaries")
            }
            BadgeCriteria::FlashcardsGenerated { threshold } => {
                format!("Generated {threshold} AI flashcard sets")
            }
            BadgeCriteria::FirstAction { action } => format!("First {action:?}"),
            BadgeCriteria::Unknown => "Unknown criteria".to_string(),
        }
    }
}

/// Badge rarity tier, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Badge grouping, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Streak,
    Notes,
    Community,
    Ai,
    Progression,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    /// Stable identifier referenced from earned-badge entries.
    pub id: String,
    /// Unique display name.
    pub name: String,
    pub category: BadgeCategory,
    pub criteria: BadgeCriteria,
    /// XP granted on award.
    pub xp_reward: u64,
    pub rarity: BadgeRarity,
    /// Inactive entries are skipped by the engine.
    pub is_active: bool,
    /// Evaluation and presentation order.
    pub display_order: i64,
}

/// The badge set seeded into a fresh catalog.
pub fn default_catalog() -> Vec<Badge> {
    let entries = [
        (
            "first-note",
            "First Note",
            BadgeCategory::Notes,
            BadgeCriteria::NoteCount { threshold: 1 },
            10,
            BadgeRarity::Common,
        ),
        (
            "note-taker",
            "Note Taker",
            BadgeCategory::Notes,
            BadgeCriteria::NoteCount { threshold: 5 },
            25,
            BadgeRarity::Common,
        ),
        (
            "prolific-author",
            "Prolific Author",
            BadgeCategory::Notes,
            BadgeCriteria::NoteCount { threshold: 25 },
            100,
            BadgeRarity::Rare,
        ),
        (
            "first-rating",
            "Helpful Voice",
            BadgeCategory::Community,
            BadgeCriteria::FirstAction {
                action: ActivityAction::RatingGiven,
            },
            10,
            BadgeRarity::Common,
        ),
        (
            "critic",
            "Critic",
            BadgeCategory::Community,
            BadgeCriteria::RatingCount { threshold: 10 },
            50,
            BadgeRarity::Uncommon,
        ),
        (
            "crowd-favorite",
            "Crowd Favorite",
            BadgeCategory::Community,
            BadgeCriteria::DownloadCount { threshold: 50 },
            100,
            BadgeRarity::Rare,
        ),
        (
            "streak-3",
            "Warming Up",
            BadgeCategory::Streak,
            BadgeCriteria::StreakDays { threshold: 3 },
            15,
            BadgeRarity::Common,
        ),
        (
            "streak-7",
            "Week Strong",
            BadgeCategory::Streak,
            BadgeCriteria::StreakDays { threshold: 7 },
            50,
            BadgeRarity::Uncommon,
        ),
        (
            "streak-30",
            "Iron Habit",
            BadgeCategory::Streak,
            BadgeCriteria::StreakDays { threshold: 30 },
            200,
            BadgeRarity::Epic,
        ),
        (
            "summarizer",
            "Summarizer",
            BadgeCategory::Ai,
            BadgeCriteria::SummariesGenerated { threshold: 10 },
            50,
            BadgeRarity::Uncommon,
        ),
        (
            "card-sharp",
            "Card Sharp",
            BadgeCategory::Ai,
            BadgeCriteria::FlashcardsGenerated { threshold: 10 },
            50,
            BadgeRarity::Uncommon,
        ),
        (
            "level-5",
            "Rising Scholar",
            BadgeCategory::Progression,
            BadgeCriteria::Level { threshold: 5 },
            50,
            BadgeRarity::Uncommon,
        ),
        (
            "level-10",
            "Dean's List",
            BadgeCategory::Progression,
            BadgeCriteria::Level { threshold: 10 },
            150,
            BadgeRarity::Rare,
        ),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(
            |(i, (id, name, category, criteria, xp_reward, rarity))| Badge {
                id: id.to_string(),
                name: name.to_string(),
                category,
                criteria,
                xp_reward,
                rarity,
                is_active: true,
                display_order: i as i64,
            },
        )
        .collect()
}
