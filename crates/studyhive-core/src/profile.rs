//! Per-user gamification aggregate.
//!
//! One [`GamificationProfile`] exists per user account. It is created
//! with all-zero defaults alongside the account and is mutated only by
//! the orchestrator; the store writes it back as a single document so
//! xp, streak, quota and badges never race at field level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::ActivityAction;

/// Maximum number of activity records retained per profile.
pub const ACTIVITY_LOG_CAP: usize = 100;

/// Consecutive-calendar-day streak state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    /// Current run of consecutive qualifying days.
    pub current: u32,
    /// Historical ceiling; never decreases.
    pub max: u32,
    /// Timestamp of the last streak-bearing action, if any.
    pub last_used: Option<DateTime<Utc>>,
}

impl StreakState {
    pub fn new() -> Self {
        Self {
            current: 0,
            max: 0,
            last_used: None,
        }
    }
}

impl Default for StreakState {
    fn default() -> Self {
        Self::new()
    }
}

/// Daily AI-feature usage counters with a rolling reset stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiUsage {
    pub summary_used: u32,
    pub flashcard_used: u32,
    /// When the daily counters were last zeroed.
    pub last_reset: DateTime<Utc>,
}

impl AiUsage {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            summary_used: 0,
            flashcard_used: 0,
            last_reset: created_at,
        }
    }
}

/// A badge held by a user. At most one entry per badge id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub badge_id: String,
    pub earned_at: DateTime<Utc>,
    /// Display-only note recording which criteria qualified.
    pub criteria_met: String,
}

/// One entry in the capped activity log.
///
/// Immutable once appended, except for truncation from the tail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub action: ActivityAction,
    pub description: String,
    pub xp_earned: u64,
    pub timestamp: DateTime<Utc>,
}

/// The per-user gamification aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamificationProfile {
    pub user_id: String,

    pub xp: u64,
    /// Derived: always `1 + xp / 100`. Recomputed on every grant.
    pub level: u32,

    pub streak: StreakState,
    pub ai_usage: AiUsage,

    /// Lifetime counters; never reset.
    pub total_summaries_generated: u64,
    pub total_flashcards_generated: u64,

    /// Earned badges, in award order.
    pub badges: Vec<EarnedBadge>,

    /// Activity log, most-recent-first, capped at [`ACTIVITY_LOG_CAP`].
    pub activity: Vec<ActivityRecord>,
}

impl GamificationProfile {
    /// All-zero profile for a freshly created account.
    pub fn new(user_id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            xp: 0,
            level: 1,
            streak: StreakState::new(),
            ai_usage: AiUsage::new(created_at),
            total_summaries_generated: 0,
            total_flashcards_generated: 0,
            badges: Vec::new(),
            activity: Vec::new(),
        }
    }

    /// Whether the user already holds the given badge.
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.iter().any(|b| b.badge_id == badge_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_profile_defaults() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let profile = GamificationProfile::new("user-1", created);

        assert_eq!(profile.xp, 0);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.streak.current, 0);
        assert_eq!(profile.streak.max, 0);
        assert!(profile.streak.last_used.is_none());
        assert_eq!(profile.ai_usage.summary_used, 0);
        assert_eq!(profile.ai_usage.flashcard_used, 0);
        assert_eq!(profile.ai_usage.last_reset, created);
        assert!(profile.badges.is_empty());
        assert!(profile.activity.is_empty());
    }

    #[test]
    fn test_has_badge() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut profile = GamificationProfile::new("user-1", created);
        assert!(!profile.has_badge("note-taker"));

        profile.badges.push(EarnedBadge {
            badge_id: "note-taker".to_string(),
            earned_at: created,
            criteria_met: "Uploaded 5 notes".to_string(),
        });
        assert!(profile.has_badge("note-taker"));
    }

    #[test]
    fn test_profile_json_roundtrip() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let profile = GamificationProfile::new("user-1", created);

        let json = serde_json::to_string(&profile).unwrap();
        let back: GamificationProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
