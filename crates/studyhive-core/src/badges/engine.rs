//! Badge criteria evaluation.
//!
//! Evaluates the catalog against a user's post-update profile and the
//! triggering event, returning badges newly qualified. Awarding (badge
//! entry + XP reward) is the orchestrator's job, so evaluation stays a
//! pure read.

use crate::badges::{Badge, BadgeCriteria};
use crate::events::{ActivityAction, TriggerEvent};
use crate::profile::GamificationProfile;

/// Stateless evaluator over a badge catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeCriteriaEngine;

impl BadgeCriteriaEngine {
    pub fn new() -> Self {
        Self
    }

    /// Return catalog entries newly qualified by this event.
    ///
    /// Inactive entries are skipped, badges the user already holds are
    /// never re-evaluated, and predicates are independent of one
    /// another. Results follow the catalog's `display_order`.
    pub fn evaluate<'a>(
        &self,
        catalog: &'a [Badge],
        profile: &GamificationProfile,
        event: &TriggerEvent,
    ) -> Vec<&'a Badge> {
        let mut candidates: Vec<&Badge> = catalog
            .iter()
            .filter(|badge| badge.is_active)
            .filter(|badge| !profile.has_badge(&badge.id))
            .filter(|badge| Self::satisfied(&badge.criteria, profile, event))
            .collect();
        candidates.sort_by_key(|badge| badge.display_order);
        candidates
    }

    fn satisfied(
        criteria: &BadgeCriteria,
        profile: &GamificationProfile,
        event: &TriggerEvent,
    ) -> bool {
        match criteria {
            BadgeCriteria::StreakDays { threshold } => profile.streak.current >= *threshold,
            BadgeCriteria::NoteCount { threshold } => match event {
                TriggerEvent::NoteCreated { note_count } => note_count >= threshold,
                _ => false,
            },
            BadgeCriteria::RatingCount { threshold } => match event {
                TriggerEvent::RatingGiven { rating_count } => rating_count >= threshold,
                _ => false,
            },
            BadgeCriteria::DownloadCount { threshold } => match event {
                TriggerEvent::NoteDownloaded { download_count } => download_count >= threshold,
                _ => false,
            },
            BadgeCriteria::XpTotal { threshold } => profile.xp >= *threshold,
            BadgeCriteria::Level { threshold } => profile.level >= *threshold,
            BadgeCriteria::SummariesGenerated { threshold } => {
                profile.total_summaries_generated >= *threshold
            }
            BadgeCriteria::FlashcardsGenerated { threshold } => {
                profile.total_flashcards_generated >= *threshold
            }
            BadgeCriteria::FirstAction { action } => {
                event.action() == *action && Self::is_first_occurrence(profile, event)
            }
            BadgeCriteria::Unknown => false,
        }
    }

    /// Whether this event is the first of its kind for the user, judged
    /// from the post-update counters.
    fn is_first_occurrence(profile: &GamificationProfile, event: &TriggerEvent) -> bool {
        match event {
            TriggerEvent::NoteCreated { note_count } => *note_count == 1,
            TriggerEvent::RatingGiven { rating_count } => *rating_count == 1,
            TriggerEvent::NoteDownloaded { download_count } => *download_count == 1,
            TriggerEvent::AiSummaryGenerated => profile.total_summaries_generated == 1,
            TriggerEvent::AiFlashcardsGenerated => profile.total_flashcards_generated == 1,
            // Logins have no lifetime counter; a first-login badge would
            // need a dedicated criteria kind.
            TriggerEvent::Login => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::{BadgeCategory, BadgeRarity};
    use chrono::{TimeZone, Utc};

    fn make_badge(id: &str, criteria: BadgeCriteria, display_order: i64) -> Badge {
        Badge {
            id: id.to_string(),
            name: id.to_string(),
            category: BadgeCategory::Notes,
            criteria,
            xp_reward: 10,
            rarity: BadgeRarity::Common,
            is_active: true,
            display_order,
        }
    }

    fn make_profile() -> GamificationProfile {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        GamificationProfile::new("user-1", created)
    }

    #[test]
    fn test_note_count_threshold_met() {
        let engine = BadgeCriteriaEngine::new();
        let catalog = vec![make_badge(
            "note-taker",
            BadgeCriteria::NoteCount { threshold: 5 },
            0,
        )];
        let profile = make_profile();

        let hits = engine.evaluate(&catalog, &profile, &TriggerEvent::NoteCreated { note_count: 5 });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "note-taker");

        let misses =
            engine.evaluate(&catalog, &profile, &TriggerEvent::NoteCreated { note_count: 4 });
        assert!(misses.is_empty());
    }

    #[test]
    fn test_already_held_badge_not_reawarded() {
        let engine = BadgeCriteriaEngine::new();
        let catalog = vec![make_badge(
            "note-taker",
            BadgeCriteria::NoteCount { threshold: 5 },
            0,
        )];
        let mut profile = make_profile();
        profile.badges.push(crate::profile::EarnedBadge {
            badge_id: "note-taker".to_string(),
            earned_at: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
            criteria_met: "Uploaded 5 notes".to_string(),
        });

        // Predicate would still pass on the 6th note; held badges are
        // never re-evaluated.
        let hits = engine.evaluate(&catalog, &profile, &TriggerEvent::NoteCreated { note_count: 6 });
        assert!(hits.is_empty());
    }

    #[test]
    fn test_inactive_badges_skipped() {
        let engine = BadgeCriteriaEngine::new();
        let mut badge = make_badge("note-taker", BadgeCriteria::NoteCount { threshold: 1 }, 0);
        badge.is_active = false;
        let catalog = vec![badge];
        let profile = make_profile();

        let hits = engine.evaluate(&catalog, &profile, &TriggerEvent::NoteCreated { note_count: 3 });
        assert!(hits.is_empty());
    }

    #[test]
    fn test_unknown_criteria_never_qualifies() {
        let engine = BadgeCriteriaEngine::new();
        let catalog = vec![make_badge("mystery", BadgeCriteria::Unknown, 0)];
        let profile = make_profile();

        let hits = engine.evaluate(&catalog, &profile, &TriggerEvent::Login);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_streak_and_level_evaluated_from_state() {
        let engine = BadgeCriteriaEngine::new();
        let catalog = vec![
            make_badge("streak-3", BadgeCriteria::StreakDays { threshold: 3 }, 0),
            make_badge("level-2", BadgeCriteria::Level { threshold: 2 }, 1),
        ];
        let mut profile = make_profile();
        profile.streak.current = 3;
        profile.xp = 150;
        profile.level = 2;

        let hits = engine.evaluate(&catalog, &profile, &TriggerEvent::Login);
        let ids: Vec<_> = hits.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["streak-3", "level-2"]);
    }

    #[test]
    fn test_results_follow_display_order() {
        let engine = BadgeCriteriaEngine::new();
        let catalog = vec![
            make_badge("second", BadgeCriteria::XpTotal { threshold: 0 }, 5),
            make_badge("first", BadgeCriteria::XpTotal { threshold: 0 }, 1),
        ];
        let profile = make_profile();

        let hits = engine.evaluate(&catalog, &profile, &TriggerEvent::Login);
        let ids: Vec<_> = hits.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_first_action_for_rating() {
        let engine = BadgeCriteriaEngine::new();
        let catalog = vec![make_badge(
            "first-rating",
            BadgeCriteria::FirstAction {
                action: ActivityAction::RatingGiven,
            },
            0,
        )];
        let profile = make_profile();

        let hits = engine.evaluate(
            &catalog,
            &profile,
            &TriggerEvent::RatingGiven { rating_count: 1 },
        );
        assert_eq!(hits.len(), 1);

        let later = engine.evaluate(
            &catalog,
            &profile,
            &TriggerEvent::RatingGiven { rating_count: 2 },
        );
        assert!(later.is_empty());
    }
}
