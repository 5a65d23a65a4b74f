//! Gamification pipeline orchestration.
//!
//! One [`GamificationOrchestrator::handle_event`] call runs the whole
//! pipeline for a trigger: load profile, advance streak (streak-bearing
//! triggers only), consume AI quota (AI triggers only), grant the
//! trigger's XP, run one badge-evaluation sweep, persist once, and
//! report the outcome. Runs for the same user are serialized through
//! the store's versioned save: a conflicting commit restarts the run
//! against fresh state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::badges::BadgeCriteriaEngine;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::events::{ActivityAction, TriggerEvent};
use crate::generation::TextGenerator;
use crate::profile::{EarnedBadge, StreakState};
use crate::quota::{AiFeature, QuotaManager};
use crate::store::Store;
use crate::{streak, xp};

/// Attempts per event before a version conflict is surfaced.
const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// A badge granted during an orchestration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardedBadge {
    pub badge_id: String,
    pub name: String,
    pub xp_reward: u64,
    pub criteria_met: String,
}

/// Result of one orchestration run, returned to the controller layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOutcome {
    pub xp: u64,
    pub level: u32,
    pub streak: StreakState,
    pub badges_awarded: Vec<AwardedBadge>,
}

/// Facade sequencing streak, quota, XP and badge evaluation per event.
pub struct GamificationOrchestrator {
    store: Store,
    config: Config,
    quota: QuotaManager,
    badges: BadgeCriteriaEngine,
    clock: Box<dyn Clock>,
    /// Runs between the pipeline and the commit, so tests can interleave
    /// a competing write on another connection.
    #[cfg(test)]
    before_commit: std::sync::Mutex<Option<Box<dyn FnMut() + Send>>>,
}

impl GamificationOrchestrator {
    pub fn new(store: Store, config: Config) -> Self {
        Self::with_clock(store, config, Box::new(SystemClock))
    }

    pub fn with_clock(store: Store, config: Config, clock: Box<dyn Clock>) -> Self {
        let quota = QuotaManager::with_limits(config.quota);
        Self {
            store,
            config,
            quota,
            badges: BadgeCriteriaEngine::new(),
            clock,
            #[cfg(test)]
            before_commit: std::sync::Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Handle a trigger for a regular (non-privileged) user.
    pub fn handle_event(&self, user_id: &str, event: &TriggerEvent) -> Result<EventOutcome> {
        self.handle_event_as(user_id, event, false)
    }

    /// Handle a trigger, optionally with the administrator quota bypass.
    ///
    /// Retries the whole run on a version conflict; each attempt reloads
    /// the profile so no stale state leaks between attempts.
    pub fn handle_event_as(
        &self,
        user_id: &str,
        event: &TriggerEvent,
        privileged: bool,
    ) -> Result<EventOutcome> {
        let mut attempt = 0;
        loop {
            match self.run_once(user_id, event, privileged) {
                Err(CoreError::Conflict { .. }) if attempt + 1 < MAX_COMMIT_ATTEMPTS => {
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// The two-phase AI flow: pre-flight quota check, opaque external
    /// generation, then the normal pipeline (which consumes quota).
    ///
    /// A failed generation call aborts before anything is persisted, so
    /// it never costs quota, XP or badges.
    pub fn generate_with_quota(
        &self,
        user_id: &str,
        feature: AiFeature,
        prompt: &str,
        generator: &dyn TextGenerator,
        privileged: bool,
    ) -> Result<(EventOutcome, String)> {
        let now = self.clock.now();

        // Pre-flight on a throwaway copy: the reset it may apply only
        // becomes durable when the pipeline commits below.
        let mut loaded = self.store.load_profile(user_id)?;
        self.quota
            .check(&mut loaded.profile.ai_usage, feature, privileged, now)?;

        let text = generator.generate(prompt)?;

        let event = match feature {
            AiFeature::Summary => TriggerEvent::AiSummaryGenerated,
            AiFeature::Flashcards => TriggerEvent::AiFlashcardsGenerated,
        };
        let outcome = self.handle_event_as(user_id, &event, privileged)?;
        Ok((outcome, text))
    }

    fn run_once(
        &self,
        user_id: &str,
        event: &TriggerEvent,
        privileged: bool,
    ) -> Result<EventOutcome> {
        let now = self.clock.now();
        let loaded = self.store.load_profile(user_id)?;
        let mut profile = loaded.profile;

        if event.advances_streak() {
            profile.streak = streak::advance(&profile.streak, now);
        }

        if let Some(feature) = event.ai_feature() {
            self.quota.consume(&mut profile, feature, privileged, now)?;
        }

        let award = i64::try_from(self.config.xp.award_for(event))
            .map_err(|_| CoreError::BadRequest(format!("XP award for {event:?} out of range")))?;
        xp::grant(
            &mut profile,
            award,
            event.action(),
            event.description(),
            now,
        )?;

        let badges_awarded = self.award_badges(&mut profile, event, now)?;

        #[cfg(test)]
        if let Some(hook) = self.before_commit.lock().unwrap().as_mut() {
            hook();
        }

        self.store.save_profile(&profile, loaded.version, now)?;

        Ok(EventOutcome {
            xp: profile.xp,
            level: profile.level,
            streak: profile.streak,
            badges_awarded,
        })
    }

    /// One evaluation sweep over the active catalog.
    ///
    /// XP granted by awards here never re-enters evaluation within the
    /// same run; a badge whose criteria only holds after that XP lands
    /// is picked up by the next trigger.
    fn award_badges(
        &self,
        profile: &mut crate::profile::GamificationProfile,
        event: &TriggerEvent,
        now: DateTime<Utc>,
    ) -> Result<Vec<AwardedBadge>> {
        let catalog = self.store.active_badges()?;
        let qualified: Vec<_> = self
            .badges
            .evaluate(&catalog, profile, event)
            .into_iter()
            .cloned()
            .collect();

        let mut awarded = Vec::with_capacity(qualified.len());
        for badge in qualified {
            let reward = i64::try_from(badge.xp_reward).map_err(|_| {
                CoreError::BadRequest(format!("xp_reward for badge '{}' out of range", badge.id))
            })?;
            let criteria_met = badge.criteria.description();
            profile.badges.push(EarnedBadge {
                badge_id: badge.id.clone(),
                earned_at: now,
                criteria_met: criteria_met.clone(),
            });
            xp::grant(
                profile,
                reward,
                ActivityAction::BadgeEarned,
                format!("Earned badge: {}", badge.name),
                now,
            )?;
            awarded.push(AwardedBadge {
                badge_id: badge.id,
                name: badge.name,
                xp_reward: badge.xp_reward,
                criteria_met,
            });
        }
        Ok(awarded)
    }
}
