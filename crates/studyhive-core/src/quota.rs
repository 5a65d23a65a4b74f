//! Daily AI-usage quota enforcement.
//!
//! Each AI feature has a fixed daily ceiling tracked on the user's
//! profile. Counters reset on a rolling 24-hour window keyed off
//! `last_reset`, and the reset is applied *before* any ceiling check so
//! a request landing exactly on the boundary is judged against a fresh
//! quota.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::profile::{AiUsage, GamificationProfile};

/// Default daily ceiling for AI summaries.
pub const SUMMARY_PER_DAY: u32 = 3;
/// Default daily ceiling for AI flashcard sets.
pub const FLASHCARDS_PER_DAY: u32 = 3;
/// Rolling reset window in hours.
pub const QUOTA_RESET_HOURS: i64 = 24;

/// The quota-governed AI features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiFeature {
    Summary,
    Flashcards,
}

impl fmt::Display for AiFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiFeature::Summary => write!(f, "summary"),
            AiFeature::Flashcards => write!(f, "flashcards"),
        }
    }
}

/// Per-feature daily ceilings and the reset window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLimits {
    #[serde(default = "default_summary_per_day")]
    pub summary_per_day: u32,
    #[serde(default = "default_flashcards_per_day")]
    pub flashcards_per_day: u32,
    #[serde(default = "default_reset_hours")]
    pub reset_hours: i64,
}

fn default_summary_per_day() -> u32 {
    SUMMARY_PER_DAY
}
fn default_flashcards_per_day() -> u32 {
    FLASHCARDS_PER_DAY
}
fn default_reset_hours() -> i64 {
    QUOTA_RESET_HOURS
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            summary_per_day: SUMMARY_PER_DAY,
            flashcards_per_day: FLASHCARDS_PER_DAY,
            reset_hours: QUOTA_RESET_HOURS,
        }
    }
}

impl QuotaLimits {
    /// Daily ceiling for a feature.
    pub fn ceiling(&self, feature: AiFeature) -> u32 {
        match feature {
            AiFeature::Summary => self.summary_per_day,
            AiFeature::Flashcards => self.flashcards_per_day,
        }
    }
}

/// Quota bookkeeping over a profile's [`AiUsage`] counters.
#[derive(Debug, Clone, Default)]
pub struct QuotaManager {
    limits: QuotaLimits,
}

impl QuotaManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: QuotaLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &QuotaLimits {
        &self.limits
    }

    /// Zero the daily counters if the reset window has elapsed.
    ///
    /// Returns true if a reset happened. Privileged and regular callers
    /// share this bookkeeping.
    pub fn maybe_reset(&self, usage: &mut AiUsage, now: DateTime<Utc>) -> bool {
        let hours_since = (now - usage.last_reset).num_hours();
        if hours_since >= self.limits.reset_hours {
            usage.summary_used = 0;
            usage.flashcard_used = 0;
            usage.last_reset = now;
            true
        } else {
            false
        }
    }

    /// Reset-then-check, without consuming.
    ///
    /// Used as the pre-flight gate before the expensive external
    /// generation call; nothing is persisted at that point, so the
    /// reset only takes effect if the run later commits.
    pub fn check(
        &self,
        usage: &mut AiUsage,
        feature: AiFeature,
        privileged: bool,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.maybe_reset(usage, now);

        if privileged {
            return Ok(());
        }

        let used = match feature {
            AiFeature::Summary => usage.summary_used,
            AiFeature::Flashcards => usage.flashcard_used,
        };
        let limit = self.limits.ceiling(feature);

        if used >= limit {
            Err(CoreError::QuotaExceeded {
                feature,
                used,
                limit,
            })
        } else {
            Ok(())
        }
    }

    /// Reset-then-check-then-increment.
    ///
    /// On success, bumps the daily counter and the matching lifetime
    /// counter. A denied request mutates nothing beyond the reset.
    pub fn consume(
        &self,
        profile: &mut GamificationProfile,
        feature: AiFeature,
        privileged: bool,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.check(&mut profile.ai_usage, feature, privileged, now)?;

        match feature {
            AiFeature::Summary => {
                profile.ai_usage.summary_used += 1;
                profile.total_summaries_generated += 1;
            }
            AiFeature::Flashcards => {
                profile.ai_usage.flashcard_used += 1;
                profile.total_flashcards_generated += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::GamificationProfile;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, d, h, 0, 0).unwrap()
    }

    fn make_profile(summary_used: u32, last_reset: DateTime<Utc>) -> GamificationProfile {
        let mut profile = GamificationProfile::new("user-1", last_reset);
        profile.ai_usage.summary_used = summary_used;
        profile
    }

    #[test]
    fn test_consume_within_ceiling() {
        let manager = QuotaManager::new();
        let mut profile = make_profile(0, at(1, 0));

        manager
            .consume(&mut profile, AiFeature::Summary, false, at(1, 10))
            .unwrap();

        assert_eq!(profile.ai_usage.summary_used, 1);
        assert_eq!(profile.total_summaries_generated, 1);
        assert_eq!(profile.ai_usage.flashcard_used, 0);
    }

    #[test]
    fn test_consume_at_ceiling_denied_without_mutation() {
        let manager = QuotaManager::new();
        let mut profile = make_profile(SUMMARY_PER_DAY, at(1, 0));

        let err = manager
            .consume(&mut profile, AiFeature::Summary, false, at(1, 10))
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::QuotaExceeded {
                feature: AiFeature::Summary,
                used: 3,
                limit: 3,
            }
        ));
        assert_eq!(profile.ai_usage.summary_used, SUMMARY_PER_DAY);
        assert_eq!(profile.total_summaries_generated, 0);
    }

    #[test]
    fn test_reset_applies_before_check() {
        // Ceiling reached on Jan 1; attempt at Jan 2 01:00 is past the
        // 24h window, so both counters zero first and the request lands
        // on a fresh quota.
        let manager = QuotaManager::new();
        let mut profile = make_profile(SUMMARY_PER_DAY, at(1, 0));
        profile.ai_usage.flashcard_used = 2;

        manager
            .consume(&mut profile, AiFeature::Summary, false, at(2, 1))
            .unwrap();

        assert_eq!(profile.ai_usage.summary_used, 1);
        assert_eq!(profile.ai_usage.flashcard_used, 0);
        assert_eq!(profile.ai_usage.last_reset, at(2, 1));
    }

    #[test]
    fn test_reset_exactly_at_boundary() {
        let manager = QuotaManager::new();
        let mut profile = make_profile(SUMMARY_PER_DAY, at(1, 0));

        // Exactly 24 hours later: reset first, then check.
        manager
            .consume(&mut profile, AiFeature::Summary, false, at(2, 0))
            .unwrap();

        assert_eq!(profile.ai_usage.summary_used, 1);
        assert_eq!(profile.ai_usage.last_reset, at(2, 0));
    }

    #[test]
    fn test_no_reset_within_window() {
        let manager = QuotaManager::new();
        let mut usage = AiUsage::new(at(1, 0));
        usage.summary_used = 2;

        assert!(!manager.maybe_reset(&mut usage, at(1, 23)));
        assert_eq!(usage.summary_used, 2);
        assert_eq!(usage.last_reset, at(1, 0));
    }

    #[test]
    fn test_privileged_bypasses_ceiling_but_still_counts() {
        let manager = QuotaManager::new();
        let mut profile = make_profile(SUMMARY_PER_DAY, at(1, 0));

        manager
            .consume(&mut profile, AiFeature::Summary, true, at(1, 10))
            .unwrap();

        assert_eq!(profile.ai_usage.summary_used, SUMMARY_PER_DAY + 1);
        assert_eq!(profile.total_summaries_generated, 1);
    }

    #[test]
    fn test_privileged_still_gets_reset_bookkeeping() {
        let manager = QuotaManager::new();
        let mut profile = make_profile(SUMMARY_PER_DAY, at(1, 0));

        manager
            .consume(&mut profile, AiFeature::Summary, true, at(3, 0))
            .unwrap();

        assert_eq!(profile.ai_usage.summary_used, 1);
        assert_eq!(profile.ai_usage.last_reset, at(3, 0));
    }

    #[test]
    fn test_features_tracked_independently() {
        let manager = QuotaManager::new();
        let mut profile = make_profile(SUMMARY_PER_DAY, at(1, 0));

        // Summary ceiling reached; flashcards still available.
        manager
            .consume(&mut profile, AiFeature::Flashcards, false, at(1, 10))
            .unwrap();

        assert_eq!(profile.ai_usage.flashcard_used, 1);
        assert_eq!(profile.total_flashcards_generated, 1);
        assert_eq!(profile.total_summaries_generated, 0);
    }

    #[test]
    fn test_ceiling_never_exceeded_within_window() {
        let manager = QuotaManager::new();
        let mut profile = make_profile(0, at(1, 0));

        for _ in 0..SUMMARY_PER_DAY {
            manager
                .consume(&mut profile, AiFeature::Summary, false, at(1, 10))
                .unwrap();
        }
        assert!(manager
            .consume(&mut profile, AiFeature::Summary, false, at(1, 12))
            .is_err());
        assert_eq!(profile.ai_usage.summary_used, SUMMARY_PER_DAY);
    }
}
