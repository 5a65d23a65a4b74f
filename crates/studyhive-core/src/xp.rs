//! XP grants, level derivation and the activity log.
//!
//! Level is always derived from total XP with `1 + xp / 100`; it is
//! recomputed in full on every grant and never incremented on its own,
//! so the two can never drift apart.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, Result};
use crate::events::ActivityAction;
use crate::profile::{ActivityRecord, GamificationProfile, ACTIVITY_LOG_CAP};

/// XP required per level.
pub const XP_PER_LEVEL: u64 = 100;

/// Level for a given XP total.
pub fn level_for_xp(xp: u64) -> u32 {
    (1 + xp / XP_PER_LEVEL) as u32
}

/// Grant `amount` XP to the profile and append an activity record.
///
/// Negative amounts are rejected with [`CoreError::InvalidAmount`] and
/// leave the profile untouched; they are never clamped to zero.
pub fn grant(
    profile: &mut GamificationProfile,
    amount: i64,
    action: ActivityAction,
    description: impl Into<String>,
    now: DateTime<Utc>,
) -> Result<()> {
    if amount < 0 {
        return Err(CoreError::InvalidAmount(amount));
    }
    let amount = amount as u64;

    profile.xp += amount;
    profile.level = level_for_xp(profile.xp);

    profile.activity.insert(
        0,
        ActivityRecord {
            action,
            description: description.into(),
            xp_earned: amount,
            timestamp: now,
        },
    );
    profile.activity.truncate(ACTIVITY_LOG_CAP);

    Ok(())
}
