//! Consecutive-day streak tracking.
//!
//! Streak continuation is decided by calendar-date difference, not
//! elapsed hours: a use at 23:59 followed by one at 00:01 the next day
//! counts as a one-day gap even though less than 24 hours elapsed.

use chrono::{DateTime, Utc};

use crate::profile::StreakState;

/// Calendar-day difference between two instants (UTC dates).
fn calendar_day_difference(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later.date_naive() - earlier.date_naive()).num_days()
}

/// Compute the streak state after a streak-bearing action at `now`.
///
/// Pure function: no side effects, no I/O. `max` never decreases.
pub fn advance(streak: &StreakState, now: DateTime<Utc>) -> StreakState {
    let Some(last_used) = streak.last_used else {
        // First ever qualifying action.
        return StreakState {
            current: 1,
            max: streak.max.max(1),
            last_used: Some(now),
        };
    };

    let diff_days = calendar_day_difference(last_used, now);

    match diff_days {
        0 => StreakState {
            current: streak.current,
            max: streak.max,
            last_used: Some(now),
        },
        1 => {
            let current = streak.current + 1;
            StreakState {
                current,
                max: streak.max.max(current),
                last_used: Some(now),
            }
        }
        _ => StreakState {
            current: 1,
            max: streak.max.max(1),
            last_used: Some(now),
        },
    }
}
