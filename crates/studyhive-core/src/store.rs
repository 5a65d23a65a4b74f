//! SQLite-based persistence for profiles and the badge catalog.
//!
//! Provides persistent storage for:
//! - Per-user gamification profiles (single JSON document per user)
//! - The global badge catalog
//!
//! A profile row carries an integer `version` bumped on every save;
//! `save_profile` is conditional on the version read at load time, so
//! two interleaved orchestration runs for the same user cannot both
//! commit -- the loser gets a conflict and retries against fresh state.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::badges::Badge;
use crate::error::{CoreError, Result, StoreError};
use crate::profile::GamificationProfile;

/// Returns `~/.config/studyhive[-dev]/` based on STUDYHIVE_ENV.
///
/// Set STUDYHIVE_ENV=dev to use the development data directory.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYHIVE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("studyhive-dev")
    } else {
        base_dir.join("studyhive")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StoreError::DataDirError(e.to_string()))?;
    Ok(dir)
}

/// A profile together with the version it was read at.
#[derive(Debug, Clone)]
pub struct VersionedProfile {
    pub profile: GamificationProfile,
    pub version: i64,
}

/// SQLite database for gamification state.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the database at `~/.config/studyhive/studyhive.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("studyhive.db"))
    }

    /// Open the database at an explicit path.
    ///
    /// Multiple handles on the same path see each other's commits.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let conn = Connection::open(&path).map_err(|source| StoreError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS profiles (
                    user_id    TEXT PRIMARY KEY,
                    version    INTEGER NOT NULL DEFAULT 1,
                    document   TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS badges (
                    id            TEXT PRIMARY KEY,
                    name          TEXT NOT NULL UNIQUE,
                    document      TEXT NOT NULL,
                    is_active     INTEGER NOT NULL DEFAULT 1,
                    display_order INTEGER NOT NULL DEFAULT 0
                );

                CREATE INDEX IF NOT EXISTS idx_badges_active_order
                    ON badges(is_active, display_order);",
            )
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))
    }

    /// Create an all-zero profile for a new user.
    ///
    /// Fails with a bad-request error if the user already has one.
    pub fn create_profile(
        &self,
        user_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<GamificationProfile> {
        let profile = GamificationProfile::new(user_id, created_at);
        let document = serde_json::to_string(&profile)?;

        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO profiles (user_id, version, document, updated_at)
                 VALUES (?1, 1, ?2, ?3)",
                params![user_id, document, created_at.to_rfc3339()],
            )
            .map_err(StoreError::from)?;

        if inserted == 0 {
            return Err(CoreError::BadRequest(format!(
                "profile for user '{user_id}' already exists"
            )));
        }
        Ok(profile)
    }

    /// Load a profile and its current version.
    pub fn load_profile(&self, user_id: &str) -> Result<VersionedProfile> {
        self.try_load_profile(user_id)?
            .ok_or_else(|| CoreError::NotFound {
                kind: "user",
                id: user_id.to_string(),
            })
    }

    /// Load a profile if it exists.
    pub fn try_load_profile(&self, user_id: &str) -> Result<Option<VersionedProfile>> {
        let row = self
            .conn
            .query_row(
                "SELECT document, version FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()
            .map_err(StoreError::from)?;

        match row {
            None => Ok(None),
            Some((document, version)) => {
                let profile = serde_json::from_str(&document).map_err(|e| {
                    StoreError::CorruptDocument {
                        user_id: user_id.to_string(),
                        message: e.to_string(),
                    }
                })?;
                Ok(Some(VersionedProfile { profile, version }))
            }
        }
    }

    /// Write a profile back as a single document, conditional on the
    /// version read at load time.
    ///
    /// Returns the new version. A version mismatch means another run
    /// committed in between; the caller retries the whole orchestration
    /// run against a fresh load.
    pub fn save_profile(
        &self,
        profile: &GamificationProfile,
        expected_version: i64,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        let document = serde_json::to_string(profile)?;

        let updated = self
            .conn
            .execute(
                "UPDATE profiles
                 SET document = ?1, version = version + 1, updated_at = ?2
                 WHERE user_id = ?3 AND version = ?4",
                params![
                    document,
                    now.to_rfc3339(),
                    profile.user_id,
                    expected_version
                ],
            )
            .map_err(StoreError::from)?;

        if updated == 1 {
            return Ok(expected_version + 1);
        }

        // Distinguish a stale version from a deleted user.
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT version FROM profiles WHERE user_id = ?1",
                params![profile.user_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)?;

        match exists {
            Some(_) => Err(CoreError::Conflict {
                user_id: profile.user_id.clone(),
            }),
            None => Err(CoreError::NotFound {
                kind: "user",
                id: profile.user_id.clone(),
            }),
        }
    }

    /// Load the catalog filtered to active entries, in display order.
    pub fn active_badges(&self) -> Result<Vec<Badge>> {
        self.load_badges("SELECT document FROM badges WHERE is_active = 1 ORDER BY display_order")
    }

    /// Load the full catalog, in display order.
    pub fn all_badges(&self) -> Result<Vec<Badge>> {
        self.load_badges("SELECT document FROM badges ORDER BY display_order")
    }

    fn load_badges(&self, sql: &str) -> Result<Vec<Badge>> {
        let mut stmt = self.conn.prepare(sql).map_err(StoreError::from)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(StoreError::from)?;

        let mut badges = Vec::new();
        for row in rows {
            let document = row.map_err(StoreError::from)?;
            badges.push(serde_json::from_str(&document)?);
        }
        Ok(badges)
    }

    /// Insert or replace a catalog entry (admin operation).
    pub fn upsert_badge(&self, badge: &Badge) -> Result<()> {
        let document = serde_json::to_string(badge)?;
        self.conn
            .execute(
                "INSERT INTO badges (id, name, document, is_active, display_order)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     document = excluded.document,
                     is_active = excluded.is_active,
                     display_order = excluded.display_order",
                params![
                    badge.id,
                    badge.name,
                    document,
                    badge.is_active as i64,
                    badge.display_order
                ],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    /// Seed the default badge set, skipping ids that already exist.
    ///
    /// Returns the number of entries inserted.
    pub fn seed_default_catalog(&self) -> Result<usize> {
        let mut inserted = 0;
        for badge in crate::badges::default_catalog() {
            let document = serde_json::to_string(&badge)?;
            let n = self
                .conn
                .execute(
                    "INSERT OR IGNORE INTO badges (id, name, document, is_active, display_order)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        badge.id,
                        badge.name,
                        document,
                        badge.is_active as i64,
                        badge.display_order
                    ],
                )
                .map_err(StoreError::from)?;
            inserted += n;
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::{BadgeCategory, BadgeCriteria, BadgeRarity};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_create_and_load_roundtrip() {
        let store = Store::open_memory().unwrap();
        let created = store.create_profile("user-1", now()).unwrap();

        let loaded = store.load_profile("user-1").unwrap();
        assert_eq!(loaded.profile, created);
        assert_eq!(loaded.version, 1);
    }

    #[test]
    fn test_create_twice_rejected() {
        let store = Store::open_memory().unwrap();
        store.create_profile("user-1", now()).unwrap();

        let err = store.create_profile("user-1", now()).unwrap_err();
        assert!(matches!(err, CoreError::BadRequest(_)));
    }

    #[test]
    fn test_load_missing_user_not_found() {
        let store = Store::open_memory().unwrap();
        let err = store.load_profile("ghost").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: "user", .. }));
    }

    #[test]
    fn test_save_bumps_version() {
        let store = Store::open_memory().unwrap();
        store.create_profile("user-1", now()).unwrap();

        let mut loaded = store.load_profile("user-1").unwrap();
        loaded.profile.xp = 40;
        let v2 = store
            .save_profile(&loaded.profile, loaded.version, now())
            .unwrap();
        assert_eq!(v2, 2);

        let reloaded = store.load_profile("user-1").unwrap();
        assert_eq!(reloaded.profile.xp, 40);
        assert_eq!(reloaded.version, 2);
    }

    #[test]
    fn test_stale_version_conflicts() {
        let store = Store::open_memory().unwrap();
        store.create_profile("user-1", now()).unwrap();

        // Two loads of the same version; the second save loses.
        let first = store.load_profile("user-1").unwrap();
        let second = store.load_profile("user-1").unwrap();

        store
            .save_profile(&first.profile, first.version, now())
            .unwrap();

        let err = store
            .save_profile(&second.profile, second.version, now())
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict { .. }));
    }

    #[test]
    fn test_seed_catalog_idempotent() {
        let store = Store::open_memory().unwrap();

        let first = store.seed_default_catalog().unwrap();
        assert!(first > 0);

        let second = store.seed_default_catalog().unwrap();
        assert_eq!(second, 0);

        assert_eq!(store.all_badges().unwrap().len(), first);
    }

    #[test]
    fn test_active_badges_filtered_and_ordered() {
        let store = Store::open_memory().unwrap();

        let mut retired = Badge {
            id: "retired".to_string(),
            name: "Retired".to_string(),
            category: BadgeCategory::Notes,
            criteria: BadgeCriteria::NoteCount { threshold: 1 },
            xp_reward: 10,
            rarity: BadgeRarity::Common,
            is_active: false,
            display_order: 0,
        };
        store.upsert_badge(&retired).unwrap();

        let late = Badge {
            id: "late".to_string(),
            name: "Late".to_string(),
            display_order: 9,
            is_active: true,
            ..retired.clone()
        };
        let early = Badge {
            id: "early".to_string(),
            name: "Early".to_string(),
            display_order: 2,
            is_active: true,
            ..retired.clone()
        };
        store.upsert_badge(&late).unwrap();
        store.upsert_badge(&early).unwrap();

        let active = store.active_badges().unwrap();
        let ids: Vec<_> = active.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);

        // Reactivating via upsert makes it visible again.
        retired.is_active = true;
        store.upsert_badge(&retired).unwrap();
        assert_eq!(store.active_badges().unwrap().len(), 3);
    }

    #[test]
    fn test_unknown_criteria_survives_storage() {
        let store = Store::open_memory().unwrap();

        let badge = Badge {
            id: "mystery".to_string(),
            name: "Mystery".to_string(),
            category: BadgeCategory::Notes,
            criteria: BadgeCriteria::Unknown,
            xp_reward: 0,
            rarity: BadgeRarity::Common,
            is_active: true,
            display_order: 0,
        };
        store.upsert_badge(&badge).unwrap();

        let loaded = store.all_badges().unwrap();
        assert_eq!(loaded[0].criteria, BadgeCriteria::Unknown);
    }
}
