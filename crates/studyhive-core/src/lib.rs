//! # Studyhive Core Library
//!
//! This library provides the gamification and quota-enforcement engine for
//! the Studyhive note-sharing platform. It implements a CLI-first philosophy
//! where all operations are available via a standalone CLI binary, with any
//! web or desktop surface being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Orchestrator**: The single entry point that turns platform triggers
//!   (logins, note uploads, AI generations) into streak, XP, quota, and
//!   badge updates in one commit
//! - **Storage**: SQLite-based profile and badge-catalog persistence with
//!   optimistic concurrency, plus TOML-based configuration
//! - **Badges**: A data-driven criteria engine evaluating the active catalog
//!   against the profile after every trigger
//! - **Generation**: Quota-gated access to an external text-generation service
//!
//! ## Key Components
//!
//! - [`GamificationOrchestrator`]: Trigger pipeline and commit loop
//! - [`Store`]: Profile and badge persistence
//! - [`Config`]: XP awards, quota ceilings, and generation settings
//! - [`BadgeCriteriaEngine`]: Catalog evaluation

pub mod badges;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod generation;
pub mod orchestrator;
pub mod profile;
pub mod quota;
pub mod store;
pub mod streak;
pub mod xp;

pub use badges::{Badge, BadgeCategory, BadgeCriteria, BadgeCriteriaEngine, BadgeRarity};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, GenerationConfig, XpConfig};
pub use error::{ConfigError, CoreError, GenerationError, Result, StoreError};
pub use events::{ActivityAction, TriggerEvent};
pub use generation::{HttpTextGenerator, TextGenerator};
pub use orchestrator::{AwardedBadge, EventOutcome, GamificationOrchestrator};
pub use profile::{
    ActivityRecord, AiUsage, EarnedBadge, GamificationProfile, StreakState, ACTIVITY_LOG_CAP,
};
pub use quota::{AiFeature, QuotaLimits, QuotaManager};
pub use store::{Store, VersionedProfile};
