//! Badge catalog and criteria evaluation.

pub mod catalog;
pub mod engine;

pub use catalog::{default_catalog, Badge, BadgeCategory, BadgeCriteria, BadgeRarity};
pub use engine::BadgeCriteriaEngine;
