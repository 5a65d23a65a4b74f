//! Trigger events consumed by the gamification engine.
//!
//! Every qualifying platform action produces a [`TriggerEvent`]. The
//! controller layer fires one per request; the orchestrator runs the
//! full pipeline for it. Trigger types are a closed enum, separate from
//! the free-text descriptions used only for display.

use serde::{Deserialize, Serialize};

use crate::quota::AiFeature;

/// An external trigger entering the gamification pipeline.
///
/// Payload counts (`note_count`, `rating_count`, `download_count`) are
/// supplied by the caller because the engine does not own the notes
/// collection; they are post-action totals for the acting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TriggerEvent {
    /// User logged in.
    Login,

    /// User uploaded a note; `note_count` is their total after upload.
    NoteCreated { note_count: u64 },

    /// User rated someone else's note.
    RatingGiven { rating_count: u64 },

    /// Someone downloaded one of the user's notes.
    NoteDownloaded { download_count: u64 },

    /// An AI summary was generated for the user.
    AiSummaryGenerated,

    /// An AI flashcard set was generated for the user.
    AiFlashcardsGenerated,
}

impl TriggerEvent {
    /// Whether this trigger advances the daily streak.
    ///
    /// Only login and AI-feature use count as streak-bearing; uploads,
    /// ratings and downloads do not.
    pub fn advances_streak(&self) -> bool {
        matches!(
            self,
            TriggerEvent::Login
                | TriggerEvent::AiSummaryGenerated
                | TriggerEvent::AiFlashcardsGenerated
        )
    }

    /// The AI feature consumed by this trigger, if any.
    pub fn ai_feature(&self) -> Option<AiFeature> {
        match self {
            TriggerEvent::AiSummaryGenerated => Some(AiFeature::Summary),
            TriggerEvent::AiFlashcardsGenerated => Some(AiFeature::Flashcards),
            _ => None,
        }
    }

    /// The activity-log action recorded for this trigger.
    pub fn action(&self) -> ActivityAction {
        match self {
            TriggerEvent::Login => ActivityAction::Login,
            TriggerEvent::NoteCreated { .. } => ActivityAction::NoteUpload,
            TriggerEvent::RatingGiven { .. } => ActivityAction::RatingGiven,
            TriggerEvent::NoteDownloaded { .. } => ActivityAction::NoteDownload,
            TriggerEvent::AiSummaryGenerated => ActivityAction::AiSummary,
            TriggerEvent::AiFlashcardsGenerated => ActivityAction::AiFlashcards,
        }
    }

    /// Default activity-log description for this trigger.
    pub fn description(&self) -> String {
        match self {
            TriggerEvent::Login => "Daily login".to_string(),
            TriggerEvent::NoteCreated { note_count } => {
                format!("Uploaded a note (total: {note_count})")
            }
            TriggerEvent::RatingGiven { .. } => "Rated a note".to_string(),
            TriggerEvent::NoteDownloaded { .. } => "A note was downloaded".to_string(),
            TriggerEvent::AiSummaryGenerated => "Generated an AI summary".to_string(),
            TriggerEvent::AiFlashcardsGenerated => "Generated AI flashcards".to_string(),
        }
    }
}

/// Closed set of actions recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Login,
    NoteUpload,
    RatingGiven,
    NoteDownload,
    AiSummary,
    AiFlashcards,
    BadgeEarned,
    EarnXp,
}
