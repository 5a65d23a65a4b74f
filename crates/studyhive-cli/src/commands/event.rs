use clap::Subcommand;
use studyhive_core::{Config, GamificationOrchestrator, Store, TriggerEvent};

#[derive(Subcommand)]
pub enum EventAction {
    /// Record a daily login
    Login {
        /// User identifier
        user_id: String,
    },
    /// Record a note upload
    NoteUpload {
        /// User identifier
        user_id: String,
        /// The user's total note count after the upload
        #[arg(long)]
        note_count: u64,
    },
    /// Record a rating given to another user's note
    Rating {
        /// User identifier
        user_id: String,
        /// The user's total rating count after this rating
        #[arg(long)]
        rating_count: u64,
    },
    /// Record a note download
    Download {
        /// User identifier
        user_id: String,
        /// The user's total download count after the download
        #[arg(long)]
        download_count: u64,
    },
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    store.seed_default_catalog()?;
    let orchestrator = GamificationOrchestrator::new(store, Config::load()?);

    let (user_id, event) = match action {
        EventAction::Login { user_id } => (user_id, TriggerEvent::Login),
        EventAction::NoteUpload {
            user_id,
            note_count,
        } => (user_id, TriggerEvent::NoteCreated { note_count }),
        EventAction::Rating {
            user_id,
            rating_count,
        } => (user_id, TriggerEvent::RatingGiven { rating_count }),
        EventAction::Download {
            user_id,
            download_count,
        } => (user_id, TriggerEvent::NoteDownloaded { download_count }),
    };

    let outcome = orchestrator.handle_event(&user_id, &event)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
