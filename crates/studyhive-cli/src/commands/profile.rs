use chrono::Utc;
use clap::Subcommand;
use studyhive_core::{Store, VersionedProfile};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create a fresh profile for a user
    Create {
        /// User identifier
        user_id: String,
    },
    /// Show a user's profile
    Show {
        /// User identifier
        user_id: String,
    },
    /// Show a user's activity log
    Activity {
        /// User identifier
        user_id: String,
        /// Show at most this many entries
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;

    match action {
        ProfileAction::Create { user_id } => {
            let profile = store.create_profile(&user_id, Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Show { user_id } => {
            let VersionedProfile { profile, .. } = store.load_profile(&user_id)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Activity { user_id, limit } => {
            let VersionedProfile { profile, .. } = store.load_profile(&user_id)?;
            let entries: Vec<_> = profile.activity.iter().take(limit).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}
