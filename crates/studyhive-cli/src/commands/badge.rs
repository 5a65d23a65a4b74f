use clap::Subcommand;
use studyhive_core::Store;

#[derive(Subcommand)]
pub enum BadgeAction {
    /// List active badges in display order
    List {
        /// Include retired (inactive) badges
        #[arg(long)]
        all: bool,
    },
    /// Seed the default badge catalog (skips badges that already exist)
    Seed,
    /// Show the badges a user has earned
    Earned {
        /// User identifier
        user_id: String,
    },
}

pub fn run(action: BadgeAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;

    match action {
        BadgeAction::List { all } => {
            let badges = if all {
                store.all_badges()?
            } else {
                store.active_badges()?
            };
            println!("{}", serde_json::to_string_pretty(&badges)?);
        }
        BadgeAction::Seed => {
            let inserted = store.seed_default_catalog()?;
            println!("seeded {inserted} badges");
        }
        BadgeAction::Earned { user_id } => {
            let loaded = store.load_profile(&user_id)?;
            println!("{}", serde_json::to_string_pretty(&loaded.profile.badges)?);
        }
    }
    Ok(())
}
