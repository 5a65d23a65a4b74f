use clap::Subcommand;
use serde_json::json;
use studyhive_core::{
    AiFeature, Config, GamificationOrchestrator, HttpTextGenerator, Store,
};

#[derive(Subcommand)]
pub enum GenerateAction {
    /// Generate a note summary (counts against the daily quota)
    Summary {
        /// User identifier
        user_id: String,
        /// Text to summarize
        prompt: String,
        /// Bypass the quota ceiling (administrators only)
        #[arg(long)]
        privileged: bool,
    },
    /// Generate flashcards (counts against the daily quota)
    Flashcards {
        /// User identifier
        user_id: String,
        /// Text to build flashcards from
        prompt: String,
        /// Bypass the quota ceiling (administrators only)
        #[arg(long)]
        privileged: bool,
    },
    /// Show remaining quota for a user
    Quota {
        /// User identifier
        user_id: String,
    },
}

pub fn run(action: GenerateAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    store.seed_default_catalog()?;
    let config = Config::load()?;

    match action {
        GenerateAction::Summary {
            user_id,
            prompt,
            privileged,
        } => generate(store, config, &user_id, AiFeature::Summary, &prompt, privileged),
        GenerateAction::Flashcards {
            user_id,
            prompt,
            privileged,
        } => generate(
            store,
            config,
            &user_id,
            AiFeature::Flashcards,
            &prompt,
            privileged,
        ),
        GenerateAction::Quota { user_id } => {
            let loaded = store.load_profile(&user_id)?;
            let usage = &loaded.profile.ai_usage;
            let report = json!({
                "summary_used": usage.summary_used,
                "summary_limit": config.quota.summary_per_day,
                "flashcard_used": usage.flashcard_used,
                "flashcard_limit": config.quota.flashcards_per_day,
                "last_reset": usage.last_reset,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

fn generate(
    store: Store,
    config: Config,
    user_id: &str,
    feature: AiFeature,
    prompt: &str,
    privileged: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let generator = HttpTextGenerator::new(config.generation.clone());
    let orchestrator = GamificationOrchestrator::new(store, config);

    let (outcome, text) =
        orchestrator.generate_with_quota(user_id, feature, prompt, &generator, privileged)?;

    let report = json!({ "text": text, "outcome": outcome });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
