use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "studyhive-cli", version, about = "Studyhive gamification CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Gamification profile management
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Fire a gamification trigger
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Quota-gated AI generation
    Generate {
        #[command(subcommand)]
        action: commands::generate::GenerateAction,
    },
    /// Badge catalog management
    Badge {
        #[command(subcommand)]
        action: commands::badge::BadgeAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Event { action } => commands::event::run(action),
        Commands::Generate { action } => commands::generate::run(action),
        Commands::Badge { action } => commands::badge::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
