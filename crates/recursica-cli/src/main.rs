//! Recursica CLI: the `recursica` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands, NameCommands};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            value,
            tokens,
            brand,
            uikit,
            mode,
            json,
        } => commands::resolve::run(commands::resolve::Args {
            value,
            tokens,
            brand,
            uikit,
            mode,
            json,
        }),

        Commands::Step {
            hex,
            tokens,
            surface,
            direction,
            until_aa,
            max_steps,
            json,
        } => commands::step::run(commands::step::Args {
            hex,
            tokens,
            surface,
            direction,
            until_aa,
            max_steps,
            json,
        }),

        Commands::Audit {
            tokens,
            brand,
            uikit,
            fix,
            json,
        } => commands::audit::run(tokens, brand, uikit, fix, json),

        Commands::Export {
            tokens,
            brand,
            uikit,
            out,
            config,
            json,
        } => commands::export::run(commands::export::Args {
            tokens,
            brand,
            uikit,
            out,
            config,
            json,
        }),

        Commands::Name { command } => match command {
            NameCommands::Encode { segments } => commands::name::encode(segments),
            NameCommands::Decode { name } => commands::name::decode(name),
            NameCommands::Path { name } => commands::name::path(name),
        },
    }
}
