// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Session;

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries command output only
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let session = Session::new(cli.config.as_deref(), cli.db_path, cli.remote)?;

    match cli.command {
        None => commands::cmd_recommend(&session),
        Some(Commands::ListIngredients) => commands::cmd_list_ingredients(&session),
        Some(Commands::AddIngredient { name, days }) => {
            commands::cmd_add_ingredient(&session, &name, days)
        }
        Some(Commands::DeleteIngredient { name }) => {
            commands::cmd_delete_ingredient(&session, &name)
        }
        Some(Commands::ListRecipes) => commands::cmd_list_recipes(&session),
        Some(Commands::AddRecipe { name, ingredients }) => {
            commands::cmd_add_recipe(&session, &name, &ingredients)
        }
        Some(Commands::DeleteRecipe { name }) => commands::cmd_delete_recipe(&session, &name),
        #[cfg(feature = "server")]
        Some(Commands::Serve { bind }) => commands::cmd_serve(&session, bind.as_deref()),
    }
}
