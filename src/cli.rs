// src/cli.rs
//! CLI definitions for cookme
//!
//! Running `cookme` with no command prints the recipes that can be cooked
//! from the current inventory. Command implementations live in `commands`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cookme")]
#[command(version)]
#[command(about = "Track perishable ingredients and find recipes you can cook", long_about = None)]
pub struct Cli {
    /// Configuration file (default: <config dir>/cookme/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the database file
    #[arg(short, long, global = true, env = "COOKME_DB")]
    pub db_path: Option<PathBuf>,

    /// Read and modify recipes on this recipe server instead of locally
    #[arg(short, long, global = true, env = "COOKME_REMOTE")]
    pub remote: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List ingredients, soonest to expire first
    ListIngredients,

    /// Add an ingredient that expires in DAYS days
    AddIngredient {
        /// Ingredient name
        name: String,

        /// Days until it expires (0 means today)
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },

    /// Delete every ingredient with this name
    DeleteIngredient {
        /// Ingredient name
        name: String,
    },

    /// List all known recipes
    ListRecipes,

    /// Add a recipe
    AddRecipe {
        /// Recipe name
        name: String,

        /// Ingredients the recipe needs
        #[arg(required = true)]
        ingredients: Vec<String>,
    },

    /// Delete every recipe with this name
    DeleteRecipe {
        /// Recipe name
        name: String,
    },

    /// Serve the local recipe book over HTTP
    #[cfg(feature = "server")]
    Serve {
        /// Address to listen on (default: from config, else 127.0.0.1:5000)
        #[arg(short, long)]
        bind: Option<String>,
    },
}
