// src/commands.rs
//! Command handlers for the cookme CLI

use anyhow::{Context, Result};
use chrono::Utc;
use cookme::config::CookmeConfig;
use cookme::db::paths;
use cookme::{
    BlobStore, HouseInventory, Ingredient, Recipe, RecipeBook, RecipeCatalog, RecipeClient,
    RecipeSource, list_ingredients, list_recipes,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Resolved configuration shared by every command
pub struct Session {
    config: CookmeConfig,
    db_path: Option<PathBuf>,
    remote: Option<String>,
}

impl Session {
    /// Load configuration; an explicit `--config` file must exist
    pub fn new(
        config_path: Option<&Path>,
        db_path: Option<PathBuf>,
        remote: Option<String>,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => CookmeConfig::load(path)?,
            None => CookmeConfig::load_or_default(&paths::default_config_path())?,
        };
        let remote = remote.or_else(|| config.remote.endpoint.clone());
        Ok(Self {
            config,
            db_path,
            remote,
        })
    }

    fn store(&self) -> Result<BlobStore> {
        let store_config = self.config.store_config(self.db_path.as_deref())?;
        let path = store_config.path.clone();
        debug!("Using database at {}", path.display());
        BlobStore::open(store_config)
            .with_context(|| format!("Failed to open database at {}", path.display()))
    }

    fn inventory(&self) -> Result<HouseInventory> {
        let storage = &self.config.storage;
        let inventory =
            HouseInventory::open_bucket(self.store()?, &storage.inventory_bucket, storage.write_mode)?
                .with_delete_case(self.config.delete_case());
        Ok(inventory)
    }

    fn recipe_book(&self) -> Result<RecipeBook> {
        let storage = &self.config.storage;
        let book = RecipeBook::open_bucket(self.store()?, &storage.recipe_bucket, storage.write_mode)?
            .with_delete_case(self.config.delete_case());
        Ok(book)
    }

    /// The remote catalog when one is configured, otherwise the local book
    fn catalog(&self) -> Result<Box<dyn RecipeCatalog>> {
        match &self.remote {
            Some(endpoint) => {
                let client = RecipeClient::connect(endpoint, self.config.remote_timeout()?)
                    .with_context(|| format!("Cannot reach recipe server at {}", endpoint))?;
                Ok(Box::new(client))
            }
            None => Ok(Box::new(self.recipe_book()?)),
        }
    }
}

/// Print the recipes that can be cooked right now
pub fn cmd_recommend(session: &Session) -> Result<()> {
    let inventory = session.inventory()?;
    let catalog = session.catalog()?;

    let recipes = list_recipes(
        &inventory,
        &catalog,
        &session.config.match_options(),
        Utc::now(),
    )?;

    let mut out = io::stdout().lock();
    for recipe in &recipes {
        writeln!(out, "{}", recipe)?;
    }
    Ok(())
}

pub fn cmd_list_ingredients(session: &Session) -> Result<()> {
    let inventory = session.inventory()?;
    let mut out = io::stdout().lock();
    list_ingredients(
        &mut out,
        &inventory,
        &session.config.match_options(),
        Utc::now(),
    )?;
    Ok(())
}

pub fn cmd_add_ingredient(session: &Session, name: &str, days: i64) -> Result<()> {
    let ingredient = Ingredient::expiring_in_days(name, days, Utc::now())?;
    session.inventory()?.add_ingredients([ingredient])?;
    Ok(())
}

pub fn cmd_delete_ingredient(session: &Session, name: &str) -> Result<()> {
    let removed = session.inventory()?.delete_ingredient(name)?;
    if removed == 0 {
        info!("No ingredient named '{}'", name);
    }
    Ok(())
}

pub fn cmd_list_recipes(session: &Session) -> Result<()> {
    let recipes = session.catalog()?.recipes()?;
    let mut out = io::stdout().lock();
    for recipe in &recipes {
        let ingredients: Vec<&str> = recipe.ingredient_names().collect();
        writeln!(out, "{}: {}", recipe.name, ingredients.join(", "))?;
    }
    Ok(())
}

pub fn cmd_add_recipe(session: &Session, name: &str, ingredients: &[String]) -> Result<()> {
    let recipe = Recipe::new(name, ingredients.iter().cloned());
    session.catalog()?.add(recipe)?;
    Ok(())
}

pub fn cmd_delete_recipe(session: &Session, name: &str) -> Result<()> {
    let removed = session.catalog()?.delete(name)?;
    if removed == 0 {
        info!("No recipe named '{}'", name);
    }
    Ok(())
}

/// Run the recipe server until interrupted
#[cfg(feature = "server")]
pub fn cmd_serve(session: &Session, bind: Option<&str>) -> Result<()> {
    use cookme::server::{ServerConfig, run_server};

    let bind_addr = match bind {
        Some(addr) => addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", addr))?,
        None => session.config.bind_addr()?,
    };
    let book = session.recipe_book()?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(run_server(ServerConfig { bind_addr }, book))
}
