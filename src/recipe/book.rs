// src/recipe/book.rs

//! The recipe book: a persisted catalog of recipes
//!
//! Used directly in-process and also served over HTTP by the recipe server.

use super::{Recipe, Recipes};
use crate::collection::{Collection, WriteMode};
use crate::db::BlobStore;
use crate::error::Result;
use crate::ingredient::CaseSensitivity;
use crate::source::{RecipeCatalog, RecipeSource};
use tracing::info;

/// Bucket name used for recipes unless configured otherwise
pub const RECIPES_BUCKET: &str = "recipes";

/// Recipes persisted in a blob store bucket
#[derive(Debug, Clone)]
pub struct RecipeBook {
    recipes: Collection<Recipe>,
    delete_case: CaseSensitivity,
}

impl RecipeBook {
    /// Open the book in the default bucket
    pub fn open(store: BlobStore) -> Result<Self> {
        Self::open_bucket(store, RECIPES_BUCKET, WriteMode::default())
    }

    /// Open the book in a specific bucket
    pub fn open_bucket(
        store: BlobStore,
        bucket: impl Into<String>,
        write_mode: WriteMode,
    ) -> Result<Self> {
        Ok(Self {
            recipes: Collection::open(store, bucket, write_mode)?,
            delete_case: CaseSensitivity::Sensitive,
        })
    }

    /// Set how `delete` compares recipe names
    pub fn with_delete_case(mut self, case: CaseSensitivity) -> Self {
        self.delete_case = case;
        self
    }

    pub fn bucket(&self) -> &str {
        self.recipes.bucket()
    }

    /// All recipes in the order they were added
    pub fn list(&self) -> Result<Recipes> {
        Ok(self.recipes.list()?.into())
    }

    pub fn add(&self, recipe: Recipe) -> Result<()> {
        let name = recipe.name.clone();
        self.recipes.append([recipe])?;
        info!("Added recipe '{}' to '{}'", name, self.bucket());
        Ok(())
    }

    /// Remove every recipe with this name, returning how many were removed
    pub fn delete(&self, name: &str) -> Result<usize> {
        let case = self.delete_case;
        let removed = self
            .recipes
            .remove_where(|r| case.names_equal(&r.name, name))?;
        info!(
            "Removed {} recipe(s) named '{}' from '{}'",
            removed,
            name,
            self.bucket()
        );
        Ok(removed)
    }
}

impl RecipeSource for RecipeBook {
    fn recipes(&self) -> Result<Recipes> {
        self.list()
    }
}

impl RecipeCatalog for RecipeBook {
    fn add(&self, recipe: Recipe) -> Result<()> {
        RecipeBook::add(self, recipe)
    }

    fn delete(&self, name: &str) -> Result<usize> {
        RecipeBook::delete(self, name)
    }
}
