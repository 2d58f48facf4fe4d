// src/inventory.rs

//! The household inventory: what ingredients are in the house right now

use crate::collection::{Collection, WriteMode};
use crate::db::BlobStore;
use crate::error::Result;
use crate::ingredient::{CaseSensitivity, Ingredient, Ingredients};
use crate::source::IngredientSource;
use tracing::info;

/// Bucket name used for the inventory unless configured otherwise
pub const INVENTORY_BUCKET: &str = "inventory";

/// Ingredients owned by the household, persisted in a blob store bucket
#[derive(Debug, Clone)]
pub struct HouseInventory {
    items: Collection<Ingredient>,
    delete_case: CaseSensitivity,
}

impl HouseInventory {
    /// Open the inventory in the default bucket
    pub fn open(store: BlobStore) -> Result<Self> {
        Self::open_bucket(store, INVENTORY_BUCKET, WriteMode::default())
    }

    /// Open the inventory in a specific bucket
    pub fn open_bucket(
        store: BlobStore,
        bucket: impl Into<String>,
        write_mode: WriteMode,
    ) -> Result<Self> {
        Ok(Self {
            items: Collection::open(store, bucket, write_mode)?,
            delete_case: CaseSensitivity::Sensitive,
        })
    }

    /// Set how `delete_ingredient` compares names
    pub fn with_delete_case(mut self, case: CaseSensitivity) -> Self {
        self.delete_case = case;
        self
    }

    pub fn bucket(&self) -> &str {
        self.items.bucket()
    }

    /// All ingredients in the order they were added
    ///
    /// An inventory that was never written, or whose stored data cannot be
    /// read back, is empty.
    pub fn list(&self) -> Result<Ingredients> {
        Ok(self.items.list()?.into())
    }

    /// Append ingredients; duplicates are kept
    pub fn add_ingredients<I>(&self, ingredients: I) -> Result<()>
    where
        I: IntoIterator<Item = Ingredient>,
    {
        let ingredients: Vec<Ingredient> = ingredients.into_iter().collect();
        let count = ingredients.len();
        self.items.append(ingredients)?;
        info!("Added {} ingredient(s) to '{}'", count, self.bucket());
        Ok(())
    }

    /// Remove every ingredient with this name, returning how many were removed
    pub fn delete_ingredient(&self, name: &str) -> Result<usize> {
        let case = self.delete_case;
        let removed = self
            .items
            .remove_where(|i| case.names_equal(&i.name, name))?;
        info!(
            "Removed {} ingredient(s) named '{}' from '{}'",
            removed,
            name,
            self.bucket()
        );
        Ok(removed)
    }
}

impl IngredientSource for HouseInventory {
    fn ingredients(&self) -> Result<Ingredients> {
        self.list()
    }
}
