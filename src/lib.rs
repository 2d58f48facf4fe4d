// src/lib.rs

//! Cookme household ingredient tracker
//!
//! Tracks perishable ingredients and a recipe catalog, and recommends the
//! recipes that can be cooked from what is in the house.
//!
//! # Architecture
//!
//! - Blob store: SQLite file of named buckets, one JSON document each
//! - Collections: typed read-modify-write over a bucket
//! - Sources: ingredients and recipes come from capabilities, not concrete stores
//! - Remote catalog: the recipe book can be served to and read from another process

pub mod collection;
pub mod config;
pub mod db;
mod error;
pub mod ingredient;
pub mod inventory;
pub mod matching;
pub mod recipe;
pub mod remote;
pub mod source;

#[cfg(feature = "server")]
pub mod server;

pub use collection::{Collection, Snapshot, WriteMode};
pub use config::CookmeConfig;
pub use db::{Blob, BlobStore, StoreConfig};
pub use error::{Error, Result};
pub use ingredient::{CaseSensitivity, Ingredient, Ingredients, NullExpirationPolicy};
pub use inventory::{HouseInventory, INVENTORY_BUCKET};
pub use matching::{MatchOptions, find_recipes, list_ingredients, list_recipes};
pub use recipe::{RECIPES_BUCKET, Recipe, RecipeBook, RecipeIngredient, Recipes};
pub use remote::RecipeClient;
pub use source::{IngredientSource, RecipeCatalog, RecipeSource, SourceFn};
