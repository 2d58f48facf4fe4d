// src/recipe/mod.rs

//! Recipes and the recipe book
//!
//! A recipe only names the ingredients it needs. Expiration dates belong to
//! the household inventory, never to a recipe.

mod book;

pub use book::{RECIPES_BUCKET, RecipeBook};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// A reference to an ingredient by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
}

impl RecipeIngredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A dish and the ingredients needed to make it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    pub fn new<I, S>(name: impl Into<String>, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            ingredients: ingredients.into_iter().map(RecipeIngredient::new).collect(),
        }
    }

    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|i| i.name.as_str())
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An ordered collection of recipes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipes(Vec<Recipe>);

impl Recipes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, recipe: Recipe) {
        self.0.push(recipe);
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Recipe> {
        self.0
    }
}

impl Deref for Recipes {
    type Target = [Recipe];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Recipe>> for Recipes {
    fn from(v: Vec<Recipe>) -> Self {
        Self(v)
    }
}

impl FromIterator<Recipe> for Recipes {
    fn from_iter<I: IntoIterator<Item = Recipe>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Recipes {
    type Item = Recipe;
    type IntoIter = std::vec::IntoIter<Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Recipes {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
