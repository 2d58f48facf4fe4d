// src/matching.rs

//! Deciding what can be cooked
//!
//! A recipe is satisfiable when every ingredient it names is present in the
//! available ingredients (case-insensitive). There is no partial credit, no
//! substitution and no quantity accounting.

use crate::error::Result;
use crate::ingredient::{Ingredients, NullExpirationPolicy};
use crate::recipe::Recipes;
use crate::source::{IngredientSource, RecipeSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::debug;

/// Controls how the inventory is prepared before matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Placement of ingredients that never expire
    #[serde(default)]
    pub null_expiration: NullExpirationPolicy,
    /// Keep ingredients whose expiration has already passed
    #[serde(default)]
    pub include_expired: bool,
}

/// Recipes whose ingredients are all in `ingredients`, in catalog order
///
/// `ingredients` is used as given; callers sort it first if they care about
/// presentation order.
pub fn find_recipes(recipes: &Recipes, ingredients: &Ingredients) -> Recipes {
    recipes
        .iter()
        .filter(|recipe| {
            recipe
                .ingredient_names()
                .all(|name| ingredients.contains(name))
        })
        .cloned()
        .collect()
}

/// The inventory as it should be presented: usable items, soonest expiry first
pub fn prepare_ingredients(
    ingredients: Ingredients,
    options: &MatchOptions,
    now: DateTime<Utc>,
) -> Ingredients {
    let ingredients = if options.include_expired {
        ingredients
    } else {
        ingredients.fresh_at(now)
    };
    ingredients.sort_by_expiration(options.null_expiration)
}

/// Recipes that can be cooked right now from what is in the house
pub fn list_recipes<I, R>(
    ingredient_source: &I,
    recipe_source: &R,
    options: &MatchOptions,
    now: DateTime<Utc>,
) -> Result<Recipes>
where
    I: IngredientSource + ?Sized,
    R: RecipeSource + ?Sized,
{
    let ingredients = prepare_ingredients(ingredient_source.ingredients()?, options, now);
    let recipes = recipe_source.recipes()?;
    let found = find_recipes(&recipes, &ingredients);

    debug!(
        "{} of {} recipe(s) satisfiable from {} ingredient(s)",
        found.len(),
        recipes.len(),
        ingredients.len()
    );
    Ok(found)
}

/// Write the inventory, one ingredient per line, soonest expiry first
pub fn list_ingredients<W, I>(
    out: &mut W,
    ingredient_source: &I,
    options: &MatchOptions,
    now: DateTime<Utc>,
) -> Result<()>
where
    W: Write + ?Sized,
    I: IngredientSource + ?Sized,
{
    let ingredients = prepare_ingredients(ingredient_source.ingredients()?, options, now);
    for ingredient in &ingredients {
        writeln!(out, "{}", ingredient.describe_at(now))?;
    }
    Ok(())
}
