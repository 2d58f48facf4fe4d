// src/remote/mod.rs

//! Remote recipe catalog protocol
//!
//! Stateless JSON request/response over HTTP. Only ingredient names travel
//! over the wire; expiration data stays with the local inventory.
//!
//! | Operation    | Request                      | Response                 |
//! |--------------|------------------------------|--------------------------|
//! | health probe | `GET /health`                | `OK`                     |
//! | list recipes | `GET /v1/recipes`            | [`ListRecipesResponse`]  |
//! | add recipe   | `POST /v1/recipes`           | `201` [`AddRecipeResponse`] |
//! | delete       | `DELETE /v1/recipes/{name}`  | [`DeleteRecipeResponse`] |
//!
//! Failures carry an [`ErrorResponse`] body.

mod client;

pub use client::{DEFAULT_REMOTE_TIMEOUT, RecipeClient};

use crate::recipe::{Recipe, RecipeIngredient, Recipes};
use serde::{Deserialize, Serialize};

/// Path of the recipe collection resource
pub const RECIPES_PATH: &str = "/v1/recipes";

/// Path of the liveness probe
pub const HEALTH_PATH: &str = "/health";

/// An ingredient as sent over the wire: a name and nothing else
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireIngredient {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecipe {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<WireIngredient>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecipesResponse {
    #[serde(default)]
    pub recipes: Vec<WireRecipe>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRecipeRequest {
    pub recipe: WireRecipe,
}

/// Acknowledgement of an added recipe; carries no payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRecipeResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRecipeResponse {
    pub removed: usize,
}

/// Body of every non-success response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<&Recipe> for WireRecipe {
    fn from(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            ingredients: recipe
                .ingredients
                .iter()
                .map(|i| WireIngredient {
                    name: i.name.clone(),
                })
                .collect(),
        }
    }
}

impl From<WireRecipe> for Recipe {
    fn from(wire: WireRecipe) -> Self {
        Self {
            name: wire.name,
            ingredients: wire
                .ingredients
                .into_iter()
                .map(|i| RecipeIngredient::new(i.name))
                .collect(),
        }
    }
}

impl From<&Recipes> for ListRecipesResponse {
    fn from(recipes: &Recipes) -> Self {
        Self {
            recipes: recipes.iter().map(WireRecipe::from).collect(),
        }
    }
}

impl From<ListRecipesResponse> for Recipes {
    fn from(response: ListRecipesResponse) -> Self {
        response.recipes.into_iter().map(Recipe::from).collect()
    }
}
