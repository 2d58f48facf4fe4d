// src/source.rs

//! Where ingredients and recipes come from
//!
//! Callers depend on these capabilities only. Implementations include the
//! in-memory collections themselves (useful as stubs), [`SourceFn`] for
//! closures, the durable repositories and the remote recipe client.

use crate::error::Result;
use crate::ingredient::Ingredients;
use crate::recipe::{Recipe, Recipes};

/// Anything that can list the ingredients currently in the house
pub trait IngredientSource {
    fn ingredients(&self) -> Result<Ingredients>;
}

/// Anything that can list known recipes
pub trait RecipeSource {
    fn recipes(&self) -> Result<Recipes>;
}

/// A recipe source that can also be modified
pub trait RecipeCatalog: RecipeSource {
    fn add(&self, recipe: Recipe) -> Result<()>;

    /// Remove every recipe with this name, returning how many were removed
    fn delete(&self, name: &str) -> Result<usize>;
}

impl IngredientSource for Ingredients {
    fn ingredients(&self) -> Result<Ingredients> {
        Ok(self.clone())
    }
}

impl RecipeSource for Recipes {
    fn recipes(&self) -> Result<Recipes> {
        Ok(self.clone())
    }
}

/// Adapts a closure into a source
///
/// ```
/// use cookme::{Ingredient, IngredientSource, Ingredients, Result, SourceFn};
///
/// let source = SourceFn(|| -> Result<Ingredients> {
///     Ok(Ingredients::from(vec![Ingredient::non_perishable("Salt")]))
/// });
/// assert_eq!(source.ingredients().unwrap().len(), 1);
/// ```
pub struct SourceFn<F>(pub F);

impl<F> IngredientSource for SourceFn<F>
where
    F: Fn() -> Result<Ingredients>,
{
    fn ingredients(&self) -> Result<Ingredients> {
        (self.0)()
    }
}

impl<F> RecipeSource for SourceFn<F>
where
    F: Fn() -> Result<Recipes>,
{
    fn recipes(&self) -> Result<Recipes> {
        (self.0)()
    }
}

impl<T: IngredientSource + ?Sized> IngredientSource for Box<T> {
    fn ingredients(&self) -> Result<Ingredients> {
        (**self).ingredients()
    }
}

impl<T: RecipeSource + ?Sized> RecipeSource for Box<T> {
    fn recipes(&self) -> Result<Recipes> {
        (**self).recipes()
    }
}

impl<T: RecipeCatalog + ?Sized> RecipeCatalog for Box<T> {
    fn add(&self, recipe: Recipe) -> Result<()> {
        (**self).add(recipe)
    }

    fn delete(&self, name: &str) -> Result<usize> {
        (**self).delete(name)
    }
}
