// src/server/handlers/recipes.rs
//! Recipe catalog handlers

use crate::error::Error;
use crate::recipe::{Recipe, Recipes};
use crate::remote::{
    AddRecipeRequest, AddRecipeResponse, DeleteRecipeResponse, ErrorResponse, ListRecipesResponse,
};
use crate::server::routes::SharedState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info};

/// Error response wrapper mapping catalog errors to HTTP statuses
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            Error::StorageUnavailable { .. } => (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable"),
            Error::VersionConflict { .. } => (StatusCode::CONFLICT, "version_conflict"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        error!("Request failed: {}", self.0);

        let body = ErrorResponse {
            error: code.to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Run a blocking recipe book operation off the async executor
async fn blocking<T, F>(state: SharedState, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&crate::recipe::RecipeBook) -> crate::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state.book))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?
        .map_err(ApiError::from)
}

/// List all recipes
///
/// GET /v1/recipes
pub async fn list_recipes(State(state): State<SharedState>) -> ApiResult<Json<ListRecipesResponse>> {
    let recipes: Recipes = blocking(state, |book| book.list()).await?;
    debug!("Listing {} recipe(s)", recipes.len());
    Ok(Json(ListRecipesResponse::from(&recipes)))
}

/// Add a recipe
///
/// POST /v1/recipes
pub async fn add_recipe(
    State(state): State<SharedState>,
    Json(request): Json<AddRecipeRequest>,
) -> ApiResult<(StatusCode, Json<AddRecipeResponse>)> {
    let recipe = Recipe::from(request.recipe);
    info!("Add recipe request: {}", recipe.name);

    blocking(state, move |book| book.add(recipe)).await?;
    Ok((StatusCode::CREATED, Json(AddRecipeResponse {})))
}

/// Delete recipes by name
///
/// DELETE /v1/recipes/:name
pub async fn delete_recipe(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> ApiResult<Json<DeleteRecipeResponse>> {
    info!("Delete recipe request: {}", name);

    let removed = blocking(state, move |book| book.delete(&name)).await?;
    Ok(Json(DeleteRecipeResponse { removed }))
}
