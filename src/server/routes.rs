// src/server/routes.rs
//! Axum router configuration for the recipe server

use crate::remote::{HEALTH_PATH, RECIPES_PATH};
use crate::server::ServerState;
use crate::server::handlers::recipes;
use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared server state type
pub type SharedState = Arc<ServerState>;

/// Create the main application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health_check))
        .route(
            RECIPES_PATH,
            get(recipes::list_recipes).post(recipes::add_recipe),
        )
        .route("/v1/recipes/:name", delete(recipes::delete_recipe))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{BlobStore, StoreConfig};
    use crate::recipe::{Recipe, RecipeBook};
    use crate::remote::{AddRecipeRequest, DeleteRecipeResponse, ListRecipesResponse, WireRecipe};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app() -> (TempDir, RecipeBook, Router) {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(StoreConfig::new(dir.path().join("server.db"))).unwrap();
        let book = RecipeBook::open(store).unwrap();
        let app = create_router(Arc::new(ServerState::new(book.clone())));
        (dir, book, app)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_dir, _book, app) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_recipes() {
        let (_dir, book, app) = test_app();
        book.add(Recipe::new("Mac and cheese", ["Pasta", "Cheese"]))
            .unwrap();

        let response = app
            .oneshot(Request::builder().uri("/v1/recipes").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: ListRecipesResponse = body_json(response).await;
        assert_eq!(body.recipes.len(), 1);
        assert_eq!(body.recipes[0].name, "Mac and cheese");
        assert_eq!(body.recipes[0].ingredients.len(), 2);
    }

    #[tokio::test]
    async fn test_add_recipe() {
        let (_dir, book, app) = test_app();
        let request = AddRecipeRequest {
            recipe: WireRecipe::from(&Recipe::new("Cheesy milk", ["Milk", "Cheese"])),
        };

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/recipes")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(book.list().unwrap().names(), vec!["Cheesy milk"]);
    }

    #[tokio::test]
    async fn test_delete_recipe_with_encoded_name() {
        let (_dir, book, app) = test_app();
        book.add(Recipe::new("Mac and cheese", ["Pasta", "Cheese"]))
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/v1/recipes/Mac%20and%20cheese")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: DeleteRecipeResponse = body_json(response).await;
        assert_eq!(body.removed, 1);
        assert!(book.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_add_is_rejected() {
        let (_dir, book, app) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/recipes")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"name\": 42}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert!(book.list().unwrap().is_empty());
    }
}
