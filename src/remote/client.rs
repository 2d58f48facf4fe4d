// src/remote/client.rs

//! Blocking HTTP client for a remote recipe catalog
//!
//! The client probes the server once when it is created and fails fast if it
//! cannot reach it. There is no retry or backoff: a failed call is reported
//! to the caller as `RemoteCallFailure`.

use super::{
    AddRecipeRequest, AddRecipeResponse, DeleteRecipeResponse, ErrorResponse, HEALTH_PATH,
    ListRecipesResponse, RECIPES_PATH, WireRecipe,
};
use crate::error::{Error, Result};
use crate::recipe::{Recipe, Recipes};
use crate::source::{RecipeCatalog, RecipeSource};
use reqwest::blocking::{Client, Response};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default timeout for each request to the recipe server
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

/// A recipe catalog served by another process
#[derive(Debug, Clone)]
pub struct RecipeClient {
    client: Client,
    base: Url,
}

impl RecipeClient {
    /// Connect to the recipe server at `endpoint` (e.g. `http://127.0.0.1:5000`)
    pub fn connect(endpoint: &str, timeout: Duration) -> Result<Self> {
        let unreachable = |reason: String| Error::RemoteUnreachable {
            endpoint: endpoint.to_string(),
            reason,
        };

        let base = Url::parse(endpoint).map_err(|e| unreachable(format!("invalid URL: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(unreachable(format!(
                "unsupported scheme '{}'",
                base.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cookme/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| unreachable(format!("failed to create HTTP client: {e}")))?;

        let this = Self { client, base };
        let probe = this.url(&[HEALTH_PATH.trim_start_matches('/')])?;
        let response = this
            .client
            .get(probe)
            .send()
            .map_err(|e| unreachable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(unreachable(format!(
                "health check returned HTTP {}",
                response.status()
            )));
        }

        info!("Connected to recipe server at {}", this.base);
        Ok(this)
    }

    pub fn endpoint(&self) -> &Url {
        &self.base
    }

    /// List all recipes known to the server
    pub fn list(&self) -> Result<Recipes> {
        const OP: &str = "list recipes";
        let response = self
            .client
            .get(self.recipes_url(OP, None)?)
            .send()
            .map_err(|e| call_failed(OP, e))?;
        let body: ListRecipesResponse = check(OP, response)?
            .json()
            .map_err(|e| call_failed(OP, e))?;

        debug!("Received {} recipe(s) from {}", body.recipes.len(), self.base);
        Ok(body.into())
    }

    /// Add a recipe to the server's catalog
    pub fn add(&self, recipe: &Recipe) -> Result<()> {
        const OP: &str = "add recipe";
        let request = AddRecipeRequest {
            recipe: WireRecipe::from(recipe),
        };
        let response = self
            .client
            .post(self.recipes_url(OP, None)?)
            .json(&request)
            .send()
            .map_err(|e| call_failed(OP, e))?;
        let _ack: AddRecipeResponse = check(OP, response)?
            .json()
            .map_err(|e| call_failed(OP, e))?;

        debug!("Added recipe '{}' on {}", recipe.name, self.base);
        Ok(())
    }

    /// Delete every recipe with this name on the server
    pub fn delete(&self, name: &str) -> Result<usize> {
        const OP: &str = "delete recipe";
        let response = self
            .client
            .delete(self.recipes_url(OP, Some(name))?)
            .send()
            .map_err(|e| call_failed(OP, e))?;
        let body: DeleteRecipeResponse = check(OP, response)?
            .json()
            .map_err(|e| call_failed(OP, e))?;
        Ok(body.removed)
    }

    fn recipes_url(&self, operation: &'static str, name: Option<&str>) -> Result<Url> {
        let mut segments: Vec<&str> = RECIPES_PATH.trim_start_matches('/').split('/').collect();
        segments.extend(name);
        self.url(&segments).map_err(|e| Error::RemoteCallFailure {
            operation,
            reason: e.to_string(),
        })
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::RemoteUnreachable {
                endpoint: self.base.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn call_failed(operation: &'static str, err: reqwest::Error) -> Error {
    Error::RemoteCallFailure {
        operation,
        reason: err.to_string(),
    }
}

/// Turn a non-success response into `RemoteCallFailure`, using the server's message if present
fn check(operation: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let reason = match response.json::<ErrorResponse>() {
        Ok(body) => format!("HTTP {}: {} ({})", status, body.message, body.error),
        Err(_) => format!("HTTP {}", status),
    };
    Err(Error::RemoteCallFailure { operation, reason })
}

impl RecipeSource for RecipeClient {
    fn recipes(&self) -> Result<Recipes> {
        self.list()
    }
}

impl RecipeCatalog for RecipeClient {
    fn add(&self, recipe: Recipe) -> Result<()> {
        RecipeClient::add(self, &recipe)
    }

    fn delete(&self, name: &str) -> Result<usize> {
        RecipeClient::delete(self, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_endpoint_is_unreachable() {
        let err = RecipeClient::connect("not a url", DEFAULT_REMOTE_TIMEOUT).unwrap_err();
        assert!(matches!(err, Error::RemoteUnreachable { .. }));

        let err = RecipeClient::connect("ftp://127.0.0.1:5000", DEFAULT_REMOTE_TIMEOUT).unwrap_err();
        assert!(matches!(err, Error::RemoteUnreachable { .. }));
    }

    #[test]
    fn test_closed_port_is_unreachable() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let err = RecipeClient::connect(
            &format!("http://127.0.0.1:{port}"),
            Duration::from_millis(500),
        )
        .unwrap_err();
        assert!(matches!(err, Error::RemoteUnreachable { .. }), "got {err}");
    }
}
