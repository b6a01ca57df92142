//! `reqwest` client for the remote recipe service.

use async_trait::async_trait;
use recipebox_core::models::recipe::{Recipe, RecipeId, RecipePage};
use recipebox_core::{AppError, RecipeApi};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// HTTP implementation of [`RecipeApi`].
pub struct HttpRecipeApi {
    client: reqwest::Client,
    server: String,
}

impl HttpRecipeApi {
    /// Build a client for `server` with a per-request `timeout`.
    ///
    /// # Errors
    /// Returns [`AppError::Transport`] when the HTTP client cannot be built.
    pub fn new(server: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            server: normalize_server(server),
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        api_url(&self.server, segments).map_err(AppError::BadRequest)
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<reqwest::Response, AppError> {
        let res = request.send().await.map_err(transport)?;
        let status = res.status();
        tracing::debug!(action, status = status.as_u16(), "recipe service response");
        if status.is_success() {
            return Ok(res);
        }
        let body = match res.text().await {
            Ok(body) => body,
            Err(err) => format!("failed to read error response body: {}", err),
        };
        Err(AppError::Remote {
            status: status.as_u16(),
            message: error_message_for_response(status, &body),
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> Result<T, AppError> {
        let res = self.send(request, action).await?;
        let bytes = res.bytes().await.map_err(transport)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn page(&self, request: RequestBuilder, action: &str) -> Result<Vec<Recipe>, AppError> {
        let page: RecipePage = self.send_json(request, action).await?;
        Ok(page.recipes)
    }
}

fn transport(err: reqwest::Error) -> AppError {
    AppError::Transport(err.to_string())
}

/// Pick the most useful message out of an error response body.
///
/// The service reports errors as `{"message": "..."}`.
pub(crate) fn error_message_for_response(status: StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(body)
            .to_string();
    }

    body.to_string()
}

/// Append percent-encoded path `segments` to the `server` base URL.
pub(crate) fn api_url(server: &str, segments: &[&str]) -> Result<Url, String> {
    let mut url =
        Url::parse(server).map_err(|err| format!("Invalid server URL '{}': {}", server, err))?;
    let mut path = url
        .path_segments_mut()
        .map_err(|_| "Server URL cannot be used as an API base".to_string())?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment);
    }
    drop(path);
    Ok(url)
}

/// Trim whitespace and trailing slashes from a server URL.
pub(crate) fn normalize_server(server: &str) -> String {
    let mut normalized = server.trim().to_string();
    while normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn list(&self, limit: Option<usize>) -> Result<Vec<Recipe>, AppError> {
        // The service treats `limit=0` as "no limit".
        let limit = limit.unwrap_or(0);
        let url = self.endpoint(&["recipes"])?;
        self.page(self.client.get(url).query(&[("limit", limit)]), "list")
            .await
    }

    async fn search(&self, query: &str) -> Result<Vec<Recipe>, AppError> {
        let url = self.endpoint(&["recipes", "search"])?;
        self.page(self.client.get(url).query(&[("q", query)]), "search")
            .await
    }

    async fn by_meal_type(&self, meal: &str) -> Result<Vec<Recipe>, AppError> {
        let url = self.endpoint(&["recipes", "meal-type", meal])?;
        self.page(self.client.get(url), "meal-type").await
    }

    async fn create(&self, recipe: &Recipe) -> Result<Recipe, AppError> {
        let url = self.endpoint(&["recipes", "add"])?;
        self.send_json(self.client.post(url).json(recipe), "create")
            .await
    }

    async fn update(&self, id: RecipeId, recipe: &Recipe) -> Result<Recipe, AppError> {
        let id = id.to_string();
        let url = self.endpoint(&["recipes", id.as_str()])?;
        self.send_json(self.client.put(url).json(recipe), "update")
            .await
    }

    async fn delete(&self, id: RecipeId) -> Result<(), AppError> {
        let id = id.to_string();
        let url = self.endpoint(&["recipes", id.as_str()])?;
        self.send(self.client.delete(url), "delete").await?;
        Ok(())
    }
}
