// SPDX-License-Identifier: MIT

//! Recipe search API client (Spoonacular).
//!
//! Handles:
//! - Free-text search with recipe information inlined
//! - Per-recipe detail fetch (instructions and ingredient lines)
//! - Quota/auth failure detection on responses

use crate::error::AppError;
use crate::models::{Recipe, RecipeDetail, RecipeId, RecipeSource};
use serde::Deserialize;

/// Number of results requested per search.
const SEARCH_PAGE_SIZE: u32 = 20;

/// Recipe search API client.
#[derive(Clone)]
pub struct SpoonacularClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SpoonacularClient {
    /// Create a new client against a base URL (overridable for tests).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Search recipes by free-text query.
    ///
    /// A blank or whitespace-only query returns an empty list without
    /// issuing a request.
    pub async fn search(&self, query: &str) -> Result<Vec<Recipe>, AppError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/recipes/complexSearch", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("query", query),
                ("addRecipeInformation", "true"),
                ("number", &SEARCH_PAGE_SIZE.to_string()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::RecipeApi(e.to_string()))?;

        let body: SearchResponse = self.check_response_json(response).await?;
        Ok(body
            .results
            .into_iter()
            .map(ApiRecipe::into_summary)
            .collect())
    }

    /// Fetch full information for an externally-sourced recipe.
    pub async fn recipe_information(&self, id: u64) -> Result<RecipeDetail, AppError> {
        let url = format!("{}/recipes/{}/information", self.base_url, id);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("includeNutrition", "false"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::RecipeApi(e.to_string()))?;

        let body: ApiRecipeDetail = self.check_response_json(response).await?;
        Ok(body.into_detail())
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // Daily points quota exhausted
            if status.as_u16() == 402 {
                tracing::warn!("Recipe API quota exhausted (402)");
            }
            if status.as_u16() == 401 {
                tracing::warn!("Recipe API rejected the API key (401)");
            }

            return Err(AppError::RecipeApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::RecipeApi(format!("JSON parse error: {}", e)))
    }
}

/// Search endpoint response envelope.
#[derive(Debug, Clone, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ApiRecipe>,
}

/// Recipe summary as returned by the search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRecipe {
    id: u64,
    title: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    ready_in_minutes: Option<u32>,
    #[serde(default)]
    summary: String,
}

impl ApiRecipe {
    fn into_summary(self) -> Recipe {
        Recipe {
            id: RecipeId::External(self.id),
            title: self.title,
            image: self.image,
            ready_in_minutes: self.ready_in_minutes,
            summary: self.summary,
            source: RecipeSource::Api,
            ingredients: None,
            instructions: None,
            created_by: None,
            created_at: None,
        }
    }
}

/// Detailed recipe response from the information endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRecipeDetail {
    id: u64,
    title: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    ready_in_minutes: Option<u32>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    instructions: Option<String>,
    #[serde(default)]
    extended_ingredients: Vec<ApiIngredient>,
}

/// One ingredient line descriptor.
#[derive(Debug, Clone, Deserialize)]
struct ApiIngredient {
    #[serde(default)]
    original: String,
}

impl ApiRecipeDetail {
    fn into_detail(self) -> RecipeDetail {
        RecipeDetail {
            id: RecipeId::External(self.id),
            title: self.title,
            image: self.image,
            ready_in_minutes: self.ready_in_minutes,
            summary: self.summary,
            instructions: self.instructions.unwrap_or_default(),
            // The API may omit the ingredient list entirely
            ingredients: self
                .extended_ingredients
                .into_iter()
                .map(|ingredient| ingredient.original)
                .collect(),
            source: RecipeSource::Api,
        }
    }
}
