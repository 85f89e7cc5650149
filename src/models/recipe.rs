// SPDX-License-Identifier: MIT

//! Recipe models: view models, the stored Firestore document, and the
//! submission form.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::Validate;

/// Recipe identity. Two id spaces coexist: numeric ids minted by the
/// external recipe API and string document ids minted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecipeId {
    /// Numeric id from the external recipe API.
    External(u64),
    /// Firestore document id of a user-authored recipe.
    Owned(String),
}

impl RecipeId {
    /// String form used as the favorites storage key.
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipeId::External(id) => write!(f, "{}", id),
            RecipeId::Owned(id) => write!(f, "{}", id),
        }
    }
}

impl std::str::FromStr for RecipeId {
    type Err = std::convert::Infallible;

    /// Revive an id from its string key: numeric keys are external ids,
    /// everything else is a store document id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(id) => RecipeId::External(id),
            Err(_) => RecipeId::Owned(s.to_string()),
        })
    }
}

impl Serialize for RecipeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RecipeId::External(id) => serializer.serialize_u64(*id),
            RecipeId::Owned(id) => serializer.serialize_str(id),
        }
    }
}

impl<'de> Deserialize<'de> for RecipeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(id) => RecipeId::External(id),
            Raw::Text(id) => RecipeId::Owned(id),
        })
    }
}

/// Where a recipe record came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeSource {
    /// External recipe API.
    #[default]
    Api,
    /// User-authored, as listed from a live feed.
    User,
    /// User-authored, as stored in Firestore.
    Firebase,
}

/// Recipe summary as rendered in feeds and search results.
///
/// Store-sourced recipes already carry their detail fields; API-sourced
/// summaries fetch them lazily (see the detail merge policy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub image: String,
    pub ready_in_minutes: Option<u32>,
    pub summary: String,
    pub source: RecipeSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<CreatedBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Recipe {
    /// Map a stored document into the feed view model.
    ///
    /// Returns `None` when the document id was not captured (a document
    /// that never round-tripped through the store).
    pub fn from_stored(stored: StoredRecipe) -> Option<Self> {
        let doc_id = stored.doc_id?;
        Some(Self {
            id: RecipeId::Owned(doc_id),
            title: stored.title,
            image: stored.image_url,
            ready_in_minutes: stored.ready_in_minutes.or(Some(30)),
            summary: stored.summary,
            source: RecipeSource::User,
            ingredients: Some(stored.ingredients),
            instructions: Some(stored.instructions),
            created_by: Some(stored.created_by),
            created_at: Some(stored.created_at),
        })
    }

    /// Summary text with HTML markup stripped.
    pub fn plain_summary(&self) -> String {
        crate::text::strip_html(&self.summary)
    }

    /// Card-length summary: stripped and truncated to 100 characters.
    pub fn short_summary(&self) -> String {
        crate::text::truncate(&self.plain_summary(), 100)
    }
}

/// Full recipe detail as rendered on the detail screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: RecipeId,
    pub title: String,
    pub image: String,
    pub ready_in_minutes: Option<u32>,
    pub summary: String,
    pub instructions: String,
    /// Ordered free-text ingredient lines.
    pub ingredients: Vec<String>,
    pub source: RecipeSource,
}

impl RecipeDetail {
    /// Build detail from a store-sourced summary without a remote fetch:
    /// those records already carry instructions and ingredients.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            image: recipe.image.clone(),
            ready_in_minutes: recipe.ready_in_minutes,
            summary: recipe.summary.clone(),
            instructions: recipe.instructions.clone().unwrap_or_default(),
            ingredients: split_ingredient_lines(recipe.ingredients.as_deref().unwrap_or_default()),
            source: recipe.source,
        }
    }

    /// Instructions with HTML markup stripped.
    pub fn plain_instructions(&self) -> String {
        crate::text::strip_html(&self.instructions)
    }
}

/// Author stamp on a stored recipe document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedBy {
    pub uid: String,
    pub display_name: String,
}

/// Recipe document in the `recipes` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecipe {
    /// Document id, captured on reads. Never written as a field.
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub doc_id: Option<String>,
    pub title: String,
    pub summary: String,
    pub image_url: String,
    /// Single free-text blob, one ingredient per line.
    pub ingredients: String,
    pub instructions: String,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    pub source: RecipeSource,
    pub created_by: CreatedBy,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Partial update written when editing an owned recipe. Exactly these
/// fields change; author and creation stamps are never touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub title: String,
    pub summary: String,
    pub image_url: String,
    pub ingredients: String,
    pub instructions: String,
    pub updated_at: String,
}

/// Recipe submission form. Validation is non-empty fields only; anything
/// further is the caller's responsibility.
#[derive(Debug, Clone, Default, Validate)]
pub struct RecipeForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Summary is required"))]
    pub summary: String,
    #[validate(length(min = 1, message = "Image URL is required"))]
    pub image_url: String,
    #[validate(length(min = 1, message = "Ingredients are required"))]
    pub ingredients: String,
    #[validate(length(min = 1, message = "Instructions are required"))]
    pub instructions: String,
}

/// Split a stored ingredient blob into display lines. Newlines win;
/// comma-separated blobs are split as a fallback.
pub fn split_ingredient_lines(text: &str) -> Vec<String> {
    let separator = if text.contains('\n') { '\n' } else { ',' };
    text.split(separator)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_id_key_round_trip() {
        let external = RecipeId::External(42);
        assert_eq!(external.as_key(), "42");
        assert_eq!("42".parse::<RecipeId>().unwrap(), external);

        let owned = RecipeId::Owned("xK3f9aB".to_string());
        assert_eq!(owned.as_key(), "xK3f9aB");
        assert_eq!("xK3f9aB".parse::<RecipeId>().unwrap(), owned);
    }

    #[test]
    fn test_recipe_id_serde_shapes() {
        let external = serde_json::to_string(&RecipeId::External(7)).unwrap();
        assert_eq!(external, "7");

        let owned = serde_json::to_string(&RecipeId::Owned("abc".to_string())).unwrap();
        assert_eq!(owned, "\"abc\"");

        let back: RecipeId = serde_json::from_str("7").unwrap();
        assert_eq!(back, RecipeId::External(7));
        let back: RecipeId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, RecipeId::Owned("abc".to_string()));
    }

    #[test]
    fn test_from_stored_requires_doc_id() {
        let stored = sample_stored(None);
        assert!(Recipe::from_stored(stored).is_none());

        let stored = sample_stored(Some("doc1".to_string()));
        let recipe = Recipe::from_stored(stored).unwrap();
        assert_eq!(recipe.id, RecipeId::Owned("doc1".to_string()));
        assert_eq!(recipe.source, RecipeSource::User);
        // Documents without a stored duration read as 30 minutes.
        assert_eq!(recipe.ready_in_minutes, Some(30));
    }

    #[test]
    fn test_detail_from_owned_recipe_skips_fetch_fields() {
        let stored = sample_stored(Some("doc1".to_string()));
        let recipe = Recipe::from_stored(stored).unwrap();
        let detail = RecipeDetail::from_recipe(&recipe);
        assert_eq!(detail.ingredients, vec!["2 eggs", "1 cup flour"]);
        assert_eq!(detail.instructions, "Mix and bake.");
    }

    #[test]
    fn test_split_ingredient_lines() {
        assert_eq!(
            split_ingredient_lines("2 eggs\n1 cup flour\n"),
            vec!["2 eggs", "1 cup flour"]
        );
        assert_eq!(
            split_ingredient_lines("salt, pepper, thyme"),
            vec!["salt", "pepper", "thyme"]
        );
        assert!(split_ingredient_lines("").is_empty());
    }

    #[test]
    fn test_form_rejects_empty_fields() {
        let form = RecipeForm {
            title: "Soup".to_string(),
            ..RecipeForm::default()
        };
        assert!(form.validate().is_err());

        let form = RecipeForm {
            title: "Soup".to_string(),
            summary: "A soup".to_string(),
            image_url: "https://example.com/soup.jpg".to_string(),
            ingredients: "water".to_string(),
            instructions: "Boil.".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    fn sample_stored(doc_id: Option<String>) -> StoredRecipe {
        StoredRecipe {
            doc_id,
            title: "Pancakes".to_string(),
            summary: "Fluffy pancakes".to_string(),
            image_url: "https://example.com/p.jpg".to_string(),
            ingredients: "2 eggs\n1 cup flour".to_string(),
            instructions: "Mix and bake.".to_string(),
            ready_in_minutes: None,
            source: RecipeSource::Firebase,
            created_by: CreatedBy {
                uid: "u1".to_string(),
                display_name: "Test Cook".to_string(),
            },
            created_at: "2024-01-15T10:00:00Z".to_string(),
            updated_at: None,
        }
    }
}
