//! Recipe models and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::tag::Tag;
use crate::models::user::UserView;

/// Recipe entity
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// One (ingredient, amount) entry of a recipe payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub id: Uuid,
    pub amount: i32,
}

/// Recipe creation payload
///
/// The image travels as an opaque string (base64 in, URL out); decoding and
/// storage are outside the core.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub tags: Vec<Uuid>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Recipe update payload
///
/// Scalar fields may be omitted to keep their current values, but the tag
/// and ingredient sets are mandatory: an update always replaces both sets
/// in full, partial association updates are not supported.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecipe {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub tags: Option<Vec<Uuid>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
}

/// Ingredient entry of a full recipe view
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeIngredientView {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Full recipe view
#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: Uuid,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Short recipe view used by favorite/cart responses and subscription embeds
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeShortView {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

/// Query parameters for recipe listings
///
/// `tags` may be given multiple times and matches with OR semantics across
/// the provided slugs. The boolean filters accept `1`/`true` and restrict
/// the listing to the viewer's favorite/cart set; they are no-ops for
/// anonymous viewers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub author: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

/// Interpret a `1`/`true` style query flag
pub fn flag_is_set(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("1") | Some("true") | Some("True"))
}

/// One aggregated line of a shopping list
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_is_set() {
        assert!(flag_is_set(&Some("1".to_string())));
        assert!(flag_is_set(&Some("true".to_string())));
        assert!(!flag_is_set(&Some("0".to_string())));
        assert!(!flag_is_set(&Some("false".to_string())));
        assert!(!flag_is_set(&None));
    }

    #[test]
    fn test_recipe_view_serializes_expected_fields() {
        let view = RecipeView {
            id: Uuid::new_v4(),
            tags: vec![],
            author: UserView {
                id: Uuid::new_v4(),
                email: "anna@example.com".to_string(),
                username: "chef_anna".to_string(),
                first_name: "Anna".to_string(),
                last_name: "Smith".to_string(),
                is_subscribed: false,
            },
            ingredients: vec![],
            is_favorited: false,
            is_in_shopping_cart: false,
            name: "Borscht".to_string(),
            image: "recipes/images/borscht.png".to_string(),
            text: "Beet soup".to_string(),
            cooking_time: 90,
        };

        let value = serde_json::to_value(&view).unwrap();
        for field in [
            "id",
            "tags",
            "author",
            "ingredients",
            "is_favorited",
            "is_in_shopping_cart",
            "name",
            "image",
            "text",
            "cooking_time",
        ] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
    }

    #[test]
    fn test_update_recipe_without_associations_deserializes() {
        let payload: UpdateRecipe = serde_json::from_str(r#"{"name": "Renamed"}"#).unwrap();
        assert_eq!(payload.name.as_deref(), Some("Renamed"));
        assert!(payload.tags.is_none());
        assert!(payload.ingredients.is_none());
    }
}
