//! Ingredient models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ingredient entity
///
/// Reference data, not owned by any user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

/// Query parameters for ingredient search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientQuery {
    /// Name prefix to match, case-insensitive
    pub name: Option<String>,
}
