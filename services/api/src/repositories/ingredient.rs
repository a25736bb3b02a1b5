//! Ingredient repository for database operations

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::ingredient::Ingredient;

/// Ingredient repository
#[derive(Clone)]
pub struct IngredientRepository {
    pool: PgPool,
}

impl IngredientRepository {
    /// Create a new ingredient repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List ingredients, optionally restricted to a case-insensitive name
    /// prefix
    ///
    /// The prefix is matched literally; `ILIKE` metacharacters in it do not
    /// act as wildcards.
    pub async fn list(&self, name_prefix: Option<&str>) -> ApiResult<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, measurement_unit
            FROM ingredients
            WHERE $1::text IS NULL OR name ILIKE $1 || '%'
            ORDER BY name
            "#,
        )
        .bind(name_prefix.map(escape_like_prefix))
        .fetch_all(&self.pool)
        .await?;

        Ok(ingredients)
    }

    /// Get an ingredient by ID
    pub async fn get_by_id(&self, id: Uuid) -> ApiResult<Option<Ingredient>> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, measurement_unit
            FROM ingredients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ingredient)
    }
}

/// Escape `%`, `_`, and `\` so the bound value matches as a literal prefix
fn escape_like_prefix(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_prefix_leaves_plain_text_alone() {
        assert_eq!(escape_like_prefix("flour"), "flour");
    }

    #[test]
    fn test_escape_like_prefix_escapes_wildcards() {
        assert_eq!(escape_like_prefix("%"), "\\%");
        assert_eq!(escape_like_prefix("_salt"), "\\_salt");
        assert_eq!(escape_like_prefix("a%b_c"), "a\\%b\\_c");
    }

    #[test]
    fn test_escape_like_prefix_escapes_backslash() {
        assert_eq!(escape_like_prefix("a\\b"), "a\\\\b");
    }
}
