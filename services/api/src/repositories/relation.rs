//! User-recipe relation repository
//!
//! Favorites and shopping-cart membership are the same join-table toggle
//! over different tables, so the repository is implemented once and
//! parameterized by [`RecipeRelation`]. Existence of a row is membership;
//! adding an existing edge or removing a missing one is a caller error.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::recipe::{RecipeShortView, ShoppingListItem};

/// Kind of user-recipe edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeRelation {
    Favorite,
    ShoppingCart,
}

impl RecipeRelation {
    /// Join table holding this edge kind
    pub fn table(&self) -> &'static str {
        match self {
            RecipeRelation::Favorite => "favorites",
            RecipeRelation::ShoppingCart => "shopping_cart",
        }
    }

    /// Human-readable set name used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            RecipeRelation::Favorite => "favorites",
            RecipeRelation::ShoppingCart => "shopping cart",
        }
    }
}

/// Repository for favorite and shopping-cart edges
#[derive(Clone)]
pub struct RelationRepository {
    pool: PgPool,
}

impl RelationRepository {
    /// Create a new relation repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn short_view(&self, recipe_id: Uuid) -> ApiResult<Option<RecipeShortView>> {
        let view = sqlx::query_as::<_, RecipeShortView>(
            r#"
            SELECT id, name, image, cooking_time
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(view)
    }

    /// Add an edge between a user and a recipe
    ///
    /// Returns the short recipe view on success. Fails with a validation
    /// error when the recipe does not exist or the edge is already present;
    /// the insert is conditional so the store never holds two rows for the
    /// same (user, recipe) pair.
    pub async fn add(
        &self,
        kind: RecipeRelation,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> ApiResult<RecipeShortView> {
        let recipe = self
            .short_view(recipe_id)
            .await?
            .ok_or_else(|| ApiError::Validation("Recipe does not exist".to_string()))?;

        let result = sqlx::query(&format!(
            "INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            kind.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::Validation(format!(
                "Recipe is already in {}",
                kind.describe()
            )));
        }

        info!("Added recipe {} to {} of user {}", recipe_id, kind.describe(), user_id);
        Ok(recipe)
    }

    /// Remove an edge between a user and a recipe
    ///
    /// A missing recipe is 404; a missing edge on an existing recipe is a
    /// validation error.
    pub async fn remove(
        &self,
        kind: RecipeRelation,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> ApiResult<()> {
        if self.short_view(recipe_id).await?.is_none() {
            return Err(ApiError::NotFound("Recipe"));
        }

        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            kind.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::Validation(format!(
                "Recipe is not in {}",
                kind.describe()
            )));
        }

        info!("Removed recipe {} from {} of user {}", recipe_id, kind.describe(), user_id);
        Ok(())
    }

    /// Check whether an edge exists
    pub async fn exists(
        &self,
        kind: RecipeRelation,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> ApiResult<bool> {
        let exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE user_id = $1 AND recipe_id = $2)",
            kind.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Aggregate the ingredients of every recipe in a user's shopping cart
    ///
    /// Amounts are summed per (ingredient name, measurement unit) group;
    /// groups are ordered by name so the rendered report is stable.
    pub async fn shopping_list(&self, user_id: Uuid) -> ApiResult<Vec<ShoppingListItem>> {
        let items = sqlx::query_as::<_, ShoppingListItem>(
            r#"
            SELECT i.name, i.measurement_unit, SUM(ri.amount)::bigint AS total_amount
            FROM shopping_cart sc
            INNER JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
            INNER JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sc.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
