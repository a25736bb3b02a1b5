//! Recipe repository for database operations
//!
//! A recipe and its tag/ingredient associations form one aggregate: create
//! and update run in a single transaction so no request ever observes a
//! recipe with a partial association set. Updates replace both association
//! sets in full.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::recipe::{
    IngredientAmount, NewRecipe, Recipe, RecipeIngredientView, RecipeShortView, UpdateRecipe,
};
use crate::models::tag::Tag;

/// Recipe repository
#[derive(Clone)]
pub struct RecipeRepository {
    pool: PgPool,
}

impl RecipeRepository {
    /// Create a new recipe repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a recipe by ID
    pub async fn get_by_id(&self, id: Uuid) -> ApiResult<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, author_id, name, text, image, cooking_time, created_at
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(recipe)
    }

    /// Create a recipe with its full tag and ingredient sets
    ///
    /// The recipe row, the tag links, and the bulk-inserted ingredient rows
    /// commit together or not at all.
    pub async fn create(&self, author_id: Uuid, payload: &NewRecipe) -> ApiResult<Recipe> {
        let mut tx = self.pool.begin().await?;

        check_tags_exist(&mut tx, &payload.tags).await?;
        let ingredient_ids: Vec<Uuid> = payload.ingredients.iter().map(|entry| entry.id).collect();
        check_ingredients_exist(&mut tx, &ingredient_ids).await?;

        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (author_id, name, text, image, cooking_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, author_id, name, text, image, cooking_time, created_at
            "#,
        )
        .bind(author_id)
        .bind(&payload.name)
        .bind(&payload.text)
        .bind(&payload.image)
        .bind(payload.cooking_time)
        .fetch_one(&mut *tx)
        .await?;

        insert_tag_links(&mut tx, recipe.id, &payload.tags).await?;
        insert_ingredient_links(&mut tx, recipe.id, &payload.ingredients).await?;

        tx.commit().await?;

        info!("User {} created recipe {}", author_id, recipe.id);
        Ok(recipe)
    }

    /// Update a recipe, replacing its tag and ingredient sets in full
    ///
    /// Old ingredient rows are deleted and the new set bulk-inserted inside
    /// the same transaction that updates the scalar fields; `created_at` is
    /// never touched. Only the author may update.
    pub async fn update(
        &self,
        recipe_id: Uuid,
        actor_id: Uuid,
        payload: &UpdateRecipe,
        tags: &[Uuid],
        ingredients: &[IngredientAmount],
    ) -> ApiResult<Recipe> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, author_id, name, text, image, cooking_time, created_at
            FROM recipes
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(recipe_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound("Recipe"))?;

        if current.author_id != actor_id {
            return Err(ApiError::Forbidden);
        }

        check_tags_exist(&mut tx, tags).await?;
        let ingredient_ids: Vec<Uuid> = ingredients.iter().map(|entry| entry.id).collect();
        check_ingredients_exist(&mut tx, &ingredient_ids).await?;

        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            UPDATE recipes
            SET name = $2, text = $3, image = $4, cooking_time = $5
            WHERE id = $1
            RETURNING id, author_id, name, text, image, cooking_time, created_at
            "#,
        )
        .bind(recipe_id)
        .bind(payload.name.as_deref().unwrap_or(&current.name))
        .bind(payload.text.as_deref().unwrap_or(&current.text))
        .bind(payload.image.as_deref().unwrap_or(&current.image))
        .bind(payload.cooking_time.unwrap_or(current.cooking_time))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;

        insert_tag_links(&mut tx, recipe_id, tags).await?;
        insert_ingredient_links(&mut tx, recipe_id, ingredients).await?;

        tx.commit().await?;

        info!("User {} updated recipe {}", actor_id, recipe_id);
        Ok(recipe)
    }

    /// Delete a recipe
    ///
    /// Only the author may delete; favorite, cart, tag, and ingredient rows
    /// go with it through the cascading foreign keys.
    pub async fn delete(&self, recipe_id: Uuid, actor_id: Uuid) -> ApiResult<()> {
        let recipe = self
            .get_by_id(recipe_id)
            .await?
            .ok_or(ApiError::NotFound("Recipe"))?;

        if recipe.author_id != actor_id {
            return Err(ApiError::Forbidden);
        }

        sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;

        info!("User {} deleted recipe {}", actor_id, recipe_id);
        Ok(())
    }

    /// List recipes newest-first with filtering and pagination
    ///
    /// Filters: exact author match, OR semantics across tag slugs, and
    /// viewer-relative favorite/cart restrictions. The viewer-relative
    /// filters are no-ops when `viewer` is `None`. The total is counted
    /// separately with the same predicates, so it stays correct even when
    /// the requested page is past the last row.
    pub async fn list(
        &self,
        author: Option<Uuid>,
        tag_slugs: &[String],
        only_favorited: bool,
        only_in_cart: bool,
        viewer: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<Recipe>, i64)> {
        let only_favorited = only_favorited && viewer.is_some();
        let only_in_cart = only_in_cart && viewer.is_some();

        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT r.id, r.author_id, r.name, r.text, r.image, r.cooking_time, r.created_at
            FROM recipes r
            WHERE ($1::uuid IS NULL OR r.author_id = $1)
              AND (cardinality($2::text[]) = 0 OR EXISTS (
                    SELECT 1 FROM recipe_tags rt
                    INNER JOIN tags t ON t.id = rt.tag_id
                    WHERE rt.recipe_id = r.id AND t.slug = ANY($2)))
              AND (NOT $3::bool OR EXISTS (
                    SELECT 1 FROM favorites f
                    WHERE f.recipe_id = r.id AND f.user_id = $4))
              AND (NOT $5::bool OR EXISTS (
                    SELECT 1 FROM shopping_cart sc
                    WHERE sc.recipe_id = r.id AND sc.user_id = $4))
            ORDER BY r.created_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(author)
        .bind(tag_slugs)
        .bind(only_favorited)
        .bind(viewer)
        .bind(only_in_cart)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM recipes r
            WHERE ($1::uuid IS NULL OR r.author_id = $1)
              AND (cardinality($2::text[]) = 0 OR EXISTS (
                    SELECT 1 FROM recipe_tags rt
                    INNER JOIN tags t ON t.id = rt.tag_id
                    WHERE rt.recipe_id = r.id AND t.slug = ANY($2)))
              AND (NOT $3::bool OR EXISTS (
                    SELECT 1 FROM favorites f
                    WHERE f.recipe_id = r.id AND f.user_id = $4))
              AND (NOT $5::bool OR EXISTS (
                    SELECT 1 FROM shopping_cart sc
                    WHERE sc.recipe_id = r.id AND sc.user_id = $4))
            "#,
        )
        .bind(author)
        .bind(tag_slugs)
        .bind(only_favorited)
        .bind(viewer)
        .bind(only_in_cart)
        .fetch_one(&self.pool)
        .await?;

        Ok((recipes, total))
    }

    /// Tags attached to a recipe
    pub async fn tags_of(&self, recipe_id: Uuid) -> ApiResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.color, t.slug
            FROM recipe_tags rt
            INNER JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    /// Ingredient entries of a recipe with their amounts
    pub async fn ingredients_of(&self, recipe_id: Uuid) -> ApiResult<Vec<RecipeIngredientView>> {
        let ingredients = sqlx::query_as::<_, RecipeIngredientView>(
            r#"
            SELECT i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            INNER JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY i.name
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ingredients)
    }

    /// Short views of an author's recipes, newest-first, optionally capped
    pub async fn short_by_author(
        &self,
        author_id: Uuid,
        limit: Option<i64>,
    ) -> ApiResult<Vec<RecipeShortView>> {
        let recipes = sqlx::query_as::<_, RecipeShortView>(
            r#"
            SELECT id, name, image, cooking_time
            FROM recipes
            WHERE author_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(author_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes)
    }

    /// Number of recipes published by an author
    pub async fn count_by_author(&self, author_id: Uuid) -> ApiResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

async fn check_tags_exist(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    tags: &[Uuid],
) -> ApiResult<()> {
    let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE id = ANY($1)")
        .bind(tags)
        .fetch_one(&mut **tx)
        .await?;

    if found != tags.len() as i64 {
        return Err(ApiError::Validation(
            "Tags field contains an unknown id".to_string(),
        ));
    }

    Ok(())
}

async fn check_ingredients_exist(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ingredient_ids: &[Uuid],
) -> ApiResult<()> {
    let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ingredients WHERE id = ANY($1)")
        .bind(ingredient_ids)
        .fetch_one(&mut **tx)
        .await?;

    if found != ingredient_ids.len() as i64 {
        return Err(ApiError::Validation(
            "Ingredients field contains an unknown id".to_string(),
        ));
    }

    Ok(())
}

async fn insert_tag_links(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    recipe_id: Uuid,
    tags: &[Uuid],
) -> ApiResult<()> {
    sqlx::query(
        r#"
        INSERT INTO recipe_tags (recipe_id, tag_id)
        SELECT $1, tag_id FROM UNNEST($2::uuid[]) AS tag_id
        "#,
    )
    .bind(recipe_id)
    .bind(tags)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_ingredient_links(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    recipe_id: Uuid,
    ingredients: &[IngredientAmount],
) -> ApiResult<()> {
    let ids: Vec<Uuid> = ingredients.iter().map(|entry| entry.id).collect();
    let amounts: Vec<i32> = ingredients.iter().map(|entry| entry.amount).collect();

    sqlx::query(
        r#"
        INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount)
        SELECT $1, ingredient_id, amount
        FROM UNNEST($2::uuid[], $3::int4[]) AS entries (ingredient_id, amount)
        "#,
    )
    .bind(recipe_id)
    .bind(&ids)
    .bind(&amounts)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
