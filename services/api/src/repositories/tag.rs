//! Tag repository for database operations

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::tag::Tag;

/// Tag repository
#[derive(Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    /// Create a new tag repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all tags
    pub async fn list(&self) -> ApiResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, color, slug
            FROM tags
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    /// Get a tag by ID
    pub async fn get_by_id(&self, id: Uuid) -> ApiResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, color, slug
            FROM tags
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tag)
    }
}
