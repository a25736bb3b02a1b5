//! User repository for database operations

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth;
use crate::error::{ApiError, ApiResult};
use crate::models::user::{NewUser, User};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    ///
    /// The password is hashed with argon2 before it reaches the database.
    /// Duplicate email or username surfaces as a validation error through
    /// the unique constraints.
    pub async fn create(&self, new_user: &NewUser) -> ApiResult<User> {
        info!("Creating new user: {}", new_user.username);

        let password_hash =
            auth::hash_password(&new_user.password).map_err(|_| ApiError::Internal)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, username, first_name, last_name, password_hash, created_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, first_name, last_name, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, first_name, last_name, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List users with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> ApiResult<(Vec<User>, i64)> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, first_name, last_name, password_hash, created_at
            FROM users
            ORDER BY username
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok((users, total))
    }

    /// Check whether `subscriber` is subscribed to `author`
    ///
    /// Always false for anonymous viewers.
    pub async fn is_subscribed(
        &self,
        subscriber: Option<Uuid>,
        author_id: Uuid,
    ) -> ApiResult<bool> {
        let Some(subscriber_id) = subscriber else {
            return Ok(false);
        };

        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM subscriptions
                WHERE subscriber_id = $1 AND author_id = $2
            )
            "#,
        )
        .bind(subscriber_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Subscribe a user to an author
    ///
    /// Fails with a validation error on self-subscription or when the
    /// subscription already exists; the missing author is the caller's 404.
    pub async fn subscribe(&self, subscriber_id: Uuid, author_id: Uuid) -> ApiResult<User> {
        let author = self
            .find_by_id(author_id)
            .await?
            .ok_or(ApiError::NotFound("User"))?;

        if subscriber_id == author_id {
            return Err(ApiError::Validation(
                "You cannot subscribe to yourself".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO subscriptions (subscriber_id, author_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(subscriber_id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::Validation(
                "You are already subscribed to this user".to_string(),
            ));
        }

        info!("User {} subscribed to {}", subscriber_id, author_id);
        Ok(author)
    }

    /// Remove a subscription
    pub async fn unsubscribe(&self, subscriber_id: Uuid, author_id: Uuid) -> ApiResult<()> {
        if self.find_by_id(author_id).await?.is_none() {
            return Err(ApiError::NotFound("User"));
        }

        let result = sqlx::query(
            r#"
            DELETE FROM subscriptions
            WHERE subscriber_id = $1 AND author_id = $2
            "#,
        )
        .bind(subscriber_id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::Validation(
                "Subscription does not exist".to_string(),
            ));
        }

        info!("User {} unsubscribed from {}", subscriber_id, author_id);
        Ok(())
    }

    /// List the authors a user is subscribed to, with pagination
    pub async fn subscriptions(
        &self,
        subscriber_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<User>, i64)> {
        let authors = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name,
                   u.password_hash, u.created_at
            FROM subscriptions s
            INNER JOIN users u ON u.id = s.author_id
            WHERE s.subscriber_id = $1
            ORDER BY u.username
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(subscriber_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = $1")
                .bind(subscriber_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((authors, total))
    }
}
