//! Application state shared across handlers

use sqlx::PgPool;

use crate::repositories::{
    IngredientRepository, RecipeRepository, RelationRepository, TagRepository, UserRepository,
};
use crate::settings::Settings;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Settings,
    pub user_repository: UserRepository,
    pub tag_repository: TagRepository,
    pub ingredient_repository: IngredientRepository,
    pub recipe_repository: RecipeRepository,
    pub relation_repository: RelationRepository,
}

impl AppState {
    /// Build the application state from a pool and settings
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone()),
            tag_repository: TagRepository::new(pool.clone()),
            ingredient_repository: IngredientRepository::new(pool.clone()),
            recipe_repository: RecipeRepository::new(pool.clone()),
            relation_repository: RelationRepository::new(pool.clone()),
            db_pool: pool,
            settings,
        }
    }
}
