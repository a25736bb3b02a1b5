//! Repositories for database operations

pub mod ingredient;
pub mod recipe;
pub mod relation;
pub mod tag;
pub mod user;

pub use ingredient::IngredientRepository;
pub use recipe::RecipeRepository;
pub use relation::{RecipeRelation, RelationRepository};
pub use tag::TagRepository;
pub use user::UserRepository;
