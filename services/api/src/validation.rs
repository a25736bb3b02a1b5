//! Input validation utilities
//!
//! All validation runs before any persistence step; a failing payload never
//! reaches the database.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::models::recipe::IngredientAmount;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate the tag set of a recipe payload
pub fn validate_tags(tags: &[Uuid]) -> Result<(), String> {
    if tags.is_empty() {
        return Err("Tags field cannot be empty".to_string());
    }

    let unique: HashSet<&Uuid> = tags.iter().collect();
    if unique.len() != tags.len() {
        return Err("Tags field cannot contain duplicate values".to_string());
    }

    Ok(())
}

/// Validate the ingredient-amount list of a recipe payload
///
/// Amounts are per recipe per ingredient; repeating the same ingredient id
/// within one recipe is invalid regardless of the amounts.
pub fn validate_ingredients(ingredients: &[IngredientAmount]) -> Result<(), String> {
    if ingredients.is_empty() {
        return Err("Ingredients field cannot be empty".to_string());
    }

    for entry in ingredients {
        if entry.amount < 1 {
            return Err("Ingredient amount must be at least 1".to_string());
        }
    }

    let unique: HashSet<&Uuid> = ingredients.iter().map(|entry| &entry.id).collect();
    if unique.len() != ingredients.len() {
        return Err("Ingredients field cannot contain duplicate values".to_string());
    }

    Ok(())
}

/// Validate recipe scalar fields
pub fn validate_recipe_fields(name: &str, image: &str, cooking_time: i32) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name field is required".to_string());
    }

    if image.is_empty() {
        return Err("The image field is required".to_string());
    }

    if cooking_time < 1 {
        return Err("Cooking time must be at least 1".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: Uuid, amount: i32) -> IngredientAmount {
        IngredientAmount { id, amount }
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("chef_anna").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("bad name!").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("anna@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("long-enough").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_tags_rejects_empty_and_duplicates() {
        assert!(validate_tags(&[]).is_err());

        let tag = Uuid::new_v4();
        assert!(validate_tags(&[tag, tag]).is_err());
        assert!(validate_tags(&[tag, Uuid::new_v4()]).is_ok());
    }

    #[test]
    fn test_validate_ingredients_rejects_empty_list() {
        assert!(validate_ingredients(&[]).is_err());
    }

    #[test]
    fn test_validate_ingredients_rejects_duplicate_ids_regardless_of_amounts() {
        let id = Uuid::new_v4();
        assert!(validate_ingredients(&[entry(id, 100), entry(id, 200)]).is_err());
        assert!(validate_ingredients(&[entry(id, 100), entry(id, 100)]).is_err());
    }

    #[test]
    fn test_validate_ingredients_rejects_non_positive_amounts() {
        assert!(validate_ingredients(&[entry(Uuid::new_v4(), 0)]).is_err());
        assert!(validate_ingredients(&[entry(Uuid::new_v4(), -5)]).is_err());
        assert!(validate_ingredients(&[entry(Uuid::new_v4(), 1)]).is_ok());
    }

    #[test]
    fn test_validate_recipe_fields() {
        assert!(validate_recipe_fields("Borscht", "img.png", 40).is_ok());
        assert!(validate_recipe_fields("", "img.png", 40).is_err());
        assert!(validate_recipe_fields("Borscht", "", 40).is_err());
        assert!(validate_recipe_fields("Borscht", "img.png", 0).is_err());
    }
}
