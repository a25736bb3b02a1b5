//! Bearer token issuance and password hashing
//!
//! Tokens are HS256 JWTs carrying the user id; passwords are hashed with
//! argon2. Registration and login are the only places the identity stack is
//! touched, everything else consumes the decoded user id.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Create a signed bearer token for a user
pub fn create_token(user_id: Uuid, secret: &str, expiry_seconds: u64) -> Result<String> {
    let now = unix_now();
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + expiry_seconds,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Decode and validate a bearer token, returning its claims
pub fn decode_token(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Hash a password with argon2
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, "test-secret", 3600).expect("Failed to create token");

        let claims = decode_token(&token, "test-secret").expect("Failed to decode token");
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let token = create_token(Uuid::new_v4(), "test-secret", 3600).unwrap();
        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_token_rejects_garbage() {
        assert!(decode_token("not-a-token", "test-secret").is_err());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("Sup3r-secret!").expect("Failed to hash password");
        assert_ne!(hash, "Sup3r-secret!");
        assert!(verify_password("Sup3r-secret!", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }
}
