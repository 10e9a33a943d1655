//! Authenticated user claims

use serde::{Deserialize, Serialize};

/// JWT claims issued by the login service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User ID
    pub id: i32,
    pub email: String,
    pub role: String,
    pub name: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn claims(exp_offset: Duration) -> UserClaims {
        let now = Utc::now();
        UserClaims {
            id: 3,
            email: "staff@example.com".to_string(),
            role: "staff".to_string(),
            name: Some("Staff".to_string()),
            exp: (now + exp_offset).timestamp(),
            iat: now.timestamp(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = claims(Duration::days(7)).create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.id, 3);
        assert_eq!(parsed.role, "staff");
    }

    #[test]
    fn test_token_rejects_wrong_secret_and_expiry() {
        let token = claims(Duration::days(7)).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());

        let expired = claims(Duration::days(-2)).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&expired, "secret").is_err());
    }
}
