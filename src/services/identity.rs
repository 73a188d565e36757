use crate::core::email::is_university_email;
use crate::models::Identity;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while establishing who the caller is
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("E-mail address is not verified")]
    EmailNotVerified,

    #[error("E-mail domain is not an allowed university domain: {0}")]
    EmailNotAllowed(String),
}

/// Claims issued by the identity service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    pub exp: usize,
}

/// Verifies bearer tokens and applies the university e-mail gate
pub struct IdentityVerifier {
    key: DecodingKey,
    validation: Validation,
    allowed_email_domains: Vec<String>,
    require_verified_email: bool,
}

impl IdentityVerifier {
    pub fn new(
        jwt_secret: &str,
        issuer: Option<&str>,
        allowed_email_domains: Vec<String>,
        require_verified_email: bool,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
            allowed_email_domains,
            require_verified_email,
        }
    }

    /// Decode a token and check the caller may use the service
    pub fn verify(&self, token: &str) -> Result<Identity, IdentityError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        let claims = data.claims;

        if self.require_verified_email && !claims.email_verified {
            return Err(IdentityError::EmailNotVerified);
        }

        if !is_university_email(&claims.email, &self.allowed_email_domains) {
            return Err(IdentityError::EmailNotAllowed(claims.email));
        }

        Ok(Identity {
            user_id: claims.sub,
            email: claims.email,
            email_verified: claims.email_verified,
        })
    }

    /// Extract and verify the token from an `Authorization` header value
    pub fn verify_header(&self, header: Option<&str>) -> Result<Identity, IdentityError> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(IdentityError::MissingToken)?;

        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(email: &str, verified: bool) -> String {
        let claims = Claims {
            sub: "user_1".to_string(),
            email: email.to_string(),
            email_verified: verified,
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    fn verifier() -> IdentityVerifier {
        IdentityVerifier::new(SECRET, None, vec!["edu.tr".to_string()], true)
    }

    #[test]
    fn test_verify_valid_token() {
        let identity = verifier().verify(&token("zeynep@metu.edu.tr", true)).unwrap();

        assert_eq!(identity.user_id, "user_1");
        assert!(identity.email_verified);
    }

    #[test]
    fn test_unverified_email_rejected() {
        let result = verifier().verify(&token("zeynep@metu.edu.tr", false));
        assert!(matches!(result, Err(IdentityError::EmailNotVerified)));
    }

    #[test]
    fn test_non_university_email_rejected() {
        let result = verifier().verify(&token("zeynep@gmail.com", true));
        assert!(matches!(result, Err(IdentityError::EmailNotAllowed(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let other = IdentityVerifier::new("other", None, vec![], false);
        let result = other.verify(&token("zeynep@metu.edu.tr", true));
        assert!(matches!(result, Err(IdentityError::InvalidToken(_))));
    }

    #[test]
    fn test_verify_header() {
        let v = verifier();
        let header = format!("Bearer {}", token("zeynep@metu.edu.tr", true));

        assert!(v.verify_header(Some(&header)).is_ok());
        assert!(matches!(v.verify_header(None), Err(IdentityError::MissingToken)));
        assert!(matches!(v.verify_header(Some("Basic abc")), Err(IdentityError::MissingToken)));
    }
}
