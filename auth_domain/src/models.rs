use serde::{Deserialize, Serialize};
use std::fmt;

/// Registered end user as seen by the domain service
#[derive(Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub pass_hash: Vec<u8>,
}

// Hash stays out of logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Client application tokens are issued for
#[derive(Clone)]
pub struct App {
    pub id: i32,
    pub name: String,
    pub secret: String,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,   // User ID
    pub email: String,
    pub app_id: i32,
    pub iat: i64,      // Issued at
    pub exp: i64,      // Expiration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let user = User {
            id: 1,
            email: "a@x.com".to_string(),
            pass_hash: b"pbkdf2-sha256$1$00$00".to_vec(),
        };
        let app = App {
            id: 1,
            name: "web".to_string(),
            secret: "top-secret".to_string(),
        };

        assert!(!format!("{user:?}").contains("pbkdf2"));
        assert!(!format!("{app:?}").contains("top-secret"));
    }
}
