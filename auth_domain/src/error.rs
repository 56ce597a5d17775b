use auth_data::AuthDataError;
use thiserror::Error;

/// Domain-specific authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or wrong password; the two are deliberately not told apart.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    UserExists,

    #[error("User not found")]
    UserNotFound,

    #[error("App not found")]
    AppNotFound,

    #[error("Storage error: {0}")]
    Storage(AuthDataError),

    #[error("Token signing error: {0}")]
    Signing(#[source] TokenError),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] HashingError),
}

impl AuthError {
    /// Infrastructure failures whose detail must not reach external callers.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Storage(_) | AuthError::Signing(_) | AuthError::Hashing(_)
        )
    }
}

impl From<AuthDataError> for AuthError {
    fn from(err: AuthDataError) -> Self {
        match err {
            AuthDataError::UserExists => AuthError::UserExists,
            AuthDataError::UserNotFound => AuthError::UserNotFound,
            AuthDataError::AppNotFound => AuthError::AppNotFound,
            other => AuthError::Storage(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum HashingError {
    #[error("Malformed password hash")]
    MalformedHash,

    #[error("Hashing task failed: {0}")]
    TaskFailed(String),
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("App secret is empty")]
    EmptySecret,

    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Token has expired")]
    Expired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_storage_conditions_keep_their_meaning() {
        assert!(matches!(
            AuthError::from(AuthDataError::UserExists),
            AuthError::UserExists
        ));
        assert!(matches!(
            AuthError::from(AuthDataError::UserNotFound),
            AuthError::UserNotFound
        ));
        assert!(matches!(
            AuthError::from(AuthDataError::AppNotFound),
            AuthError::AppNotFound
        ));

        let err = AuthError::from(AuthDataError::MongoError("connection reset".to_string()));
        assert!(matches!(err, AuthError::Storage(_)));
        assert!(err.is_internal());
    }

    #[test]
    fn domain_errors_are_not_internal() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::UserExists,
            AuthError::UserNotFound,
            AuthError::AppNotFound,
        ] {
            assert!(!err.is_internal(), "{err} should be visible to callers");
        }
        assert!(AuthError::Signing(TokenError::EmptySecret).is_internal());
        assert!(AuthError::from(HashingError::MalformedHash).is_internal());
    }
}
