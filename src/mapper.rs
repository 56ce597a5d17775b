use auth_domain::AuthError;
use tonic::{Code, Status};
use tracing::error;

pub trait IntoStatus {
    fn into_status(self) -> Status;
}

impl IntoStatus for AuthError {
    fn into_status(self) -> Status {
        match self {
            // 401 Unauthorized, same answer for unknown email and wrong password
            AuthError::InvalidCredentials => {
                Status::new(Code::Unauthenticated, "invalid email or password")
            }

            // 409 Conflict
            AuthError::UserExists => Status::new(Code::AlreadyExists, "user already exists"),

            // 404 Not Found
            AuthError::UserNotFound => Status::new(Code::NotFound, "user not found"),
            AuthError::AppNotFound => Status::new(Code::NotFound, "app not found"),

            // 500, detail goes to the log only
            err @ (AuthError::Storage(_) | AuthError::Signing(_) | AuthError::Hashing(_)) => {
                error!(error = %err, "Request failed with internal error");
                Status::new(Code::Internal, "internal error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_data::AuthDataError;
    use auth_domain::{HashingError, TokenError};

    #[test]
    fn domain_errors_map_to_distinct_codes() {
        assert_eq!(
            AuthError::InvalidCredentials.into_status().code(),
            Code::Unauthenticated
        );
        assert_eq!(AuthError::UserExists.into_status().code(), Code::AlreadyExists);
        assert_eq!(AuthError::UserNotFound.into_status().code(), Code::NotFound);
        assert_eq!(AuthError::AppNotFound.into_status().code(), Code::NotFound);
    }

    #[test]
    fn internal_errors_do_not_leak_detail() {
        let errors = [
            AuthError::Storage(AuthDataError::MongoError(
                "connection refused at 10.0.0.5:27017".to_string(),
            )),
            AuthError::Signing(TokenError::EmptySecret),
            AuthError::Hashing(HashingError::MalformedHash),
        ];

        for err in errors {
            let status = err.into_status();
            assert_eq!(status.code(), Code::Internal);
            assert_eq!(status.message(), "internal error");
        }
    }
}
