pub mod error;
pub mod hashing_service;
mod mappers;
pub mod models;
pub mod service;
pub mod token_service;

pub use error::{AuthError, AuthResult, HashingError, TokenError};
pub use hashing_service::{HashingService, Pbkdf2HashingService};
pub use models::{App, TokenClaims, User};
pub use service::{AuthService, AuthServiceConfig, AuthServiceImpl};
pub use token_service::{JwtTokenService, TokenService};
