use crate::error::TokenError;
use crate::models::{App, TokenClaims, User};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Issues and checks per-app access tokens
pub trait TokenService: Send + Sync {
    /// Sign a token for `user` with `app`'s secret, valid for `ttl`.
    fn new_token(&self, user: &User, app: &App, ttl: Duration) -> Result<String, TokenError>;

    /// Check signature and expiry of `token` against `secret`.
    fn validate_token(&self, token: &str, secret: &str) -> Result<TokenClaims, TokenError>;
}

/// HMAC-signed JWTs
pub struct JwtTokenService {
    algorithm: Algorithm,
}

impl JwtTokenService {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    pub(crate) fn new_token_at(
        &self,
        user: &User,
        app: &App,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if app.secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Encoding(format!("expiry out of range for ttl {ttl}")))?;

        let claims = TokenClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            app_id: app.id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let key = EncodingKey::from_secret(app.secret.as_bytes());
        encode(&Header::new(self.algorithm), &claims, &key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }
}

impl Default for JwtTokenService {
    fn default() -> Self {
        Self::new(Algorithm::HS256)
    }
}

impl TokenService for JwtTokenService {
    fn new_token(&self, user: &User, app: &App, ttl: Duration) -> Result<String, TokenError> {
        self.new_token_at(user, app, ttl, Utc::now())
    }

    fn validate_token(&self, token: &str, secret: &str) -> Result<TokenClaims, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        jsonwebtoken::decode::<TokenClaims>(token, &key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}
