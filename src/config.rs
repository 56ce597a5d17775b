//! Configuration management.
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "SSO_";
const MAX_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file does not exist: {0}")]
    NotFound(PathBuf),

    #[error("cannot read config: {0}")]
    Read(#[from] figment::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Deployment environment, selects log level and format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub env: Environment,
    pub storage: StorageConfig,
    /// Lifetime of issued access tokens
    pub token_ttl_secs: u64,
    pub grpc: GrpcConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrpcConfig {
    pub port: u16,
    /// Per-request deadline; a request that runs past it is dropped.
    pub timeout_secs: u64,
}

impl Config {
    /// YAML file at `path`, overridden by `SSO_` environment variables
    /// (`SSO_GRPC__PORT=5000` sets `grpc.port`).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::Invalid("token_ttl_secs must be positive".into()));
        }
        if self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "token_ttl_secs must not exceed {MAX_TOKEN_TTL_SECS}"
            )));
        }
        if self.grpc.timeout_secs == 0 {
            return Err(ConfigError::Invalid("grpc.timeout_secs must be positive".into()));
        }
        if self.storage.uri.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.uri is required".into()));
        }
        if self.storage.database.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.database is required".into()));
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_secs.min(MAX_TOKEN_TTL_SECS) as i64)
    }

    pub fn grpc_timeout(&self) -> Duration {
        Duration::from_secs(self.grpc.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const LOCAL_YAML: &str = r#"
env: local
token_ttl_secs: 3600
storage:
  uri: mongodb://localhost:27017
  database: sso
grpc:
  port: 44044
  timeout_secs: 10
"#;

    #[test]
    fn test_load_settings() {
        Jail::expect_with(|jail| {
            jail.create_file("local.yaml", LOCAL_YAML)?;

            let config = Config::load(Path::new("local.yaml")).expect("config should load");
            assert_eq!(config.env, Environment::Local);
            assert_eq!(config.storage.database, "sso");
            assert_eq!(config.grpc.port, 44044);
            assert_eq!(config.token_ttl(), chrono::Duration::hours(1));
            assert_eq!(config.grpc_timeout(), Duration::from_secs(10));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("local.yaml", LOCAL_YAML)?;
            jail.set_env("SSO_ENV", "prod");
            jail.set_env("SSO_GRPC__PORT", "5000");
            jail.set_env("SSO_TOKEN_TTL_SECS", "60");

            let config = Config::load(Path::new("local.yaml")).expect("config should load");
            assert_eq!(config.env, Environment::Prod);
            assert_eq!(config.grpc.port, 5000);
            assert_eq!(config.token_ttl_secs, 60);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_settings_validation() {
        Jail::expect_with(|jail| {
            jail.create_file("local.yaml", LOCAL_YAML)?;
            let config = Config::load(Path::new("local.yaml")).expect("config should load");
            assert!(config.validate().is_ok());

            let mut invalid = config.clone();
            invalid.token_ttl_secs = 0;
            assert!(invalid.validate().is_err());

            let mut invalid = config.clone();
            invalid.token_ttl_secs = MAX_TOKEN_TTL_SECS + 1;
            assert!(invalid.validate().is_err());

            let mut invalid = config.clone();
            invalid.grpc.timeout_secs = 0;
            assert!(invalid.validate().is_err());

            let mut invalid = config.clone();
            invalid.storage.uri = "  ".to_string();
            assert!(invalid.validate().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_unknown_env_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("local.yaml", &LOCAL_YAML.replace("env: local", "env: staging"))?;

            let result = Config::load(Path::new("local.yaml"));
            assert!(matches!(result, Err(ConfigError::Read(_))));
            Ok(())
        });
    }
}
