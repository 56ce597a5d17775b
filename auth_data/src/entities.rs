//! Database entities for authentication

use bson::spec::BinarySubtype;
use bson::Binary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User entity for MongoDB
#[derive(Clone, Serialize, Deserialize)]
pub struct UserEntity {
    #[serde(rename = "_id")]
    pub id: i64,
    pub email: String,
    pub pass_hash: Binary,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl UserEntity {
    pub fn new(id: i64, email: &str, pass_hash: &[u8]) -> Self {
        Self {
            id,
            email: email.to_string(),
            pass_hash: Binary {
                subtype: BinarySubtype::Generic,
                bytes: pass_hash.to_vec(),
            },
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    pub fn pass_hash_bytes(&self) -> &[u8] {
        &self.pass_hash.bytes
    }
}

// Hash stays out of logs.
impl fmt::Debug for UserEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserEntity")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Client application allowed to issue logins. Provisioned out-of-band.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppEntity {
    #[serde(rename = "_id")]
    pub id: i32,
    pub name: String,
    pub secret: String,
}

impl AppEntity {
    pub fn new(id: i32, name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for AppEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppEntity")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Named sequence used to hand out numeric ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterEntity {
    #[serde(rename = "_id")]
    pub id: String,
    pub seq: i64,
}
