//! Storage contracts and their MongoDB implementation

use crate::entities::{AppEntity, CounterEntity, UserEntity};
use crate::error::AuthDataError;
use async_trait::async_trait;
use bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use std::sync::Arc;
use tokio::sync::RwLock;

const USERS_COLLECTION: &str = "users";
const APPS_COLLECTION: &str = "apps";
const COUNTERS_COLLECTION: &str = "counters";
const USER_ID_SEQUENCE: &str = "user_id";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Persists newly registered users
#[async_trait]
pub trait UserSaver: Send + Sync {
    /// Store a user and return the id assigned to it.
    /// Fails with `UserExists` when the email is already registered.
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> Result<i64, AuthDataError>;
}

/// Read access to users
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<UserEntity, AuthDataError>;

    /// Admin flag of a user
    async fn is_admin(&self, user_id: i64) -> Result<bool, AuthDataError>;
}

/// Read access to registered client apps
#[async_trait]
pub trait AppProvider: Send + Sync {
    async fn find_app_by_id(&self, app_id: i32) -> Result<AppEntity, AuthDataError>;
}

/// MongoDB implementation of the storage contracts
pub struct MongoStorage {
    db: Arc<RwLock<Database>>,
}

impl MongoStorage {
    pub fn new(db: Arc<RwLock<Database>>) -> Self {
        Self { db }
    }

    /// Connect to `uri` and use `database` for all collections
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AuthDataError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        Ok(Self::new(Arc::new(RwLock::new(db))))
    }

    /// Create the unique email index that registration relies on.
    pub async fn init_indexes(&self) -> Result<(), AuthDataError> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.users().await.create_index(index).await?;
        tracing::info!("Ensured unique index on users.email");
        Ok(())
    }

    async fn users(&self) -> Collection<UserEntity> {
        self.db.read().await.collection(USERS_COLLECTION)
    }

    async fn apps(&self) -> Collection<AppEntity> {
        self.db.read().await.collection(APPS_COLLECTION)
    }

    async fn counters(&self) -> Collection<CounterEntity> {
        self.db.read().await.collection(COUNTERS_COLLECTION)
    }

    async fn next_user_id(&self) -> Result<i64, AuthDataError> {
        let counter = self
            .counters()
            .await
            .find_one_and_update(
                doc! { "_id": USER_ID_SEQUENCE },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| {
                AuthDataError::InternalError("user id sequence missing after upsert".to_string())
            })?;

        Ok(counter.seq)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl UserSaver for MongoStorage {
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> Result<i64, AuthDataError> {
        // A rejected insert burns the allocated id; ids stay unique but may have gaps.
        let id = self.next_user_id().await?;
        let user = UserEntity::new(id, email, pass_hash);

        match self.users().await.insert_one(user).await {
            Ok(_) => Ok(id),
            Err(e) if is_duplicate_key(&e) => Err(AuthDataError::UserExists),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl UserProvider for MongoStorage {
    async fn find_by_email(&self, email: &str) -> Result<UserEntity, AuthDataError> {
        self.users()
            .await
            .find_one(doc! { "email": email })
            .await?
            .ok_or(AuthDataError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, AuthDataError> {
        let user = self
            .users()
            .await
            .find_one(doc! { "_id": user_id })
            .await?
            .ok_or(AuthDataError::UserNotFound)?;

        Ok(user.is_admin)
    }
}

#[async_trait]
impl AppProvider for MongoStorage {
    async fn find_app_by_id(&self, app_id: i32) -> Result<AppEntity, AuthDataError> {
        self.apps()
            .await
            .find_one(doc! { "_id": app_id })
            .await?
            .ok_or(AuthDataError::AppNotFound)
    }
}
