use crate::models::{App, User};
use auth_data::entities::{AppEntity, UserEntity};

pub fn user_entity_to_user(user: UserEntity) -> User {
    User {
        id: user.id,
        pass_hash: user.pass_hash_bytes().to_vec(),
        email: user.email,
    }
}

pub fn app_entity_to_app(app: AppEntity) -> App {
    App {
        id: app.id,
        name: app.name,
        secret: app.secret,
    }
}
