//! Customer listing: users with the `user` role.

use crate::errors::AppError;
use crate::models::user::{User, UserResponse, UserRole};
use crate::store::{Collection, Filter, FindOptions, Store};

pub async fn list(store: &Store) -> Result<Vec<UserResponse>, AppError> {
    let users: Vec<User> = store
        .find_as(
            Collection::Users,
            &Filter::eq("role", UserRole::User.as_str()),
            &FindOptions::default(),
        )
        .await?;

    tracing::debug!(customers = users.len(), "Listed customers");
    Ok(users.into_iter().map(UserResponse::from).collect())
}
