use crate::{
    auth::CredentialVerifier,
    db::DbPool,
    entities::user,
    errors::ServiceError,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use std::sync::Arc;
use tracing::{info, instrument};

/// The three fixed role accounts seeded when the store is empty.
const SEED_ACCOUNTS: [(&str, &str, &str); 3] = [
    ("manager1", "manager123", "Manager"),
    ("supervisor1", "supervisor123", "Supervisor"),
    ("worker1", "worker123", "Worker"),
];

/// Service for login and startup seeding of user accounts
#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl UserService {
    pub fn new(db: Arc<DbPool>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { db, verifier }
    }

    /// Seeds the default role accounts if the users table is empty.
    #[instrument(skip(self))]
    pub async fn seed_default_users(&self) -> Result<(), ServiceError> {
        let existing = user::Entity::find()
            .count(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if existing > 0 {
            return Ok(());
        }

        for (username, password, role) in SEED_ACCOUNTS {
            let active = user::ActiveModel {
                username: Set(username.to_string()),
                password: Set(password.to_string()),
                role: Set(role.to_string()),
                ..Default::default()
            };
            active
                .insert(&*self.db)
                .await
                .map_err(ServiceError::DatabaseError)?;
        }

        info!("Seeded {} default user accounts", SEED_ACCOUNTS.len());
        Ok(())
    }

    /// Checks a username/password pair through the configured credential
    /// verifier. An unknown username and a wrong password both fail with
    /// `InvalidCredentials`.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<user::Model, ServiceError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let user = found.ok_or(ServiceError::InvalidCredentials)?;

        if self.verifier.verify(password, &user.password).await {
            Ok(user)
        } else {
            Err(ServiceError::InvalidCredentials)
        }
    }
}
