//! Registration and login.

use std::sync::Arc;

use super::{ServiceError, password};
use crate::domain::{CurrentUser, NewUser, RecordId};
use crate::infrastructure::{StoreError, UserRepository};

/// User registration and credential checks.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository + Send + Sync>,
}

impl UserService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository + Send + Sync>) -> Self {
        Self { users }
    }

    /// Registers a new user and returns its identifier.
    ///
    /// No session is created; the client logs in separately.
    ///
    /// # Errors
    ///
    /// - `ServiceError::AlreadyExists` if the email is taken, whether caught
    ///   by the lookup or by the store's unique index.
    /// - `ServiceError::Hashing` or `ServiceError::Store` on internal faults.
    pub async fn register(&self, email: &str, password: &str) -> Result<RecordId, ServiceError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(ServiceError::AlreadyExists);
        }

        let user = NewUser {
            email: email.to_string(),
            password_hash: password::hash_password(password)?,
        };

        match self.users.insert(&user).await {
            Ok(id) => {
                tracing::info!(user_id = %id, "User registered");
                Ok(id)
            }
            Err(StoreError::Duplicate(_)) => Err(ServiceError::AlreadyExists),
            Err(error) => Err(error.into()),
        }
    }

    /// Checks credentials and returns the identity to attach to a session.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidCredentials` for an unknown email and
    /// for a wrong password alike.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CurrentUser, ServiceError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!("Login rejected: unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if !password::verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user.identity())
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("UserService")
            .field("users", &"Arc<dyn UserRepository>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::infrastructure::InMemoryUserRepository;
    use futures::future::BoxFuture;
    use rstest::{fixture, rstest};

    #[fixture]
    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    #[rstest]
    #[tokio::test]
    async fn test_register_then_authenticate(service: UserService) {
        let id = service.register("a@x.com", "secret").await.unwrap();
        let identity = service.authenticate("a@x.com", "secret").await.unwrap();

        assert_eq!(identity.id, id);
        assert_eq!(identity.email, "a@x.com");
    }

    #[rstest]
    #[tokio::test]
    async fn test_register_duplicate_email(service: UserService) {
        service.register("a@x.com", "secret").await.unwrap();
        let result = service.register("a@x.com", "other").await;
        assert_eq!(result, Err(ServiceError::AlreadyExists));
    }

    #[rstest]
    #[case("a@x.com", "wrong")]
    #[case("b@x.com", "secret")]
    #[tokio::test]
    async fn test_bad_credentials_are_indistinguishable(
        service: UserService,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        service.register("a@x.com", "secret").await.unwrap();
        let result = service.authenticate(email, password).await;
        assert_eq!(result, Err(ServiceError::InvalidCredentials));
    }

    /// Lookup never sees the user, so only the unique index catches the clash.
    struct RacingUserRepository;

    impl UserRepository for RacingUserRepository {
        fn find_by_email(
            &self,
            _email: &str,
        ) -> BoxFuture<'static, Result<Option<User>, StoreError>> {
            Box::pin(async { Ok(None) })
        }

        fn insert(&self, _user: &NewUser) -> BoxFuture<'static, Result<RecordId, StoreError>> {
            Box::pin(async { Err(StoreError::Duplicate("email".to_string())) })
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_unique_index_violation_is_already_exists() {
        let service = UserService::new(Arc::new(RacingUserRepository));
        let result = service.register("a@x.com", "secret").await;
        assert_eq!(result, Err(ServiceError::AlreadyExists));
    }
}
