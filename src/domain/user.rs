//! User domain model.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// A registered user as stored.
///
/// The password hash never leaves the service layer: clients and the
/// session store only ever see a [`CurrentUser`].
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// Login email, unique across users.
    pub email: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
}

impl User {
    /// Projects the user onto the identity carried by a session.
    #[must_use]
    pub fn identity(&self) -> CurrentUser {
        CurrentUser {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Creation payload for a user: the email plus an already-derived hash.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    /// Attaches the store-assigned identifier.
    #[must_use]
    pub fn into_user(self, id: RecordId) -> User {
        User {
            id,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("NewUser")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// The acting identity of an authenticated request.
///
/// This is what the session store holds under a session token and what
/// `/users/login` and `/users/current` return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: RecordId,
    pub email: String,
}
