//! Caller identity as seen by a workflow
//!
//! Workflows take an [`Identity`] value instead of reading ambient auth
//! state, so "not signed in" and "not known yet" are explicit inputs.

use thiserror::Error;

use crate::auth::CurrentUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// The identity provider has not answered yet
    Resolving,
    SignedOut,
    SignedIn(CurrentUser),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Identity is still being resolved")]
    Pending,

    #[error("Sign in to continue")]
    SignedOut,
}

impl Identity {
    /// The signed-in user, or why there is none
    pub fn require(&self) -> Result<&CurrentUser, IdentityError> {
        match self {
            Identity::SignedIn(user) => Ok(user),
            Identity::Resolving => Err(IdentityError::Pending),
            Identity::SignedOut => Err(IdentityError::SignedOut),
        }
    }
}

impl From<Option<CurrentUser>> for Identity {
    fn from(user: Option<CurrentUser>) -> Self {
        match user {
            Some(user) => Identity::SignedIn(user),
            None => Identity::SignedOut,
        }
    }
}
