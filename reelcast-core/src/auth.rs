//! Admin credential check
//!
//! A static shared-secret scheme: one configured password is exchanged at
//! login for one configured bearer token, and protected routes compare the
//! presented token for exact equality. Kept behind this small type so a
//! signed-token scheme could replace it without touching endpoint logic;
//! the equality semantics themselves are the observable contract and must
//! not change.

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    password: String,
    token: String,
}

impl AdminCredentials {
    #[must_use]
    pub fn new(password: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            token: token.into(),
        }
    }

    /// Exchange the login password for the admin token.
    pub fn login(&self, presented_password: &str) -> Result<&str> {
        if self.password.is_empty() || presented_password != self.password {
            return Err(Error::Authentication("Invalid password".to_string()));
        }
        Ok(&self.token)
    }

    /// Validate a bearer token presented on a protected route.
    ///
    /// An unconfigured (empty) token denies everything rather than letting
    /// an empty Authorization value through.
    pub fn check_token(&self, presented: &str) -> Result<()> {
        if self.token.is_empty() || presented != self.token {
            return Err(Error::Authorization("Invalid admin token".to_string()));
        }
        Ok(())
    }
}
