//! Authentication service.
//!
//! The admin panel has a single account whose credentials come from
//! configuration. Both fields are compared in constant time.

mod error;

pub use error::AuthError;

use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use crate::config::AdminConfig;

/// Authentication service for the admin panel.
pub struct AuthService<'a> {
    admin: &'a AdminConfig,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(admin: &'a AdminConfig) -> Self {
        Self { admin }
    }

    /// Check a submitted username/password pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` unless both values match exactly.
    pub fn verify_admin(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username_ok = username
            .as_bytes()
            .ct_eq(self.admin.username.as_bytes());
        let password_ok = password
            .as_bytes()
            .ct_eq(self.admin.password.expose_secret().as_bytes());

        if bool::from(username_ok & password_ok) {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
