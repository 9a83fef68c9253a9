//! Application credentials type.

use std::fmt;

/// Application credentials used to mint tenant access tokens.
///
/// Holds the `app_id` and `app_secret` issued to a self-built application
/// on the provider's developer console. Credentials are immutable once
/// constructed.
///
/// # Security
///
/// The secret is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use bitable_core::Credentials;
///
/// let creds = Credentials::new("cli_a1b2c3", "app-secret-here");
/// assert_eq!(creds.app_id(), "cli_a1b2c3");
/// ```
#[derive(Clone)]
pub struct Credentials {
    app_id: String,
    app_secret: String,
}

impl Credentials {
    /// Create new credentials.
    ///
    /// # Arguments
    ///
    /// * `app_id` - The application's App ID
    /// * `app_secret` - The application's App Secret
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }

    /// Returns the App ID.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the App Secret.
    ///
    /// # Security
    ///
    /// Use this only when constructing token requests.
    /// Never log or display this value.
    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }
}

// Intentionally hide the secret in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}
