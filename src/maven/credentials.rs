//! Publishing credentials from the process environment.

use crate::maven::error::{Error, Result};
use base64::Engine;
use std::fmt;

/// Sonatype Central Portal user token name.
pub const USERNAME_VAR: &str = "MAVEN_USERNAME";
/// Sonatype Central Portal user token secret.
pub const PASSWORD_VAR: &str = "MAVEN_PASSWORD";

/// Username/password pair for the Central Portal and snapshot repository.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Reads both variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads both variables through `lookup`; unset and empty values are both missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |variable: &'static str| {
            lookup(variable)
                .filter(|value| !value.is_empty())
                .ok_or(Error::MissingEnvironment { variable })
        };
        Ok(Self {
            username: read(USERNAME_VAR)?,
            password: read(PASSWORD_VAR)?,
        })
    }

    /// Token user name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Token secret.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Bearer token for the portal API: base64 of `username:password`.
    pub fn bearer_token(&self) -> String {
        base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.username, self.password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
