use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

pub const ENV_VAR: &str = "ARTEMIS_ENV";
pub const USERNAME_VAR: &str = "ARTEMIS_USERNAME";
pub const PASSWORD_VAR: &str = "ARTEMIS_PASSWORD";

/// Fixed URLs for one target site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteUrls {
    /// Job-search listing endpoint; the query is appended after `?`.
    pub search_url: &'static str,
    /// Login form, if the target requires authentication.
    pub login_url: Option<&'static str>,
    /// URL prefix reached once login (and any security challenge) is done.
    pub post_login_prefix: Option<&'static str>,
}

const PRODUCTION_URLS: SiteUrls = SiteUrls {
    search_url: "https://www.linkedin.com/jobs/search/",
    login_url: Some("https://www.linkedin.com/login"),
    post_login_prefix: Some("https://www.linkedin.com/feed"),
};

const DEVELOPMENT_URLS: SiteUrls = SiteUrls {
    search_url: "http://localhost:8000/jobs/search/",
    login_url: None,
    post_login_prefix: None,
};

/// Which site a run talks to. Chosen once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    pub fn urls(&self) -> SiteUrls {
        match self {
            Environment::Production => PRODUCTION_URLS,
            Environment::Development => DEVELOPMENT_URLS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }

    /// Read `ARTEMIS_ENV`, defaulting to development.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        match lookup(ENV_VAR) {
            None => Ok(Self::default()),
            Some(raw) => raw.parse().map_err(AppError::ConfigError),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            _ => Err(format!(
                "Unknown environment '{s}': expected production or development"
            )),
        }
    }
}

/// Login credentials for the job site.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read configuration from environment variables.
    ///
    /// - `ARTEMIS_USERNAME` (required)
    /// - `ARTEMIS_PASSWORD` (required)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::ConfigError(format!("{key} not set. Required to log in.")))
        };

        Ok(Self {
            username: require(USERNAME_VAR)?,
            password: require(PASSWORD_VAR)?,
        })
    }
}
