use chrono::Duration;

use crate::error::{AuthError, ConfigError};

/// Issuer embedded in every access token minted by this service.
pub const DEFAULT_ISSUER: &str = "chirpy";

const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 60 * 60; // 1 hour
const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 60 * 24 * 60 * 60; // 60 days
/// Longest lifetime `validate` accepts for either token.
pub const MAX_TOKEN_EXPIRY: i64 = 10 * 365 * 24 * 60 * 60; // 10 years

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    /// Without a database section the in-memory stores are used.
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// Signing and lifetime settings for access and refresh tokens.
///
/// Passed explicitly into every issue/validate call; nothing here is
/// process-global.
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64, // seconds
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64, // seconds
}

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

fn default_access_token_expiry() -> i64 {
    DEFAULT_ACCESS_TOKEN_EXPIRY
}

fn default_refresh_token_expiry() -> i64 {
    DEFAULT_REFRESH_TOKEN_EXPIRY
}

impl JwtSettings {
    /// Settings with the default issuer and lifetimes.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: default_issuer(),
            access_token_expiry: DEFAULT_ACCESS_TOKEN_EXPIRY,
            refresh_token_expiry: DEFAULT_REFRESH_TOKEN_EXPIRY,
        }
    }

    pub fn access_token_ttl(&self) -> Result<Duration, AuthError> {
        Duration::try_seconds(self.access_token_expiry).ok_or(AuthError::ExpiryOutOfRange)
    }

    pub fn refresh_token_ttl(&self) -> Result<Duration, AuthError> {
        Duration::try_seconds(self.refresh_token_expiry).ok_or(AuthError::ExpiryOutOfRange)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt.secret".to_string()));
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt.issuer".to_string()));
        }
        if self.access_token_expiry <= 0 || self.refresh_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "token expiry must be a positive number of seconds".to_string(),
            ));
        }
        if self.access_token_expiry > MAX_TOKEN_EXPIRY
            || self.refresh_token_expiry > MAX_TOKEN_EXPIRY
        {
            return Err(ConfigError::InvalidValue(format!(
                "token expiry must not exceed {} seconds",
                MAX_TOKEN_EXPIRY
            )));
        }
        if self.refresh_token_expiry <= self.access_token_expiry {
            return Err(ConfigError::InvalidValue(
                "refresh_token_expiry must exceed access_token_expiry".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads `configuration.*` from the working directory (optional), then
/// `APP__`-prefixed environment variables, e.g. `APP__JWT__SECRET`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    settings_from(settings)
}

/// Deserialize and validate already-merged sources.
pub fn settings_from(config: config::Config) -> Result<Settings, ConfigError> {
    let settings = config.try_deserialize::<Settings>()?;
    settings.jwt.validate()?;
    Ok(settings)
}
