use core_config::{ConfigError, Environment, FromEnv, env_optional, env_parse};

/// Used when `JWT_SECRET` is unset outside production.
const DEVELOPMENT_SECRET: &str = "snapevent-development-secret-change-me!!";

/// Default session lifetime: one day.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;

/// JWT authentication configuration.
///
/// - `JWT_SECRET`: required in production, at least 32 characters
/// - `SESSION_TTL_SECS`: token lifetime, defaults to 86400
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_secs: i64,
}

impl JwtConfig {
    /// # Panics
    /// Panics if the secret is less than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= 32,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }

    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = match env_optional("JWT_SECRET") {
            Some(secret) => secret,
            None if Environment::from_env().is_production() => {
                return Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string()));
            }
            None => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEVELOPMENT_SECRET.to_string()
            }
        };

        if secret.len() < 32 {
            return Err(ConfigError::InvalidValue {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        let ttl_secs = env_parse("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        if ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "SESSION_TTL_SECS".to_string(),
                details: "must be positive".to_string(),
            });
        }

        Ok(Self { secret, ttl_secs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    fn test_jwt_config_new_valid() {
        let config = JwtConfig::new(SECRET);
        assert_eq!(config.secret, SECRET);
        assert_eq!(config.ttl_secs, DEFAULT_SESSION_TTL_SECS);
    }

    #[test]
    #[should_panic(expected = "JWT secret must be at least 32 characters")]
    fn test_jwt_config_new_too_short() {
        JwtConfig::new("short");
    }

    #[test]
    fn test_jwt_config_from_env_valid() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("SESSION_TTL_SECS", Some("600")),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, SECRET);
                assert_eq!(config.ttl_secs, 600);
            },
        );
    }

    #[test]
    fn test_jwt_config_missing_in_production() {
        temp_env::with_vars(
            [("JWT_SECRET", None), ("APP_ENV", Some("production"))],
            || {
                let err = JwtConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_SECRET"));
            },
        );
    }

    #[test]
    fn test_jwt_config_missing_in_development_uses_fallback() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", None::<&str>),
                ("APP_ENV", None),
                ("SESSION_TTL_SECS", None),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, DEVELOPMENT_SECRET);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_too_short() {
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("32 characters"));
        });
    }
}
