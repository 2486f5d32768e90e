use axum_helpers::JwtConfig;
use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_optional, env_or_default, env_parse,
    server::ServerConfig,
};
use database::mongodb::MongoConfig;
use std::path::PathBuf;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Where events, records and users are kept
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    Memory,
    Mongodb,
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub storage: StorageBackend,
    /// Only read with the MongoDB backend
    pub mongodb: Option<MongoConfig>,
    /// Front-end origin encoded in share links and QR codes
    pub public_base_url: String,
    /// Origin of this API, used for blob URLs
    pub api_base_url: String,
    /// Filesystem blob root; blobs stay in memory when unset
    pub blob_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;
        let storage = env_parse("STORAGE_BACKEND", StorageBackend::Memory)?;
        let mongodb = match storage {
            StorageBackend::Mongodb => Some(MongoConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            jwt,
            storage,
            mongodb,
            public_base_url: base_url("PUBLIC_BASE_URL", "http://localhost:3000")?,
            api_base_url: base_url("API_BASE_URL", "http://localhost:8080")?,
            blob_dir: env_optional("BLOB_DIR").map(PathBuf::from),
        })
    }
}

fn base_url(key: &str, default: &str) -> Result<String, ConfigError> {
    let value = env_or_default(key, default);
    let trimmed = value.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            details: format!("'{}' must start with http:// or https://", value),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 7] = [
        "STORAGE_BACKEND",
        "PUBLIC_BASE_URL",
        "API_BASE_URL",
        "BLOB_DIR",
        "JWT_SECRET",
        "APP_ENV",
        "MONGODB_DATABASE",
    ];

    /// Every known variable unset except `overrides`
    fn env(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
        VARS.iter()
            .map(|key| {
                let value = overrides.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
                (*key, value)
            })
            .collect()
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(env(&[]), || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.storage, StorageBackend::Memory);
            assert!(config.mongodb.is_none());
            assert_eq!(config.public_base_url, "http://localhost:3000");
            assert_eq!(config.api_base_url, "http://localhost:8080");
            assert!(config.blob_dir.is_none());
        });
    }

    #[test]
    fn test_mongodb_backend_and_overrides() {
        let vars = env(&[
            ("STORAGE_BACKEND", "MongoDB"),
            ("MONGODB_DATABASE", "snap_test"),
            ("PUBLIC_BASE_URL", "https://snap.example.com/"),
            ("BLOB_DIR", "/var/lib/snapevent/blobs"),
        ]);

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.storage, StorageBackend::Mongodb);
            assert_eq!(config.mongodb.unwrap().database, "snap_test");
            assert_eq!(config.public_base_url, "https://snap.example.com");
            assert_eq!(
                config.blob_dir,
                Some(PathBuf::from("/var/lib/snapevent/blobs"))
            );
        });
    }

    #[test]
    fn test_rejects_unknown_backend_and_bad_url() {
        temp_env::with_vars(env(&[("STORAGE_BACKEND", "redis")]), || {
            assert!(Config::from_env().is_err());
        });

        temp_env::with_vars(env(&[("API_BASE_URL", "localhost:8080")]), || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("API_BASE_URL"));
        });
    }

    #[test]
    fn test_production_requires_jwt_secret() {
        temp_env::with_vars(env(&[("APP_ENV", "production")]), || {
            assert!(Config::from_env().is_err());
        });
    }
}
