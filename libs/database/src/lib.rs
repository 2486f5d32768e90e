//! Document store connectivity for SnapEvent.
//!
//! # Features
//!
//! - `mongodb` (default): MongoDB connector, health check
//! - `config`: `core_config::FromEnv` for [`mongodb::MongoConfig`]
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_with_retry};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "snapevent");
//! let db = connect_with_retry(&config, None).await?;
//! let events = db.collection::<Document>("events");
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
