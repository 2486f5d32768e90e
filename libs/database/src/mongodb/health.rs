use mongodb::Database;
use mongodb::bson::doc;
use std::time::{Duration, Instant};

use crate::common::{DatabaseError, DatabaseResult};

/// Ping the database; returns the round-trip time.
pub async fn check_health(database: &Database) -> DatabaseResult<Duration> {
    let start = Instant::now();

    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;

    Ok(start.elapsed())
}
