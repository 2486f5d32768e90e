//! MongoDB collection setup

use domain_events::MongoEventRepository;
use domain_identity::MongoUserRepository;
use domain_uploads::MongoRecordRepository;
use mongodb::Database;
use tracing::info;

/// Initialize indexes for events, records and users
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoEventRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create event indexes: {}", e))?;

    MongoRecordRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create record indexes: {}", e))?;

    MongoUserRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create user indexes: {}", e))?;

    info!("Collection indexes created");
    Ok(())
}
