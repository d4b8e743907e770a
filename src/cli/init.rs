use crate::core::AppConfig;
use crate::core::db::{async_db, initialize_db};
use anyhow::Result;
use std::fs;

pub async fn run(config: &AppConfig) -> Result<()> {
    println!("Initializing session db...");
    // Create the storage directory if it doesn't already exist
    fs::create_dir_all(&config.storage_path)
        .unwrap_or_else(|err| println!("Ignoring storage directory create failed: {}", err));

    let db = async_db(&config.db_path).await?;
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await?;
    println!("Finished initializing session db");

    Ok(())
}
