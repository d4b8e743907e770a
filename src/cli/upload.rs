use anyhow::Result;
use std::path::Path;

use crate::chat::ChatServiceClient;
use crate::core::AppConfig;

pub async fn run(config: &AppConfig, path: &str) -> Result<()> {
    let client = ChatServiceClient::new(config);

    let uploaded = client.upload(Path::new(path)).await?;
    println!(
        "Uploaded {} ({}, {} preview records)",
        uploaded.filename, uploaded.detected_type, uploaded.preview_records
    );
    if let Some(message) = &uploaded.message {
        println!("{}", message);
    }

    // Kick off parsing right away, the same flow the dashboard uses
    let parsed = client.parse(&uploaded.upload_id, None).await?;
    println!("Parse task {}: {}", parsed.task_id, parsed.status);
    if let Some(records) = &parsed.records {
        println!("{} records parsed", records.len());
    }
    if let Some(message) = &parsed.message {
        println!("{}", message);
    }

    Ok(())
}
