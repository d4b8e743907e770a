use anyhow::{Result, anyhow};
use std::path::Path;

use super::open_session;
use crate::backend::BackendClient;
use crate::core::AppConfig;

pub async fn run(config: &AppConfig, upload: Option<String>) -> Result<()> {
    let client = BackendClient::new(open_session(config).await?);
    let org_id = client.org_id().await?;

    if let Some(path) = upload {
        let path = Path::new(&path);
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("Invalid file path: {}", path.display()))?;
        let bytes = tokio::fs::read(path).await?;

        println!("Uploading {} for capture...", filename);
        let uploaded = client.upload_bill(&org_id, filename, bytes).await?;
        let bill = uploaded.bill;
        println!(
            "Captured bill {} from {} for {}",
            bill.bill_number, bill.vendor_name, bill.total_amount
        );
        if let Some(confidence) = bill.ocr_confidence {
            println!("OCR confidence: {}", confidence);
        }
        return Ok(());
    }

    let bills = client.bills(&org_id).await?;
    if bills.is_empty() {
        println!("No bills");
        return Ok(());
    }
    for bill in &bills {
        println!(
            "{}  {}  {:>12}  due {}  {:?}{}",
            bill.bill_number,
            bill.vendor_name,
            bill.total_amount,
            bill.due_date,
            bill.status,
            if bill.is_overdue { "  OVERDUE" } else { "" },
        );
    }

    Ok(())
}
