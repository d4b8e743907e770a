use anyhow::Result;

use super::open_session;
use crate::backend::BackendClient;
use crate::core::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    let client = BackendClient::new(open_session(config).await?);
    let org_id = client.org_id().await?;

    let vendors = client.vendors(&org_id).await?;
    if vendors.is_empty() {
        println!("No vendors");
        return Ok(());
    }
    for vendor in &vendors {
        println!(
            "{}  {}  {} bills totaling {}  ({} on time)",
            vendor.name,
            vendor.category,
            vendor.total_bills,
            vendor.total_paid,
            vendor.on_time_payment_rate,
        );
    }

    Ok(())
}
