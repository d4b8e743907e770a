use anyhow::Result;

use super::open_session;
use crate::backend::BackendClient;
use crate::core::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    let client = BackendClient::new(open_session(config).await?);
    let org_id = client.org_id().await?;

    let invoices = client.invoices(&org_id).await?;
    if invoices.is_empty() {
        println!("No invoices");
        return Ok(());
    }
    for invoice in &invoices {
        println!(
            "{}  {}  {:>12}  due {}  {:?}{}",
            invoice.invoice_number,
            invoice.customer_name.as_deref().unwrap_or("-"),
            invoice.total_amount,
            invoice.due_date,
            invoice.status,
            if invoice.is_overdue { "  OVERDUE" } else { "" },
        );
    }

    Ok(())
}
