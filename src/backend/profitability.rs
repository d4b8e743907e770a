//! Customer and product profitability analysis.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::client::BackendClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfitability {
    pub id: String,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub total_revenue: String,
    pub direct_costs: String,
    pub labor_costs: String,
    pub overhead_allocated: String,
    pub gross_profit: String,
    pub net_profit: String,
    pub profit_margin_percent: String,
    pub lifetime_value: String,
    pub predicted_ltv: Option<String>,
    pub retention_probability: Option<String>,
    pub period_start: String,
    pub period_end: String,
    pub calculated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub description: String,
    pub category: String,
    pub base_price: String,
    pub cost_per_unit: String,
    pub total_revenue: String,
    pub total_sold: i64,
    pub gross_margin_percent: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Writable product fields. Prices are decimal strings.
#[derive(Debug, Clone, Serialize)]
pub struct ProductRequest {
    pub name: String,
    pub sku: String,
    pub description: String,
    pub category: String,
    pub base_price: String,
    pub cost_per_unit: String,
}

impl BackendClient {
    pub async fn customer_profitability(&self, org_id: &str) -> Result<Vec<CustomerProfitability>> {
        self.get_json(
            &format!("/api/orgs/{}/profitability/customer-profitability/", org_id),
            "Customer profitability fetch",
        )
        .await
    }

    pub async fn products(&self, org_id: &str) -> Result<Vec<Product>> {
        self.get_json(
            &format!("/api/orgs/{}/profitability/products/", org_id),
            "Product list fetch",
        )
        .await
    }

    pub async fn update_product(
        &self,
        org_id: &str,
        product_id: &str,
        req: &ProductRequest,
    ) -> Result<Product> {
        self.put_json(
            &format!("/api/orgs/{}/profitability/products/{}/", org_id, product_id),
            req,
            "Product update",
        )
        .await
    }
}
