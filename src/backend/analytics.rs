//! Revenue and expense analytics series for the dashboards.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::client::BackendClient;

#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange<'a> {
    pub start_date: Option<&'a str>,
    pub end_date: Option<&'a str>,
}

impl DateRange<'_> {
    /// Query string for the range, starting with `?` when non-empty.
    fn to_query(self) -> String {
        let mut params = Vec::new();
        if let Some(start) = self.start_date {
            params.push(format!("start_date={}", urlencoding::encode(start)));
        }
        if let Some(end) = self.end_date {
            params.push(format!("end_date={}", urlencoding::encode(end)));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueTrendPoint {
    pub period: String,
    pub revenue: f64,
    pub expenses: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub category: String,
    pub amount: f64,
    pub transaction_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

impl BackendClient {
    pub async fn revenue_trends(
        &self,
        org_id: &str,
        range: DateRange<'_>,
    ) -> Result<Vec<RevenueTrendPoint>> {
        self.get_json(
            &format!(
                "/api/orgs/{}/analytics/revenue-trends/{}",
                org_id,
                range.to_query()
            ),
            "Revenue trends fetch",
        )
        .await
    }

    pub async fn expense_analysis(
        &self,
        org_id: &str,
        range: DateRange<'_>,
    ) -> Result<Vec<ExpenseCategory>> {
        self.get_json(
            &format!(
                "/api/orgs/{}/analytics/expense-analysis/{}",
                org_id,
                range.to_query()
            ),
            "Expense analysis fetch",
        )
        .await
    }

    pub async fn category_distribution(
        &self,
        org_id: &str,
        range: DateRange<'_>,
    ) -> Result<Vec<CategorySlice>> {
        self.get_json(
            &format!(
                "/api/orgs/{}/analytics/category-distribution/{}",
                org_id,
                range.to_query()
            ),
            "Category distribution fetch",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_query() {
        let empty = DateRange::default();
        assert_eq!(empty.to_query(), "");

        let full = DateRange {
            start_date: Some("2026-01-01"),
            end_date: Some("2026-06-30"),
        };
        assert_eq!(
            full.to_query(),
            "?start_date=2026-01-01&end_date=2026-06-30"
        );

        let open_ended = DateRange {
            start_date: Some("2026-01-01"),
            end_date: None,
        };
        assert_eq!(open_ended.to_query(), "?start_date=2026-01-01");
    }
}
