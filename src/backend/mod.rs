pub mod analytics;
pub mod billpay;
mod client;
pub mod forecast;
pub mod health;
pub mod invoices;
pub mod planning;
pub mod profitability;
pub mod reports;
pub mod reserves;

pub use client::BackendClient;
