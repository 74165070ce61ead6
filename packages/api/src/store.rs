//! Data access seam between the HTTP handlers and the sales database.
//!
//! Handlers only see [`RetailStore`]; the Postgres implementation lives in
//! [`postgres`] and every query it issues is parameterized.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::insights::DateWindow;
use crate::insights::category::Category;
use crate::insights::comparison::{GroupBy, ProductSales};
use crate::insights::ranking::{SalesRecord, VisitorRecord};

pub mod postgres;

pub use postgres::PgRetailStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Filters shared by the product sales and period total queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Store codes to include, empty means every store
    pub locations: Vec<String>,
    pub vendor: Option<String>,
    pub category: Option<Category>,
    pub group_by: GroupBy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItem {
    pub id: String,
    pub sku: Option<String>,
    pub upc: Option<String>,
    pub product_name: String,
    pub vendor: Option<String>,
    pub product_class: Option<String>,
    pub quantity: i32,
    pub price: f64,
}

/// Order as delivered by the commerce platform's order webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub id: String,
    pub order_number: Option<String>,
    pub location: Option<String>,
    pub financial_status: String,
    pub customer_id: Option<String>,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub line_items: Vec<NewLineItem>,
}

impl NewOrder {
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("order id must not be empty".to_string());
        }
        if self.financial_status.trim().is_empty() {
            return Err("financialStatus must not be empty".to_string());
        }
        if let Some(item) = self.line_items.iter().find(|i| i.id.trim().is_empty()) {
            return Err(format!("line item of {} has an empty id", item.product_name));
        }
        if let Some(item) = self.line_items.iter().find(|i| i.quantity < 0) {
            return Err(format!("line item {} has a negative quantity", item.id));
        }
        let mut seen = HashSet::new();
        for item in &self.line_items {
            if !seen.insert(item.id.as_str()) {
                return Err(format!("line item {} appears more than once", item.id));
            }
        }
        Ok(())
    }
}

#[async_trait]
pub trait RetailStore: Send + Sync {
    /// Door-counter visits per (location, day), warehouse and unassigned
    /// readings excluded.
    async fn visitor_days(&self, window: DateWindow) -> Result<Vec<VisitorRecord>, StoreError>;

    /// Paid order totals per (location, day), warehouse and unassigned
    /// orders excluded.
    async fn sales_days(&self, window: DateWindow) -> Result<Vec<SalesRecord>, StoreError>;

    /// Paid line item sales per product key (or vendor) inside the window.
    async fn product_sales(
        &self,
        window: DateWindow,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductSales>, StoreError>;

    /// Paid line item sales inside the window with the same filters, ungrouped.
    async fn period_total(&self, window: DateWindow, filter: &ProductFilter)
    -> Result<f64, StoreError>;

    /// Stores an order and replaces its line items atomically. Returns the
    /// number of line items written.
    async fn ingest_order(&self, order: &NewOrder) -> Result<usize, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
