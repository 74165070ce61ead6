use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseBackend, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, Set, Statement, TransactionTrait, Value,
};

use super::{NewOrder, ProductFilter, RetailStore, StoreError};
use crate::config::AnalyticsConfig;
use crate::entity::{line_item, order, prelude::*};
use crate::insights::DateWindow;
use crate::insights::comparison::{GroupBy, ProductSales};
use crate::insights::ranking::{SalesRecord, VisitorRecord};

const VISITOR_DAYS_SQL: &str = r#"
    SELECT
        dc.location                                   AS location,
        dc.counted_at::date                           AS day,
        COALESCE(SUM(dc.visitors), 0)::bigint         AS visitors
    FROM door_counts dc
    WHERE dc.counted_at::date BETWEEN $1 AND $2
      AND dc.location IS NOT NULL
      AND dc.location <> $3
    GROUP BY dc.location, dc.counted_at::date
"#;

const SALES_DAYS_SQL: &str = r#"
    SELECT
        o.location                                    AS location,
        o.created_at::date                            AS day,
        COUNT(*)::bigint                              AS transactions,
        COALESCE(SUM(o.total_price), 0)::float8       AS revenue,
        COALESCE(AVG(o.total_price), 0)::float8       AS avg_transaction_value,
        COUNT(DISTINCT o.customer_id)::bigint         AS unique_customers
    FROM orders o
    WHERE o.created_at::date BETWEEN $1 AND $2
      AND o.financial_status = $3
      AND o.location IS NOT NULL
      AND o.location <> ''
      AND o.location <> $4
    GROUP BY o.location, o.created_at::date
"#;

const PRODUCT_KEY: &str = "COALESCE(NULLIF(li.upc, ''), NULLIF(li.sku, ''), li.product_name)";
const BRAND_KEY: &str = "COALESCE(NULLIF(li.vendor, ''), 'Unknown')";

#[derive(Debug, FromQueryResult)]
struct VisitorDayRow {
    location: String,
    day: NaiveDate,
    visitors: i64,
}

#[derive(Debug, FromQueryResult)]
struct SalesDayRow {
    location: String,
    day: NaiveDate,
    transactions: i64,
    revenue: f64,
    avg_transaction_value: f64,
    unique_customers: i64,
}

#[derive(Debug, FromQueryResult)]
struct ProductSalesRow {
    key: String,
    product_name: Option<String>,
    vendor: Option<String>,
    product_class: Option<String>,
    sales: f64,
    units: i64,
}

#[derive(Debug, FromQueryResult)]
struct TotalRow {
    total: f64,
}

/// Accumulates a WHERE clause together with its positional `$n` values.
struct Conditions {
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl Conditions {
    fn new() -> Self {
        Self {
            clauses: Vec::new(),
            values: Vec::new(),
        }
    }

    fn bind(&mut self, value: impl Into<Value>) -> String {
        self.values.push(value.into());
        format!("${}", self.values.len())
    }

    fn bind_list<I, V>(&mut self, values: I) -> String
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        values
            .into_iter()
            .map(|v| self.bind(v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn push(&mut self, clause: String) {
        self.clauses.push(clause);
    }

    fn where_clause(&self) -> String {
        self.clauses.join("\n      AND ")
    }
}

pub struct PgRetailStore {
    db: DatabaseConnection,
    config: AnalyticsConfig,
}

impl PgRetailStore {
    pub fn new(db: DatabaseConnection, config: AnalyticsConfig) -> Self {
        Self { db, config }
    }

    /// Line item conditions for one window; `$1`/`$2` are always the window bounds.
    fn line_item_conditions(&self, window: DateWindow, filter: &ProductFilter) -> Conditions {
        let mut conditions = Conditions::new();

        let start = conditions.bind(window.start);
        let end = conditions.bind(window.end);
        conditions.push(format!("o.created_at::date BETWEEN {start} AND {end}"));

        let paid = conditions.bind(self.config.paid_status.clone());
        conditions.push(format!("o.financial_status = {paid}"));

        if !filter.locations.is_empty() {
            let list = conditions.bind_list(filter.locations.iter().cloned());
            conditions.push(format!("o.location IN ({list})"));
        }

        if let Some(vendor) = &filter.vendor {
            let vendor = conditions.bind(vendor.clone());
            conditions.push(format!("li.vendor = {vendor}"));
        }

        if let Some(category) = filter.category {
            let classes = category.classes();
            if classes.is_empty() {
                conditions.push("FALSE".to_string());
            } else {
                let list = conditions.bind_list(classes.into_iter().map(str::to_string));
                conditions.push(format!("LOWER(TRIM(li.product_class)) IN ({list})"));
            }
        }

        conditions
    }
}

fn product_sales_sql(group_by: GroupBy, where_clause: &str) -> String {
    let (key, name, class) = match group_by {
        GroupBy::Product => (PRODUCT_KEY, "MAX(li.product_name)", "MAX(li.product_class)"),
        GroupBy::Brand => (BRAND_KEY, BRAND_KEY, "NULL::text"),
    };

    format!(
        r#"
    SELECT
        {key}                                         AS key,
        {name}                                        AS product_name,
        MAX(li.vendor)                                AS vendor,
        {class}                                       AS product_class,
        COALESCE(SUM(li.price * li.quantity), 0)::float8 AS sales,
        COALESCE(SUM(li.quantity), 0)::bigint         AS units
    FROM line_items li
    JOIN orders o ON o.id = li.order_id
    WHERE {where_clause}
    GROUP BY 1
"#
    )
}

fn period_total_sql(where_clause: &str) -> String {
    format!(
        r#"
    SELECT COALESCE(SUM(li.price * li.quantity), 0)::float8 AS total
    FROM line_items li
    JOIN orders o ON o.id = li.order_id
    WHERE {where_clause}
"#
    )
}

#[async_trait]
impl RetailStore for PgRetailStore {
    async fn visitor_days(&self, window: DateWindow) -> Result<Vec<VisitorRecord>, StoreError> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            VISITOR_DAYS_SQL,
            [
                window.start.into(),
                window.end.into(),
                self.config.warehouse_location.clone().into(),
            ],
        );

        let rows = VisitorDayRow::find_by_statement(stmt).all(&self.db).await?;
        tracing::debug!(rows = rows.len(), "loaded visitor days");

        Ok(rows
            .into_iter()
            .map(|row| VisitorRecord {
                location: row.location,
                date: row.day,
                visitor_count: row.visitors,
            })
            .collect())
    }

    async fn sales_days(&self, window: DateWindow) -> Result<Vec<SalesRecord>, StoreError> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            SALES_DAYS_SQL,
            [
                window.start.into(),
                window.end.into(),
                self.config.paid_status.clone().into(),
                self.config.warehouse_location.clone().into(),
            ],
        );

        let rows = SalesDayRow::find_by_statement(stmt).all(&self.db).await?;
        tracing::debug!(rows = rows.len(), "loaded sales days");

        Ok(rows
            .into_iter()
            .map(|row| SalesRecord {
                location: row.location,
                date: row.day,
                transaction_count: row.transactions,
                revenue: row.revenue,
                avg_transaction_value: row.avg_transaction_value,
                unique_customers: row.unique_customers,
            })
            .collect())
    }

    async fn product_sales(
        &self,
        window: DateWindow,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductSales>, StoreError> {
        let conditions = self.line_item_conditions(window, filter);
        let sql = product_sales_sql(filter.group_by, &conditions.where_clause());
        let stmt =
            Statement::from_sql_and_values(DatabaseBackend::Postgres, sql, conditions.values);

        let rows = ProductSalesRow::find_by_statement(stmt)
            .all(&self.db)
            .await?;
        tracing::debug!(rows = rows.len(), start = %window.start, "loaded product sales");

        Ok(rows
            .into_iter()
            .map(|row| ProductSales {
                product_name: row.product_name.unwrap_or_else(|| row.key.clone()),
                key: row.key,
                vendor: row.vendor,
                product_class: row.product_class,
                sales: row.sales,
                units: row.units,
            })
            .collect())
    }

    async fn period_total(
        &self,
        window: DateWindow,
        filter: &ProductFilter,
    ) -> Result<f64, StoreError> {
        let conditions = self.line_item_conditions(window, filter);
        let sql = period_total_sql(&conditions.where_clause());
        let stmt =
            Statement::from_sql_and_values(DatabaseBackend::Postgres, sql, conditions.values);

        let total = TotalRow::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .map(|row| row.total)
            .unwrap_or(0.0);

        Ok(total)
    }

    async fn ingest_order(&self, new_order: &NewOrder) -> Result<usize, StoreError> {
        let now = Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let existing = Order::find_by_id(new_order.id.clone()).one(&txn).await?;

        if let Some(existing) = existing {
            let mut active: order::ActiveModel = existing.into();
            active.order_number = Set(new_order.order_number.clone());
            active.location = Set(new_order.location.clone());
            active.financial_status = Set(new_order.financial_status.clone());
            active.customer_id = Set(new_order.customer_id.clone());
            active.total_price = Set(new_order.total_price);
            active.created_at = Set(new_order.created_at.naive_utc());
            active.updated_at = Set(now);
            active.update(&txn).await?;

            LineItem::delete_many()
                .filter(line_item::Column::OrderId.eq(&new_order.id))
                .exec(&txn)
                .await?;
        } else {
            let active = order::ActiveModel {
                id: Set(new_order.id.clone()),
                order_number: Set(new_order.order_number.clone()),
                location: Set(new_order.location.clone()),
                financial_status: Set(new_order.financial_status.clone()),
                customer_id: Set(new_order.customer_id.clone()),
                total_price: Set(new_order.total_price),
                created_at: Set(new_order.created_at.naive_utc()),
                updated_at: Set(now),
            };
            active.insert(&txn).await?;
        }

        let items: Vec<line_item::ActiveModel> = new_order
            .line_items
            .iter()
            .map(|item| line_item::ActiveModel {
                id: Set(item.id.clone()),
                order_id: Set(new_order.id.clone()),
                sku: Set(item.sku.clone()),
                upc: Set(item.upc.clone()),
                product_name: Set(item.product_name.clone()),
                vendor: Set(item.vendor.clone()),
                product_class: Set(item.product_class.clone()),
                quantity: Set(item.quantity),
                price: Set(item.price),
            })
            .collect();

        let written = items.len();
        if !items.is_empty() {
            LineItem::insert_many(items).exec(&txn).await?;
        }

        txn.commit().await?;
        tracing::info!(order_id = %new_order.id, line_items = written, "ingested order");

        Ok(written)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.ping().await?;
        Ok(())
    }
}
