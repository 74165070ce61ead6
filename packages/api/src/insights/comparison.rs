//! Year-over-year product comparison.
//!
//! Sales for the requested window and for the same window one calendar year
//! earlier arrive as two sets of per-key aggregates. They are merged by key
//! and enriched with the absolute and relative change plus the share of the
//! current-period total.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::DateRange;
use super::category::Category;
use super::format::percent_change;

/// Aggregated sales of one product (or one brand) inside one window.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub key: String,
    pub product_name: String,
    pub vendor: Option<String>,
    pub product_class: Option<String>,
    pub sales: f64,
    pub units: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchType {
    #[default]
    All,
    /// Only products with sales in both windows.
    Both,
}

impl MatchType {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "" | "all" => Ok(MatchType::All),
            "both" | "matched" | "both_periods" => Ok(MatchType::Both),
            other => Err(format!("Unknown matchType: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupBy {
    #[default]
    Product,
    Brand,
}

impl GroupBy {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "" | "product" => Ok(GroupBy::Product),
            "brand" | "vendor" => Ok(GroupBy::Brand),
            other => Err(format!("Unknown groupBy: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductComparisonRow {
    pub product_key: String,
    pub product_name: String,
    pub vendor: Option<String>,
    pub category: Category,
    pub this_year_sales: f64,
    pub last_year_sales: f64,
    pub this_year_units: i64,
    pub last_year_units: i64,
    pub percentage_change: f64,
    pub dollar_change: f64,
    pub percent_of_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub total_this_year_sales: f64,
    pub total_last_year_sales: f64,
    pub total_this_year_units: i64,
    pub total_last_year_units: i64,
    pub percentage_change: f64,
    pub dollar_change: f64,
    pub products_up: usize,
    pub products_down: usize,
    pub total_products: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandSummary {
    pub vendor: String,
    pub this_year_sales: f64,
    pub last_year_sales: f64,
    pub this_year_units: i64,
    pub last_year_units: i64,
    pub percentage_change: f64,
    pub dollar_change: f64,
    pub unique_products: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ComparisonDateRanges {
    pub current: DateRange,
    pub previous: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub data: Vec<ProductComparisonRow>,
    pub summary: ComparisonSummary,
    pub brand_summary: Option<BrandSummary>,
    pub date_ranges: ComparisonDateRanges,
}

#[derive(Default)]
struct KeyedPair {
    product_name: String,
    vendor: Option<String>,
    product_class: Option<String>,
    this_year_sales: f64,
    last_year_sales: f64,
    this_year_units: i64,
    last_year_units: i64,
}

impl KeyedPair {
    fn describe(&mut self, row: &ProductSales) {
        if self.product_name.is_empty() {
            self.product_name = row.product_name.clone();
        }
        if self.vendor.is_none() {
            self.vendor = row.vendor.clone();
        }
        if self.product_class.is_none() {
            self.product_class = row.product_class.clone();
        }
    }
}

/// Merges both windows by key and derives the change columns.
///
/// Rows without sales in either window are dropped. The result is ordered by
/// the size of the dollar change regardless of its sign, biggest first.
pub fn compare_periods(
    current: &[ProductSales],
    previous: &[ProductSales],
    grand_total: f64,
    match_type: MatchType,
) -> Vec<ProductComparisonRow> {
    let mut pairs: BTreeMap<&str, KeyedPair> = BTreeMap::new();

    // current rows describe the product first so renamed items show their new name
    for row in current {
        let pair = pairs.entry(row.key.as_str()).or_default();
        pair.describe(row);
        pair.this_year_sales += row.sales;
        pair.this_year_units += row.units;
    }
    for row in previous {
        let pair = pairs.entry(row.key.as_str()).or_default();
        pair.describe(row);
        pair.last_year_sales += row.sales;
        pair.last_year_units += row.units;
    }

    let mut rows: Vec<ProductComparisonRow> = pairs
        .into_iter()
        .filter(|(_, pair)| pair.this_year_sales != 0.0 || pair.last_year_sales != 0.0)
        .filter(|(_, pair)| {
            match_type == MatchType::All || (pair.this_year_sales > 0.0 && pair.last_year_sales > 0.0)
        })
        .map(|(key, pair)| ProductComparisonRow {
            product_key: key.to_string(),
            category: Category::classify(pair.product_class.as_deref()),
            product_name: pair.product_name,
            vendor: pair.vendor,
            this_year_sales: pair.this_year_sales,
            last_year_sales: pair.last_year_sales,
            this_year_units: pair.this_year_units,
            last_year_units: pair.last_year_units,
            percentage_change: percent_change(pair.this_year_sales, pair.last_year_sales),
            dollar_change: pair.this_year_sales - pair.last_year_sales,
            percent_of_total: if grand_total != 0.0 {
                pair.this_year_sales / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    rows.sort_by(|a, b| {
        b.dollar_change
            .abs()
            .total_cmp(&a.dollar_change.abs())
            .then_with(|| a.product_key.cmp(&b.product_key))
    });

    rows
}

pub fn summarize(rows: &[ProductComparisonRow]) -> ComparisonSummary {
    let this_year: f64 = rows.iter().map(|r| r.this_year_sales).sum();
    let last_year: f64 = rows.iter().map(|r| r.last_year_sales).sum();

    ComparisonSummary {
        total_this_year_sales: this_year,
        total_last_year_sales: last_year,
        total_this_year_units: rows.iter().map(|r| r.this_year_units).sum(),
        total_last_year_units: rows.iter().map(|r| r.last_year_units).sum(),
        percentage_change: percent_change(this_year, last_year),
        dollar_change: this_year - last_year,
        products_up: rows.iter().filter(|r| r.dollar_change > 0.0).count(),
        products_down: rows.iter().filter(|r| r.dollar_change < 0.0).count(),
        total_products: rows.len(),
    }
}

/// Collapses every row into one record for the filtered vendor.
pub fn brand_summary(vendor: &str, rows: &[ProductComparisonRow]) -> BrandSummary {
    let totals = summarize(rows);

    BrandSummary {
        vendor: vendor.to_string(),
        this_year_sales: totals.total_this_year_sales,
        last_year_sales: totals.total_last_year_sales,
        this_year_units: totals.total_this_year_units,
        last_year_units: totals.total_last_year_units,
        percentage_change: totals.percentage_change,
        dollar_change: totals.dollar_change,
        unique_products: rows.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales(key: &str, amount: f64, units: i64) -> ProductSales {
        ProductSales {
            key: key.to_string(),
            product_name: format!("Product {key}"),
            vendor: Some("Acme".to_string()),
            product_class: Some("Sneakers".to_string()),
            sales: amount,
            units,
        }
    }

    #[test]
    fn test_doubling_sales() {
        let rows = compare_periods(&[sales("A", 500.0, 5)], &[sales("A", 250.0, 3)], 500.0, MatchType::All);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].percentage_change, 100.0);
        assert_eq!(rows[0].dollar_change, 250.0);
        assert_eq!(rows[0].this_year_units, 5);
        assert_eq!(rows[0].last_year_units, 3);
        assert_eq!(rows[0].percent_of_total, 100.0);
        assert_eq!(rows[0].category, Category::Footwear);
    }

    #[test]
    fn test_new_product_counts_as_flat_hundred_percent() {
        let rows = compare_periods(&[sales("N", 100.0, 1)], &[], 100.0, MatchType::All);
        assert_eq!(rows[0].percentage_change, 100.0);
        assert!(rows[0].percentage_change.is_finite());
    }

    #[test]
    fn test_discontinued_product() {
        let rows = compare_periods(&[], &[sales("D", 300.0, 2)], 0.0, MatchType::All);
        assert_eq!(rows[0].percentage_change, -100.0);
        assert_eq!(rows[0].dollar_change, -300.0);
        assert_eq!(rows[0].percent_of_total, 0.0);
        assert_eq!(rows[0].product_name, "Product D");
    }

    #[test]
    fn test_zero_rows_dropped() {
        let rows = compare_periods(&[sales("Z", 0.0, 0)], &[sales("Z", 0.0, 0)], 0.0, MatchType::All);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_match_type_both_requires_sales_in_both_windows() {
        let current = [sales("A", 100.0, 1), sales("B", 50.0, 1)];
        let previous = [sales("A", 80.0, 1), sales("C", 40.0, 1)];

        let all = compare_periods(&current, &previous, 150.0, MatchType::All);
        assert_eq!(all.len(), 3);

        let both = compare_periods(&current, &previous, 150.0, MatchType::Both);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].product_key, "A");
    }

    #[test]
    fn test_sorted_by_absolute_dollar_change() {
        let current = [sales("A", 110.0, 1), sales("B", 0.0, 0), sales("C", 400.0, 4)];
        let previous = [sales("A", 100.0, 1), sales("B", 500.0, 5), sales("C", 100.0, 1)];
        let rows = compare_periods(&current, &previous, 510.0, MatchType::All);
        let keys: Vec<_> = rows.iter().map(|r| r.product_key.as_str()).collect();
        assert_eq!(keys, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_percent_of_total_never_exceeds_hundred() {
        let current = [sales("A", 120.0, 1), sales("B", 80.0, 1), sales("C", 50.0, 1)];
        let rows = compare_periods(&current, &[], 250.0, MatchType::All);
        let share: f64 = rows.iter().map(|r| r.percent_of_total).sum();
        assert!((share - 100.0).abs() < 1e-9);

        let rows = compare_periods(&current[..2], &[], 250.0, MatchType::All);
        let share: f64 = rows.iter().map(|r| r.percent_of_total).sum();
        assert!(share <= 100.0);
    }

    #[test]
    fn test_summary_and_brand_summary() {
        let current = [sales("A", 300.0, 3), sales("B", 100.0, 1)];
        let previous = [sales("A", 100.0, 1), sales("B", 200.0, 2)];
        let rows = compare_periods(&current, &previous, 400.0, MatchType::All);

        let summary = summarize(&rows);
        assert_eq!(summary.total_this_year_sales, 400.0);
        assert_eq!(summary.total_last_year_sales, 300.0);
        assert_eq!(summary.dollar_change, 100.0);
        assert_eq!(summary.products_up, 1);
        assert_eq!(summary.products_down, 1);
        assert_eq!(summary.total_products, 2);

        let brand = brand_summary("Acme", &rows);
        assert_eq!(brand.unique_products, 2);
        assert_eq!(brand.this_year_units, 4);
        assert_eq!(brand.last_year_units, 3);
        assert_eq!(brand.dollar_change, 100.0);
    }

    #[test]
    fn test_empty_summary_is_zeroed() {
        let summary = summarize(&[]);
        assert_eq!(summary, ComparisonSummary::default());
    }

    #[test]
    fn test_parse_options() {
        assert_eq!(MatchType::parse("all"), Ok(MatchType::All));
        assert_eq!(MatchType::parse("both"), Ok(MatchType::Both));
        assert!(MatchType::parse("some").is_err());
        assert_eq!(GroupBy::parse("brand"), Ok(GroupBy::Brand));
        assert_eq!(GroupBy::parse(""), Ok(GroupBy::Product));
    }
}
