use crate::error::ApiError;
use crate::insights::DateRange;
use crate::insights::category::Category;
use crate::insights::comparison::{
    self, ComparisonDateRanges, ComparisonReport, GroupBy, MatchType,
};
use crate::routes::parse_window;
use crate::state::AppState;
use crate::store::ProductFilter;
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use utoipa::IntoParams;

pub const ALL_STORES: &str = "all_stores";
pub const ALL_VENDORS: &str = "all";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ComparisonQuery {
    /// First day of the current window (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Last day of the current window, inclusive (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// Comma-separated store codes or "all_stores"
    pub stores: Option<String>,
    /// Vendor name or "all"
    pub vendor: Option<String>,
    /// "footwear", "apparel", "accessories" or "all"
    pub category: Option<String>,
    /// "all" or "both" (only products sold in both windows)
    pub match_type: Option<String>,
    /// "product" or "brand"
    pub group_by: Option<String>,
}

fn parse_stores(value: Option<&str>) -> Vec<String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_STORES) {
        return Vec::new();
    }

    let mut stores: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    stores.sort();
    stores.dedup();
    stores
}

fn parse_vendor(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_VENDORS))
        .map(str::to_string)
}

impl ComparisonQuery {
    fn filter(&self) -> Result<ProductFilter, ApiError> {
        let category = Category::parse_filter(self.category.as_deref().unwrap_or_default())
            .map_err(ApiError::bad_request)?;
        let group_by =
            GroupBy::parse(self.group_by.as_deref().unwrap_or_default()).map_err(ApiError::bad_request)?;

        Ok(ProductFilter {
            locations: parse_stores(self.stores.as_deref()),
            vendor: parse_vendor(self.vendor.as_deref()),
            category,
            group_by,
        })
    }
}

#[utoipa::path(
    get,
    path = "/ly-comparison",
    tag = "comparison",
    params(ComparisonQuery),
    responses(
        (status = 200, description = "Per-product sales against the same window last year", body = ComparisonReport),
        (status = 400, description = "Missing or invalid query parameters"),
        (status = 500, description = "Sales database error")
    )
)]
#[tracing::instrument(name = "GET /ly-comparison", skip(state))]
pub async fn get_comparison(
    State(state): State<AppState>,
    query: Result<Query<ComparisonQuery>, QueryRejection>,
) -> Result<Json<ComparisonReport>, ApiError> {
    let Query(query) = query?;
    let current = parse_window(query.start_date.as_deref(), query.end_date.as_deref())?;
    let previous = current.prior_year();
    let filter = query.filter()?;
    let match_type =
        MatchType::parse(query.match_type.as_deref().unwrap_or_default()).map_err(ApiError::bad_request)?;

    let this_year = state.store.product_sales(current, &filter).await?;
    let last_year = state.store.product_sales(previous, &filter).await?;
    let grand_total = state.store.period_total(current, &filter).await?;

    let data = comparison::compare_periods(&this_year, &last_year, grand_total, match_type);
    let summary = comparison::summarize(&data);
    let brand_summary = filter
        .vendor
        .as_deref()
        .map(|vendor| comparison::brand_summary(vendor, &data));

    Ok(Json(ComparisonReport {
        data,
        summary,
        brand_summary,
        date_ranges: ComparisonDateRanges {
            current: DateRange::from(current),
            previous: DateRange::from(previous),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stores() {
        assert!(parse_stores(None).is_empty());
        assert!(parse_stores(Some("all_stores")).is_empty());
        assert_eq!(
            parse_stores(Some("UPT, DTN,,UPT")),
            vec!["DTN".to_string(), "UPT".to_string()]
        );
    }

    #[test]
    fn test_parse_vendor() {
        assert_eq!(parse_vendor(Some("all")), None);
        assert_eq!(parse_vendor(Some("  ")), None);
        assert_eq!(parse_vendor(Some("Acme")), Some("Acme".to_string()));
    }

    #[test]
    fn test_filter_rejects_unknown_category() {
        let query = ComparisonQuery {
            category: Some("hats".to_string()),
            ..Default::default()
        };
        assert!(query.filter().is_err());

        let query = ComparisonQuery {
            category: Some("footwear".to_string()),
            group_by: Some("brand".to_string()),
            ..Default::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.category, Some(Category::Footwear));
        assert_eq!(filter.group_by, GroupBy::Brand);
    }
}
