use crate::error::ApiError;
use crate::insights::ranking::{
    self, DEFAULT_MIN_ORDERS, DEFAULT_MIN_VISITORS, RankingReport, RankingThresholds,
};
use crate::routes::{parse_count, parse_window};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RankingsQuery {
    /// First day of the window (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Last day of the window, inclusive (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// Minimum visitors for a store to be ranked, defaults to 100
    pub min_visitors: Option<String>,
    /// Minimum paid orders for a store to be ranked, defaults to 5
    pub min_orders: Option<String>,
}

#[utoipa::path(
    get,
    path = "/rankings",
    tag = "rankings",
    params(RankingsQuery),
    responses(
        (status = 200, description = "Stores ordered by efficiency score", body = RankingReport),
        (status = 400, description = "Missing or invalid query parameters"),
        (status = 500, description = "Sales database error")
    )
)]
#[tracing::instrument(name = "GET /rankings", skip(state))]
pub async fn get_rankings(
    State(state): State<AppState>,
    query: Result<Query<RankingsQuery>, QueryRejection>,
) -> Result<Json<RankingReport>, ApiError> {
    let Query(query) = query?;
    let window = parse_window(query.start_date.as_deref(), query.end_date.as_deref())?;
    let thresholds = RankingThresholds {
        min_visitors: parse_count(
            "minVisitors",
            query.min_visitors.as_deref(),
            DEFAULT_MIN_VISITORS,
        )?,
        min_orders: parse_count("minOrders", query.min_orders.as_deref(), DEFAULT_MIN_ORDERS)?,
    };

    let visitors = state.store.visitor_days(window).await?;
    let sales = state.store.sales_days(window).await?;

    let report = ranking::build_report(&visitors, &sales, thresholds, window);
    tracing::debug!(
        visitor_rows = visitors.len(),
        sales_rows = sales.len(),
        ranked = report.rankings.len(),
        "Built store rankings"
    );

    Ok(Json(report))
}
