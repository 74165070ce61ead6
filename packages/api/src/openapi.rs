use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Retail Insights API",
        version = "1.0.0",
        description = "Store efficiency rankings and year-over-year product comparisons computed from the sales database."
    ),
    servers(
        (url = "/api", description = "Dashboard API")
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rankings", description = "Store efficiency rankings"),
        (name = "comparison", description = "Year-over-year product comparison"),
        (name = "webhooks", description = "Order ingestion from the commerce platform")
    ),
    paths(
        crate::routes::health::health,
        crate::routes::health::db_health,
        crate::routes::rankings::get_rankings,
        crate::routes::comparison::get_comparison,
        crate::routes::webhook::ingest_order,
    ),
    components(schemas(
        crate::routes::health::HealthResponse,
        crate::routes::health::DbHealthResponse,
        crate::routes::webhook::IngestedOrder,
        crate::store::NewOrder,
        crate::store::NewLineItem,
        crate::insights::DateRange,
        crate::insights::category::Category,
        crate::insights::ranking::RankingReport,
        crate::insights::ranking::StoreRanking,
        crate::insights::ranking::StoreAggregate,
        crate::insights::ranking::ChartData,
        crate::insights::ranking::ChartDataset,
        crate::insights::ranking::RankingSummary,
        crate::insights::comparison::ComparisonReport,
        crate::insights::comparison::ProductComparisonRow,
        crate::insights::comparison::ComparisonSummary,
        crate::insights::comparison::BrandSummary,
        crate::insights::comparison::ComparisonDateRanges,
    ))
)]
pub struct ApiDoc;

#[tracing::instrument(name = "GET /openapi.json")]
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
