use crate::error::ApiError;
use crate::state::AppState;
use crate::store::NewOrder;
use axum::{Json, Router, extract::State, extract::rejection::JsonRejection, routing::post};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn routes() -> Router<AppState> {
    Router::new().route("/orders", post(ingest_order))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestedOrder {
    pub order_id: String,
    /// Line items stored for the order after replacement
    pub line_items: usize,
}

/// Upserts an order pushed by the commerce platform and replaces its line items.
#[utoipa::path(
    post,
    path = "/webhooks/orders",
    tag = "webhooks",
    request_body = NewOrder,
    responses(
        (status = 200, description = "Order stored", body = IngestedOrder),
        (status = 400, description = "Invalid order payload"),
        (status = 500, description = "Sales database error, nothing was written")
    )
)]
#[tracing::instrument(
    name = "POST /webhooks/orders",
    skip(state, payload),
    fields(order_id = tracing::field::Empty)
)]
pub async fn ingest_order(
    State(state): State<AppState>,
    payload: Result<Json<NewOrder>, JsonRejection>,
) -> Result<Json<IngestedOrder>, ApiError> {
    let Json(order) = payload?;
    tracing::Span::current().record("order_id", order.id.as_str());
    order.validate().map_err(ApiError::bad_request)?;

    let line_items = state.store.ingest_order(&order).await?;

    Ok(Json(IngestedOrder {
        order_id: order.id,
        line_items,
    }))
}
