use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::api::gateway::{parse_player_query, read_body, relay, ProxyRoute};
use crate::api::state::AppState;
use crate::api::ApiError;

/// `POST /api/analyze`: full analysis, relayed unchanged.
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = read_body(body)?;
    let query = parse_player_query(&body)?;
    let data = relay(&state, ProxyRoute::Analyze, &query).await?;
    Ok(Json(data))
}
