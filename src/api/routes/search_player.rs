use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;

use crate::api::gateway::{
    comparison_payload, parse_player_query, read_body, relay, PlayerComparison, ProxyRoute,
};
use crate::api::state::AppState;
use crate::api::ApiError;

/// `POST /api/search-player`: look up an opponent for the versus view.
pub async fn search_player(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PlayerComparison>, ApiError> {
    let body = read_body(body)?;
    let query = parse_player_query(&body)?;
    let data = relay(&state, ProxyRoute::SearchPlayer, &query).await?;
    Ok(Json(comparison_payload(&query, &data)?))
}
