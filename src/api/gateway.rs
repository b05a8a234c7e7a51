//! Request validation and upstream relay shared by the proxy routes.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::PlayerQuery;
use crate::upstream::{with_deadline, UpstreamError};

const MISSING_FIELDS: &str = "Missing required fields: summonerName and tag are required";
const WRONG_TYPES: &str = "Invalid field types: summonerName and tag must be strings";
const EMPTY_FIELDS: &str = "Empty fields: summonerName and tag cannot be empty";
const MALFORMED_JSON: &str = "Invalid JSON format in request body";
const BODY_TOO_LARGE: &str = "Request body is too large";
const NOT_CONFIGURED: &str = "Service configuration error";
const UNREACHABLE: &str = "Failed to connect to game data service";
const INVALID_UPSTREAM_JSON: &str = "Invalid response from game data service";
const PLAYER_NOT_FOUND: &str = "Player not found. Please check the summoner name and tag.";
const INVALID_RIOT_ID: &str = "Invalid player name or tag format.";
const TOO_MANY_REQUESTS: &str = "Too many requests. Please wait a moment and try again.";
const GAME_SERVERS_DOWN: &str = "Game servers are temporarily unavailable.";
const INCOMPLETE_PLAYER_DATA: &str = "Incomplete player data received";

/// The two proxy flavours. They share every rule except deadline, wording
/// and the search projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyRoute {
    Analyze,
    SearchPlayer,
}

impl ProxyRoute {
    pub fn deadline(&self, state: &AppState) -> std::time::Duration {
        match self {
            ProxyRoute::Analyze => state.timeouts.analyze,
            ProxyRoute::SearchPlayer => state.timeouts.search,
        }
    }

    pub fn timeout_message(&self) -> &'static str {
        match self {
            ProxyRoute::Analyze => "Request timeout. Please try again.",
            ProxyRoute::SearchPlayer => "Search request timeout. Please try again.",
        }
    }

    /// Used when upstream fails without a recognised status or message.
    pub fn failure_message(&self) -> &'static str {
        match self {
            ProxyRoute::Analyze => "Failed to retrieve player data",
            ProxyRoute::SearchPlayer => "Failed to find player",
        }
    }

    pub fn invalid_format_message(&self) -> &'static str {
        match self {
            ProxyRoute::Analyze => "Invalid data format received",
            ProxyRoute::SearchPlayer => "Invalid player data format received",
        }
    }

    pub fn internal_message(&self) -> &'static str {
        match self {
            ProxyRoute::Analyze => "An unexpected error occurred. Please try again later.",
            ProxyRoute::SearchPlayer => {
                "An unexpected error occurred while searching for the player. Please try again later."
            }
        }
    }
}

impl std::fmt::Display for ProxyRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxyRoute::Analyze => write!(f, "analyze"),
            ProxyRoute::SearchPlayer => write!(f, "search-player"),
        }
    }
}

/// Treat JSON null the same as an absent field.
fn present<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|v| !v.is_null())
}

/// Turn a failed body read into a JSON error instead of axum's plain-text one.
pub fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(BODY_TOO_LARGE.to_string())
        } else {
            ApiError::BadRequest(MALFORMED_JSON.to_string())
        }
    })
}

/// Validate a raw request body into a trimmed `PlayerQuery`.
pub fn parse_player_query(body: &[u8]) -> Result<PlayerQuery, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        warn!("Failed to parse request body: {}", e);
        ApiError::BadRequest(MALFORMED_JSON.to_string())
    })?;

    let (name, tag) = match (present(&value, "summonerName"), present(&value, "tag")) {
        (Some(name), Some(tag)) => (name, tag),
        _ => return Err(ApiError::BadRequest(MISSING_FIELDS.to_string())),
    };

    let (name, tag) = match (name.as_str(), tag.as_str()) {
        (Some(name), Some(tag)) => (name, tag),
        _ => return Err(ApiError::BadRequest(WRONG_TYPES.to_string())),
    };

    if name.trim().is_empty() || tag.trim().is_empty() {
        return Err(ApiError::BadRequest(EMPTY_FIELDS.to_string()));
    }

    Ok(PlayerQuery::new(name, tag))
}

/// Map a non-2xx upstream reply to the client-facing error.
pub fn map_upstream_failure(route: ProxyRoute, status: u16, data: &Value) -> ApiError {
    match status {
        404 => ApiError::NotFound(PLAYER_NOT_FOUND.to_string()),
        400 => ApiError::BadRequest(INVALID_RIOT_ID.to_string()),
        429 => ApiError::RateLimited(TOO_MANY_REQUESTS.to_string()),
        503 => ApiError::ServiceUnavailable(GAME_SERVERS_DOWN.to_string()),
        _ => match data.get("error").and_then(Value::as_str) {
            Some(message) if !message.is_empty() => ApiError::Upstream {
                status,
                message: message.to_string(),
            },
            _ => ApiError::Upstream {
                status: 500,
                message: route.failure_message().to_string(),
            },
        },
    }
}

/// Send the query upstream and return its JSON object body.
///
/// The configuration check happens before any network activity.
pub async fn relay(state: &AppState, route: ProxyRoute, query: &PlayerQuery) -> Result<Value, ApiError> {
    let service = state.upstream.as_ref().ok_or_else(|| {
        error!("Analysis endpoint not configured");
        ApiError::ServiceUnavailable(NOT_CONFIGURED.to_string())
    })?;

    info!("{}: calling {} for {}", route, service.name(), query);

    let deadline = route.deadline(state);
    let reply = with_deadline(deadline, service.analyze(query))
        .await
        .map_err(|e| match e {
            UpstreamError::Timeout(_) => {
                error!("{}: upstream timed out after {:?}", route, deadline);
                ApiError::GatewayTimeout(route.timeout_message().to_string())
            }
            UpstreamError::Unreachable(reason) => {
                error!("{}: upstream fetch error: {}", route, reason);
                ApiError::ServiceUnavailable(UNREACHABLE.to_string())
            }
        })?;

    let data: Value = serde_json::from_slice(&reply.body).map_err(|e| {
        error!("{}: failed to parse upstream response: {}", route, e);
        ApiError::BadGateway(INVALID_UPSTREAM_JSON.to_string())
    })?;

    info!("{}: upstream responded {}", route, reply.status);

    if !reply.is_success() {
        warn!("{}: upstream failed with status {}: {}", route, reply.status, data);
        return Err(map_upstream_failure(route, reply.status.as_u16(), &data));
    }

    if !data.is_object() {
        error!("{}: upstream body is not an object", route);
        return Err(ApiError::BadGateway(route.invalid_format_message().to_string()));
    }

    Ok(data)
}

/// Champion shown on the comparison card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopChampion {
    pub name: Value,
    pub image: Value,
}

/// Minimal payload for the versus comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerComparison {
    pub name: String,
    pub summary: Value,
    pub top_champion: Option<TopChampion>,
}

/// Narrow a full analysis down to the comparison payload.
pub fn comparison_payload(query: &PlayerQuery, data: &Value) -> Result<PlayerComparison, ApiError> {
    let summary = present(data, "summary").ok_or_else(|| {
        error!("Missing summary data for {}", query);
        ApiError::BadGateway(INCOMPLETE_PLAYER_DATA.to_string())
    })?;

    let top_champion = data
        .get("matches")
        .and_then(Value::as_array)
        .and_then(|matches| matches.first())
        .map(|first| TopChampion {
            name: first.get("champion").cloned().unwrap_or(Value::Null),
            image: first.get("champion_img").cloned().unwrap_or(Value::Null),
        });

    Ok(PlayerComparison {
        name: query.riot_id(),
        summary: summary.clone(),
        top_champion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bad_request_message(body: &str) -> String {
        match parse_player_query(body.as_bytes()) {
            Err(ApiError::BadRequest(message)) => message,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_valid_query_trims() {
        let query = parse_player_query(br#"{"summonerName": " Faker ", "tag": "KR1 "}"#).unwrap();
        assert_eq!(query, PlayerQuery::new("Faker", "KR1"));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert_eq!(bad_request_message("{not json"), MALFORMED_JSON);
        assert_eq!(bad_request_message(""), MALFORMED_JSON);
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert_eq!(bad_request_message("{}"), MISSING_FIELDS);
        assert_eq!(bad_request_message(r#"{"summonerName": "Faker"}"#), MISSING_FIELDS);
        assert_eq!(
            bad_request_message(r#"{"summonerName": null, "tag": "KR1"}"#),
            MISSING_FIELDS
        );
        assert_eq!(bad_request_message("[1, 2]"), MISSING_FIELDS);
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert_eq!(
            bad_request_message(r#"{"summonerName": 42, "tag": "KR1"}"#),
            WRONG_TYPES
        );
        assert_eq!(
            bad_request_message(r#"{"summonerName": "Faker", "tag": ["KR1"]}"#),
            WRONG_TYPES
        );
    }

    #[test]
    fn test_parse_rejects_blank_fields() {
        assert_eq!(
            bad_request_message(r#"{"summonerName": "   ", "tag": "KR1"}"#),
            EMPTY_FIELDS
        );
        assert_eq!(
            bad_request_message(r#"{"summonerName": "Faker", "tag": ""}"#),
            EMPTY_FIELDS
        );
    }

    #[test]
    fn test_map_known_statuses() {
        let empty = json!({});
        assert!(matches!(
            map_upstream_failure(ProxyRoute::Analyze, 404, &empty),
            ApiError::NotFound(m) if m.contains("not found")
        ));
        assert!(matches!(
            map_upstream_failure(ProxyRoute::Analyze, 400, &empty),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            map_upstream_failure(ProxyRoute::Analyze, 429, &empty),
            ApiError::RateLimited(_)
        ));
        assert!(matches!(
            map_upstream_failure(ProxyRoute::SearchPlayer, 503, &empty),
            ApiError::ServiceUnavailable(_)
        ));
    }

    #[test]
    fn test_map_known_status_ignores_upstream_message() {
        let data = json!({"error": "riot said no"});
        let err = map_upstream_failure(ProxyRoute::Analyze, 404, &data);
        assert_eq!(err.to_string(), PLAYER_NOT_FOUND);
    }

    #[test]
    fn test_map_unknown_status_uses_upstream_message() {
        let data = json!({"error": "Bedrock quota exceeded"});
        let err = map_upstream_failure(ProxyRoute::Analyze, 502, &data);
        assert_eq!(err.status().as_u16(), 502);
        assert_eq!(err.to_string(), "Bedrock quota exceeded");
    }

    #[test]
    fn test_map_unknown_status_without_message_is_500() {
        let err = map_upstream_failure(ProxyRoute::SearchPlayer, 418, &json!({}));
        assert_eq!(err.status().as_u16(), 500);
        assert_eq!(err.to_string(), "Failed to find player");

        let err = map_upstream_failure(ProxyRoute::Analyze, 500, &json!([1, 2]));
        assert_eq!(err.to_string(), "Failed to retrieve player data");
    }

    #[test]
    fn test_comparison_payload_with_matches() {
        let data = json!({
            "summary": {"games": 20, "win_rate": 0.55},
            "matches": [
                {"champion": "Ahri", "champion_img": "https://cdn.example.com/Ahri.png"},
                {"champion": "Zed", "champion_img": "https://cdn.example.com/Zed.png"}
            ],
            "recap": {"strengths": "roams"}
        });
        let payload = comparison_payload(&PlayerQuery::new("Faker", "KR1"), &data).unwrap();

        assert_eq!(payload.name, "Faker#KR1");
        assert_eq!(payload.summary["games"], 20);
        let top = payload.top_champion.unwrap();
        assert_eq!(top.name, "Ahri");
        assert_eq!(top.image, "https://cdn.example.com/Ahri.png");
    }

    #[test]
    fn test_comparison_payload_serializes_camel_case() {
        let data = json!({"summary": {"games": 0}, "matches": []});
        let payload = comparison_payload(&PlayerQuery::new("Faker", "KR1"), &data).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json.get("topChampion").is_some());
        assert!(json["topChampion"].is_null());
    }

    #[test]
    fn test_comparison_payload_requires_summary() {
        let query = PlayerQuery::new("Faker", "KR1");
        for data in [json!({"matches": []}), json!({"summary": null})] {
            match comparison_payload(&query, &data) {
                Err(ApiError::BadGateway(m)) => assert_eq!(m, INCOMPLETE_PLAYER_DATA),
                other => panic!("expected BadGateway, got {:?}", other),
            }
        }
    }
}
