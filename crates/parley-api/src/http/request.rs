//! Routed request envelope and its typed, validated form.
//!
//! The front-end posts `{route, payload}`; validation happens here, in one
//! schema step, so handlers and the session service only ever see a typed
//! request. Missing `session_id`/`owner_id` are rejected before any route
//! is considered, naming the missing fields.

use serde::Deserialize;

use parley_types::session::SessionSeeds;

use crate::http::response::ApiError;

/// Raw request envelope as posted by the chat widget.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Payload for the `initialize` route.
#[derive(Debug, Deserialize)]
pub struct InitializePayload {
    pub session_id: String,
    pub owner_id: String,
    #[serde(flatten)]
    pub seeds: SessionSeeds,
}

/// Payload for the `chat` route.
#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    pub session_id: String,
    pub owner_id: String,
    pub message: String,
}

/// Payload for the `history` route.
#[derive(Debug, Deserialize)]
pub struct HistoryPayload {
    pub session_id: String,
    pub owner_id: String,
}

/// A fully validated request, ready for dispatch into the session service.
#[derive(Debug)]
pub enum RouteRequest {
    Initialize(InitializePayload),
    Chat(ChatPayload),
    History(HistoryPayload),
}

impl RouteRequest {
    /// Validate an envelope into a typed request.
    pub fn parse(envelope: Envelope) -> Result<Self, ApiError> {
        let missing: Vec<&str> = ["session_id", "owner_id"]
            .into_iter()
            .filter(|key| envelope.payload.get(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ApiError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        match envelope.route.as_str() {
            "initialize" => serde_json::from_value(envelope.payload)
                .map(RouteRequest::Initialize)
                .map_err(|e| ApiError::Validation(e.to_string())),
            "chat" => serde_json::from_value(envelope.payload)
                .map(RouteRequest::Chat)
                .map_err(|e| ApiError::Validation(e.to_string())),
            "history" => serde_json::from_value(envelope.payload)
                .map(RouteRequest::History)
                .map_err(|e| ApiError::Validation(e.to_string())),
            _ => Err(ApiError::InvalidRoute),
        }
    }

    /// The owner this request acts on behalf of (for allow-list gating).
    pub fn owner_id(&self) -> &str {
        match self {
            RouteRequest::Initialize(p) => &p.owner_id,
            RouteRequest::Chat(p) => &p.owner_id,
            RouteRequest::History(p) => &p.owner_id,
        }
    }

    /// Route name, for logging.
    pub fn route_name(&self) -> &'static str {
        match self {
            RouteRequest::Initialize(_) => "initialize",
            RouteRequest::Chat(_) => "chat",
            RouteRequest::History(_) => "history",
        }
    }
}
