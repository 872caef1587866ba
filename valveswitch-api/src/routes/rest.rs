/// REST facade over the switch state
///
/// Plain HTTP endpoints for browsers polling the valve. They share the
/// same [`SwitchStore`](valveswitch_shared::state::SwitchStore) as the MCP
/// tools and must stay behaviorally identical to them.
///
/// # Endpoints
///
/// - `GET /api/state` - Current value
/// - `POST /api/toggle` - Flip the switch
/// - `POST /api/set/:value` - Force to `on` or `off`
///
/// # Response
///
/// ```json
/// { "switch": true }
/// ```
///
/// # Authentication
///
/// None. The browser UI is served from the same origin and polls these
/// routes directly.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

/// Switch state response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchResponse {
    /// `true` = ON, `false` = OFF
    #[serde(rename = "switch")]
    pub on: bool,
}

impl From<bool> for SwitchResponse {
    fn from(on: bool) -> Self {
        Self { on }
    }
}

/// Parses the `:value` path segment of `/api/set/:value`
pub fn parse_switch_value(value: &str) -> ApiResult<bool> {
    match value {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(ApiError::BadRequest(format!(
            "Unsupported switch value '{}', expected 'on' or 'off'",
            other
        ))),
    }
}

/// `GET /api/state`
pub async fn get_state(State(state): State<AppState>) -> Json<SwitchResponse> {
    Json(state.switch.get().into())
}

/// `POST /api/toggle`
pub async fn toggle(State(state): State<AppState>) -> Json<SwitchResponse> {
    let on = state.switch.toggle();
    tracing::info!(switch = on, "Switch toggled via REST");
    Json(on.into())
}

/// `POST /api/set/:value`
///
/// # Errors
///
/// - 400 Bad Request: value is neither `on` nor `off` (state untouched)
pub async fn set_state(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> ApiResult<Json<SwitchResponse>> {
    let desired = parse_switch_value(&value)?;
    let on = state.switch.set(desired);
    tracing::info!(switch = on, "Switch set via REST");
    Ok(Json(on.into()))
}
