/// Browser UI
///
/// A single static page that polls `GET /api/state` once per second and
/// posts `POST /api/toggle` when the switch image is clicked. Assets are
/// compiled into the binary.
///
/// # Endpoints
///
/// - `GET /` - The page
/// - `GET /static/:asset` - Script and switch images

use crate::error::{ApiError, ApiResult};
use axum::{
    extract::Path,
    http::header,
    response::{Html, IntoResponse},
};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const APP_JS: &str = include_str!("../../static/app.js");
const SWITCH_ON_SVG: &str = include_str!("../../static/switch_on.svg");
const SWITCH_OFF_SVG: &str = include_str!("../../static/switch_off.svg");

/// Looks up an embedded asset, returning `(content_type, body)`
pub fn lookup_asset(name: &str) -> Option<(&'static str, &'static str)> {
    match name {
        "app.js" => Some(("text/javascript; charset=utf-8", APP_JS)),
        "switch_on.svg" => Some(("image/svg+xml", SWITCH_ON_SVG)),
        "switch_off.svg" => Some(("image/svg+xml", SWITCH_OFF_SVG)),
        _ => None,
    }
}

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /static/:asset`
pub async fn asset(Path(name): Path<String>) -> ApiResult<impl IntoResponse> {
    let (content_type, body) = lookup_asset(&name)
        .ok_or_else(|| ApiError::NotFound(format!("No static asset named '{}'", name)))?;

    Ok(([(header::CONTENT_TYPE, content_type)], body))
}
