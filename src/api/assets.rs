use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "ui"]
struct Asset;

const INDEX: &str = "index.html";

fn embedded(path: &str) -> Option<Response> {
    let content = Asset::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let cache_control = if path == INDEX {
        HeaderValue::from_static("no-cache")
    } else {
        HeaderValue::from_static("public, max-age=3600")
    };

    Some(
        (
            [
                (header::CONTENT_TYPE, HeaderValue::from_str(mime.as_ref()).ok()?),
                (header::CACHE_CONTROL, cache_control),
            ],
            Body::from(content.data),
        )
            .into_response(),
    )
}

/// Serves the embedded search page.
///
/// Paths without an extension fall back to the page itself; missing files
/// are a plain 404.
pub async fn serve_asset(uri: Uri) -> Response {
    let path = match uri.path().trim_start_matches('/') {
        "" => INDEX,
        other => other,
    };

    if let Some(response) = embedded(path) {
        return response;
    }

    let looks_like_file = path.rsplit('/').next().is_some_and(|name| name.contains('.'));
    if looks_like_file {
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    }

    embedded(INDEX).unwrap_or_else(|| (StatusCode::NOT_FOUND, "404 Not Found").into_response())
}
