mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use common::{ACCESS_KEY, FLIGHT_BODY, MockUpstream, Reply};
use flightdesk::clients::aviationstack::error_message_for_code;
use flightdesk::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn spawn_app(config: Config) -> Router {
    let state = flightdesk::api::create_app_state_from_config(config, None)
        .expect("Failed to create app state");
    flightdesk::api::router(state)
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn cache_header(response: &Response) -> &str {
    response
        .headers()
        .get("x-cache")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[tokio::test]
async fn test_flights_pass_through_and_cache() {
    let upstream = MockUpstream::start(Reply::json(FLIGHT_BODY)).await;
    let app = spawn_app(upstream.config());

    let response = get(&app, "/api/aviation/flights?flight_iata=BA117").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(cache_header(&response), "MISS");

    let body = body_text(response).await;
    assert!(!body.contains(ACCESS_KEY));
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["data"][0]["flight"]["iata"], "BA117");
    assert_eq!(json["pagination"]["total"], 1);

    let recorded = upstream.last_request().unwrap();
    assert_eq!(recorded.path, "/v1/flights");
    assert_eq!(recorded.query["access_key"], ACCESS_KEY);
    assert_eq!(recorded.query["flight_iata"], "BA117");

    let response = get(&app, "/api/aviation/flights?flight_iata=BA117").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(cache_header(&response), "HIT");
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_parameter_order_shares_cache_entry() {
    let upstream = MockUpstream::start(Reply::json(FLIGHT_BODY)).await;
    let app = spawn_app(upstream.config());

    get(&app, "/api/aviation/flights?dep_iata=LHR&arr_iata=JFK").await;
    let response = get(&app, "/api/aviation/flights?arr_iata=JFK&dep_iata=LHR").await;

    assert_eq!(cache_header(&response), "HIT");
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_endpoint_slugs_map_to_upstream_paths() {
    let upstream = MockUpstream::start(Reply::json(r#"{"data":[]}"#)).await;
    let app = spawn_app(upstream.config());

    for (slug, path) in [
        ("aircraft-types", "/v1/aircraft_types"),
        ("flight-schedules", "/v1/timetable"),
        ("future-schedules", "/v1/flightsFuture"),
        ("airports", "/v1/airports"),
    ] {
        let response = get(&app, &format!("/api/aviation/{slug}")).await;
        assert_eq!(response.status(), StatusCode::OK, "{slug}");
        assert_eq!(upstream.last_request().unwrap().path, path);
    }
}

#[tokio::test]
async fn test_unknown_endpoint_is_not_found() {
    let upstream = MockUpstream::start(Reply::json(FLIGHT_BODY)).await;
    let app = spawn_app(upstream.config());

    let response = get(&app, "/api/aviation/hotels").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert!(json["error"]["message"].as_str().unwrap().contains("hotels"));
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_quota_error_is_translated() {
    let upstream = MockUpstream::start(Reply::json(
        r#"{"error":{"code":104,"type":"usage_limit_reached","info":"Your monthly usage limit has been reached."}}"#,
    ))
    .await;
    let app = spawn_app(upstream.config());

    let response = get(&app, "/api/aviation/flights?flight_iata=BA117").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], error_message_for_code(104).unwrap());
    assert_eq!(json["error"]["code"], 104);
    assert_eq!(json["error"]["type"], "usage_limit_reached");
    assert!(json["error"].get("details").is_none());
}

#[tokio::test]
async fn test_verbose_mode_attaches_upstream_details() {
    let upstream = MockUpstream::start(Reply::json(
        r#"{"error":{"code":301,"info":"You did not specify a valid parameter."}}"#,
    ))
    .await;
    let mut config = upstream.config();
    config.general.debug = true;
    let app = spawn_app(config);

    let response = get(&app, "/api/aviation/flights").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], error_message_for_code(301).unwrap());
    assert_eq!(
        json["error"]["details"],
        "You did not specify a valid parameter."
    );
}

#[tokio::test]
async fn test_errors_are_not_cached() {
    let upstream = MockUpstream::start(Reply::json(r#"{"error":{"code":104}}"#)).await;
    let app = spawn_app(upstream.config());

    get(&app, "/api/aviation/flights").await;
    get(&app, "/api/aviation/flights").await;
    assert_eq!(upstream.calls(), 2);

    upstream.set_reply(Reply::json(FLIGHT_BODY));
    let response = get(&app, "/api/aviation/flights").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(cache_header(&response), "MISS");
}

#[tokio::test]
async fn test_empty_data_is_a_success() {
    let upstream = MockUpstream::start(Reply::json(r#"{"data":[]}"#)).await;
    let app = spawn_app(upstream.config());

    let response = get(&app, "/api/aviation/flights?flight_number=999999").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_empty_body_is_synthesized() {
    let upstream = MockUpstream::start(Reply::json("{}")).await;
    let app = spawn_app(upstream.config());

    let response = get(&app, "/api/aviation/countries").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({"pagination": {"total": 0, "count": 0}, "data": []})
    );
}

#[tokio::test]
async fn test_upstream_http_error_propagates() {
    let upstream =
        MockUpstream::start(Reply::status(StatusCode::TOO_MANY_REQUESTS, "slow down")).await;
    let app = spawn_app(upstream.config());

    let response = get(&app, "/api/aviation/flights").await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let json = body_json(response).await;
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Too Many Requests")
    );
}

#[tokio::test]
async fn test_malformed_body_is_server_error() {
    let upstream = MockUpstream::start(Reply::json("<html>maintenance</html>")).await;
    let app = spawn_app(upstream.config());

    let response = get(&app, "/api/aviation/flights").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert!(json["error"]["message"].is_string());
}

#[tokio::test]
async fn test_unreachable_upstream_is_service_unavailable() {
    let config = common::config_for(&common::closed_port_url().await);
    let app = spawn_app(config);

    let response = get(&app, "/api/aviation/flights").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_text(response).await;
    assert!(!body.contains(ACCESS_KEY));
    assert!(body.contains("try again later"));
}

#[tokio::test]
async fn test_debug_flag_forces_refresh_only_in_debug_mode() {
    let upstream = MockUpstream::start(Reply::json(FLIGHT_BODY)).await;

    let app = spawn_app(upstream.config());
    get(&app, "/api/aviation/flights?flight_iata=BA117").await;
    let response = get(&app, "/api/aviation/flights?flight_iata=BA117&debug=1").await;
    assert_eq!(cache_header(&response), "HIT");
    assert_eq!(upstream.calls(), 1);

    let mut config = upstream.config();
    config.general.debug = true;
    let app = spawn_app(config);

    get(&app, "/api/aviation/flights?flight_iata=BA117").await;
    let response = get(&app, "/api/aviation/flights?flight_iata=BA117&debug=1").await;
    assert_eq!(cache_header(&response), "REFRESH");
    assert_eq!(upstream.calls(), 3);
    assert!(!upstream.last_request().unwrap().query.contains_key("debug"));

    let response = get(&app, "/api/aviation/flights?flight_iata=BA117").await;
    assert_eq!(cache_header(&response), "HIT");
    assert_eq!(upstream.calls(), 3);
}

#[tokio::test]
async fn test_connectivity_check() {
    let upstream = MockUpstream::start(Reply::json(FLIGHT_BODY)).await;
    let app = spawn_app(upstream.config());

    let response = get(&app, "/api/aviation/test").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(!body.contains(ACCESS_KEY));
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(upstream.last_request().unwrap().query["limit"], "1");

    upstream.set_reply(Reply::json(r#"{"error":{"code":101}}"#));
    let response = get(&app, "/api/aviation/test").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], error_message_for_code(101).unwrap());
}

#[tokio::test]
async fn test_health_and_index() {
    let upstream = MockUpstream::start(Reply::json(FLIGHT_BODY)).await;
    let app = spawn_app(upstream.config());

    let response = get(&app, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json.as_object().unwrap().len(), 2);

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("search-form"));

    let response = get(&app, "/missing.js").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
