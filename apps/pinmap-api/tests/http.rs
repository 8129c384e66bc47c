use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use pinmap_api::{
	routes::{self, HEADER_USER_ID},
	state::AppState,
};
use pinmap_config::{Config, Postgres, Search, Security, Service, Storage};
use pinmap_service::PinmapService;
use pinmap_storage::db::Db;
use pinmap_testkit::TestDatabase;

// Nothing listens on port 1, so any request that reaches the pool fails fast.
const UNREACHABLE_DSN: &str = "postgres://pinmap@127.0.0.1:1/pinmap";

fn test_config(dsn: String, api_auth_token: Option<&str>) -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage { postgres: Postgres { dsn, pool_max_conns: 1 } },
		search: Search { default_limit: 20, max_limit: 100 },
		security: Security {
			bind_localhost_only: true,
			api_auth_token: api_auth_token.map(str::to_string),
		},
	}
}

fn offline_app(api_auth_token: Option<&str>) -> Router {
	let config = test_config(UNREACHABLE_DSN.to_string(), api_auth_token);
	let db = Db::connect_lazy(&config.storage.postgres).expect("Failed to build lazy pool.");

	routes::router(AppState::from_service(PinmapService::new(config, db)))
}

async fn json_body(response: axum::response::Response) -> Value {
	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");

	serde_json::from_slice(&bytes).expect("Failed to parse body.")
}

fn search_request(user_id: Option<&str>, bearer: Option<&str>) -> Request<Body> {
	let mut builder = Request::builder()
		.method("POST")
		.uri("/v1/places/search")
		.header("content-type", "application/json");

	if let Some(user_id) = user_id {
		builder = builder.header(HEADER_USER_ID, user_id);
	}
	if let Some(bearer) = bearer {
		builder = builder.header("Authorization", format!("Bearer {bearer}"));
	}

	builder.body(Body::from("{}")).expect("Failed to build request.")
}

#[tokio::test]
async fn health_ok() {
	let response = offline_app(Some("secret"))
		.oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_caller_is_rejected() {
	let response = offline_app(None)
		.oneshot(search_request(None, None))
		.await
		.expect("Failed to call search.");

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(json_body(response).await["error_code"], "authentication_required");
}

#[tokio::test]
async fn wrong_bearer_token_is_rejected() {
	let response = offline_app(Some("secret"))
		.oneshot(search_request(Some("user-a"), Some("guess")))
		.await
		.expect("Failed to call search.");

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(json_body(response).await["error_code"], "authentication_required");
}

#[tokio::test]
async fn malformed_place_id_is_a_client_error() {
	let response = offline_app(None)
		.oneshot(
			Request::builder()
				.uri("/v1/places/not-a-uuid")
				.header(HEADER_USER_ID, "user-a")
				.body(Body::empty())
				.expect("request"),
		)
		.await
		.expect("Failed to call get place.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PINMAP_PG_DSN to run."]
async fn add_then_search_by_radius() {
	let Some(base_dsn) = pinmap_testkit::env_dsn() else {
		eprintln!("Skipping add_then_search_by_radius; set PINMAP_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let config = test_config(test_db.dsn().to_string(), Some("secret"));
	let state = AppState::new(config).await.expect("Failed to initialize app state.");
	let app = routes::router(state.clone());

	for (name, lat) in [("Near", 35.6857), ("Far", 35.6947)] {
		let payload = json!({
			"name": name,
			"location": { "lat": lat, "lng": 139.7671 },
			"features": ["counter", " counter ", "late night"],
		});
		let response = app
			.clone()
			.oneshot(
				Request::builder()
					.method("POST")
					.uri("/v1/places")
					.header("content-type", "application/json")
					.header(HEADER_USER_ID, "user-a")
					.header("Authorization", "Bearer secret")
					.body(Body::from(payload.to_string()))
					.expect("request"),
			)
			.await
			.expect("Failed to add place.");

		assert_eq!(response.status(), StatusCode::CREATED);

		let body = json_body(response).await;

		assert_eq!(body["features"], json!(["counter", "late night"]));
		assert!(body.get("distance_km").is_none());
	}

	let payload = json!({
		"location": { "lat": 35.6812, "lng": 139.7671 },
		"distanceRadius": 1000,
		"sort": "distance",
	});
	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/places/search")
				.header("content-type", "application/json")
				.header(HEADER_USER_ID, "user-a")
				.header("Authorization", "Bearer secret")
				.body(Body::from(payload.to_string()))
				.expect("request"),
		)
		.await
		.expect("Failed to search.");

	assert_eq!(response.status(), StatusCode::OK);

	let body = json_body(response).await;

	assert_eq!(body["total"], 1);
	assert_eq!(body["hasMore"], false);
	assert_eq!(body["places"][0]["name"], "Near");
	assert!(body["places"][0]["distance_km"].as_f64().is_some());
	assert!(
		body["places"][0]["google_maps_url"]
			.as_str()
			.is_some_and(|url| url.starts_with("https://www.google.com/maps/search/?api=1&query="))
	);

	let payload = json!({ "location": { "lat": 95.0, "lng": 139.7671 } });
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/places/search")
				.header("content-type", "application/json")
				.header(HEADER_USER_ID, "user-a")
				.header("Authorization", "Bearer secret")
				.body(Body::from(payload.to_string()))
				.expect("request"),
		)
		.await
		.expect("Failed to search.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(json_body(response).await["error_code"], "invalid_request");

	state.service.db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
