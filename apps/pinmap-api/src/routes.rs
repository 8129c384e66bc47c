use axum::{
	Json, Router,
	extract::{FromRequestParts, Path, Request, State},
	http::{HeaderMap, StatusCode, request::Parts},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, patch, post, put},
};
use serde::Serialize;
use uuid::Uuid;

use pinmap_domain::RawSearchFilters;
use pinmap_service::{
	AddPlaceRequest, AddToListRequest, CreateListRequest, DeleteListResponse, DeletePlaceResponse,
	EditPlaceRequest, Error as ServiceError, ListItem, ListPlacesResponse, ListsResponse,
	MembershipResponse, PlaceDetail, RatePlaceRequest, RemoveFromListResponse, SearchResponse,
	SetStatusRequest, UpdateListRequest,
};

use crate::state::AppState;

pub const HEADER_USER_ID: &str = "X-Pinmap-User-Id";

const HEADER_AUTHORIZATION: &str = "Authorization";

pub fn router(state: AppState) -> Router {
	let api = Router::new()
		.route("/v1/places/search", post(search))
		.route("/v1/places", post(add_place))
		.route("/v1/places/{place_id}", get(get_place).patch(edit_place).delete(delete_place))
		.route("/v1/places/{place_id}/status", post(set_status))
		.route("/v1/places/{place_id}/rating", post(rate_place))
		.route("/v1/lists", get(lists).post(create_list))
		.route("/v1/lists/{list_id}", patch(update_list).delete(delete_list))
		.route("/v1/lists/{list_id}/places", get(list_places))
		.route(
			"/v1/lists/{list_id}/places/{place_id}",
			put(add_to_list).delete(remove_from_list),
		)
		.route_layer(middleware::from_fn_with_state(state.clone(), api_auth_middleware));

	Router::new().route("/health", get(health)).merge(api).with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Json(payload): Json<RawSearchFilters>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(&user_id, payload).await?;

	Ok(Json(response))
}

async fn add_place(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Json(payload): Json<AddPlaceRequest>,
) -> Result<(StatusCode, Json<PlaceDetail>), ApiError> {
	let response = state.service.add_place(&user_id, payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn get_place(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Path(place_id): Path<Uuid>,
) -> Result<Json<PlaceDetail>, ApiError> {
	let response = state.service.get_place(&user_id, place_id).await?;

	Ok(Json(response))
}

async fn edit_place(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Path(place_id): Path<Uuid>,
	Json(payload): Json<EditPlaceRequest>,
) -> Result<Json<PlaceDetail>, ApiError> {
	let response = state.service.edit_place(&user_id, place_id, payload).await?;

	Ok(Json(response))
}

async fn set_status(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Path(place_id): Path<Uuid>,
	Json(payload): Json<SetStatusRequest>,
) -> Result<Json<PlaceDetail>, ApiError> {
	let response = state.service.set_status(&user_id, place_id, payload).await?;

	Ok(Json(response))
}

async fn rate_place(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Path(place_id): Path<Uuid>,
	Json(payload): Json<RatePlaceRequest>,
) -> Result<Json<PlaceDetail>, ApiError> {
	let response = state.service.rate_place(&user_id, place_id, payload).await?;

	Ok(Json(response))
}

async fn delete_place(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Path(place_id): Path<Uuid>,
) -> Result<Json<DeletePlaceResponse>, ApiError> {
	let response = state.service.delete_place(&user_id, place_id).await?;

	Ok(Json(response))
}

async fn lists(
	State(state): State<AppState>,
	Caller(user_id): Caller,
) -> Result<Json<ListsResponse>, ApiError> {
	let response = state.service.lists(&user_id).await?;

	Ok(Json(response))
}

async fn create_list(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Json(payload): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<ListItem>), ApiError> {
	let response = state.service.create_list(&user_id, payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn update_list(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Path(list_id): Path<Uuid>,
	Json(payload): Json<UpdateListRequest>,
) -> Result<Json<ListItem>, ApiError> {
	let response = state.service.update_list(&user_id, list_id, payload).await?;

	Ok(Json(response))
}

async fn delete_list(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Path(list_id): Path<Uuid>,
) -> Result<Json<DeleteListResponse>, ApiError> {
	let response = state.service.delete_list(&user_id, list_id).await?;

	Ok(Json(response))
}

async fn list_places(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Path(list_id): Path<Uuid>,
) -> Result<Json<ListPlacesResponse>, ApiError> {
	let response = state.service.list_places(&user_id, list_id).await?;

	Ok(Json(response))
}

async fn add_to_list(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Path((list_id, place_id)): Path<(Uuid, Uuid)>,
	payload: Option<Json<AddToListRequest>>,
) -> Result<Json<MembershipResponse>, ApiError> {
	let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
	let response = state.service.add_to_list(&user_id, list_id, place_id, payload).await?;

	Ok(Json(response))
}

async fn remove_from_list(
	State(state): State<AppState>,
	Caller(user_id): Caller,
	Path((list_id, place_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RemoveFromListResponse>, ApiError> {
	let response = state.service.remove_from_list(&user_id, list_id, place_id).await?;

	Ok(Json(response))
}

async fn api_auth_middleware(
	State(state): State<AppState>,
	req: Request,
	next: Next,
) -> Response {
	let expected = state.service.cfg.security.api_auth_token.as_deref();

	if !is_authorized(req.headers(), expected) {
		return json_error(
			StatusCode::UNAUTHORIZED,
			"authentication_required",
			"A valid Bearer token is required.",
			None,
		)
		.into_response();
	}

	next.run(req).await
}

fn is_authorized(headers: &HeaderMap, expected: Option<&str>) -> bool {
	match expected {
		None => true,
		Some(expected) => read_bearer_token(headers).is_some_and(|token| token == expected),
	}
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let raw = headers.get(HEADER_AUTHORIZATION)?;
	let value = raw.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
}

fn read_user_id(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(HEADER_USER_ID)?.to_str().ok()?.trim();

	if value.is_empty() { None } else { Some(value) }
}

/// The user resolved by the upstream auth layer.
pub struct Caller(pub String);
impl<S> FromRequestParts<S> for Caller
where
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		read_user_id(&parts.headers)
			.map(|user_id| Self(user_id.to_string()))
			.ok_or_else(|| ApiError::from(ServiceError::AuthenticationRequired))
	}
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn error_code(&self) -> &str {
		&self.error_code
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::AuthenticationRequired => json_error(
				StatusCode::UNAUTHORIZED,
				"authentication_required",
				format!("Set the {HEADER_USER_ID} header."),
				None,
			),
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			ServiceError::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "conflict", message, None),
			ServiceError::Storage { message } => {
				tracing::warn!(error = %message, "Storage failure.");

				json_error(
					StatusCode::SERVICE_UNAVAILABLE,
					"storage_unavailable",
					"The data store is unavailable.",
					None,
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn headers(name: &'static str, value: &str) -> HeaderMap {
		let mut headers = HeaderMap::new();

		headers.insert(name, value.parse().expect("valid header"));

		headers
	}

	#[test]
	fn no_configured_token_allows_everything() {
		assert!(is_authorized(&HeaderMap::new(), None));
	}

	#[test]
	fn bearer_token_must_match() {
		assert!(is_authorized(&headers(HEADER_AUTHORIZATION, "Bearer token-a"), Some("token-a")));
		assert!(!is_authorized(&headers(HEADER_AUTHORIZATION, "Bearer token-b"), Some("token-a")));
		assert!(!is_authorized(&headers(HEADER_AUTHORIZATION, "bearer token-a"), Some("token-a")));
		assert!(!is_authorized(&HeaderMap::new(), Some("token-a")));
	}

	#[test]
	fn user_id_header_is_trimmed_and_required() {
		assert_eq!(read_user_id(&headers(HEADER_USER_ID, " user-a ")), Some("user-a"));
		assert_eq!(read_user_id(&headers(HEADER_USER_ID, "   ")), None);
		assert_eq!(read_user_id(&HeaderMap::new()), None);
	}

	#[test]
	fn service_errors_map_to_status_codes() {
		let cases = [
			(ServiceError::AuthenticationRequired, StatusCode::UNAUTHORIZED, "authentication_required"),
			(
				ServiceError::InvalidRequest { message: "bad".to_string() },
				StatusCode::BAD_REQUEST,
				"invalid_request",
			),
			(
				ServiceError::NotFound { message: "gone".to_string() },
				StatusCode::NOT_FOUND,
				"not_found",
			),
			(
				ServiceError::Conflict { message: "owner".to_string() },
				StatusCode::CONFLICT,
				"conflict",
			),
			(
				ServiceError::Storage { message: "down".to_string() },
				StatusCode::SERVICE_UNAVAILABLE,
				"storage_unavailable",
			),
		];

		for (err, status, code) in cases {
			let api = ApiError::from(err);

			assert_eq!(api.status(), status);
			assert_eq!(api.error_code(), code);
		}
	}
}
