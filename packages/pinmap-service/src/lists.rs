use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use pinmap_domain::{list, place::non_blank};
use pinmap_storage::{
	lists as store,
	models::{PlaceList, PlaceListSummary},
	places, users,
};

use crate::{Error, PinmapService, Result, items::PlaceItem};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateListRequest {
	pub name: String,
	pub description: Option<String>,
	pub color: Option<String>,
}

/// Absent fields are left unchanged. A blank description or color clears it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateListRequest {
	pub name: Option<String>,
	pub description: Option<String>,
	pub color: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AddToListRequest {
	pub note: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ListItem {
	pub list_id: Uuid,
	pub name: String,
	pub description: Option<String>,
	pub color: Option<String>,
	pub place_count: i64,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl ListItem {
	fn new(list: PlaceList, place_count: i64) -> Self {
		Self {
			list_id: list.list_id,
			name: list.name,
			description: list.description,
			color: list.color,
			place_count,
			created_at: list.created_at,
			updated_at: list.updated_at,
		}
	}
}
impl From<PlaceListSummary> for ListItem {
	fn from(summary: PlaceListSummary) -> Self {
		Self::new(summary.list, summary.place_count)
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct ListsResponse {
	pub lists: Vec<ListItem>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ListMemberItem {
	#[serde(flatten)]
	pub place: PlaceItem,
	pub note: Option<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub added_at: OffsetDateTime,
}

#[derive(Clone, Debug, Serialize)]
pub struct ListPlacesResponse {
	pub list: ListItem,
	pub places: Vec<ListMemberItem>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MembershipResponse {
	pub list_id: Uuid,
	pub place_id: Uuid,
	pub note: Option<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub added_at: OffsetDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteListResponse {
	pub list_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoveFromListResponse {
	pub list_id: Uuid,
	pub place_id: Uuid,
	pub removed: bool,
}

impl PinmapService {
	pub async fn create_list(&self, user_id: &str, req: CreateListRequest) -> Result<ListItem> {
		let user_id = crate::caller(user_id)?;
		let Some(name) = non_blank(Some(req.name.as_str())) else {
			return Err(Error::InvalidRequest { message: "name is required.".to_string() });
		};
		let color = match req.color.as_deref() {
			Some(color) => parse_color(color)?,
			None => None,
		};
		let now = OffsetDateTime::now_utc();
		let list = PlaceList {
			list_id: Uuid::new_v4(),
			user_id: user_id.to_string(),
			name,
			description: non_blank(req.description.as_deref()),
			color,
			created_at: now,
			updated_at: now,
		};
		let mut tx = self.db.pool.begin().await?;

		users::ensure_user(&mut *tx, user_id).await?;
		store::insert_list(&mut *tx, &list).await?;

		tx.commit().await?;

		tracing::info!(user_id, list_id = %list.list_id, "List created.");

		Ok(ListItem::new(list, 0))
	}

	pub async fn update_list(
		&self,
		user_id: &str,
		list_id: Uuid,
		req: UpdateListRequest,
	) -> Result<ListItem> {
		let user_id = crate::caller(user_id)?;

		if req.name.is_none() && req.description.is_none() && req.color.is_none() {
			return Err(Error::InvalidRequest { message: "No updates provided.".to_string() });
		}

		let mut tx = self.db.pool.begin().await?;
		let mut list =
			store::fetch_list(&mut *tx, user_id, list_id).await?.ok_or_else(list_not_found)?;

		if let Some(name) = req.name.as_deref() {
			list.name = non_blank(Some(name)).ok_or_else(|| Error::InvalidRequest {
				message: "name must not be blank.".to_string(),
			})?;
		}
		if let Some(description) = req.description.as_deref() {
			list.description = non_blank(Some(description));
		}
		if let Some(color) = req.color.as_deref() {
			list.color = parse_color(color)?;
		}

		list.updated_at = OffsetDateTime::now_utc();

		store::update_list(&mut *tx, &list).await?;

		let place_count = store::count_members(&mut *tx, list_id).await?;

		tx.commit().await?;

		Ok(ListItem::new(list, place_count))
	}

	/// Deletes the list and its memberships. The member places stay.
	pub async fn delete_list(&self, user_id: &str, list_id: Uuid) -> Result<DeleteListResponse> {
		let user_id = crate::caller(user_id)?;

		if !store::delete_list(&self.db.pool, user_id, list_id).await? {
			return Err(list_not_found());
		}

		tracing::info!(user_id, %list_id, "List deleted.");

		Ok(DeleteListResponse { list_id })
	}

	pub async fn lists(&self, user_id: &str) -> Result<ListsResponse> {
		let user_id = crate::caller(user_id)?;
		let lists = store::list_summaries(&self.db.pool, user_id).await?;

		Ok(ListsResponse { lists: lists.into_iter().map(ListItem::from).collect() })
	}

	/// Members of one list in the order they were added.
	pub async fn list_places(&self, user_id: &str, list_id: Uuid) -> Result<ListPlacesResponse> {
		let user_id = crate::caller(user_id)?;
		let list =
			store::fetch_list(&self.db.pool, user_id, list_id).await?.ok_or_else(list_not_found)?;
		let members = store::list_members(&self.db.pool, list_id).await?;
		let places = members
			.into_iter()
			.map(|member| ListMemberItem {
				place: PlaceItem::from_place(member.place, None),
				note: member.note,
				added_at: member.added_at,
			})
			.collect::<Vec<_>>();
		let place_count = i64::try_from(places.len()).unwrap_or(i64::MAX);

		Ok(ListPlacesResponse { list: ListItem::new(list, place_count), places })
	}

	/// Adding a place twice keeps the first `added_at`. The note is replaced only when given.
	pub async fn add_to_list(
		&self,
		user_id: &str,
		list_id: Uuid,
		place_id: Uuid,
		req: AddToListRequest,
	) -> Result<MembershipResponse> {
		let user_id = crate::caller(user_id)?;
		let note = non_blank(req.note.as_deref());
		let mut tx = self.db.pool.begin().await?;

		store::fetch_list(&mut *tx, user_id, list_id).await?.ok_or_else(list_not_found)?;
		places::fetch_place(&mut *tx, user_id, place_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Place not found.".to_string() })?;

		let member = store::add_member(
			&mut *tx,
			list_id,
			place_id,
			note.as_deref(),
			OffsetDateTime::now_utc(),
		)
		.await?;

		tx.commit().await?;

		Ok(MembershipResponse {
			list_id: member.list_id,
			place_id: member.place_id,
			note: member.note,
			added_at: member.added_at,
		})
	}

	/// Removing a place that is not in the list is a no-op reported as `removed: false`.
	pub async fn remove_from_list(
		&self,
		user_id: &str,
		list_id: Uuid,
		place_id: Uuid,
	) -> Result<RemoveFromListResponse> {
		let user_id = crate::caller(user_id)?;
		let mut tx = self.db.pool.begin().await?;

		store::fetch_list(&mut *tx, user_id, list_id).await?.ok_or_else(list_not_found)?;

		let removed = store::remove_member(&mut *tx, list_id, place_id).await?;

		tx.commit().await?;

		Ok(RemoveFromListResponse { list_id, place_id, removed })
	}
}

fn list_not_found() -> Error {
	Error::NotFound { message: "List not found.".to_string() }
}

/// Blank clears the color; anything else must be `#RRGGBB`.
fn parse_color(color: &str) -> Result<Option<String>> {
	if color.trim().is_empty() {
		return Ok(None);
	}

	list::normalize_color(color)
		.map(Some)
		.ok_or_else(|| Error::InvalidRequest { message: "color must be #RRGGBB.".to_string() })
}
