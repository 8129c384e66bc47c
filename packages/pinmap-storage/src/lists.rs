use sqlx::PgExecutor;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Error, Result,
	models::{ListMember, ListPlace, PLACE_COLUMNS, PlaceList, PlaceListSummary},
};

const LIST_COLUMNS: &str = "list_id, user_id, name, description, color, created_at, updated_at";

pub async fn insert_list<'e, E>(executor: E, list: &PlaceList) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO place_lists (list_id, user_id, name, description, color, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(list.list_id)
	.bind(list.user_id.as_str())
	.bind(list.name.as_str())
	.bind(list.description.as_deref())
	.bind(list.color.as_deref())
	.bind(list.created_at)
	.bind(list.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn fetch_list<'e, E>(executor: E, user_id: &str, list_id: Uuid) -> Result<Option<PlaceList>>
where
	E: PgExecutor<'e>,
{
	let sql = format!("SELECT {LIST_COLUMNS} FROM place_lists WHERE list_id = $1 AND user_id = $2");
	let list = sqlx::query_as::<_, PlaceList>(&sql)
		.bind(list_id)
		.bind(user_id)
		.fetch_optional(executor)
		.await?;

	Ok(list)
}

pub async fn update_list<'e, E>(executor: E, list: &PlaceList) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
UPDATE place_lists
SET name = $1, description = $2, color = $3, updated_at = $4
WHERE list_id = $5 AND user_id = $6",
	)
	.bind(list.name.as_str())
	.bind(list.description.as_deref())
	.bind(list.color.as_deref())
	.bind(list.updated_at)
	.bind(list.list_id)
	.bind(list.user_id.as_str())
	.execute(executor)
	.await?;

	Ok(())
}

/// Deletes an owned list and its memberships. Member places are kept.
pub async fn delete_list<'e, E>(executor: E, user_id: &str, list_id: Uuid) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM place_lists WHERE list_id = $1 AND user_id = $2")
		.bind(list_id)
		.bind(user_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

/// All lists of a user with their member counts, newest first.
pub async fn list_summaries<'e, E>(executor: E, user_id: &str) -> Result<Vec<PlaceListSummary>>
where
	E: PgExecutor<'e>,
{
	let lists = sqlx::query_as::<_, PlaceListSummary>(
		"\
SELECT
	l.list_id,
	l.user_id,
	l.name,
	l.description,
	l.color,
	l.created_at,
	l.updated_at,
	count(lp.place_id) AS place_count
FROM place_lists l
LEFT JOIN list_places lp ON lp.list_id = l.list_id
WHERE l.user_id = $1
GROUP BY l.list_id
ORDER BY l.created_at DESC, l.list_id ASC",
	)
	.bind(user_id)
	.fetch_all(executor)
	.await?;

	Ok(lists)
}

pub async fn count_members<'e, E>(executor: E, list_id: Uuid) -> Result<i64>
where
	E: PgExecutor<'e>,
{
	let count = sqlx::query_scalar::<_, i64>("SELECT count(*) FROM list_places WHERE list_id = $1")
		.bind(list_id)
		.fetch_one(executor)
		.await?;

	Ok(count)
}

/// Adds a place to a list. Adding an existing member keeps its original `added_at` and replaces
/// the note only when a new one is given. Fails with [`Error::Conflict`] when the list and the
/// place belong to different users.
pub async fn add_member<'e, E>(
	executor: E,
	list_id: Uuid,
	place_id: Uuid,
	note: Option<&str>,
	now: OffsetDateTime,
) -> Result<ListPlace>
where
	E: PgExecutor<'e>,
{
	let member = sqlx::query_as::<_, ListPlace>(
		"\
INSERT INTO list_places (list_id, place_id, note, added_at)
SELECT l.list_id, p.place_id, $3, $4
FROM place_lists l
JOIN places p ON p.user_id = l.user_id
WHERE l.list_id = $1 AND p.place_id = $2
ON CONFLICT (list_id, place_id)
DO UPDATE SET note = COALESCE(EXCLUDED.note, list_places.note)
RETURNING list_id, place_id, note, added_at",
	)
	.bind(list_id)
	.bind(place_id)
	.bind(note)
	.bind(now)
	.fetch_optional(executor)
	.await?;

	member.ok_or_else(|| {
		Error::Conflict("List and place must exist and belong to the same user.".to_string())
	})
}

pub async fn remove_member<'e, E>(executor: E, list_id: Uuid, place_id: Uuid) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM list_places WHERE list_id = $1 AND place_id = $2")
		.bind(list_id)
		.bind(place_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

/// Members of a list in the order they were added.
pub async fn list_members<'e, E>(executor: E, list_id: Uuid) -> Result<Vec<ListMember>>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
SELECT {PLACE_COLUMNS}, lp.note, lp.added_at
FROM list_places lp
JOIN places USING (place_id)
WHERE lp.list_id = $1
ORDER BY lp.added_at ASC, place_id ASC"
	);
	let members = sqlx::query_as::<_, ListMember>(&sql).bind(list_id).fetch_all(executor).await?;

	Ok(members)
}
