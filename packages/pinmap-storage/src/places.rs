use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
	Result,
	models::{PLACE_COLUMNS, Place},
};

/// Inserts `place` and returns the row as stored, with numeric columns at their column scale.
pub async fn insert_place<'e, E>(executor: E, place: &Place) -> Result<Place>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
INSERT INTO places (
	place_id,
	user_id,
	name,
	address,
	prefecture,
	lat,
	lng,
	genre,
	genre_parent,
	genre_child,
	features,
	summary,
	rating,
	review_count,
	price_level,
	budget_lunch,
	budget_dinner,
	google_place_id,
	status,
	user_rating,
	user_note,
	visited_at,
	created_at,
	updated_at
)
VALUES (
	$1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
	$13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
)
RETURNING {PLACE_COLUMNS}"
	);
	let stored = sqlx::query_as::<_, Place>(&sql)
		.bind(place.place_id)
		.bind(place.user_id.as_str())
		.bind(place.name.as_str())
		.bind(place.address.as_deref())
		.bind(place.prefecture.as_deref())
		.bind(place.lat)
		.bind(place.lng)
		.bind(place.genre.as_deref())
		.bind(place.genre_parent.as_deref())
		.bind(place.genre_child.as_deref())
		.bind(&place.features)
		.bind(place.summary.as_deref())
		.bind(place.rating)
		.bind(place.review_count)
		.bind(place.price_level)
		.bind(place.budget_lunch.as_deref())
		.bind(place.budget_dinner.as_deref())
		.bind(place.google_place_id.as_deref())
		.bind(place.status.as_str())
		.bind(place.user_rating)
		.bind(place.user_note.as_deref())
		.bind(place.visited_at)
		.bind(place.created_at)
		.bind(place.updated_at)
		.fetch_one(executor)
		.await?;

	Ok(stored)
}

pub async fn fetch_place<'e, E>(executor: E, user_id: &str, place_id: Uuid) -> Result<Option<Place>>
where
	E: PgExecutor<'e>,
{
	let sql = format!("SELECT {PLACE_COLUMNS} FROM places WHERE place_id = $1 AND user_id = $2");
	let place = sqlx::query_as::<_, Place>(&sql)
		.bind(place_id)
		.bind(user_id)
		.fetch_optional(executor)
		.await?;

	Ok(place)
}

/// Same as [`fetch_place`] but locks the row for the rest of the transaction.
pub async fn fetch_place_for_update<'e, E>(
	executor: E,
	user_id: &str,
	place_id: Uuid,
) -> Result<Option<Place>>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"SELECT {PLACE_COLUMNS} FROM places WHERE place_id = $1 AND user_id = $2 FOR UPDATE"
	);
	let place = sqlx::query_as::<_, Place>(&sql)
		.bind(place_id)
		.bind(user_id)
		.fetch_optional(executor)
		.await?;

	Ok(place)
}

/// Writes the explicitly editable descriptive fields and returns the updated row as stored.
/// Status fields are not touched.
pub async fn update_place_details<'e, E>(executor: E, place: &Place) -> Result<Place>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
UPDATE places
SET
	name = $1,
	address = $2,
	prefecture = $3,
	lat = $4,
	lng = $5,
	genre = $6,
	genre_parent = $7,
	genre_child = $8,
	features = $9,
	summary = $10,
	budget_lunch = $11,
	budget_dinner = $12,
	google_place_id = $13,
	updated_at = $14
WHERE place_id = $15 AND user_id = $16
RETURNING {PLACE_COLUMNS}"
	);
	let stored = sqlx::query_as::<_, Place>(&sql)
		.bind(place.name.as_str())
		.bind(place.address.as_deref())
		.bind(place.prefecture.as_deref())
		.bind(place.lat)
		.bind(place.lng)
		.bind(place.genre.as_deref())
		.bind(place.genre_parent.as_deref())
		.bind(place.genre_child.as_deref())
		.bind(&place.features)
		.bind(place.summary.as_deref())
		.bind(place.budget_lunch.as_deref())
		.bind(place.budget_dinner.as_deref())
		.bind(place.google_place_id.as_deref())
		.bind(place.updated_at)
		.bind(place.place_id)
		.bind(place.user_id.as_str())
		.fetch_one(executor)
		.await?;

	Ok(stored)
}

pub async fn update_place_status<'e, E>(executor: E, place: &Place) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
UPDATE places
SET status = $1, visited_at = $2, updated_at = $3
WHERE place_id = $4 AND user_id = $5",
	)
	.bind(place.status.as_str())
	.bind(place.visited_at)
	.bind(place.updated_at)
	.bind(place.place_id)
	.bind(place.user_id.as_str())
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn update_place_rating<'e, E>(executor: E, place: &Place) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
UPDATE places
SET user_rating = $1, user_note = $2, updated_at = $3
WHERE place_id = $4 AND user_id = $5",
	)
	.bind(place.user_rating)
	.bind(place.user_note.as_deref())
	.bind(place.updated_at)
	.bind(place.place_id)
	.bind(place.user_id.as_str())
	.execute(executor)
	.await?;

	Ok(())
}

/// Deletes an owned place. List memberships go with it through `ON DELETE CASCADE`.
pub async fn delete_place<'e, E>(executor: E, user_id: &str, place_id: Uuid) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM places WHERE place_id = $1 AND user_id = $2")
		.bind(place_id)
		.bind(user_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn list_ids_for_place<'e, E>(executor: E, place_id: Uuid) -> Result<Vec<Uuid>>
where
	E: PgExecutor<'e>,
{
	let ids = sqlx::query_scalar::<_, Uuid>(
		"\
SELECT list_id
FROM list_places
WHERE place_id = $1
ORDER BY added_at ASC, list_id ASC",
	)
	.bind(place_id)
	.fetch_all(executor)
	.await?;

	Ok(ids)
}
