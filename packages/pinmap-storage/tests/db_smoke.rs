use time::OffsetDateTime;
use uuid::Uuid;

use pinmap_config::Postgres;
use pinmap_storage::{
	Error,
	db::Db,
	lists,
	models::{Place, PlaceList},
	places, users,
};
use pinmap_testkit::TestDatabase;

fn place(user_id: &str, name: &str) -> Place {
	let now = OffsetDateTime::now_utc();

	Place {
		place_id: Uuid::new_v4(),
		user_id: user_id.to_string(),
		name: name.to_string(),
		address: None,
		prefecture: None,
		lat: Some(35.6812),
		lng: Some(139.7671),
		genre: Some("Ramen".to_string()),
		genre_parent: None,
		genre_child: None,
		features: vec!["counter".to_string()],
		summary: None,
		rating: Some(4.3),
		review_count: Some(120),
		price_level: Some(2),
		budget_lunch: None,
		budget_dinner: None,
		google_place_id: None,
		status: "none".to_string(),
		user_rating: None,
		user_note: None,
		visited_at: None,
		created_at: now,
		updated_at: now,
	}
}

fn list(user_id: &str, name: &str) -> PlaceList {
	let now = OffsetDateTime::now_utc();

	PlaceList {
		list_id: Uuid::new_v4(),
		user_id: user_id.to_string(),
		name: name.to_string(),
		description: None,
		color: None,
		created_at: now,
		updated_at: now,
	}
}

async fn connect(dsn: &str) -> Db {
	let cfg = Postgres { dsn: dsn.to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PINMAP_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some(base_dsn) = pinmap_testkit::env_dsn() else {
		eprintln!("Skipping schema_bootstrap_is_idempotent; set PINMAP_PG_DSN to run this test.");

		return;
	};

	pinmap_testkit::with_test_db(&base_dsn, |dsn| async move {
		let db = connect(&dsn).await;

		db.ensure_schema().await.expect("Second bootstrap must succeed.");

		for table in ["users", "places", "place_lists", "list_places"] {
			let count: i64 = sqlx::query_scalar(
				"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
			)
			.bind(table)
			.fetch_one(&db.pool)
			.await
			.expect("Failed to query schema tables.");

			assert_eq!(count, 1, "Missing table {table}.");
		}

		db.close().await;

		Ok(())
	})
	.await
	.expect("Test database lifecycle failed.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PINMAP_PG_DSN to run."]
async fn place_round_trips_numeric_columns() {
	let Some(base_dsn) = pinmap_testkit::env_dsn() else {
		eprintln!("Skipping place_round_trips_numeric_columns; set PINMAP_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(test_db.dsn()).await;

	users::ensure_user(&db.pool, "user-a").await.expect("Failed to insert user.");
	users::ensure_user(&db.pool, "user-a").await.expect("Repeated ensure_user must succeed.");

	let user = users::fetch_user(&db.pool, "user-a")
		.await
		.expect("Failed to fetch user.")
		.expect("User must exist.");

	assert_eq!(user.user_id, "user-a");

	let stored = place("user-a", "Ichiran");

	places::insert_place(&db.pool, &stored).await.expect("Failed to insert place.");

	let fetched = places::fetch_place(&db.pool, "user-a", stored.place_id)
		.await
		.expect("Failed to fetch place.")
		.expect("Place must exist.");

	assert_eq!(fetched.lat, Some(35.6812));
	assert_eq!(fetched.lng, Some(139.7671));
	assert_eq!(fetched.rating, Some(4.3));
	assert_eq!(fetched.features, vec!["counter".to_string()]);

	let foreign = places::fetch_place(&db.pool, "user-b", stored.place_id)
		.await
		.expect("Failed to fetch place.");

	assert!(foreign.is_none());

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PINMAP_PG_DSN to run."]
async fn deleting_a_place_cascades_list_memberships() {
	let Some(base_dsn) = pinmap_testkit::env_dsn() else {
		eprintln!(
			"Skipping deleting_a_place_cascades_list_memberships; set PINMAP_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(test_db.dsn()).await;

	users::ensure_user(&db.pool, "user-a").await.expect("Failed to insert user.");

	let stored = place("user-a", "Fuunji");
	let favorites = list("user-a", "Favorites");

	places::insert_place(&db.pool, &stored).await.expect("Failed to insert place.");
	lists::insert_list(&db.pool, &favorites).await.expect("Failed to insert list.");
	lists::add_member(&db.pool, favorites.list_id, stored.place_id, None, OffsetDateTime::now_utc())
		.await
		.expect("Failed to add member.");

	assert!(places::delete_place(&db.pool, "user-a", stored.place_id).await.expect("delete"));

	let members =
		lists::list_members(&db.pool, favorites.list_id).await.expect("Failed to list members.");

	assert!(members.is_empty());

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PINMAP_PG_DSN to run."]
async fn cross_user_membership_is_a_conflict() {
	let Some(base_dsn) = pinmap_testkit::env_dsn() else {
		eprintln!("Skipping cross_user_membership_is_a_conflict; set PINMAP_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(test_db.dsn()).await;

	users::ensure_user(&db.pool, "user-a").await.expect("Failed to insert user.");
	users::ensure_user(&db.pool, "user-b").await.expect("Failed to insert user.");

	let foreign_place = place("user-b", "Afuri");
	let own_list = list("user-a", "Someday");

	places::insert_place(&db.pool, &foreign_place).await.expect("Failed to insert place.");
	lists::insert_list(&db.pool, &own_list).await.expect("Failed to insert list.");

	let err = lists::add_member(
		&db.pool,
		own_list.list_id,
		foreign_place.place_id,
		Some("try"),
		OffsetDateTime::now_utc(),
	)
	.await
	.expect_err("Cross-user membership must fail.");

	assert!(matches!(err, Error::Conflict(_)), "Unexpected error: {err:?}");

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
