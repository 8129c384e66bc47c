use sqlx::PgExecutor;

use crate::{Result, models::User};

/// Records a caller resolved by the upstream identity provider. Existing rows are left untouched.
pub async fn ensure_user<'e, E>(executor: E, user_id: &str) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO users (user_id)
VALUES ($1)
ON CONFLICT (user_id) DO NOTHING",
	)
	.bind(user_id)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn fetch_user<'e, E>(executor: E, user_id: &str) -> Result<Option<User>>
where
	E: PgExecutor<'e>,
{
	let user = sqlx::query_as::<_, User>(
		"SELECT user_id, email, display_name, created_at FROM users WHERE user_id = $1",
	)
	.bind(user_id)
	.fetch_optional(executor)
	.await?;

	Ok(user)
}
