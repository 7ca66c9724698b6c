use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::User};

use super::get_user_by_id;

pub async fn subscribe_in_db(
    pool: &SqlitePool,
    user_id: i64,
    subscribed_to: i64,
) -> Result<User, RequestError> {
    // Checked before the insert so the caller sees a validation error, not
    // a translated storage failure.
    if user_id == subscribed_to {
        return Err(RequestError::Validation("cannot subscribe to yourself"));
    }
    let target = match get_user_by_id(pool, subscribed_to).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("user does not exist")),
    };
    sqlx::query("INSERT INTO subscriptions (user_id, subscribed_to) VALUES (?, ?)")
        .bind(user_id)
        .bind(subscribed_to)
        .execute(pool)
        .await
        .map_err(|e| RequestError::from(e).or_conflict("already subscribed to this user"))?;
    Ok(target)
}

pub async fn unsubscribe_in_db(
    pool: &SqlitePool,
    user_id: i64,
    subscribed_to: i64,
) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = ? AND subscribed_to = ?")
        .bind(user_id)
        .bind(subscribed_to)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("subscription does not exist"));
    }
    Ok(())
}

pub async fn list_subscriptions_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<User>, RequestError> {
    let result = sqlx::query_as::<Sqlite, User>(
        "SELECT users.id, users.username, users.email, users.first_name, users.last_name, users.created_at \
         FROM subscriptions \
         JOIN users ON users.id = subscriptions.subscribed_to \
         WHERE subscriptions.user_id = ? \
         ORDER BY users.username",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(result)
}
