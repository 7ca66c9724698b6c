use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::User};

mod ingredient_helpers;
mod recipe_helpers;
mod shopping_helpers;
mod subscription_helpers;
mod tag_helpers;

pub use ingredient_helpers::*;
pub use recipe_helpers::*;
pub use shopping_helpers::*;
pub use subscription_helpers::*;
pub use tag_helpers::*;

// ----------------- Helper Functions -----------------

/// `?, ?, ?` placeholder list for an `IN (...)` clause with `n` entries.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, RequestError> {
    let result = sqlx::query_as::<Sqlite, User>(
        "SELECT id, username, email, first_name, last_name, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::placeholders;

    #[test]
    fn placeholder_lists() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
