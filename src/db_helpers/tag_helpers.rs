use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::Tag};

pub async fn list_tags_in_db(pool: &SqlitePool) -> Result<Vec<Tag>, RequestError> {
    let result = sqlx::query_as::<Sqlite, Tag>("SELECT id, name, color, slug FROM tags ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(result)
}

pub async fn get_tag_in_db(pool: &SqlitePool, id: i64) -> Result<Option<Tag>, RequestError> {
    let result =
        sqlx::query_as::<Sqlite, Tag>("SELECT id, name, color, slug FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(result)
}
