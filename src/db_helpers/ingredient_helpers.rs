use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::Ingredient};

pub async fn list_ingredients_in_db(
    pool: &SqlitePool,
    name: Option<&str>,
) -> Result<Vec<Ingredient>, RequestError> {
    let result = match name {
        Some(prefix) => {
            sqlx::query_as::<Sqlite, Ingredient>(
                "SELECT id, name, measurement_unit FROM ingredients WHERE name LIKE ? || '%' ORDER BY name",
            )
            .bind(prefix)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<Sqlite, Ingredient>(
                "SELECT id, name, measurement_unit FROM ingredients ORDER BY name",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(result)
}

pub async fn get_ingredient_in_db(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Ingredient>, RequestError> {
    let result = sqlx::query_as::<Sqlite, Ingredient>(
        "SELECT id, name, measurement_unit FROM ingredients WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(result)
}

/// Replaces the whole ingredient catalog with `entries`. Inserts are batched
/// so a large catalog file does not accumulate into one giant transaction;
/// this runs from the offline import tool, never on the request path.
pub async fn replace_ingredient_catalog_in_db(
    pool: &SqlitePool,
    entries: &[(String, String)],
) -> Result<u64, RequestError> {
    sqlx::query("DELETE FROM ingredients").execute(pool).await?;

    let mut inserted = 0u64;
    for chunk in entries.chunks(1000) {
        let mut tx = pool.begin().await?;
        for (name, measurement_unit) in chunk {
            sqlx::query("INSERT INTO ingredients (name, measurement_unit) VALUES (?, ?)")
                .bind(name)
                .bind(measurement_unit)
                .execute(&mut tx)
                .await?;
            inserted += 1;
        }
        tx.commit().await?;
    }
    Ok(inserted)
}

/// Parses one `name,measurement_unit` catalog row. Names may themselves
/// contain commas, units never do, so the split happens at the last comma.
pub fn parse_catalog_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (name, measurement_unit) = line.rsplit_once(',')?;
    let name = name.trim().trim_matches('"').trim();
    let measurement_unit = measurement_unit.trim();
    if name.is_empty() || measurement_unit.is_empty() {
        return None;
    }
    Some((name.to_string(), measurement_unit.to_string()))
}

#[cfg(test)]
mod tests {
    use super::parse_catalog_line;

    #[test]
    fn parses_a_plain_row() {
        assert_eq!(
            parse_catalog_line("flour,g"),
            Some(("flour".to_string(), "g".to_string()))
        );
    }

    #[test]
    fn splits_at_the_last_comma() {
        assert_eq!(
            parse_catalog_line("\"flour, wholegrain\",g"),
            Some(("flour, wholegrain".to_string(), "g".to_string()))
        );
    }

    #[test]
    fn skips_blank_and_malformed_rows() {
        assert_eq!(parse_catalog_line(""), None);
        assert_eq!(parse_catalog_line("   "), None);
        assert_eq!(parse_catalog_line("no-unit-here"), None);
        assert_eq!(parse_catalog_line("flour,"), None);
    }
}
