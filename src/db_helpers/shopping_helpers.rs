use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::{RecipeSummary, ShoppingListItem};

use super::get_recipe_summary_in_db;

pub async fn add_purchase_in_db(
    pool: &SqlitePool,
    user_id: i64,
    recipe_id: i64,
) -> Result<RecipeSummary, RequestError> {
    let recipe = get_recipe_summary_in_db(pool, recipe_id).await?;
    sqlx::query("INSERT INTO purchases (user_id, recipe_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await
        .map_err(|e| RequestError::from(e).or_conflict("recipe is already in the shopping cart"))?;
    Ok(recipe)
}

pub async fn remove_purchase_in_db(
    pool: &SqlitePool,
    user_id: i64,
    recipe_id: i64,
) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM purchases WHERE user_id = ? AND recipe_id = ?")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("recipe is not in the shopping cart"));
    }
    Ok(())
}

/// Consolidated shopping list across every recipe in the caller's cart.
/// Lines group by (name, measurement_unit), not by catalog id, so the same
/// ingredient under two units stays two rows while duplicate catalog entries
/// with equal name and unit merge. Ordered by name for a stable export.
pub async fn shopping_list_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<ShoppingListItem>, RequestError> {
    let result = sqlx::query_as::<Sqlite, ShoppingListItem>(
        "SELECT ingredients.name               AS name, \
                ingredients.measurement_unit   AS measurement_unit, \
                SUM(recipe_ingredients.amount) AS amount \
         FROM purchases \
         JOIN recipe_ingredients ON recipe_ingredients.recipe_id = purchases.recipe_id \
         JOIN ingredients ON ingredients.id = recipe_ingredients.ingredient_id \
         WHERE purchases.user_id = ? \
         GROUP BY ingredients.name, ingredients.measurement_unit \
         ORDER BY ingredients.name, ingredients.measurement_unit",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(result)
}
