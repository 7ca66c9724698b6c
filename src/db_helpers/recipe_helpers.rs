use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::data_formats::{RecipeQueryParams, RecipeRequest};
use crate::errors::RequestError;
use crate::models::{Recipe, RecipeIngredient, RecipeSummary, RecipeTag};

use super::placeholders;

// SQLite assigns `?` parameters by textual position, so every query built
// from these columns binds the caller id twice, once per EXISTS check.
const RECIPE_COLUMNS: &str = r#"
            recipes.id                    AS "id",
            recipes.author_id             AS "author_id",
            recipes.name                  AS "name",
            recipes.image                 AS "image",
            recipes.text                  AS "text",
            recipes.cooking_time          AS "cooking_time",
            recipes.pub_date              AS "pub_date",
            users.username                AS "author_username",
            users.email                   AS "author_email",
            users.first_name              AS "author_first_name",
            users.last_name               AS "author_last_name",
            EXISTS (SELECT 1
                    FROM   favorites
                    WHERE  favorites.recipe_id = recipes.id
                       AND favorites.user_id = ?) AS "is_favorited",
            EXISTS (SELECT 1
                    FROM   purchases
                    WHERE  purchases.recipe_id = recipes.id
                       AND purchases.user_id = ?) AS "is_in_shopping_cart"
"#;

pub async fn list_recipes_in_db(
    pool: &SqlitePool,
    caller: Option<i64>,
    params: &RecipeQueryParams,
) -> Result<Vec<Recipe>, RequestError> {
    // The favorite/cart filters are only defined for an identified caller;
    // an anonymous request simply does not have them applied.
    let favorited_only = (caller.is_some() && params.is_favorited) as i64;
    let in_cart_only = (caller.is_some() && params.is_in_shopping_cart) as i64;

    // Tag matching goes through EXISTS instead of a join so a recipe
    // carrying several requested tags still comes back as one row.
    let tag_filter = if params.tags.is_empty() {
        String::new()
    } else {
        format!(
            "AND EXISTS (SELECT 1 \
                         FROM recipe_tags \
                         JOIN tags ON tags.id = recipe_tags.tag_id \
                         WHERE recipe_tags.recipe_id = recipes.id \
                           AND tags.slug IN ({})) ",
            placeholders(params.tags.len())
        )
    };

    let query = format!(
        "SELECT {RECIPE_COLUMNS}, COUNT(*) OVER () AS \"count\" \
         FROM recipes \
         JOIN users ON users.id = recipes.author_id \
         WHERE (? IS NULL OR recipes.author_id = ?) \
           AND (? = 0 OR EXISTS (SELECT 1 FROM favorites \
                                 WHERE favorites.recipe_id = recipes.id \
                                   AND favorites.user_id = ?)) \
           AND (? = 0 OR EXISTS (SELECT 1 FROM purchases \
                                 WHERE purchases.recipe_id = recipes.id \
                                   AND purchases.user_id = ?)) \
         {tag_filter} \
         ORDER BY recipes.pub_date DESC, recipes.id DESC \
         LIMIT ? OFFSET ?"
    );

    let mut rows = sqlx::query_as::<Sqlite, Recipe>(&query)
        .bind(caller)
        .bind(caller)
        .bind(params.author)
        .bind(params.author)
        .bind(favorited_only)
        .bind(caller)
        .bind(in_cart_only)
        .bind(caller);
    for slug in &params.tags {
        rows = rows.bind(slug);
    }
    let result = rows
        .bind(params.limit)
        .bind(params.offset())
        .fetch_all(pool)
        .await?;
    Ok(result)
}

pub async fn get_recipe_by_id_in_db(
    pool: &SqlitePool,
    caller: Option<i64>,
    recipe_id: i64,
) -> Result<Option<Recipe>, RequestError> {
    let query = format!(
        "SELECT {RECIPE_COLUMNS} \
         FROM recipes \
         JOIN users ON users.id = recipes.author_id \
         WHERE recipes.id = ?"
    );
    let result = sqlx::query_as::<Sqlite, Recipe>(&query)
        .bind(caller)
        .bind(caller)
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn get_recipe_summary_in_db(
    pool: &SqlitePool,
    recipe_id: i64,
) -> Result<RecipeSummary, RequestError> {
    let result = sqlx::query_as::<Sqlite, RecipeSummary>(
        "SELECT id, name, image, cooking_time FROM recipes WHERE id = ?",
    )
    .bind(recipe_id)
    .fetch_optional(pool)
    .await?;
    result.ok_or(RequestError::NotFound("recipe does not exist"))
}

/// Ingredient lines of the given recipes, in insertion order, joined with
/// the catalog rows they reference.
pub async fn list_recipe_ingredients_in_db(
    pool: &SqlitePool,
    recipe_ids: &[i64],
) -> Result<Vec<RecipeIngredient>, RequestError> {
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }
    let query = format!(
        "SELECT recipe_ingredients.recipe_id        AS recipe_id, \
                recipe_ingredients.ingredient_id    AS ingredient_id, \
                ingredients.name                    AS name, \
                ingredients.measurement_unit        AS measurement_unit, \
                recipe_ingredients.amount           AS amount \
         FROM recipe_ingredients \
         JOIN ingredients ON ingredients.id = recipe_ingredients.ingredient_id \
         WHERE recipe_ingredients.recipe_id IN ({}) \
         ORDER BY recipe_ingredients.id",
        placeholders(recipe_ids.len())
    );
    let mut rows = sqlx::query_as::<Sqlite, RecipeIngredient>(&query);
    for recipe_id in recipe_ids {
        rows = rows.bind(*recipe_id);
    }
    let result = rows.fetch_all(pool).await?;
    Ok(result)
}

pub async fn list_recipe_tags_in_db(
    pool: &SqlitePool,
    recipe_ids: &[i64],
) -> Result<Vec<RecipeTag>, RequestError> {
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }
    let query = format!(
        "SELECT recipe_tags.recipe_id AS recipe_id, \
                tags.id               AS id, \
                tags.name             AS name, \
                tags.color            AS color, \
                tags.slug             AS slug \
         FROM recipe_tags \
         JOIN tags ON tags.id = recipe_tags.tag_id \
         WHERE recipe_tags.recipe_id IN ({}) \
         ORDER BY recipe_tags.id",
        placeholders(recipe_ids.len())
    );
    let mut rows = sqlx::query_as::<Sqlite, RecipeTag>(&query);
    for recipe_id in recipe_ids {
        rows = rows.bind(*recipe_id);
    }
    let result = rows.fetch_all(pool).await?;
    Ok(result)
}

pub async fn create_recipe_in_db(
    pool: &SqlitePool,
    author_id: i64,
    request: &RecipeRequest,
) -> Result<i64, RequestError> {
    let mut tx = pool.begin().await?;

    let recipe = sqlx::query_as::<Sqlite, (i64,)>(
        "INSERT INTO recipes (author_id, name, image, text, cooking_time) \
         VALUES (?, ?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(author_id)
    .bind(&request.name)
    .bind(&request.image)
    .bind(&request.text)
    .bind(request.cooking_time)
    .fetch_one(&mut tx)
    .await
    .map_err(|e| RequestError::from(e).or_conflict("recipe name is already taken"))?;

    let recipe_id = recipe.0;
    insert_recipe_relations(&mut tx, recipe_id, request).await?;

    tx.commit().await?;
    Ok(recipe_id)
}

pub async fn update_recipe_in_db(
    pool: &SqlitePool,
    author_id: i64,
    recipe_id: i64,
    request: &RecipeRequest,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;

    let recipe = sqlx::query_as::<Sqlite, (i64,)>("SELECT author_id FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .fetch_optional(&mut tx)
        .await?;
    let owner = match recipe {
        Some(row) => row.0,
        None => return Err(RequestError::NotFound("recipe does not exist")),
    };
    if owner != author_id {
        return Err(RequestError::Forbidden);
    }

    sqlx::query("UPDATE recipes SET name = ?, image = ?, text = ?, cooking_time = ? WHERE id = ?")
        .bind(&request.name)
        .bind(&request.image)
        .bind(&request.text)
        .bind(request.cooking_time)
        .bind(recipe_id)
        .execute(&mut tx)
        .await
        .map_err(|e| RequestError::from(e).or_conflict("recipe name is already taken"))?;

    // Replace semantics: both relation sets are rewritten wholesale in the
    // same transaction, never merged with the previous ones.
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut tx)
        .await?;
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut tx)
        .await?;
    insert_recipe_relations(&mut tx, recipe_id, request).await?;

    tx.commit().await?;
    Ok(())
}

pub async fn delete_recipe_in_db(
    pool: &SqlitePool,
    author_id: i64,
    recipe_id: i64,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;

    let recipe = sqlx::query_as::<Sqlite, (i64,)>("SELECT author_id FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .fetch_optional(&mut tx)
        .await?;
    let owner = match recipe {
        Some(row) => row.0,
        None => return Err(RequestError::NotFound("recipe does not exist")),
    };
    if owner != author_id {
        return Err(RequestError::Forbidden);
    }

    // Ingredient lines, tag links, favorites and cart entries go with the
    // recipe via ON DELETE CASCADE.
    sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .execute(&mut tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

async fn insert_recipe_relations(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: i64,
    request: &RecipeRequest,
) -> Result<(), RequestError> {
    for tag_id in &request.tags {
        sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES (?, ?)")
            .bind(recipe_id)
            .bind(*tag_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RequestError::from(e).or_not_found("tag does not exist"))?;
    }
    for line in &request.ingredients {
        sqlx::query("INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES (?, ?, ?)")
            .bind(recipe_id)
            .bind(line.id)
            .bind(line.amount)
            .execute(&mut *tx)
            .await
            .map_err(|e| RequestError::from(e).or_not_found("ingredient does not exist"))?;
    }
    Ok(())
}

// ----------------- Favorites -----------------

pub async fn add_favorite_in_db(
    pool: &SqlitePool,
    user_id: i64,
    recipe_id: i64,
) -> Result<RecipeSummary, RequestError> {
    let recipe = get_recipe_summary_in_db(pool, recipe_id).await?;
    sqlx::query("INSERT INTO favorites (user_id, recipe_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await
        .map_err(|e| RequestError::from(e).or_conflict("recipe is already in favorites"))?;
    Ok(recipe)
}

pub async fn remove_favorite_in_db(
    pool: &SqlitePool,
    user_id: i64,
    recipe_id: i64,
) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND recipe_id = ?")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("recipe is not in favorites"));
    }
    Ok(())
}
