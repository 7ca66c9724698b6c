use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query},
    http::{header, HeaderName, StatusCode, Uri},
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    authentication::MaybeUser,
    data_formats::{
        IngredientQueryParams, IngredientResponse, RecipeListWrapper, RecipeQueryParams,
        RecipeRequest, RecipeResponse, RecipeShortResponse, TagResponse, UserResponse,
    },
    db_helpers::{
        add_favorite_in_db, add_purchase_in_db, create_recipe_in_db, delete_recipe_in_db,
        get_ingredient_in_db, get_recipe_by_id_in_db, get_tag_in_db, list_ingredients_in_db,
        list_recipe_ingredients_in_db, list_recipe_tags_in_db, list_recipes_in_db,
        list_subscriptions_in_db, list_tags_in_db, remove_favorite_in_db, remove_purchase_in_db,
        shopping_list_in_db, subscribe_in_db, unsubscribe_in_db, update_recipe_in_db,
    },
    errors::RequestError,
    models::{Recipe, RecipeIngredient, ShoppingListItem, Tag},
    JsonResponse,
};

type JsonResult<T> = Result<Json<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}

// ----------------- Tag Handlers -----------------
pub async fn list_tags(Extension(pool): Extension<Arc<SqlitePool>>) -> JsonResult<Vec<TagResponse>> {
    let tags = list_tags_in_db(&pool).await?;
    Ok(Json(tags.into_iter().map(TagResponse::new).collect()))
}

pub async fn get_tag(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<TagResponse> {
    match get_tag_in_db(&pool, id).await? {
        Some(tag) => Ok(Json(TagResponse::new(tag))),
        None => Err(RequestError::NotFound("tag does not exist")),
    }
}

// ----------------- Ingredient Handlers -----------------
pub async fn list_ingredients(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<IngredientQueryParams>,
) -> JsonResult<Vec<IngredientResponse>> {
    let ingredients = list_ingredients_in_db(&pool, params.name.as_deref()).await?;
    Ok(Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::new)
            .collect(),
    ))
}

pub async fn get_ingredient(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> JsonResult<IngredientResponse> {
    match get_ingredient_in_db(&pool, id).await? {
        Some(ingredient) => Ok(Json(IngredientResponse::new(ingredient))),
        None => Err(RequestError::NotFound("ingredient does not exist")),
    }
}

// ----------------- Recipe Handlers -----------------
pub async fn list_recipes(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> JsonResult<RecipeListWrapper> {
    let params = RecipeQueryParams::from_pairs(&pairs)?;
    let recipes = list_recipes_in_db(&pool, maybe_user.get_id(), &params).await?;
    let count = recipes.first().map(|recipe| recipe.count).unwrap_or(0);
    let results = hydrate_recipes(&pool, recipes).await?;
    Ok(Json(RecipeListWrapper { count, results }))
}

pub async fn get_recipe(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Path(id): Path<i64>,
) -> JsonResult<RecipeResponse> {
    let recipe = get_recipe_by_id_in_db(&pool, maybe_user.get_id(), id)
        .await?
        .ok_or(RequestError::NotFound("recipe does not exist"))?;
    let response = hydrate_recipe(&pool, recipe).await?;
    Ok(Json(response))
}

pub async fn create_recipe(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<RecipeRequest>,
) -> Result<JsonResponse<RecipeResponse>, RequestError> {
    let user = maybe_user.require()?;
    request.validate()?;
    let recipe_id = create_recipe_in_db(&pool, user.id, &request).await?;
    let recipe = get_recipe_by_id_in_db(&pool, Some(user.id), recipe_id)
        .await?
        .ok_or(RequestError::ServerError)?;
    let response = hydrate_recipe(&pool, recipe).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_recipe(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
    Json(request): Json<RecipeRequest>,
) -> JsonResult<RecipeResponse> {
    let user = maybe_user.require()?;
    request.validate()?;
    update_recipe_in_db(&pool, user.id, id, &request).await?;
    let recipe = get_recipe_by_id_in_db(&pool, Some(user.id), id)
        .await?
        .ok_or(RequestError::ServerError)?;
    let response = hydrate_recipe(&pool, recipe).await?;
    Ok(Json(response))
}

pub async fn delete_recipe(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    let user = maybe_user.require()?;
    delete_recipe_in_db(&pool, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------- Favorite Handlers -----------------
pub async fn favorite_recipe(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<JsonResponse<RecipeShortResponse>, RequestError> {
    let user = maybe_user.require()?;
    let recipe = add_favorite_in_db(&pool, user.id, id).await?;
    Ok((StatusCode::CREATED, Json(RecipeShortResponse::new(recipe))))
}

pub async fn unfavorite_recipe(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    let user = maybe_user.require()?;
    remove_favorite_in_db(&pool, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------- Shopping Cart Handlers -----------------
pub async fn add_to_shopping_cart(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<JsonResponse<RecipeShortResponse>, RequestError> {
    let user = maybe_user.require()?;
    let recipe = add_purchase_in_db(&pool, user.id, id).await?;
    Ok((StatusCode::CREATED, Json(RecipeShortResponse::new(recipe))))
}

pub async fn remove_from_shopping_cart(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    let user = maybe_user.require()?;
    remove_purchase_in_db(&pool, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_shopping_cart(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> Result<([(HeaderName, &'static str); 2], String), RequestError> {
    let user = maybe_user.require()?;
    let items = shopping_list_in_db(&pool, user.id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shoppinglist.csv\"",
            ),
        ],
        shopping_list_csv(&items),
    ))
}

// ----------------- Subscription Handlers -----------------
pub async fn subscribe_user(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<JsonResponse<UserResponse>, RequestError> {
    let user = maybe_user.require()?;
    let target = subscribe_in_db(&pool, user.id, id).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::new(target))))
}

pub async fn unsubscribe_user(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    let user = maybe_user.require()?;
    unsubscribe_in_db(&pool, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_subscriptions(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<Vec<UserResponse>> {
    let user = maybe_user.require()?;
    let followed = list_subscriptions_in_db(&pool, user.id).await?;
    Ok(Json(followed.into_iter().map(UserResponse::new).collect()))
}

// ----------------- Response Assembly -----------------

async fn hydrate_recipe(pool: &SqlitePool, recipe: Recipe) -> Result<RecipeResponse, RequestError> {
    let mut hydrated = hydrate_recipes(pool, vec![recipe]).await?;
    hydrated.pop().ok_or(RequestError::ServerError)
}

/// Resolves tag objects and ingredient lines for a page of recipes with one
/// query per relation instead of one per recipe.
async fn hydrate_recipes(
    pool: &SqlitePool,
    recipes: Vec<Recipe>,
) -> Result<Vec<RecipeResponse>, RequestError> {
    let ids: Vec<i64> = recipes.iter().map(|recipe| recipe.id).collect();

    let mut tags_by_recipe: HashMap<i64, Vec<Tag>> = HashMap::new();
    for row in list_recipe_tags_in_db(pool, &ids).await? {
        tags_by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(row.into());
    }

    let mut lines_by_recipe: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
    for line in list_recipe_ingredients_in_db(pool, &ids).await? {
        lines_by_recipe.entry(line.recipe_id).or_default().push(line);
    }

    Ok(recipes
        .into_iter()
        .map(|recipe| {
            let tags = tags_by_recipe.remove(&recipe.id).unwrap_or_default();
            let ingredients = lines_by_recipe.remove(&recipe.id).unwrap_or_default();
            RecipeResponse::new(recipe, tags, ingredients)
        })
        .collect())
}

// The export carries a UTF-8 byte order mark so spreadsheet tools detect the
// encoding instead of guessing.
const UTF8_BOM: &str = "\u{feff}";

fn shopping_list_csv(items: &[ShoppingListItem]) -> String {
    let mut out = String::from(UTF8_BOM);
    for item in items {
        out.push_str(&csv_field(&item.name));
        out.push(',');
        out.push_str(&csv_field(&item.measurement_unit));
        out.push(',');
        out.push_str(&item.amount.to_string());
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value
        .chars()
        .any(|c| matches!(c, ',' | '"' | '\n' | '\r'))
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, measurement_unit: &str, amount: i64) -> ShoppingListItem {
        ShoppingListItem {
            name: name.to_string(),
            measurement_unit: measurement_unit.to_string(),
            amount,
        }
    }

    #[test]
    fn empty_cart_renders_only_the_byte_order_mark() {
        assert_eq!(shopping_list_csv(&[]), "\u{feff}");
    }

    #[test]
    fn renders_one_line_per_group() {
        let csv = shopping_list_csv(&[item("flour", "g", 500), item("sugar", "tbsp", 2)]);
        assert_eq!(csv, "\u{feff}flour,g,500\nsugar,tbsp,2\n");
    }

    #[test]
    fn quotes_fields_containing_separators() {
        let csv = shopping_list_csv(&[item("flour, wholegrain", "g", 100)]);
        assert_eq!(csv, "\u{feff}\"flour, wholegrain\",g,100\n");
        assert_eq!(csv_field("5\" pan"), "\"5\"\" pan\"");
    }
}
