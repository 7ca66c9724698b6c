use chrono::NaiveDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// One recipe row as the listing/detail queries produce it: the recipe
/// columns joined with its author and the two caller-scoped flags.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Recipe {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
    pub pub_date: NaiveDateTime,
    pub author_username: String,
    pub author_email: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    // Total number of rows matching the filter, only present in the
    // paginated listing query.
    #[sqlx(default)]
    pub count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

/// One ingredient line of a recipe, joined with the catalog entry it
/// references.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeIngredient {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeTag {
    pub recipe_id: i64,
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Favorite {
    pub user_id: i64,
    pub recipe_id: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Purchase {
    pub user_id: i64,
    pub recipe_id: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Subscription {
    pub user_id: i64,
    pub subscribed_to: i64,
}

/// One aggregated shopping-list line: ingredient lines are grouped by
/// (name, measurement_unit) and their amounts summed.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

impl From<RecipeTag> for Tag {
    fn from(value: RecipeTag) -> Self {
        Tag {
            id: value.id,
            name: value.name,
            color: value.color,
            slug: value.slug,
        }
    }
}
