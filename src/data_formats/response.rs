use serde::{Deserialize, Serialize};

use crate::models::{Ingredient, Recipe, RecipeIngredient, RecipeSummary, Tag, User};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct IngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// One ingredient line of a recipe with the catalog data resolved.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RecipeResponse {
    pub id: i64,
    pub author: UserResponse,
    pub tags: Vec<TagResponse>,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
    pub pub_date: String,
}

/// Compact recipe body returned by the favorite and shopping-cart toggles.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RecipeShortResponse {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

impl UserResponse {
    pub fn new(
        User {
            id,
            username,
            email,
            first_name,
            last_name,
            ..
        }: User,
    ) -> Self {
        UserResponse {
            id,
            email,
            username,
            first_name,
            last_name,
        }
    }
}

impl TagResponse {
    pub fn new(Tag { id, name, color, slug }: Tag) -> Self {
        TagResponse {
            id,
            name,
            color,
            slug,
        }
    }
}

impl IngredientResponse {
    pub fn new(
        Ingredient {
            id,
            name,
            measurement_unit,
        }: Ingredient,
    ) -> Self {
        IngredientResponse {
            id,
            name,
            measurement_unit,
        }
    }
}

impl RecipeResponse {
    pub fn new(recipe: Recipe, tags: Vec<Tag>, ingredients: Vec<RecipeIngredient>) -> Self {
        let Recipe {
            id,
            author_id,
            name,
            image,
            text,
            cooking_time,
            pub_date,
            author_username,
            author_email,
            author_first_name,
            author_last_name,
            is_favorited,
            is_in_shopping_cart,
            ..
        } = recipe;
        RecipeResponse {
            id,
            author: UserResponse {
                id: author_id,
                email: author_email,
                username: author_username,
                first_name: author_first_name,
                last_name: author_last_name,
            },
            tags: tags.into_iter().map(TagResponse::new).collect(),
            ingredients: ingredients
                .into_iter()
                .map(|line| RecipeIngredientResponse {
                    id: line.ingredient_id,
                    name: line.name,
                    measurement_unit: line.measurement_unit,
                    amount: line.amount,
                })
                .collect(),
            is_favorited,
            is_in_shopping_cart,
            name,
            image,
            text,
            cooking_time,
            pub_date: pub_date.to_string(),
        }
    }
}

impl RecipeShortResponse {
    pub fn new(
        RecipeSummary {
            id,
            name,
            image,
            cooking_time,
        }: RecipeSummary,
    ) -> Self {
        RecipeShortResponse {
            id,
            name,
            image,
            cooking_time,
        }
    }
}
