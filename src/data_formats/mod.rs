mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::Deserialize;

use crate::errors::RequestError;

fn get_default_limit() -> i64 {
    6
}

/// Listing parameters for `GET /api/recipes`. The `tags` parameter repeats,
/// which `Query<HashMap<_, _>>` would collapse, so this is parsed from the
/// raw key/value pairs instead.
#[derive(Debug, PartialEq, Eq)]
pub struct RecipeQueryParams {
    pub tags: Vec<String>,
    pub author: Option<i64>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub page: i64,
    pub limit: i64,
}

impl RecipeQueryParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, RequestError> {
        let mut params = RecipeQueryParams {
            tags: Vec::new(),
            author: None,
            is_favorited: false,
            is_in_shopping_cart: false,
            page: 1,
            limit: get_default_limit(),
        };
        for (key, value) in pairs {
            match key.as_str() {
                "tags" => params.tags.push(value.clone()),
                "author" => {
                    let author = value
                        .parse()
                        .map_err(|_| RequestError::Validation("author must be an integer id"))?;
                    params.author = Some(author);
                }
                "is_favorited" => params.is_favorited = flag_is_set(value),
                "is_in_shopping_cart" => params.is_in_shopping_cart = flag_is_set(value),
                "page" => {
                    params.page = value
                        .parse()
                        .ok()
                        .filter(|page| *page >= 1)
                        .ok_or(RequestError::Validation("page must be a positive integer"))?;
                }
                "limit" => {
                    params.limit = value
                        .parse()
                        .ok()
                        .filter(|limit| *limit >= 1)
                        .ok_or(RequestError::Validation("limit must be a positive integer"))?;
                }
                // Unknown parameters are ignored, matching the behavior of
                // the rest of the query string surface.
                _ => {}
            }
        }
        Ok(params)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

fn flag_is_set(value: &str) -> bool {
    value == "1" || value == "true"
}

#[derive(Debug, Deserialize)]
pub struct IngredientQueryParams {
    #[serde(default)]
    pub name: Option<String>,
}
