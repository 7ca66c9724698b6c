use serde::{Deserialize, Serialize};

use super::response::RecipeResponse;

/// Paginated listing envelope: `count` is the total number of recipes
/// matching the filter, `results` the requested page slice.
#[derive(Debug, Deserialize, Serialize)]
pub struct RecipeListWrapper {
    pub count: i64,
    pub results: Vec<RecipeResponse>,
}
