use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::RequestError;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct IngredientAmount {
    pub id: i64,
    pub amount: i64,
}

/// Body of both recipe create and update. Update uses replace semantics, so
/// the two operations share one full-representation payload.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RecipeRequest {
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<i64>,
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
}

impl RecipeRequest {
    /// Field-level validation, run before anything is written. Referential
    /// checks (do these tag/ingredient ids exist) are left to the database.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.cooking_time < 1 {
            return Err(RequestError::Validation("cooking_time must be at least 1"));
        }
        if self.ingredients.is_empty() {
            return Err(RequestError::Validation("ingredients must not be empty"));
        }
        let mut seen_ingredients = HashSet::new();
        for line in &self.ingredients {
            if line.amount < 1 {
                return Err(RequestError::Validation(
                    "ingredients amount must be at least 1",
                ));
            }
            if !seen_ingredients.insert(line.id) {
                return Err(RequestError::Validation(
                    "ingredients must not repeat within a recipe",
                ));
            }
        }
        let mut seen_tags = HashSet::new();
        for tag in &self.tags {
            if !seen_tags.insert(*tag) {
                return Err(RequestError::Validation("tags must not repeat"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RecipeRequest {
        RecipeRequest {
            ingredients: vec![
                IngredientAmount { id: 1, amount: 200 },
                IngredientAmount { id: 2, amount: 3 },
            ],
            tags: vec![1, 2],
            image: "recipe_img/pancakes.png".to_string(),
            name: "Pancakes".to_string(),
            text: "Mix and fry.".to_string(),
            cooking_time: 20,
        }
    }

    #[test]
    fn accepts_a_well_formed_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn rejects_zero_cooking_time() {
        let mut request = request();
        request.cooking_time = 0;
        assert!(matches!(
            request.validate(),
            Err(RequestError::Validation(message)) if message.contains("cooking_time")
        ));
    }

    #[test]
    fn rejects_empty_ingredient_list() {
        let mut request = request();
        request.ingredients.clear();
        assert!(matches!(
            request.validate(),
            Err(RequestError::Validation(message)) if message.contains("ingredients")
        ));
    }

    #[test]
    fn rejects_duplicate_ingredient_ids() {
        let mut request = request();
        request.ingredients.push(IngredientAmount { id: 1, amount: 50 });
        assert!(matches!(
            request.validate(),
            Err(RequestError::Validation(message)) if message.contains("repeat")
        ));
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let mut request = request();
        request.ingredients[0].amount = 0;
        assert!(matches!(
            request.validate(),
            Err(RequestError::Validation(message)) if message.contains("amount")
        ));
    }

    #[test]
    fn rejects_duplicate_tags() {
        let mut request = request();
        request.tags.push(1);
        assert!(matches!(
            request.validate(),
            Err(RequestError::Validation(message)) if message.contains("tags")
        ));
    }
}
