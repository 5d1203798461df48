use serde::Deserialize;
use std::collections::HashSet;
use utoipa::ToSchema;

const NAME_MAX: usize = 256;

/// Request body shared by recipe create and update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipePayload {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    /// `data:image/...;base64,...` data URI
    #[serde(default)]
    pub image: Option<String>,
    pub ingredients: Vec<IngredientAmount>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientAmount {
    /// Ingredient catalog id
    pub id: i32,
    pub amount: i32,
}

/// Structural validation; ingredient existence is checked against the catalog
/// separately.
pub fn validate_payload(payload: &RecipePayload) -> Result<(), String> {
    if payload.name.trim().is_empty() {
        return Err("Recipe name is required".to_string());
    }
    if payload.name.len() > NAME_MAX {
        return Err(format!("Recipe name must not exceed {} characters", NAME_MAX));
    }
    if payload.text.trim().is_empty() {
        return Err("Recipe text is required".to_string());
    }
    if payload.cooking_time < 1 {
        return Err("Cooking time must be at least 1 minute".to_string());
    }
    if payload.ingredients.is_empty() {
        return Err("At least one ingredient is required".to_string());
    }

    let mut seen = HashSet::new();
    for item in &payload.ingredients {
        if !seen.insert(item.id) {
            return Err("Ingredients must not repeat".to_string());
        }
        if item.amount < 1 {
            return Err(format!(
                "Amount for ingredient {} must be a positive integer",
                item.id
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> RecipePayload {
        RecipePayload {
            name: "Pancakes".to_string(),
            text: "Mix and fry.".to_string(),
            cooking_time: 20,
            image: None,
            ingredients: vec![
                IngredientAmount { id: 1, amount: 200 },
                IngredientAmount { id: 2, amount: 2 },
            ],
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(validate_payload(&payload()).is_ok());
    }

    #[test]
    fn test_rejects_blank_name_and_text() {
        let mut p = payload();
        p.name = "   ".to_string();
        assert!(validate_payload(&p).is_err());

        let mut p = payload();
        p.text = String::new();
        assert!(validate_payload(&p).is_err());
    }

    #[test]
    fn test_rejects_overlong_name() {
        let mut p = payload();
        p.name = "x".repeat(257);
        assert!(validate_payload(&p).is_err());
    }

    #[test]
    fn test_rejects_zero_cooking_time() {
        let mut p = payload();
        p.cooking_time = 0;
        assert!(validate_payload(&p).is_err());
    }

    #[test]
    fn test_rejects_empty_ingredient_list() {
        let mut p = payload();
        p.ingredients.clear();
        assert_eq!(
            validate_payload(&p).unwrap_err(),
            "At least one ingredient is required"
        );
    }

    #[test]
    fn test_rejects_duplicate_ingredients() {
        let mut p = payload();
        p.ingredients = vec![
            IngredientAmount { id: 1, amount: 10 },
            IngredientAmount { id: 1, amount: 15 },
        ];
        assert_eq!(validate_payload(&p).unwrap_err(), "Ingredients must not repeat");
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let mut p = payload();
        p.ingredients[0].amount = 0;
        assert!(validate_payload(&p).is_err());
    }
}
