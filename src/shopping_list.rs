//! Shopping-list aggregation: sum ingredient amounts across every recipe in a
//! user's cart and render the result as plain text.

use crate::schema::{ingredients, recipe_ingredients, shopping_cart};
use diesel::dsl::sum;
use diesel::prelude::*;

pub const SHOPPING_LIST_HEADER: &str = "Shopping list:";

/// One consolidated line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedIngredient {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Sum ingredient amounts across all recipes in the user's cart, grouped by
/// (name, unit) and ordered by name. One query, one snapshot.
pub fn aggregate_cart(
    conn: &mut PgConnection,
    user_id: i32,
) -> Result<Vec<AggregatedIngredient>, diesel::result::Error> {
    let cart_recipe_ids = shopping_cart::table
        .filter(shopping_cart::user_id.eq(user_id))
        .select(shopping_cart::recipe_id);

    let rows: Vec<(String, String, Option<i64>)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(cart_recipe_ids))
        .group_by((ingredients::name, ingredients::measurement_unit))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            sum(recipe_ingredients::amount),
        ))
        .order(ingredients::name.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(name, measurement_unit, total)| AggregatedIngredient {
            name,
            measurement_unit,
            // SUM over a non-empty group is never NULL; groups only exist for
            // matched rows
            total_amount: total.unwrap_or(0),
        })
        .collect())
}

/// Render the aggregated cart as the downloadable text file.
///
/// An empty cart yields the header with no ingredient lines; it is a valid
/// (if unhelpful) shopping list, not an error.
pub fn render_shopping_list(items: &[AggregatedIngredient]) -> String {
    let mut text = format!("{}\n\n", SHOPPING_LIST_HEADER);
    for item in items {
        text.push_str(&format!(
            "{} ({}) - {}\n",
            item.name, item.measurement_unit, item.total_amount
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, unit: &str, total: i64) -> AggregatedIngredient {
        AggregatedIngredient {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            total_amount: total,
        }
    }

    #[test]
    fn test_render_empty_cart_is_header_only() {
        assert_eq!(render_shopping_list(&[]), "Shopping list:\n\n");
    }

    #[test]
    fn test_render_line_format() {
        let items = vec![item("Sugar", "g", 25)];
        assert_eq!(
            render_shopping_list(&items),
            "Shopping list:\n\nSugar (g) - 25\n"
        );
    }

    #[test]
    fn test_render_multiple_lines_preserve_order() {
        let items = vec![item("Flour", "g", 500), item("Milk", "ml", 200)];
        let text = render_shopping_list(&items);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Shopping list:", "", "Flour (g) - 500", "Milk (ml) - 200"]);
    }

    #[test]
    fn test_render_is_deterministic() {
        let items = vec![item("Salt", "g", 5), item("Sugar", "g", 25)];
        assert_eq!(render_shopping_list(&items), render_shopping_list(&items));
    }

    #[test]
    fn test_same_name_different_unit_stay_separate() {
        let items = vec![item("Sugar", "g", 25), item("Sugar", "tbsp", 2)];
        let text = render_shopping_list(&items);
        assert!(text.contains("Sugar (g) - 25"));
        assert!(text.contains("Sugar (tbsp) - 2"));
    }
}
