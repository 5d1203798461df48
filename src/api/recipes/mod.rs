pub mod create;
pub mod delete;
pub mod download_shopping_cart;
pub mod favorite;
pub mod get;
pub mod get_link;
pub mod list;
pub mod response;
pub mod shopping_cart;
pub mod update;
pub mod validate;

use crate::models::NewRecipeIngredient;
use crate::schema::{ingredients, recipe_ingredients};
use crate::AppState;
use axum::routing::{get as get_method, post};
use axum::Router;
use diesel::prelude::*;
use utoipa::OpenApi;
use validate::IngredientAmount;

/// Returns the router for /api/recipes endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get_method(list::list_recipes).post(create::create_recipe))
        .route(
            "/download_shopping_cart",
            get_method(download_shopping_cart::download_shopping_cart),
        )
        .route(
            "/{id}",
            get_method(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route(
            "/{id}/favorite",
            post(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            post(shopping_cart::add_to_cart).delete(shopping_cart::remove_from_cart),
        )
        .route("/{id}/get-link", get_method(get_link::get_link))
}

/// Ingredient ids from the payload that don't exist in the catalog.
pub fn missing_ingredient_ids(
    conn: &mut PgConnection,
    items: &[IngredientAmount],
) -> QueryResult<Vec<i32>> {
    let requested: Vec<i32> = items.iter().map(|i| i.id).collect();
    let existing: Vec<i32> = ingredients::table
        .filter(ingredients::id.eq_any(&requested))
        .select(ingredients::id)
        .load(conn)?;

    let mut missing: Vec<i32> = requested
        .into_iter()
        .filter(|id| !existing.contains(id))
        .collect();
    missing.sort_unstable();
    missing.dedup();
    Ok(missing)
}

/// True when an insert tripped a foreign key, meaning an ingredient was
/// deleted between the existence check and the write. The only other FK on
/// `recipe_ingredients` points at the recipe row touched in the same
/// transaction, which can't be missing.
pub fn is_ingredient_fk_violation(err: &diesel::result::Error) -> bool {
    matches!(
        err,
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ForeignKeyViolation,
            _
        )
    )
}

/// Bulk-insert the ingredient rows for a recipe.
pub fn insert_ingredient_rows(
    conn: &mut PgConnection,
    recipe_id: i32,
    items: &[IngredientAmount],
) -> QueryResult<()> {
    let rows: Vec<NewRecipeIngredient> = items
        .iter()
        .map(|i| NewRecipeIngredient {
            recipe_id,
            ingredient_id: i.id,
            amount: i.amount,
        })
        .collect();

    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        create::create_recipe,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        favorite::add_favorite,
        favorite::remove_favorite,
        shopping_cart::add_to_cart,
        shopping_cart::remove_from_cart,
        download_shopping_cart::download_shopping_cart,
        get_link::get_link,
    ),
    components(schemas(
        validate::RecipePayload,
        validate::IngredientAmount,
        list::ListRecipesResponse,
        get_link::ShortLinkResponse,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error};

    #[test]
    fn test_fk_violation_detection() {
        let fk = Error::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("violates foreign key constraint".to_string()),
        );
        assert!(is_ingredient_fk_violation(&fk));

        let unique = Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_string()),
        );
        assert!(!is_ingredient_fk_violation(&unique));
        assert!(!is_ingredient_fk_violation(&Error::NotFound));
    }
}
