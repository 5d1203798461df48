//! User-recipe membership rows: favorites and shopping-cart entries.
//!
//! Both relations have the same shape (one row per (user, recipe) pair, unique
//! index on the pair), so a single add/remove implementation serves both,
//! dispatched on [`RelationKind`].

use crate::models::{NewCartEntry, NewFavorite, Recipe};
use crate::schema::{favorites, recipes, shopping_cart};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Favorite,
    ShoppingCart,
}

impl RelationKind {
    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            RelationKind::Favorite => "favorites",
            RelationKind::ShoppingCart => "shopping cart",
        }
    }
}

#[derive(Error, Debug)]
pub enum RelationError {
    #[error("Recipe not found")]
    RecipeNotFound,

    #[error("Recipe is already in {}", .0.label())]
    AlreadyExists(RelationKind),

    #[error("Recipe is not in {}", .0.label())]
    NotInRelation(RelationKind),

    #[error("Database error: {0}")]
    Db(#[from] DieselError),
}

/// Minimal recipe summary returned when a relation row is created.
#[derive(Debug, Clone)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

fn load_recipe(conn: &mut PgConnection, recipe_id: i32) -> Result<Recipe, RelationError> {
    recipes::table
        .find(recipe_id)
        .select(Recipe::as_select())
        .first(conn)
        .map_err(|e| match e {
            DieselError::NotFound => RelationError::RecipeNotFound,
            other => RelationError::Db(other),
        })
}

/// Insert a (user, recipe) row for the given relation kind.
///
/// The unique index on the pair is the source of truth; a concurrent duplicate
/// insert that slips past the pre-check comes back as a `UniqueViolation` and
/// is translated to `AlreadyExists`.
pub fn add(
    conn: &mut PgConnection,
    kind: RelationKind,
    user_id: i32,
    recipe_id: i32,
) -> Result<RecipeSummary, RelationError> {
    let recipe = load_recipe(conn, recipe_id)?;

    let inserted = match kind {
        RelationKind::Favorite => diesel::insert_into(favorites::table)
            .values(&NewFavorite { user_id, recipe_id })
            .execute(conn),
        RelationKind::ShoppingCart => diesel::insert_into(shopping_cart::table)
            .values(&NewCartEntry { user_id, recipe_id })
            .execute(conn),
    };

    match inserted {
        Ok(_) => Ok(RecipeSummary {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            Err(RelationError::AlreadyExists(kind))
        }
        Err(e) => Err(RelationError::Db(e)),
    }
}

/// Delete the (user, recipe) row for the given relation kind.
///
/// Fails with `RecipeNotFound` if the recipe itself is gone, and with
/// `NotInRelation` if the recipe exists but the caller never added it.
pub fn remove(
    conn: &mut PgConnection,
    kind: RelationKind,
    user_id: i32,
    recipe_id: i32,
) -> Result<(), RelationError> {
    load_recipe(conn, recipe_id)?;

    let deleted = match kind {
        RelationKind::Favorite => diesel::delete(
            favorites::table
                .filter(favorites::user_id.eq(user_id))
                .filter(favorites::recipe_id.eq(recipe_id)),
        )
        .execute(conn)?,
        RelationKind::ShoppingCart => diesel::delete(
            shopping_cart::table
                .filter(shopping_cart::user_id.eq(user_id))
                .filter(shopping_cart::recipe_id.eq(recipe_id)),
        )
        .execute(conn)?,
    };

    if deleted == 0 {
        return Err(RelationError::NotInRelation(kind));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_relation() {
        assert_eq!(
            RelationError::AlreadyExists(RelationKind::Favorite).to_string(),
            "Recipe is already in favorites"
        );
        assert_eq!(
            RelationError::NotInRelation(RelationKind::ShoppingCart).to_string(),
            "Recipe is not in shopping cart"
        );
    }
}
