//! Assembles full recipe responses: author profile, ingredient lines, and the
//! caller's favorite / cart annotations, batched per page rather than per row.

use crate::models::{Recipe, User};
use crate::schema::{favorites, ingredients, recipe_ingredients, shopping_cart, subscriptions, users};
use crate::types::{RecipeDto, RecipeIngredientDto, UserProfile};
use diesel::prelude::*;
use std::collections::{HashMap, HashSet};

pub fn build_recipe_dtos(
    conn: &mut PgConnection,
    recipes: Vec<Recipe>,
    viewer_id: Option<i32>,
) -> QueryResult<Vec<RecipeDto>> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
    let author_ids: Vec<i32> = recipes.iter().map(|r| r.author_id).collect();

    let followed: HashSet<i32> = match viewer_id {
        Some(me) => subscriptions::table
            .filter(subscriptions::user_id.eq(me))
            .filter(subscriptions::author_id.eq_any(&author_ids))
            .select(subscriptions::author_id)
            .load::<i32>(conn)?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    let authors: HashMap<i32, UserProfile> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load::<User>(conn)?
        .into_iter()
        .map(|u| {
            let is_subscribed = followed.contains(&u.id);
            (u.id, UserProfile::from_user(u, is_subscribed))
        })
        .collect();

    let ingredient_rows: Vec<(i32, i32, String, String, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .order(ingredients::name.asc())
        .load(conn)?;

    let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredientDto>> = HashMap::new();
    for (recipe_id, id, name, measurement_unit, amount) in ingredient_rows {
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredientDto {
                id,
                name,
                measurement_unit,
                amount,
            });
    }

    let (favorited, in_cart): (HashSet<i32>, HashSet<i32>) = match viewer_id {
        Some(me) => {
            let favorited = favorites::table
                .filter(favorites::user_id.eq(me))
                .filter(favorites::recipe_id.eq_any(&recipe_ids))
                .select(favorites::recipe_id)
                .load::<i32>(conn)?
                .into_iter()
                .collect();
            let in_cart = shopping_cart::table
                .filter(shopping_cart::user_id.eq(me))
                .filter(shopping_cart::recipe_id.eq_any(&recipe_ids))
                .select(shopping_cart::recipe_id)
                .load::<i32>(conn)?
                .into_iter()
                .collect();
            (favorited, in_cart)
        }
        None => (HashSet::new(), HashSet::new()),
    };

    Ok(recipes
        .into_iter()
        .filter_map(|recipe| {
            // Author rows exist for every recipe via the FK; filter_map keeps
            // the build total if one vanishes mid-read
            let author = authors.get(&recipe.author_id)?.clone();
            Some(RecipeDto {
                id: recipe.id,
                author,
                name: recipe.name,
                image: recipe.image,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
                ingredients: ingredients_by_recipe.remove(&recipe.id).unwrap_or_default(),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
            })
        })
        .collect())
}

/// Single-recipe convenience wrapper around [`build_recipe_dtos`].
pub fn build_recipe_dto(
    conn: &mut PgConnection,
    recipe: Recipe,
    viewer_id: Option<i32>,
) -> QueryResult<Option<RecipeDto>> {
    Ok(build_recipe_dtos(conn, vec![recipe], viewer_id)?.pop())
}
