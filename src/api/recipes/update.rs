use crate::api::recipes::response::build_recipe_dto;
use crate::api::recipes::validate::{validate_payload, RecipePayload};
use crate::api::recipes::{
    insert_ingredient_rows, is_ingredient_fk_violation, missing_ingredient_ids,
};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::{recipe_ingredients, recipes};
use crate::types::RecipeDto;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body = RecipePayload,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeDto),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the recipe author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    Json(payload): Json<RecipePayload>,
) -> impl IntoResponse {
    if let Err(message) = validate_payload(&payload) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response();
    }

    let mut conn = get_conn!(pool);

    let existing: Recipe = match recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
    {
        Ok(r) => r,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Recipe not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    if existing.author_id != user.id {
        return (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "Only the author can edit this recipe".to_string(),
            }),
        )
            .into_response();
    }

    match missing_ingredient_ids(&mut conn, &payload.ingredients) {
        Ok(missing) if !missing.is_empty() => {
            let ids = missing
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Ingredients with ids {} do not exist", ids),
                }),
            )
                .into_response();
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!("Failed to check ingredients: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response();
        }
    }

    // Field updates and the ingredient-set replacement are atomic
    let updated: Result<Recipe, diesel::result::Error> = conn.transaction(|conn| {
        let recipe: Recipe = diesel::update(recipes::table.find(id))
            .set((
                recipes::name.eq(&payload.name),
                recipes::text.eq(&payload.text),
                recipes::cooking_time.eq(payload.cooking_time),
                recipes::image.eq(payload.image.as_deref()),
            ))
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id)))
            .execute(conn)?;
        insert_ingredient_rows(conn, id, &payload.ingredients)?;

        Ok(recipe)
    });

    let recipe = match updated {
        Ok(r) => r,
        // An ingredient vanished between the existence check and the insert
        Err(e) if is_ingredient_fk_violation(&e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "One or more ingredients do not exist".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Failed to update recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    match build_recipe_dto(&mut conn, recipe, Some(user.id)) {
        Ok(Some(dto)) => (StatusCode::OK, Json(dto)).into_response(),
        Ok(None) | Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to serialize recipe".to_string(),
            }),
        )
            .into_response(),
    }
}
