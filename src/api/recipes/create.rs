use crate::api::recipes::response::build_recipe_dto;
use crate::api::recipes::validate::{validate_payload, RecipePayload};
use crate::api::recipes::{
    insert_ingredient_rows, is_ingredient_fk_violation, missing_ingredient_ids,
};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewRecipe, Recipe};
use crate::schema::recipes;
use crate::types::RecipeDto;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = RecipePayload,
    responses(
        (status = 201, description = "Recipe created", body = RecipeDto),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(payload): Json<RecipePayload>,
) -> impl IntoResponse {
    if let Err(message) = validate_payload(&payload) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response();
    }

    let mut conn = get_conn!(pool);

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
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response();
        }
    }

    // Recipe row and its ingredient rows land together or not at all
    let created: Result<Recipe, diesel::result::Error> = conn.transaction(|conn| {
        let recipe: Recipe = diesel::insert_into(recipes::table)
            .values(&NewRecipe {
                author_id: user.id,
                name: &payload.name,
                text: &payload.text,
                cooking_time: payload.cooking_time,
                image: payload.image.as_deref(),
            })
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        insert_ingredient_rows(conn, recipe.id, &payload.ingredients)?;
        Ok(recipe)
    });

    let recipe = match created {
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
            tracing::error!("Failed to create recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    match build_recipe_dto(&mut conn, recipe, Some(user.id)) {
        Ok(Some(dto)) => (StatusCode::CREATED, Json(dto)).into_response(),
        Ok(None) | Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to serialize recipe".to_string(),
            }),
        )
            .into_response(),
    }
}
