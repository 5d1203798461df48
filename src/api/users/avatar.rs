use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// 2 MB of raw image data, before base64 overhead (4/3).
const MAX_AVATAR_LEN: usize = 2 * 1024 * 1024 * 4 / 3;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetAvatarRequest {
    /// `data:image/...;base64,...` data URI
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SetAvatarResponse {
    pub avatar: String,
}

fn validate_avatar(data: &str) -> Result<(), &'static str> {
    if !data.starts_with("data:image/") || !data.contains(";base64,") {
        return Err("Avatar must be a base64 image data URI");
    }
    if data.len() > MAX_AVATAR_LEN {
        return Err("Avatar must not exceed 2MB");
    }
    Ok(())
}

#[utoipa::path(
    put,
    path = "/api/users/me/avatar",
    tag = "users",
    request_body = SetAvatarRequest,
    responses(
        (status = 200, description = "Avatar updated", body = SetAvatarResponse),
        (status = 400, description = "Invalid avatar payload", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<SetAvatarRequest>,
) -> impl IntoResponse {
    if let Err(message) = validate_avatar(&req.avatar) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    if let Err(e) = diesel::update(users::table.find(user.id))
        .set(users::avatar.eq(Some(req.avatar.as_str())))
        .execute(&mut conn)
    {
        tracing::error!("Failed to set avatar: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to set avatar".to_string(),
            }),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(SetAvatarResponse { avatar: req.avatar }),
    )
        .into_response()
}

#[utoipa::path(
    delete,
    path = "/api/users/me/avatar",
    tag = "users",
    responses(
        (status = 204, description = "Avatar cleared"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    if let Err(e) = diesel::update(users::table.find(user.id))
        .set(users::avatar.eq(None::<String>))
        .execute(&mut conn)
    {
        tracing::error!("Failed to clear avatar: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to clear avatar".to_string(),
            }),
        )
            .into_response();
    }

    StatusCode::NO_CONTENT.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_image_data_uri() {
        assert!(validate_avatar("data:image/png;base64,iVBORw0KGgo=").is_ok());
    }

    #[test]
    fn test_rejects_non_image_payloads() {
        assert!(validate_avatar("https://example.com/a.png").is_err());
        assert!(validate_avatar("data:text/plain;base64,aGk=").is_err());
        assert!(validate_avatar("data:image/png,no-base64-marker").is_err());
    }

    #[test]
    fn test_rejects_oversized_payload() {
        let big = format!("data:image/png;base64,{}", "A".repeat(MAX_AVATAR_LEN));
        assert!(validate_avatar(&big).is_err());
    }
}
