use crate::api::ErrorResponse;
use crate::auth::hash_password;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewUser, User};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

const NAME_MAX: usize = 150;
const EMAIL_MAX: usize = 254;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateUserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Same username alphabet the original service allowed: word characters plus
/// `.`, `@`, `+`, `-`.
fn valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= NAME_MAX
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
}

fn validate(req: &CreateUserRequest) -> Result<(), String> {
    if req.email.is_empty() || req.email.len() > EMAIL_MAX || !req.email.contains('@') {
        return Err("Invalid email address".to_string());
    }
    if !valid_username(&req.username) {
        return Err("Invalid username".to_string());
    }
    if req.first_name.is_empty() || req.first_name.len() > NAME_MAX {
        return Err("First name is required".to_string());
    }
    if req.last_name.is_empty() || req.last_name.len() > NAME_MAX {
        return Err("Last name is required".to_string());
    }
    if req.password.is_empty() {
        return Err("Password is required".to_string());
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = CreateUserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email or username already taken", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Err(message) = validate(&req) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response();
    }

    let password_hash = match hash_password(&req.password) {
        Ok(h) => h,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to hash password".to_string(),
                }),
            )
                .into_response()
        }
    };

    let mut conn = get_conn!(pool);

    let new_user = NewUser {
        email: &req.email,
        username: &req.username,
        first_name: &req.first_name,
        last_name: &req.last_name,
        password_hash: &password_hash,
    };

    let user: User = match diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
    {
        Ok(u) => u,
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)) => {
            let field = if info.constraint_name() == Some("users_email_key") {
                "Email"
            } else {
                "Username"
            };
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("{} already taken", field),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Failed to create user: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create user".to_string(),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::CREATED,
        Json(CreateUserResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            email: "cook@example.com".to_string(),
            username: "cook".to_string(),
            first_name: "Julia".to_string(),
            last_name: "Child".to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate(&request()).is_ok());
    }

    #[test]
    fn test_username_alphabet() {
        assert!(valid_username("user.name+tag@host-1"));
        assert!(valid_username("under_score"));
        assert!(!valid_username("has space"));
        assert!(!valid_username("semi;colon"));
        assert!(!valid_username(""));
    }

    #[test]
    fn test_rejects_bad_email() {
        let mut req = request();
        req.email = "not-an-email".to_string();
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_rejects_empty_names_and_password() {
        for field in ["first_name", "last_name", "password"] {
            let mut req = request();
            match field {
                "first_name" => req.first_name.clear(),
                "last_name" => req.last_name.clear(),
                _ => req.password.clear(),
            }
            assert!(validate(&req).is_err(), "{} should be required", field);
        }
    }
}
