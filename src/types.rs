use crate::models::{Recipe, User};
use crate::relations::RecipeSummary;
use serde::Serialize;
use utoipa::ToSchema;

/// Public user profile, annotated with whether the caller follows them.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl UserProfile {
    pub fn from_user(user: User, is_subscribed: bool) -> Self {
        UserProfile {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
            avatar: user.avatar,
        }
    }
}

/// Minimal recipe representation: relation-toggle responses and the recipe
/// lists embedded in subscription profiles.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeMinified {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

impl From<RecipeSummary> for RecipeMinified {
    fn from(s: RecipeSummary) -> Self {
        RecipeMinified {
            id: s.id,
            name: s.name,
            image: s.image,
            cooking_time: s.cooking_time,
        }
    }
}

impl From<Recipe> for RecipeMinified {
    fn from(r: Recipe) -> Self {
        RecipeMinified {
            id: r.id,
            name: r.name,
            image: r.image,
            cooking_time: r.cooking_time,
        }
    }
}

/// An author profile with their recipes attached, as returned by the
/// subscription endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserWithRecipes {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub recipes: Vec<RecipeMinified>,
    pub recipes_count: i64,
}

/// One ingredient line of a full recipe response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientDto {
    /// Ingredient catalog id
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Full recipe representation used by list, detail, create and update.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeDto {
    pub id: i32,
    pub author: UserProfile,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    pub ingredients: Vec<RecipeIngredientDto>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMetadata {
    /// Total number of items available
    pub total: i64,
    /// 1-based page number
    pub page: i64,
    /// Page size
    pub limit: i64,
}
