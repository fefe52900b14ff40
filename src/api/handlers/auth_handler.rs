//! Authentication and account handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{AccountExport, CurrentUser, SettingsKind, UpdateProfile, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::{AuthSession, Registration};
use crate::types::{ApiResponse, Created};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password (minimum 6 characters)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret1", min_length = 6)]
    pub password: String,
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Defaults to student
    pub role: Option<UserRole>,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret1")]
    pub password: String,
}

/// Profile update; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfile {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            bio: req.bio,
            avatar: req.avatar,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Replace one settings section; `settings` must match that section's shape
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub settings_type: SettingsKind,
    #[schema(value_type = Object)]
    pub settings: serde_json::Value,
}

/// Public routes: register and login
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes acting on the authenticated caller's own account
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/password", put(change_password))
        .route("/settings", put(update_settings))
        .route("/export-data", get(export_data))
        .route("/account", axum::routing::delete(delete_account))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthSession),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<AuthSession>> {
    let session = state
        .auth_service
        .register(Registration {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            role: payload.role.unwrap_or(UserRole::Student),
        })
        .await?;

    Ok(Created(session, "User registered successfully"))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthSession),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthSession>>> {
    let session = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(ApiResponse::with_message(session, "Login successful")))
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.user_service.get_user(current_user.id).await?;
    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        "Profile retrieved successfully",
    )))
}

/// Update name, email or profile details
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    tag = "Account",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .user_service
        .update_profile(&current_user, payload.into())
        .await?;

    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        "Profile updated successfully",
    )))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/api/auth/password",
    tag = "Account",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Current password is incorrect")
    )
)]
pub async fn change_password(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .user_service
        .change_password(&current_user, payload.current_password, payload.new_password)
        .await?;

    Ok(Json(ApiResponse::message("Password changed successfully")))
}

/// Replace one settings section
#[utoipa::path(
    put,
    path = "/api/auth/settings",
    tag = "Account",
    security(("bearer_auth" = [])),
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = UserResponse),
        (status = 400, description = "Settings do not match the section")
    )
)]
pub async fn update_settings(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateSettingsRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .user_service
        .update_settings(&current_user, payload.settings_type, payload.settings)
        .await?;

    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        "Settings updated successfully",
    )))
}

/// Download a copy of the caller's data
#[utoipa::path(
    get,
    path = "/api/auth/export-data",
    tag = "Account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account export", body = AccountExport)
    )
)]
pub async fn export_data(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<AccountExport>>> {
    let export = state.user_service.export_account(&current_user).await?;
    Ok(Json(ApiResponse::with_message(export, "Account data exported successfully")))
}

/// Delete the caller's account
#[utoipa::path(
    delete,
    path = "/api/auth/account",
    tag = "Account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 400, description = "Teacher still owns courses")
    )
)]
pub async fn delete_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.user_service.delete_account(&current_user).await?;
    Ok(Json(ApiResponse::message("Account deleted successfully")))
}
