//! User account endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use kidvid_common::{AppError, AppResult};
use kidvid_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{response::ApiResponse, state::AppState};

/// Registration request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub background_url: Option<String>,
    pub signature: Option<String>,
    pub verification_code: Option<String>,
}

/// Login request. The account may be a username or an email.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub account: String,
    pub password: String,
}

/// Password change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub email: String,
    pub verification_code: String,
    pub new_password: String,
}

/// Profile update request. Every field is overwritten; the password only
/// changes when a new non-empty one is supplied.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: String,
    pub password: Option<String>,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub background_url: Option<String>,
    pub signature: Option<String>,
}

/// User response. The password hash never leaves the server.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub background_url: Option<String>,
    pub signature: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            nickname: user.nickname,
            avatar_url: user.avatar_url,
            background_url: user.background_url,
            signature: user.signature,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

impl From<RegisterRequest> for kidvid_core::RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
            email: req.email,
            nickname: req.nickname,
            avatar_url: req.avatar_url,
            background_url: req.background_url,
            signature: req.signature,
            verification_code: req.verification_code,
        }
    }
}

/// Register a new user, verifying the emailed code when one is supplied.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.register(req.into()).await?;

    Ok(ApiResponse::created("User registered", user.into()))
}

/// Create a user without email verification (legacy path).
async fn create(
    State(state): State<AppState>,
    Json(mut req): Json<RegisterRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    req.verification_code = None;
    let user = state.user_service.register(req.into()).await?;

    Ok(ApiResponse::created("User created", user.into()))
}

/// Log in with a username or an email.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .user_service
        .login(&req.account, &req.password)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid account or password".to_string()))?;

    Ok(ApiResponse::ok_with_message("Login successful", user.into()))
}

/// Change a password after verifying the emailed code.
async fn change_password(
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    let changed = state
        .user_service
        .change_password(&req.email, &req.verification_code, &req.new_password)
        .await?;

    if !changed {
        return Err(AppError::BadRequest(
            "Unknown email or invalid verification code".to_string(),
        ));
    }

    Ok(ApiResponse::ok_with_message("Password changed", ()))
}

/// List all users.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state.user_service.list_all().await?;

    Ok(ApiResponse::ok(
        users.into_iter().map(UserResponse::from).collect(),
    ))
}

/// Get a user by ID.
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(id).await?;

    Ok(ApiResponse::ok(user.into()))
}

/// Get a user by username.
async fn get_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .user_service
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::UserNotFound(username))?;

    Ok(ApiResponse::ok(user.into()))
}

/// Get a user by nickname.
async fn get_by_nickname(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .user_service
        .find_by_nickname(&nickname)
        .await?
        .ok_or_else(|| AppError::UserNotFound(nickname))?;

    Ok(ApiResponse::ok(user.into()))
}

/// Get a user by email.
async fn get_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .user_service
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::UserNotFound(email))?;

    Ok(ApiResponse::ok(user.into()))
}

/// Update a user's profile.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let input = kidvid_core::UpdateUserInput {
        username: req.username,
        password: req.password,
        email: req.email,
        nickname: req.nickname,
        avatar_url: req.avatar_url,
        background_url: req.background_url,
        signature: req.signature,
    };

    let user = state.user_service.update(id, input).await?;

    Ok(ApiResponse::ok_with_message("User updated", user.into()))
}

/// Delete a user.
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.delete(id).await?;

    Ok(ApiResponse::ok_with_message("User deleted", ()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/change-password", post(change_password))
        .route("/", post(create).get(list))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
        .route("/username/{username}", get(get_by_username))
        .route("/nickname/{nickname}", get(get_by_nickname))
        .route("/email/{email}", get(get_by_email))
}
