use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::id::UserId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::user::{
        CreateUserRequest, UpdateUserRoleRequest, UpdateUserRoleRequestWithUserId, UserResponse,
        UsersResponse,
    },
};

pub async fn register_user(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    if !user.role().can_manage_users() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    let user_id = registry.user_repository().create(req.into()).await?;

    let created = registry
        .user_repository()
        .find_current_user(user_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("created user could not be reloaded".into()))?;

    Ok(Json(created.into()))
}

pub async fn list_users(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UsersResponse>> {
    if !user.role().can_manage_users() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .user_repository()
        .find_all()
        .await
        .map(UsersResponse::from)
        .map(Json)
}

pub async fn get_current_user(user: AuthorizedUser) -> Json<UserResponse> {
    Json(UserResponse::from(user.user))
}

pub async fn change_user_role(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateUserRoleRequest>,
) -> AppResult<StatusCode> {
    if !user.role().can_manage_users() {
        return Err(AppError::ForbiddenOperation);
    }

    let update = UpdateUserRoleRequestWithUserId::new(user_id, req);
    registry
        .user_repository()
        .update_role(update.into())
        .await
        .map(|_| StatusCode::OK)
}
