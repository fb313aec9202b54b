use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{booking::TimeRange, id::WorkspaceId};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::workspace::{
        AvailabilityQuery, AvailabilityResponse, CreateWorkspaceRequest,
        CreateWorkspaceTypeRequest, UpdateWorkspaceRequest, UpdateWorkspaceRequestWithId,
        WorkspaceListQuery, WorkspaceResponse, WorkspaceTypesResponse, WorkspacesResponse,
    },
};

pub async fn register_workspace(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateWorkspaceRequest>,
) -> AppResult<StatusCode> {
    if !user.role().can_manage_workspaces() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry
        .workspace_repository()
        .create(req.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn show_workspace_list(
    _user: AuthorizedUser,
    Query(query): Query<WorkspaceListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<WorkspacesResponse>> {
    let mut workspaces = registry.workspace_repository().find_all_active().await?;

    // with an availability window the catalog narrows to free workspaces
    if let (Some(from), Some(to)) = (query.available_from, query.available_to) {
        let period = TimeRange::new(from, to)?;
        let candidates: Vec<WorkspaceId> =
            workspaces.iter().map(|w| w.workspace_id).collect();
        let free: HashSet<WorkspaceId> = registry
            .booking_repository()
            .find_available_workspace_ids(&candidates, &period)
            .await?
            .into_iter()
            .collect();
        workspaces.retain(|w| free.contains(&w.workspace_id));
    }

    Ok(Json(workspaces.into()))
}

pub async fn show_workspace(
    _user: AuthorizedUser,
    Path(workspace_id): Path<WorkspaceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<WorkspaceResponse>> {
    registry
        .workspace_repository()
        .find_by_id(workspace_id)
        .await
        .and_then(|ws| match ws {
            Some(ws) => Ok(Json(ws.into())),
            None => Err(AppError::EntityNotFound(format!(
                "workspace ({workspace_id}) was not found"
            ))),
        })
}

pub async fn update_workspace(
    user: AuthorizedUser,
    Path(workspace_id): Path<WorkspaceId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateWorkspaceRequest>,
) -> AppResult<StatusCode> {
    if !user.role().can_manage_workspaces() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    let update_workspace = UpdateWorkspaceRequestWithId::new(workspace_id, req);
    registry
        .workspace_repository()
        .update(update_workspace.into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn check_workspace_availability(
    _user: AuthorizedUser,
    Path(workspace_id): Path<WorkspaceId>,
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilityResponse>> {
    registry
        .workspace_repository()
        .find_by_id(workspace_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("workspace ({workspace_id}) was not found"))
        })?;

    let period = TimeRange::new(query.from, query.to)?;
    let available = registry
        .booking_repository()
        .is_available(workspace_id, &period, None)
        .await?;

    Ok(Json(AvailabilityResponse { available }))
}

pub async fn register_workspace_type(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateWorkspaceTypeRequest>,
) -> AppResult<StatusCode> {
    if !user.role().can_manage_workspaces() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry
        .workspace_repository()
        .create_type(req.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn show_workspace_type_list(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<WorkspaceTypesResponse>> {
    registry
        .workspace_repository()
        .find_all_types()
        .await
        .map(WorkspaceTypesResponse::from)
        .map(Json)
}
