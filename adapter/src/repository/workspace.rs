use async_trait::async_trait;
use derive_new::new;

use kernel::model::{
    id::{WorkspaceId, WorkspaceTypeId},
    workspace::{
        event::{CreateWorkspace, CreateWorkspaceType, UpdateWorkspace},
        Workspace, WorkspaceType,
    },
};
use kernel::repository::workspace::WorkspaceRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::workspace::{WorkspaceRow, WorkspaceTypeRow},
    ConnectionPool,
};

const WORKSPACE_SELECT: &str = r#"
    SELECT
        w.workspace_id,
        w.name,
        w.location,
        w.floor,
        w.is_active,
        w.workspace_type_id,
        t.name AS workspace_type_name,
        t.capacity AS workspace_type_capacity
    FROM workspaces AS w
    INNER JOIN workspace_types AS t ON w.workspace_type_id = t.workspace_type_id
"#;

#[derive(new)]
pub struct WorkspaceRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl WorkspaceRepository for WorkspaceRepositoryImpl {
    async fn create(&self, event: CreateWorkspace) -> AppResult<WorkspaceId> {
        let workspace_id = WorkspaceId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO workspaces
                (workspace_id, name, location, floor, workspace_type_id, is_active)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(workspace_id)
        .bind(&event.name)
        .bind(&event.location)
        .bind(&event.floor)
        .bind(event.workspace_type_id)
        .bind(event.is_active)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no workspace record has been created".into(),
            ));
        }

        Ok(workspace_id)
    }

    // Also the deactivation path: is_active = false stops new bookings while
    // existing ones keep their time ranges.
    async fn update(&self, event: UpdateWorkspace) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE workspaces
                SET
                    name = COALESCE($2, name),
                    location = COALESCE($3, location),
                    floor = COALESCE($4, floor),
                    workspace_type_id = COALESCE($5, workspace_type_id),
                    is_active = COALESCE($6, is_active),
                    updated_at = CURRENT_TIMESTAMP
                WHERE workspace_id = $1
            "#,
        )
        .bind(event.workspace_id)
        .bind(&event.name)
        .bind(&event.location)
        .bind(&event.floor)
        .bind(event.workspace_type_id)
        .bind(event.is_active)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "workspace ({}) was not found",
                event.workspace_id
            )));
        }

        Ok(())
    }

    async fn find_all_active(&self) -> AppResult<Vec<Workspace>> {
        let mut query = WORKSPACE_SELECT.to_string();
        query.push_str(" WHERE w.is_active = TRUE ORDER BY w.name ASC");
        let rows: Vec<WorkspaceRow> = sqlx::query_as(&query)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Workspace::from).collect())
    }

    async fn find_by_id(&self, workspace_id: WorkspaceId) -> AppResult<Option<Workspace>> {
        let mut query = WORKSPACE_SELECT.to_string();
        query.push_str(" WHERE w.workspace_id = $1");
        let row: Option<WorkspaceRow> = sqlx::query_as(&query)
            .bind(workspace_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Workspace::from))
    }

    async fn create_type(&self, event: CreateWorkspaceType) -> AppResult<WorkspaceTypeId> {
        let workspace_type_id = WorkspaceTypeId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO workspace_types (workspace_type_id, name, description, capacity)
                VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(workspace_type_id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.capacity)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no workspace type record has been created".into(),
            ));
        }

        Ok(workspace_type_id)
    }

    async fn find_all_types(&self) -> AppResult<Vec<WorkspaceType>> {
        let rows: Vec<WorkspaceTypeRow> = sqlx::query_as(
            r#"
                SELECT workspace_type_id, name, description, capacity
                FROM workspace_types
                ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(WorkspaceType::from).collect())
    }
}
