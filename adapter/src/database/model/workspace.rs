use kernel::model::{
    id::{WorkspaceId, WorkspaceTypeId},
    workspace::{Workspace, WorkspaceType, WorkspaceTypeSummary},
};

#[derive(sqlx::FromRow)]
pub struct WorkspaceRow {
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub location: String,
    pub floor: Option<String>,
    pub is_active: bool,
    pub workspace_type_id: WorkspaceTypeId,
    pub workspace_type_name: String,
    pub workspace_type_capacity: i32,
}

impl From<WorkspaceRow> for Workspace {
    fn from(value: WorkspaceRow) -> Self {
        let WorkspaceRow {
            workspace_id,
            name,
            location,
            floor,
            is_active,
            workspace_type_id,
            workspace_type_name,
            workspace_type_capacity,
        } = value;
        Workspace {
            workspace_id,
            name,
            location,
            floor,
            is_active,
            workspace_type: WorkspaceTypeSummary {
                workspace_type_id,
                name: workspace_type_name,
                capacity: workspace_type_capacity,
            },
        }
    }
}

/// Just enough workspace state for the booking preconditions.
#[derive(sqlx::FromRow)]
pub struct WorkspaceStateRow {
    pub workspace_id: WorkspaceId,
    pub is_active: bool,
}

#[derive(sqlx::FromRow)]
pub struct WorkspaceTypeRow {
    pub workspace_type_id: WorkspaceTypeId,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
}

impl From<WorkspaceTypeRow> for WorkspaceType {
    fn from(value: WorkspaceTypeRow) -> Self {
        let WorkspaceTypeRow {
            workspace_type_id,
            name,
            description,
            capacity,
        } = value;
        WorkspaceType {
            workspace_type_id,
            name,
            description,
            capacity,
        }
    }
}
