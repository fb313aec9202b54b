use crate::model::id::{WorkspaceId, WorkspaceTypeId};

pub mod event;

#[derive(Debug)]
pub struct Workspace {
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub location: String,
    pub floor: Option<String>,
    pub is_active: bool,
    pub workspace_type: WorkspaceTypeSummary,
}

/// The slice of a workspace type that rides along with a workspace.
#[derive(Debug)]
pub struct WorkspaceTypeSummary {
    pub workspace_type_id: WorkspaceTypeId,
    pub name: String,
    pub capacity: i32,
}

#[derive(Debug)]
pub struct WorkspaceType {
    pub workspace_type_id: WorkspaceTypeId,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
}
