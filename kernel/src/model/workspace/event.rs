use derive_new::new;

use crate::model::id::{WorkspaceId, WorkspaceTypeId};

#[derive(new)]
pub struct CreateWorkspace {
    pub name: String,
    pub location: String,
    pub floor: Option<String>,
    pub workspace_type_id: WorkspaceTypeId,
    pub is_active: bool,
}

#[derive(Debug, new)]
pub struct UpdateWorkspace {
    pub workspace_id: WorkspaceId,
    pub name: Option<String>,
    pub location: Option<String>,
    pub floor: Option<String>,
    pub workspace_type_id: Option<WorkspaceTypeId>,
    pub is_active: Option<bool>,
}

#[derive(new)]
pub struct CreateWorkspaceType {
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
}
