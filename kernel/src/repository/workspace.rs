use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{WorkspaceId, WorkspaceTypeId},
    workspace::{
        event::{CreateWorkspace, CreateWorkspaceType, UpdateWorkspace},
        Workspace, WorkspaceType,
    },
};

#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    async fn create(&self, event: CreateWorkspace) -> AppResult<WorkspaceId>;
    /// Covers deactivation: `is_active = false` stops new bookings without
    /// touching existing ones.
    async fn update(&self, event: UpdateWorkspace) -> AppResult<()>;
    /// The bookable catalog: active workspaces only.
    async fn find_all_active(&self) -> AppResult<Vec<Workspace>>;
    async fn find_by_id(&self, workspace_id: WorkspaceId) -> AppResult<Option<Workspace>>;
    async fn create_type(&self, event: CreateWorkspaceType) -> AppResult<WorkspaceTypeId>;
    async fn find_all_types(&self) -> AppResult<Vec<WorkspaceType>>;
}
