use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{WorkspaceId, WorkspaceTypeId},
    workspace::{
        event::{CreateWorkspace, CreateWorkspaceType, UpdateWorkspace},
        Workspace, WorkspaceType, WorkspaceTypeSummary,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(length(min = 1))]
    pub location: String,
    #[garde(skip)]
    pub floor: Option<String>,
    #[garde(skip)]
    pub workspace_type_id: WorkspaceTypeId,
    #[garde(skip)]
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

impl From<CreateWorkspaceRequest> for CreateWorkspace {
    fn from(value: CreateWorkspaceRequest) -> Self {
        let CreateWorkspaceRequest {
            name,
            location,
            floor,
            workspace_type_id,
            is_active,
        } = value;
        CreateWorkspace {
            name,
            location,
            floor,
            workspace_type_id,
            is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkspaceRequest {
    #[garde(inner(length(min = 1)))]
    pub name: Option<String>,
    #[garde(inner(length(min = 1)))]
    pub location: Option<String>,
    #[garde(skip)]
    pub floor: Option<String>,
    #[garde(skip)]
    pub workspace_type_id: Option<WorkspaceTypeId>,
    #[garde(skip)]
    pub is_active: Option<bool>,
}

#[derive(new)]
pub struct UpdateWorkspaceRequestWithId(WorkspaceId, UpdateWorkspaceRequest);

impl From<UpdateWorkspaceRequestWithId> for UpdateWorkspace {
    fn from(value: UpdateWorkspaceRequestWithId) -> Self {
        let UpdateWorkspaceRequestWithId(
            workspace_id,
            UpdateWorkspaceRequest {
                name,
                location,
                floor,
                workspace_type_id,
                is_active,
            },
        ) = value;
        UpdateWorkspace {
            workspace_id,
            name,
            location,
            floor,
            workspace_type_id,
            is_active,
        }
    }
}

/// Optional availability window: when both bounds are present the listing
/// narrows to workspaces free for that range.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceListQuery {
    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspacesResponse {
    pub items: Vec<WorkspaceResponse>,
}

impl From<Vec<Workspace>> for WorkspacesResponse {
    fn from(value: Vec<Workspace>) -> Self {
        Self {
            items: value.into_iter().map(WorkspaceResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceResponse {
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub location: String,
    pub floor: Option<String>,
    pub is_active: bool,
    pub workspace_type: WorkspaceTypeSummaryResponse,
}

impl From<Workspace> for WorkspaceResponse {
    fn from(value: Workspace) -> Self {
        let Workspace {
            workspace_id,
            name,
            location,
            floor,
            is_active,
            workspace_type,
        } = value;
        Self {
            workspace_id,
            name,
            location,
            floor,
            is_active,
            workspace_type: workspace_type.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceTypeSummaryResponse {
    pub workspace_type_id: WorkspaceTypeId,
    pub name: String,
    pub capacity: i32,
}

impl From<WorkspaceTypeSummary> for WorkspaceTypeSummaryResponse {
    fn from(value: WorkspaceTypeSummary) -> Self {
        let WorkspaceTypeSummary {
            workspace_type_id,
            name,
            capacity,
        } = value;
        Self {
            workspace_type_id,
            name,
            capacity,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceTypeRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(range(min = 1))]
    #[serde(default = "default_capacity")]
    pub capacity: i32,
}

fn default_capacity() -> i32 {
    1
}

impl From<CreateWorkspaceTypeRequest> for CreateWorkspaceType {
    fn from(value: CreateWorkspaceTypeRequest) -> Self {
        let CreateWorkspaceTypeRequest {
            name,
            description,
            capacity,
        } = value;
        CreateWorkspaceType {
            name,
            description,
            capacity,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceTypesResponse {
    pub items: Vec<WorkspaceTypeResponse>,
}

impl From<Vec<WorkspaceType>> for WorkspaceTypesResponse {
    fn from(value: Vec<WorkspaceType>) -> Self {
        Self {
            items: value.into_iter().map(WorkspaceTypeResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceTypeResponse {
    pub workspace_type_id: WorkspaceTypeId,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
}

impl From<WorkspaceType> for WorkspaceTypeResponse {
    fn from(value: WorkspaceType) -> Self {
        let WorkspaceType {
            workspace_type_id,
            name,
            description,
            capacity,
        } = value;
        Self {
            workspace_type_id,
            name,
            description,
            capacity,
        }
    }
}
