use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    booking::{Booking, BookingStatus, BookingWorkspace},
    id::{BookingId, UserId, WorkspaceId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(skip)]
    pub workspace_id: WorkspaceId,
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    #[garde(length(max = 500))]
    pub purpose: Option<String>,
    #[garde(range(min = 1))]
    #[serde(default = "default_attendees")]
    pub attendees: i32,
}

fn default_attendees() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingTimeRequest {
    #[garde(skip)]
    pub new_start_time: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub new_end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    #[garde(skip)]
    pub status: Option<BookingStatus>,
    #[garde(skip)]
    pub workspace_id: Option<WorkspaceId>,
    /// Honoured for privileged callers only; everyone else is scoped to
    /// their own bookings.
    #[garde(skip)]
    pub user_id: Option<UserId>,
    #[garde(skip)]
    pub from_date: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub to_date: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub booked_by: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: Option<String>,
    pub attendees: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub workspace: BookingWorkspaceResponse,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            booked_by,
            start_time,
            end_time,
            purpose,
            attendees,
            status,
            created_at,
            updated_at,
            workspace,
        } = value;
        Self {
            booking_id,
            booked_by,
            start_time,
            end_time,
            purpose,
            attendees,
            status,
            created_at,
            updated_at,
            workspace: workspace.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWorkspaceResponse {
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub location: String,
    pub is_active: bool,
}

impl From<BookingWorkspace> for BookingWorkspaceResponse {
    fn from(value: BookingWorkspace) -> Self {
        let BookingWorkspace {
            workspace_id,
            name,
            location,
            is_active,
        } = value;
        Self {
            workspace_id,
            name,
            location,
            is_active,
        }
    }
}
