use chrono::{DateTime, Utc};
use kernel::model::{
    booking::{Booking, BookingStatus, BookingWorkspace},
    id::{BookingId, UserId, WorkspaceId},
};
use shared::error::AppError;

/// One booking joined with the slice of workspace data it is displayed with.
#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub workspace_id: WorkspaceId,
    pub user_id: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: Option<String>,
    pub attendees: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub workspace_name: String,
    pub workspace_location: String,
    pub workspace_is_active: bool,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let BookingRow {
            booking_id,
            workspace_id,
            user_id,
            start_time,
            end_time,
            purpose,
            attendees,
            status,
            created_at,
            updated_at,
            workspace_name,
            workspace_location,
            workspace_is_active,
        } = value;
        let status = status
            .parse::<BookingStatus>()
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))?;
        Ok(Booking {
            booking_id,
            booked_by: user_id,
            start_time,
            end_time,
            purpose,
            attendees,
            status,
            created_at,
            updated_at,
            workspace: BookingWorkspace {
                workspace_id,
                name: workspace_name,
                location: workspace_location,
                is_active: workspace_is_active,
            },
        })
    }
}

/// The fields the mutation paths read before writing: enough to check
/// ownership, status and the current time range.
#[derive(sqlx::FromRow)]
pub struct BookingStateRow {
    pub booking_id: BookingId,
    pub workspace_id: WorkspaceId,
    pub user_id: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
}

impl BookingStateRow {
    pub fn status(&self) -> Result<BookingStatus, AppError> {
        self.status
            .parse::<BookingStatus>()
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))
    }
}
