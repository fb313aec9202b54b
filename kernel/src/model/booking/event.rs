use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::{
    booking::{BookingStatus, TimeRange},
    id::{BookingId, UserId, WorkspaceId},
    role::Role,
};

#[derive(Debug, new)]
pub struct CreateBooking {
    pub workspace_id: WorkspaceId,
    pub booked_by: UserId,
    pub period: TimeRange,
    pub purpose: Option<String>,
    pub attendees: i32,
}

/// Partial time change. Unset fields keep the booking's current value; the
/// merged range is re-validated as if the booking were being created,
/// excluding the booking itself from the conflict scan.
#[derive(Debug, new)]
pub struct UpdateBookingTime {
    pub booking_id: BookingId,
    pub requested_user: UserId,
    pub requested_role: Role,
    pub new_start_time: Option<DateTime<Utc>>,
    pub new_end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, new)]
pub struct CancelBooking {
    pub booking_id: BookingId,
    pub requested_user: UserId,
    pub requested_role: Role,
}

/// Read-side filter. Owner scoping for non-privileged callers happens before
/// this is built; a `None` field means "no constraint".
#[derive(Debug, Default)]
pub struct BookingFilter {
    pub booked_by: Option<UserId>,
    pub workspace_id: Option<WorkspaceId>,
    pub status: Option<BookingStatus>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}
