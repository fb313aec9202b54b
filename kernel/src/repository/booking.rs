use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

use crate::model::{
    booking::{
        event::{BookingFilter, CancelBooking, CreateBooking, UpdateBookingTime},
        Booking, TimeRange,
    },
    id::{BookingId, UserId, WorkspaceId},
};

/// Single entry point for booking mutation and for availability questions.
/// Implementations must evaluate the availability check and the write in one
/// transactional scope so that two concurrent requests for overlapping ranges
/// on the same workspace cannot both succeed.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Validates and creates a booking. `now` is the validation instant.
    async fn create(&self, event: CreateBooking, now: DateTime<Utc>) -> AppResult<BookingId>;
    /// Re-validates the merged time range as a fresh booking (excluding the
    /// booking itself) and applies it atomically with the validation.
    async fn update_time(&self, event: UpdateBookingTime, now: DateTime<Utc>) -> AppResult<()>;
    /// Cancels a Pending or Confirmed booking before its end time.
    async fn cancel(&self, event: CancelBooking, now: DateTime<Utc>) -> AppResult<()>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    async fn find_all(&self, filter: BookingFilter) -> AppResult<Vec<Booking>>;
    /// Confirmed bookings starting at or after `now`, soonest first.
    async fn find_upcoming(
        &self,
        booked_by: Option<UserId>,
        now: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Booking>>;
    /// Active bookings starting within [day_start, day_end), earliest first.
    async fn find_in_day(
        &self,
        booked_by: Option<UserId>,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>>;
    /// True when no active booking on the workspace overlaps `period`.
    /// `exclude_booking_id` removes a booking from the scan when it is being
    /// re-validated against itself.
    async fn is_available(
        &self,
        workspace_id: WorkspaceId,
        period: &TimeRange,
        exclude_booking_id: Option<BookingId>,
    ) -> AppResult<bool>;
    /// Batch form of `is_available` over a candidate set; returns the subset
    /// that is free for `period`.
    async fn find_available_workspace_ids(
        &self,
        candidates: &[WorkspaceId],
        period: &TimeRange,
    ) -> AppResult<Vec<WorkspaceId>>;
}
