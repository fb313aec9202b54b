use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use strum::{AsRefStr, Display, EnumString};

use crate::model::id::{BookingId, UserId, WorkspaceId};

pub mod event;

/// A half-open time interval. `start < end` is the only invariant and is
/// enforced at construction, so a `TimeRange` in hand is always well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::InvalidTimeRange);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open overlap: ranges that merely touch at an endpoint do not
    /// overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Lifecycle states of a booking. Pending and Confirmed count toward
/// availability; Cancelled and Completed freeze the booking's time range and
/// drop out of conflict checks.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Validates a status change. Completed is reached by the external time
    /// sweep; everything outside the table below is rejected.
    pub fn transition_to(self, next: BookingStatus) -> AppResult<BookingStatus> {
        use BookingStatus::*;
        match (self, next) {
            (Pending, Confirmed)
            | (Pending, Cancelled)
            | (Confirmed, Cancelled)
            | (Pending, Completed)
            | (Confirmed, Completed) => Ok(next),
            (from, to) => Err(AppError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }
}

/// Business rules applied to a requested booking window. `now` is always
/// passed in by the caller so the rules stay clock-free.
#[derive(Debug, Clone, Copy)]
pub struct BookingPolicy {
    max_duration: Duration,
}

impl BookingPolicy {
    pub fn new(max_duration_hours: i64) -> Self {
        Self {
            max_duration: Duration::hours(max_duration_hours),
        }
    }

    pub fn max_duration_hours(&self) -> i64 {
        self.max_duration.num_hours()
    }

    /// Start must lie strictly in the future and the window must not exceed
    /// the configured maximum. Applies to creates and to time-changing
    /// updates, never to status-only updates such as cancel.
    pub fn validate_period(&self, period: &TimeRange, now: DateTime<Utc>) -> AppResult<()> {
        if period.start() <= now {
            return Err(AppError::BookingInPast);
        }
        if period.duration() > self.max_duration {
            return Err(AppError::DurationExceeded(self.max_duration.num_hours()));
        }
        Ok(())
    }
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self::new(8)
    }
}

#[derive(Debug)]
pub struct Booking {
    pub booking_id: BookingId,
    pub booked_by: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: Option<String>,
    pub attendees: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub workspace: BookingWorkspace,
}

/// The slice of workspace data a booking carries for display. The booking
/// stores only the workspace id; this is joined in on read, never a
/// back-pointer.
#[derive(Debug)]
pub struct BookingWorkspace {
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub location: String,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 3, hour, min, 0).unwrap()
    }

    fn range(start_hour: u32, end_hour: u32) -> TimeRange {
        TimeRange::new(at(start_hour, 0), at(end_hour, 0)).unwrap()
    }

    #[test]
    fn empty_or_inverted_range_is_rejected() {
        assert!(matches!(
            TimeRange::new(at(10, 0), at(10, 0)),
            Err(AppError::InvalidTimeRange)
        ));
        assert!(matches!(
            TimeRange::new(at(11, 0), at(10, 0)),
            Err(AppError::InvalidTimeRange)
        ));
    }

    #[test]
    fn overlap_is_half_open() {
        let base = range(9, 10);

        // partial overlap at either edge
        assert!(base.overlaps(&TimeRange::new(at(9, 30), at(10, 30)).unwrap()));
        assert!(base.overlaps(&TimeRange::new(at(8, 30), at(9, 30)).unwrap()));
        // exact containment, both directions
        assert!(base.overlaps(&TimeRange::new(at(9, 15), at(9, 45)).unwrap()));
        assert!(base.overlaps(&range(8, 11)));
        // identical
        assert!(base.overlaps(&range(9, 10)));
        // touching endpoints do not conflict
        assert!(!base.overlaps(&range(10, 11)));
        assert!(!base.overlaps(&range(8, 9)));
        // disjoint
        assert!(!base.overlaps(&range(12, 13)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = range(9, 10);
        let b = TimeRange::new(at(9, 30), at(10, 30)).unwrap();
        assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn active_statuses_count_toward_conflicts() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
        assert!(!BookingStatus::Completed.is_active());
    }

    #[test]
    fn permitted_transitions() {
        use BookingStatus::*;
        for (from, to) in [
            (Pending, Confirmed),
            (Pending, Cancelled),
            (Confirmed, Cancelled),
            (Pending, Completed),
            (Confirmed, Completed),
        ] {
            assert_eq!(from.transition_to(to).unwrap(), to);
        }
    }

    #[test]
    fn terminal_states_reject_every_transition() {
        use BookingStatus::*;
        for from in [Cancelled, Completed] {
            for to in [Pending, Confirmed, Cancelled, Completed] {
                assert!(matches!(
                    from.transition_to(to),
                    Err(AppError::InvalidTransition { .. })
                ));
            }
        }
        // no path back to pending, no self-confirmation
        assert!(Confirmed.transition_to(Pending).is_err());
        assert!(Confirmed.transition_to(Confirmed).is_err());
        assert!(Pending.transition_to(Pending).is_err());
    }

    #[test]
    fn status_survives_a_storage_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            let stored = status.to_string();
            assert_eq!(stored.parse::<BookingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn policy_rejects_past_and_present_starts() {
        let policy = BookingPolicy::default();
        let now = at(9, 0);

        let past = TimeRange::new(at(8, 0), at(10, 0)).unwrap();
        assert!(matches!(
            policy.validate_period(&past, now),
            Err(AppError::BookingInPast)
        ));

        // start exactly at `now` is not strictly in the future
        let starting_now = range(9, 10);
        assert!(matches!(
            policy.validate_period(&starting_now, now),
            Err(AppError::BookingInPast)
        ));

        let future = range(10, 11);
        assert!(policy.validate_period(&future, now).is_ok());
    }

    #[test]
    fn policy_caps_the_duration() {
        let policy = BookingPolicy::new(8);
        let now = at(0, 0);

        let nine_hours = range(9, 18);
        assert!(matches!(
            policy.validate_period(&nine_hours, now),
            Err(AppError::DurationExceeded(8))
        ));

        // exactly the maximum is allowed
        let eight_hours = range(9, 17);
        assert!(policy.validate_period(&eight_hours, now).is_ok());
    }
}
