use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use sqlx::QueryBuilder;

use kernel::model::{
    booking::{
        event::{BookingFilter, CancelBooking, CreateBooking, UpdateBookingTime},
        Booking, BookingPolicy, BookingStatus, TimeRange,
    },
    id::{BookingId, UserId, WorkspaceId},
    role::Role,
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{
        booking::{BookingRow, BookingStateRow},
        workspace::WorkspaceStateRow,
    },
    ConnectionPool,
};

/// How often a mutation is re-run after the database aborts it with a
/// serialization failure before the caller sees a conflict.
const SERIALIZATION_RETRY_LIMIT: u32 = 3;

const BOOKING_SELECT: &str = r#"
    SELECT
        b.booking_id,
        b.workspace_id,
        b.user_id,
        b.start_time,
        b.end_time,
        b.purpose,
        b.attendees,
        b.status,
        b.created_at,
        b.updated_at,
        w.name AS workspace_name,
        w.location AS workspace_location,
        w.is_active AS workspace_is_active
    FROM bookings AS b
    INNER JOIN workspaces AS w ON b.workspace_id = w.workspace_id
"#;

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
    policy: BookingPolicy,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking, now: DateTime<Utc>) -> AppResult<BookingId> {
        self.policy.validate_period(&event.period, now)?;

        let mut attempts = 0;
        loop {
            match self.try_create(&event).await {
                Err(e) if is_serialization_failure(&e) => {
                    attempts += 1;
                    if attempts > SERIALIZATION_RETRY_LIMIT {
                        return Err(AppError::TransactionConflict);
                    }
                }
                other => return other,
            }
        }
    }

    async fn update_time(&self, event: UpdateBookingTime, now: DateTime<Utc>) -> AppResult<()> {
        let mut attempts = 0;
        loop {
            match self.try_update_time(&event, now).await {
                Err(e) if is_serialization_failure(&e) => {
                    attempts += 1;
                    if attempts > SERIALIZATION_RETRY_LIMIT {
                        return Err(AppError::TransactionConflict);
                    }
                }
                other => return other,
            }
        }
    }

    async fn cancel(&self, event: CancelBooking, now: DateTime<Utc>) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let current = self
            .fetch_booking_state(&mut tx, event.booking_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("booking ({}) was not found", event.booking_id))
            })?;
        ensure_operator_may_touch(&current, event.requested_user, event.requested_role)?;

        let status = current.status()?;
        let next = status.transition_to(BookingStatus::Cancelled)?;
        // the cancellation window closes at the booking's end time
        if current.end_time <= now {
            return Err(AppError::InvalidTransition {
                from: status.to_string(),
                to: next.to_string(),
            });
        }

        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET status = $2, updated_at = CURRENT_TIMESTAMP
                WHERE booking_id = $1
            "#,
        )
        .bind(event.booking_id)
        .bind(next.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no booking record has been cancelled".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let mut builder = QueryBuilder::new(BOOKING_SELECT);
        builder.push(" WHERE b.booking_id = ").push_bind(booking_id);
        let row: Option<BookingRow> = builder
            .build_query_as()
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_all(&self, filter: BookingFilter) -> AppResult<Vec<Booking>> {
        let mut builder = QueryBuilder::new(BOOKING_SELECT);
        builder.push(" WHERE TRUE");
        if let Some(booked_by) = filter.booked_by {
            builder.push(" AND b.user_id = ").push_bind(booked_by);
        }
        if let Some(workspace_id) = filter.workspace_id {
            builder.push(" AND b.workspace_id = ").push_bind(workspace_id);
        }
        if let Some(status) = filter.status {
            builder
                .push(" AND b.status = ")
                .push_bind(status.to_string());
        }
        if let Some(from_date) = filter.from_date {
            builder.push(" AND b.start_time >= ").push_bind(from_date);
        }
        if let Some(to_date) = filter.to_date {
            builder.push(" AND b.end_time <= ").push_bind(to_date);
        }
        builder.push(" ORDER BY b.start_time DESC");

        let rows: Vec<BookingRow> = builder
            .build_query_as()
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_upcoming(
        &self,
        booked_by: Option<UserId>,
        now: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Booking>> {
        let mut builder = QueryBuilder::new(BOOKING_SELECT);
        builder
            .push(" WHERE b.status = 'confirmed' AND b.start_time >= ")
            .push_bind(now);
        if let Some(booked_by) = booked_by {
            builder.push(" AND b.user_id = ").push_bind(booked_by);
        }
        builder.push(" ORDER BY b.start_time ASC LIMIT ").push_bind(limit);

        let rows: Vec<BookingRow> = builder
            .build_query_as()
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_in_day(
        &self,
        booked_by: Option<UserId>,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        let mut builder = QueryBuilder::new(BOOKING_SELECT);
        builder
            .push(" WHERE b.status IN ('pending', 'confirmed') AND b.start_time >= ")
            .push_bind(day_start);
        builder.push(" AND b.start_time < ").push_bind(day_end);
        if let Some(booked_by) = booked_by {
            builder.push(" AND b.user_id = ").push_bind(booked_by);
        }
        builder.push(" ORDER BY b.start_time ASC");

        let rows: Vec<BookingRow> = builder
            .build_query_as()
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn is_available(
        &self,
        workspace_id: WorkspaceId,
        period: &TimeRange,
        exclude_booking_id: Option<BookingId>,
    ) -> AppResult<bool> {
        let overlap = sqlx::query_scalar::<_, BookingId>(
            r#"
                SELECT booking_id
                FROM bookings
                WHERE workspace_id = $1
                  AND status IN ('pending', 'confirmed')
                  AND start_time < $3
                  AND end_time > $2
                  AND ($4::uuid IS NULL OR booking_id <> $4)
                LIMIT 1
            "#,
        )
        .bind(workspace_id)
        .bind(period.start())
        .bind(period.end())
        .bind(exclude_booking_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(overlap.is_none())
    }

    async fn find_available_workspace_ids(
        &self,
        candidates: &[WorkspaceId],
        period: &TimeRange,
    ) -> AppResult<Vec<WorkspaceId>> {
        let candidates: Vec<uuid::Uuid> = candidates.iter().map(|id| id.raw()).collect();
        sqlx::query_scalar::<_, WorkspaceId>(
            r#"
                SELECT w.workspace_id
                FROM workspaces AS w
                WHERE w.workspace_id = ANY($1)
                  AND NOT EXISTS (
                      SELECT 1
                      FROM bookings AS b
                      WHERE b.workspace_id = w.workspace_id
                        AND b.status IN ('pending', 'confirmed')
                        AND b.start_time < $3
                        AND b.end_time > $2
                  )
                ORDER BY w.name ASC
            "#,
        )
        .bind(candidates)
        .bind(period.start())
        .bind(period.end())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }
}

impl BookingRepositoryImpl {
    async fn try_create(&self, event: &CreateBooking) -> AppResult<BookingId> {
        let mut tx = self.db.begin().await?;

        self.set_transaction_serializable(&mut tx).await?;

        // Preconditions, evaluated against committed state inside the
        // serializable transaction:
        // - the workspace exists and is accepting bookings
        // - no active booking overlaps the requested range
        {
            let workspace = sqlx::query_as::<_, WorkspaceStateRow>(
                r#"
                    SELECT workspace_id, is_active
                    FROM workspaces
                    WHERE workspace_id = $1
                "#,
            )
            .bind(event.workspace_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            let workspace = match workspace {
                None => {
                    return Err(AppError::EntityNotFound(format!(
                        "workspace ({}) was not found",
                        event.workspace_id
                    )))
                }
                Some(w) => w,
            };

            if !workspace.is_active {
                return Err(AppError::WorkspaceInactive(event.workspace_id.to_string()));
            }

            self.ensure_slot_free(&mut tx, event.workspace_id, &event.period, None)
                .await?;
        }

        // The slot is free: the booking confirms immediately, there is no
        // pending hold on this path.
        let booking_id = BookingId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO bookings
                (booking_id, workspace_id, user_id, start_time, end_time,
                 purpose, attendees, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(booking_id)
        .bind(event.workspace_id)
        .bind(event.booked_by)
        .bind(event.period.start())
        .bind(event.period.end())
        .bind(&event.purpose)
        .bind(event.attendees)
        .bind(BookingStatus::Confirmed.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_booking_write_error(e, event.workspace_id))?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no booking record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(booking_id)
    }

    async fn try_update_time(&self, event: &UpdateBookingTime, now: DateTime<Utc>) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        self.set_transaction_serializable(&mut tx).await?;

        let current = self
            .fetch_booking_state(&mut tx, event.booking_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("booking ({}) was not found", event.booking_id))
            })?;
        ensure_operator_may_touch(&current, event.requested_user, event.requested_role)?;

        let status = current.status()?;
        if !status.is_active() {
            return Err(AppError::UnprocessableEntity(format!(
                "booking ({}) is {} and its time range can no longer change",
                event.booking_id, status
            )));
        }

        // Merge the partial change, then validate exactly as a fresh booking
        // with this booking excluded from the conflict scan.
        let new_start = event.new_start_time.unwrap_or(current.start_time);
        let new_end = event.new_end_time.unwrap_or(current.end_time);
        let period = TimeRange::new(new_start, new_end)?;
        self.policy.validate_period(&period, now)?;

        let workspace = sqlx::query_as::<_, WorkspaceStateRow>(
            r#"
                SELECT workspace_id, is_active
                FROM workspaces
                WHERE workspace_id = $1
            "#,
        )
        .bind(current.workspace_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if !workspace.is_active {
            return Err(AppError::WorkspaceInactive(current.workspace_id.to_string()));
        }

        self.ensure_slot_free(&mut tx, current.workspace_id, &period, Some(event.booking_id))
            .await?;

        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET start_time = $2, end_time = $3, updated_at = CURRENT_TIMESTAMP
                WHERE booking_id = $1
            "#,
        )
        .bind(event.booking_id)
        .bind(period.start())
        .bind(period.end())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_booking_write_error(e, current.workspace_id))?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no booking record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn fetch_booking_state(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        booking_id: BookingId,
    ) -> AppResult<Option<BookingStateRow>> {
        sqlx::query_as::<_, BookingStateRow>(
            r#"
                SELECT booking_id, workspace_id, user_id, start_time, end_time, status
                FROM bookings
                WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn ensure_slot_free(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        workspace_id: WorkspaceId,
        period: &TimeRange,
        exclude_booking_id: Option<BookingId>,
    ) -> AppResult<()> {
        let overlap = sqlx::query_scalar::<_, BookingId>(
            r#"
                SELECT booking_id
                FROM bookings
                WHERE workspace_id = $1
                  AND status IN ('pending', 'confirmed')
                  AND start_time < $3
                  AND end_time > $2
                  AND ($4::uuid IS NULL OR booking_id <> $4)
                LIMIT 1
            "#,
        )
        .bind(workspace_id)
        .bind(period.start())
        .bind(period.end())
        .bind(exclude_booking_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if overlap.is_some() {
            return Err(AppError::SlotConflict(workspace_id.to_string()));
        }

        Ok(())
    }
}

fn ensure_operator_may_touch(
    current: &BookingStateRow,
    requested_user: UserId,
    requested_role: Role,
) -> AppResult<()> {
    if !requested_role.can_view_all_bookings() && current.user_id != requested_user {
        return Err(AppError::ForbiddenOperation);
    }
    Ok(())
}

/// The exclusion constraint over active bookings is the storage-level
/// backstop for the in-transaction overlap scan; a violation is a genuine
/// conflict, not a transient failure.
fn map_booking_write_error(e: sqlx::Error, workspace_id: WorkspaceId) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23P01") => {
            AppError::SlotConflict(workspace_id.to_string())
        }
        _ => AppError::SpecificOperationError(e),
    }
}

fn is_serialization_failure(err: &AppError) -> bool {
    match err {
        AppError::SpecificOperationError(sqlx::Error::Database(db))
        | AppError::TransactionError(sqlx::Error::Database(db)) => {
            db.code().as_deref() == Some("40001")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kernel::model::id::{UserId, WorkspaceTypeId};

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 3, 8, 0, 0).unwrap()
    }

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 3, hour, min, 0).unwrap()
    }

    fn period(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> TimeRange {
        TimeRange::new(at(start_hour, start_min), at(end_hour, end_min)).unwrap()
    }

    fn repo(pool: sqlx::PgPool) -> BookingRepositoryImpl {
        BookingRepositoryImpl::new(ConnectionPool::new(pool), BookingPolicy::new(8))
    }

    async fn fixture_user(pool: &sqlx::PgPool) -> UserId {
        let user_id = UserId::new();
        sqlx::query(
            r#"
                INSERT INTO users (user_id, user_name, email, password_hash, role)
                VALUES ($1, 'Test User', $2, 'not-a-real-hash', 'general')
            "#,
        )
        .bind(user_id)
        .bind(format!("{}@example.com", user_id.raw().simple()))
        .execute(pool)
        .await
        .unwrap();
        user_id
    }

    async fn fixture_workspace(pool: &sqlx::PgPool, is_active: bool) -> WorkspaceId {
        let workspace_type_id = WorkspaceTypeId::new();
        sqlx::query(
            r#"
                INSERT INTO workspace_types (workspace_type_id, name, capacity)
                VALUES ($1, 'meeting room', 4)
            "#,
        )
        .bind(workspace_type_id)
        .execute(pool)
        .await
        .unwrap();

        let workspace_id = WorkspaceId::new();
        sqlx::query(
            r#"
                INSERT INTO workspaces (workspace_id, name, location, workspace_type_id, is_active)
                VALUES ($1, 'Room A', '2F East', $2, $3)
            "#,
        )
        .bind(workspace_id)
        .bind(workspace_type_id)
        .bind(is_active)
        .execute(pool)
        .await
        .unwrap();
        workspace_id
    }

    fn create_event(workspace_id: WorkspaceId, user_id: UserId, period: TimeRange) -> CreateBooking {
        CreateBooking::new(workspace_id, user_id, period, None, 1)
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn booking_a_free_slot_confirms_immediately(pool: sqlx::PgPool) {
        let user_id = fixture_user(&pool).await;
        let workspace_id = fixture_workspace(&pool, true).await;
        let repo = repo(pool);

        let event = CreateBooking::new(
            workspace_id,
            user_id,
            period(9, 0, 10, 0),
            Some("design review".into()),
            3,
        );
        let booking_id = repo.create(event, test_now()).await.unwrap();

        let booking = repo.find_by_id(booking_id).await.unwrap().unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.booked_by, user_id);
        assert_eq!(booking.start_time, at(9, 0));
        assert_eq!(booking.end_time, at(10, 0));
        assert_eq!(booking.purpose.as_deref(), Some("design review"));
        assert_eq!(booking.attendees, 3);
        assert_eq!(booking.workspace.workspace_id, workspace_id);
        assert_eq!(booking.workspace.name, "Room A");
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn overlapping_booking_is_rejected_touching_is_not(pool: sqlx::PgPool) {
        let user_id = fixture_user(&pool).await;
        let workspace_id = fixture_workspace(&pool, true).await;
        let repo = repo(pool);

        let first = repo
            .create(
                create_event(workspace_id, user_id, period(9, 0, 10, 0)),
                test_now(),
            )
            .await
            .unwrap();

        // partial overlap
        let err = repo
            .create(
                create_event(workspace_id, user_id, period(9, 30, 10, 30)),
                test_now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SlotConflict(_)));

        // touching endpoint does not conflict
        repo.create(
            create_event(workspace_id, user_id, period(10, 0, 11, 0)),
            test_now(),
        )
        .await
        .unwrap();

        // cancelled bookings stop blocking the slot
        repo.cancel(
            CancelBooking::new(first, user_id, Role::General),
            test_now(),
        )
        .await
        .unwrap();
        repo.create(
            create_event(workspace_id, user_id, period(9, 0, 10, 0)),
            test_now(),
        )
        .await
        .unwrap();
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn concurrent_creates_for_the_same_slot_admit_exactly_one(pool: sqlx::PgPool) {
        let user_id = fixture_user(&pool).await;
        let workspace_id = fixture_workspace(&pool, true).await;
        let repo = std::sync::Arc::new(repo(pool));

        let spawn_create = |repo: std::sync::Arc<BookingRepositoryImpl>| {
            tokio::spawn(async move {
                repo.create(
                    create_event(workspace_id, user_id, period(9, 0, 10, 0)),
                    test_now(),
                )
                .await
            })
        };
        let first = spawn_create(repo.clone());
        let second = spawn_create(repo.clone());
        let results = [first.await.unwrap(), second.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let err = results.into_iter().find_map(Result::err).unwrap();
        assert!(matches!(
            err,
            AppError::SlotConflict(_) | AppError::TransactionConflict
        ));
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn validation_rules_fail_fast(pool: sqlx::PgPool) {
        let user_id = fixture_user(&pool).await;
        let workspace_id = fixture_workspace(&pool, true).await;
        let repo = repo(pool);

        // start in the past relative to the injected validation instant
        let err = repo
            .create(
                create_event(workspace_id, user_id, period(6, 0, 7, 0)),
                test_now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BookingInPast));

        // nine hours against an eight hour cap
        let err = repo
            .create(
                create_event(workspace_id, user_id, period(9, 0, 18, 0)),
                test_now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DurationExceeded(8)));
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn inactive_workspace_rejects_new_bookings(pool: sqlx::PgPool) {
        let user_id = fixture_user(&pool).await;
        let workspace_id = fixture_workspace(&pool, false).await;
        let repo = repo(pool);

        let err = repo
            .create(
                create_event(workspace_id, user_id, period(9, 0, 10, 0)),
                test_now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::WorkspaceInactive(_)));
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn cancel_is_rejected_for_finished_states(pool: sqlx::PgPool) {
        let user_id = fixture_user(&pool).await;
        let workspace_id = fixture_workspace(&pool, true).await;
        let repo = repo(pool);

        let booking_id = repo
            .create(
                create_event(workspace_id, user_id, period(9, 0, 10, 0)),
                test_now(),
            )
            .await
            .unwrap();

        let cancel = || CancelBooking::new(booking_id, user_id, Role::General);
        repo.cancel(cancel(), test_now()).await.unwrap();

        // cancelling twice
        let err = repo.cancel(cancel(), test_now()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));

        // cancelling after the end time has passed
        let other = repo
            .create(
                create_event(workspace_id, user_id, period(11, 0, 12, 0)),
                test_now(),
            )
            .await
            .unwrap();
        let err = repo
            .cancel(CancelBooking::new(other, user_id, Role::General), at(12, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn only_the_owner_or_an_admin_may_cancel(pool: sqlx::PgPool) {
        let owner = fixture_user(&pool).await;
        let stranger = fixture_user(&pool).await;
        let workspace_id = fixture_workspace(&pool, true).await;
        let repo = repo(pool);

        let booking_id = repo
            .create(
                create_event(workspace_id, owner, period(9, 0, 10, 0)),
                test_now(),
            )
            .await
            .unwrap();

        let err = repo
            .cancel(
                CancelBooking::new(booking_id, stranger, Role::Employee),
                test_now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ForbiddenOperation));

        // an admin may cancel on behalf of anyone
        repo.cancel(
            CancelBooking::new(booking_id, stranger, Role::Admin),
            test_now(),
        )
        .await
        .unwrap();
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn colliding_time_update_leaves_the_booking_unchanged(pool: sqlx::PgPool) {
        let user_id = fixture_user(&pool).await;
        let workspace_id = fixture_workspace(&pool, true).await;
        let repo = repo(pool);

        repo.create(
            create_event(workspace_id, user_id, period(9, 0, 10, 0)),
            test_now(),
        )
        .await
        .unwrap();
        let target = repo
            .create(
                create_event(workspace_id, user_id, period(11, 0, 12, 0)),
                test_now(),
            )
            .await
            .unwrap();

        let err = repo
            .update_time(
                UpdateBookingTime::new(
                    target,
                    user_id,
                    Role::General,
                    Some(at(9, 30)),
                    Some(at(10, 30)),
                ),
                test_now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SlotConflict(_)));

        let booking = repo.find_by_id(target).await.unwrap().unwrap();
        assert_eq!(booking.start_time, at(11, 0));
        assert_eq!(booking.end_time, at(12, 0));
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn time_update_excludes_the_booking_itself(pool: sqlx::PgPool) {
        let user_id = fixture_user(&pool).await;
        let workspace_id = fixture_workspace(&pool, true).await;
        let repo = repo(pool);

        let booking_id = repo
            .create(
                create_event(workspace_id, user_id, period(9, 0, 10, 0)),
                test_now(),
            )
            .await
            .unwrap();

        // shifting within a range that overlaps only itself succeeds, and a
        // partial event keeps the unset endpoint
        repo.update_time(
            UpdateBookingTime::new(booking_id, user_id, Role::General, Some(at(9, 30)), None),
            test_now(),
        )
        .await
        .unwrap();

        let booking = repo.find_by_id(booking_id).await.unwrap().unwrap();
        assert_eq!(booking.start_time, at(9, 30));
        assert_eq!(booking.end_time, at(10, 0));
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn availability_honours_half_open_ranges(pool: sqlx::PgPool) {
        let user_id = fixture_user(&pool).await;
        let workspace_id = fixture_workspace(&pool, true).await;
        let repo = repo(pool);

        let booking_id = repo
            .create(
                create_event(workspace_id, user_id, period(9, 0, 10, 0)),
                test_now(),
            )
            .await
            .unwrap();

        // strictly outside
        assert!(repo
            .is_available(workspace_id, &period(12, 0, 13, 0), None)
            .await
            .unwrap());
        // touching the end of the existing booking
        assert!(repo
            .is_available(workspace_id, &period(10, 0, 11, 0), None)
            .await
            .unwrap());
        // partial overlap at either edge
        assert!(!repo
            .is_available(workspace_id, &period(9, 30, 10, 30), None)
            .await
            .unwrap());
        assert!(!repo
            .is_available(workspace_id, &period(8, 30, 9, 30), None)
            .await
            .unwrap());
        // exact containment, both directions
        assert!(!repo
            .is_available(workspace_id, &period(9, 15, 9, 45), None)
            .await
            .unwrap());
        assert!(!repo
            .is_available(workspace_id, &period(8, 0, 11, 0), None)
            .await
            .unwrap());
        // the booking does not conflict with itself when excluded
        assert!(repo
            .is_available(workspace_id, &period(9, 0, 10, 0), Some(booking_id))
            .await
            .unwrap());
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn batch_availability_filters_booked_workspaces(pool: sqlx::PgPool) {
        let user_id = fixture_user(&pool).await;
        let busy = fixture_workspace(&pool, true).await;
        let free = fixture_workspace(&pool, true).await;
        let repo = repo(pool);

        repo.create(create_event(busy, user_id, period(9, 0, 10, 0)), test_now())
            .await
            .unwrap();

        let available = repo
            .find_available_workspace_ids(&[busy, free], &period(9, 30, 10, 30))
            .await
            .unwrap();
        assert_eq!(available, vec![free]);

        // outside the booked range both are free again
        let available = repo
            .find_available_workspace_ids(&[busy, free], &period(10, 0, 11, 0))
            .await
            .unwrap();
        assert_eq!(available.len(), 2);
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn listing_filters_compose(pool: sqlx::PgPool) {
        let user_a = fixture_user(&pool).await;
        let user_b = fixture_user(&pool).await;
        let workspace_id = fixture_workspace(&pool, true).await;
        let repo = repo(pool);

        repo.create(
            create_event(workspace_id, user_a, period(9, 0, 10, 0)),
            test_now(),
        )
        .await
        .unwrap();
        let cancelled = repo
            .create(
                create_event(workspace_id, user_b, period(10, 0, 11, 0)),
                test_now(),
            )
            .await
            .unwrap();
        repo.cancel(
            CancelBooking::new(cancelled, user_b, Role::General),
            test_now(),
        )
        .await
        .unwrap();

        let all = repo.find_all(BookingFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        // newest start time first
        assert_eq!(all[0].start_time, at(10, 0));

        let mine = repo
            .find_all(BookingFilter {
                booked_by: Some(user_a),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].booked_by, user_a);

        let cancelled_only = repo
            .find_all(BookingFilter {
                status: Some(BookingStatus::Cancelled),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(cancelled_only.len(), 1);
        assert_eq!(cancelled_only[0].booking_id, cancelled);

        let upcoming = repo.find_upcoming(Some(user_a), test_now(), 5).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].status, BookingStatus::Confirmed);

        let in_day = repo
            .find_in_day(None, at(0, 0), Utc.with_ymd_and_hms(2030, 6, 4, 0, 0, 0).unwrap())
            .await
            .unwrap();
        // cancelled bookings drop out of the day view
        assert_eq!(in_day.len(), 1);
        assert_eq!(in_day[0].start_time, at(9, 0));
    }
}
