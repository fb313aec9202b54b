use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveTime, Utc};
use garde::Validate;
use kernel::model::{
    booking::{
        event::{BookingFilter, CancelBooking, CreateBooking, UpdateBookingTime},
        TimeRange,
    },
    id::BookingId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::booking::{
        BookingListQuery, BookingResponse, BookingsResponse, CreateBookingRequest,
        UpdateBookingTimeRequest,
    },
};

pub async fn create_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate(&())?;

    let period = TimeRange::new(req.start_time, req.end_time)?;
    let event = CreateBooking::new(req.workspace_id, user.id(), period, req.purpose, req.attendees);

    let booking_id = registry
        .booking_repository()
        .create(event, Utc::now())
        .await?;

    let booking = fetch_booking(&registry, booking_id).await?;
    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

pub async fn show_booking_list(
    user: AuthorizedUser,
    Query(query): Query<BookingListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    query.validate(&())?;

    // non-privileged callers only ever see their own bookings
    let booked_by = if user.role().can_view_all_bookings() {
        query.user_id
    } else {
        Some(user.id())
    };

    let filter = BookingFilter {
        booked_by,
        workspace_id: query.workspace_id,
        status: query.status,
        from_date: query.from_date,
        to_date: query.to_date,
    };

    registry
        .booking_repository()
        .find_all(filter)
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    let booking = fetch_booking(&registry, booking_id).await?;
    if !user.role().can_view_all_bookings() && booking.booked_by != user.id() {
        return Err(AppError::ForbiddenOperation);
    }

    Ok(Json(booking.into()))
}

pub async fn update_booking_time(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookingTimeRequest>,
) -> AppResult<Json<BookingResponse>> {
    req.validate(&())?;
    if req.new_start_time.is_none() && req.new_end_time.is_none() {
        return Err(AppError::UnprocessableEntity(
            "either newStartTime or newEndTime must be given".into(),
        ));
    }

    let event = UpdateBookingTime::new(
        booking_id,
        user.id(),
        user.role(),
        req.new_start_time,
        req.new_end_time,
    );
    registry
        .booking_repository()
        .update_time(event, Utc::now())
        .await?;

    let booking = fetch_booking(&registry, booking_id).await?;
    Ok(Json(booking.into()))
}

pub async fn cancel_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    let event = CancelBooking::new(booking_id, user.id(), user.role());
    registry
        .booking_repository()
        .cancel(event, Utc::now())
        .await?;

    let booking = fetch_booking(&registry, booking_id).await?;
    Ok(Json(booking.into()))
}

pub async fn show_upcoming_bookings(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    let booked_by = (!user.role().can_view_all_bookings()).then(|| user.id());

    registry
        .booking_repository()
        .find_upcoming(booked_by, Utc::now(), 5)
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_todays_bookings(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    let booked_by = (!user.role().can_view_all_bookings()).then(|| user.id());

    let now = Utc::now();
    let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let day_end = day_start + chrono::Duration::days(1);

    registry
        .booking_repository()
        .find_in_day(booked_by, day_start, day_end)
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

async fn fetch_booking(
    registry: &AppRegistry,
    booking_id: BookingId,
) -> AppResult<kernel::model::booking::Booking> {
    registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("booking ({booking_id}) was not found")))
}
