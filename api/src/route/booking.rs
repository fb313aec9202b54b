use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{
    cancel_booking, create_booking, show_booking, show_booking_list, show_todays_bookings,
    show_upcoming_bookings, update_booking_time,
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let booking_routers = Router::new()
        .route("/", post(create_booking))
        .route("/", get(show_booking_list))
        .route("/upcoming", get(show_upcoming_bookings))
        .route("/today", get(show_todays_bookings))
        .route("/:booking_id", get(show_booking))
        .route("/:booking_id/time", put(update_booking_time))
        .route("/:booking_id/cancel", post(cancel_booking));

    Router::new().nest("/bookings", booking_routers)
}
