use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::workspace::{
    check_workspace_availability, register_workspace, register_workspace_type, show_workspace,
    show_workspace_list, show_workspace_type_list, update_workspace,
};

pub fn build_workspace_routers() -> Router<AppRegistry> {
    let workspace_routers = Router::new()
        .route("/", post(register_workspace))
        .route("/", get(show_workspace_list))
        .route("/:workspace_id", get(show_workspace))
        .route("/:workspace_id", put(update_workspace))
        .route("/:workspace_id/availability", get(check_workspace_availability));

    let workspace_type_routers = Router::new()
        .route("/", post(register_workspace_type))
        .route("/", get(show_workspace_type_list));

    Router::new()
        .nest("/workspaces", workspace_routers)
        .nest("/workspace-types", workspace_type_routers)
}
