use axum::{middleware, Router};

use crate::{auth::extractors::require_auth, state::AppState};

mod dto;
pub mod handlers;

pub fn router(state: &AppState) -> Router<AppState> {
    let routes = handlers::user_routes();
    if state.config.users_list_require_auth {
        routes.route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
    } else {
        routes
    }
}
