use axum::{extract::State, routing::get, Extension, Json, Router};
use tracing::{debug, instrument};

use crate::{
    auth::extractors::AuthUser, error::AppError, state::AppState, users::dto::PublicUser,
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

/// Lists live users. `caller` is only present when the route is gated.
#[instrument(skip(state, caller))]
pub async fn list_users(
    State(state): State<AppState>,
    caller: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = state.auth.list_users().await?;
    let caller = caller.map(|Extension(AuthUser(id))| id);
    debug!(count = users.len(), caller = ?caller, "listed users");
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}
