use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::dto::{LoginRequest, SignupRequest, StatusResponse, TokenResponse},
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Json(payload) = payload.map_err(bad_body)?;
    let creds = payload.validate()?;
    state.auth.signup(creds).await?;
    Ok(Json(StatusResponse {
        status: "succeeded",
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(payload) = payload.map_err(bad_body)?;
    let creds = payload.validate()?;
    let token = state.auth.login(creds).await?;
    Ok(Json(TokenResponse { token }))
}

fn bad_body(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::state::tests::memory_state;

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn router() -> Router {
        let (state, _) = memory_state(false);
        auth_routes().with_state(state)
    }

    #[tokio::test]
    async fn signup_acknowledges_without_user_data() {
        let (status, body) =
            post_json(router(), "/signup", r#"{"username":"alice","password":"secret1"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "status": "succeeded" }));
    }

    #[tokio::test]
    async fn malformed_bodies_are_validation_errors() {
        for body in ["", "{", r#"{"username":"alice"}"#, r#"{"username":1,"password":"x"}"#] {
            let (status, json) = post_json(router(), "/signup", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
            assert!(json["error"].is_string());

            let (status, _) = post_json(router(), "/login", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        }
    }

    #[tokio::test]
    async fn missing_content_type_is_a_validation_error() {
        let res = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signup")
                    .body(Body::from(r#"{"username":"alice","password":"x"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_password_is_rejected() {
        let (status, json) =
            post_json(router(), "/signup", r#"{"username":"alice","password":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "password must not be empty");
    }

    #[tokio::test]
    async fn login_failures_share_one_shape() {
        let (state, _) = memory_state(false);
        let app = auth_routes().with_state(state);
        post_json(app.clone(), "/signup", r#"{"username":"alice","password":"secret1"}"#).await;

        let wrong =
            post_json(app.clone(), "/login", r#"{"username":"alice","password":"wrong"}"#).await;
        let unknown =
            post_json(app, "/login", r#"{"username":"nobody","password":"secret1"}"#).await;
        assert_eq!(wrong.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong, unknown);
    }
}
