use std::sync::Arc;

use crate::{
    domain::{
        error::DomainError,
        models::{
            registration::{ProfileFields, RegistrationOptions},
            user::Email,
        },
        repositories::user_directory::UserDirectory,
        services::session_service::SessionIssuer,
    },
    presentation::{
        auth::caller_context,
        errors::{ErrorCode, send_error},
    },
    usecase::sign_up_usecase::SignUpUsecase,
};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::error;

// Request

/// json for the email-password registration request
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpEmailPasswordRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub options: RegistrationOptions,
}

/* Router Function and Handler Function */

// Signup Router

/// function return Router object
/// Suppose to be nested by main router
pub fn create_signup_router<
    D: UserDirectory + Send + Sync + 'static + Clone,
    S: SessionIssuer + Send + Sync + 'static + Clone,
>(
    signup_service: SignUpUsecase<D, S>,
    jwt_secret: String,
) -> Router {
    let state = AppState {
        signup_service: Arc::new(signup_service),
        jwt_secret: Arc::new(jwt_secret),
    };

    Router::new()
        .route("/email-password", post(sign_up_email_password::<D, S>))
        .with_state(state)
}

#[derive(Clone)]
pub struct AppState<D: UserDirectory, S: SessionIssuer> {
    pub signup_service: Arc<SignUpUsecase<D, S>>,
    pub jwt_secret: Arc<String>,
}

// handler function

/// handler function for admin-gated email-password registration
async fn sign_up_email_password<
    D: UserDirectory + Send + Sync + Clone,
    S: SessionIssuer + Send + Sync + Clone,
>(
    State(state): State<AppState<D, S>>,
    headers: HeaderMap,
    Json(payload): Json<SignUpEmailPasswordRequest>,
) -> Response {
    let caller = caller_context(&headers, &state.jwt_secret);

    let email = match Email::new(payload.email) {
        Ok(email) => email,
        Err(err) => return send_error(ErrorCode::from(&err)),
    };
    let profile = match ProfileFields::new(payload.first_name, payload.last_name) {
        Ok(profile) => profile,
        Err(err) => return send_error(ErrorCode::from(&err)),
    };

    match state
        .signup_service
        .sign_up(&caller, email, profile, payload.options)
        .await
    {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err @ DomainError::Repository(_)) => {
            error!("Registration failed: {}", err);
            send_error(ErrorCode::from(&err))
        }
        Err(err) => send_error(ErrorCode::from(&err)),
    }
}
