mod config;
mod domain;
mod infrastructure;
mod presentation;
mod usecase;

use anyhow::Result;
use axum::{Router, routing::get};
use sea_orm::{ConnectOptions, Database};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::AppConfig,
    infrastructure::{
        http_mailer::HttpMailer, jwt_session_issuer::JwtSessionIssuer,
        postgres_user_directory::PostgresUserDirectory,
    },
    presentation::{
        errors::{ErrorCode, send_error},
        handlers::signup_handler::create_signup_router,
    },
    usecase::sign_up_usecase::SignUpUsecase,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,auth_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(10)
        .min_connections(1)
        .sqlx_logging(true);
    let db = Database::connect(opt).await?;

    let mailer = HttpMailer::new(config.mailer.clone());
    let user_directory = PostgresUserDirectory::new(db.clone(), mailer);
    let session_issuer = JwtSessionIssuer::with_expirations(
        db.clone(),
        config.jwt_secret.clone(),
        config.access_token_expires_in,
        config.refresh_token_expires_in,
    );
    let signup_service = SignUpUsecase::new(user_directory, session_issuer, config.policy);

    let app = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest(
            "/signup",
            create_signup_router(signup_service, config.jwt_secret.clone()),
        )
        // unknown routes answer with the same reporter as the authorization
        // gate, so the two responses cannot be told apart
        .fallback(|| async { send_error(ErrorCode::RouteNotFound) });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
        routing::get,
    };
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use rstest::*;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        domain::{
            error::{DomainError, RepositoryError},
            models::{
                registration::{ProfileFields, RegistrationOptions, SignupPolicy},
                session::{Session, SignInResponse},
                user::{Email, User, UserId},
            },
            repositories::user_directory::UserDirectory,
            services::session_service::SessionIssuer,
        },
        infrastructure::jwt_session_issuer::Claims,
        presentation::{
            errors::{ErrorCode, send_error},
            handlers::signup_handler::{SignUpEmailPasswordRequest, create_signup_router},
        },
        usecase::sign_up_usecase::SignUpUsecase,
    };

    const TEST_ID: &str = "00000000-0000-0000-0000-000000000001";
    const TEST_SECRET: &str = "testtoken";

    // mock collaborator interfaces

    #[derive(Clone, Default)]
    struct MockUserDirectory {
        known: Arc<Mutex<Vec<String>>>,
        lookups: Arc<AtomicUsize>,
        creations: Arc<AtomicUsize>,
    }

    impl MockUserDirectory {
        fn with_known(email: &str) -> Self {
            let directory = Self::default();
            directory.known.lock().unwrap().push(email.to_string());
            directory
        }
    }

    #[async_trait]
    impl UserDirectory for MockUserDirectory {
        async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            let known = self.known.lock().unwrap();
            if known.iter().any(|e| e == email.as_str()) {
                let user = User::new(
                    Uuid::parse_str(TEST_ID).unwrap(),
                    email.clone(),
                    "Existing User".to_string(),
                    true,
                )
                .unwrap();
                Ok(Some(user))
            } else {
                Ok(None)
            }
        }

        async fn create_user_and_send_verification_email(
            &self,
            email: &Email,
            profile: &ProfileFields,
            _options: &RegistrationOptions,
        ) -> Result<User, RepositoryError> {
            self.creations.fetch_add(1, Ordering::SeqCst);
            if email.as_str().starts_with("outage") {
                return Err(RepositoryError::DatabaseError("connection refused".to_string()));
            }
            self.known.lock().unwrap().push(email.as_str().to_string());
            let user = User::new(
                Uuid::parse_str(TEST_ID).unwrap(),
                email.clone(),
                profile.full_name(),
                false,
            )
            .unwrap();
            Ok(user)
        }
    }

    #[derive(Clone, Default)]
    struct MockSessionIssuer {
        calls: Arc<Mutex<Vec<(Uuid, bool)>>>,
    }

    #[async_trait]
    impl SessionIssuer for MockSessionIssuer {
        async fn sign_in_response(
            &self,
            user_id: &UserId,
            check_mfa: bool,
        ) -> Result<SignInResponse, DomainError> {
            self.calls.lock().unwrap().push((*user_id.as_uuid(), check_mfa));
            let user = User::new(
                *user_id.as_uuid(),
                Email::new("new@example.com".to_string()).unwrap(),
                "New User".to_string(),
                false,
            )
            .unwrap();
            Ok(SignInResponse::active(Session {
                access_token: "mock_token".to_string(),
                access_token_expires_in: 900,
                refresh_token: Uuid::new_v4(),
                user,
            }))
        }
    }

    // setup router: sync settings of main.app
    fn test_app(
        directory: MockUserDirectory,
        policy: SignupPolicy,
    ) -> (Router, MockUserDirectory, MockSessionIssuer) {
        let issuer = MockSessionIssuer::default();
        let signup_service = SignUpUsecase::new(directory.clone(), issuer.clone(), policy);

        let app = Router::new()
            .route("/healthz", get(|| async { "OK" }))
            .nest(
                "/signup",
                create_signup_router(signup_service, TEST_SECRET.to_string()),
            )
            .fallback(|| async { send_error(ErrorCode::RouteNotFound) });

        (app, directory, issuer)
    }

    fn bearer_token(role: &str) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: TEST_ID.to_string(),
            default_role: role.to_string(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn request_body(email: &str) -> String {
        let request = SignUpEmailPasswordRequest {
            email: email.to_string(),
            first_name: "New".to_string(),
            last_name: "User".to_string(),
            options: RegistrationOptions::default(),
        };
        serde_json::to_string(&request).unwrap()
    }

    /// # Description
    ///
    /// This function is general sign-up handler
    /// Call this function from test case for registration
    async fn sign_up(app: Router, token: Option<&str>, body: String) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/signup/email-password")
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        app.oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_healthz_positive() {
        let (app, _directory, _issuer) = test_app(MockUserDirectory::default(), SignupPolicy::default());

        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_and_denied_sign_up_look_identical() {
        let (app, _directory, _issuer) = test_app(MockUserDirectory::default(), SignupPolicy::default());

        let missing = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signup/does-not-exist")
                    .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        let denied = sign_up(app, None, request_body("new@example.com")).await;

        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(denied.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(missing).await, json_body(denied).await);
    }

    #[rstest]
    #[case::no_token(None)]
    #[case::plain_user(Some("user"))]
    #[tokio::test]
    async fn test_sign_up_without_admin_role_negative(#[case] role: Option<&str>) {
        let (app, directory, issuer) = test_app(MockUserDirectory::default(), SignupPolicy::default());

        let token = role.map(bearer_token);
        let response = sign_up(app, token.as_deref(), request_body("new@example.com")).await;

        // indistinguishable from a non-existent endpoint
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "route-not-found");
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(directory.creations.load(Ordering::SeqCst), 0);
        assert!(issuer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_disabled_negative() {
        let policy = SignupPolicy {
            disable_signup: true,
            require_verified_email: false,
        };
        let (app, directory, _issuer) = test_app(MockUserDirectory::default(), policy);

        let token = bearer_token("admin");
        let response = sign_up(app, Some(&token), request_body("new@example.com")).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = json_body(response).await;
        assert_eq!(body["error"], "signup-disabled");
        // rejected before any directory I/O
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sign_up_duplicated_email_negative() {
        let directory = MockUserDirectory::with_known("registered@example.com");
        let (app, directory, _issuer) = test_app(directory, SignupPolicy::default());

        let token = bearer_token("admin");
        let response = sign_up(app, Some(&token), request_body("registered@example.com")).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = json_body(response).await;
        assert_eq!(body["error"], "email-already-in-use");
        assert_eq!(directory.creations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sign_up_verification_pending_positive() {
        let policy = SignupPolicy {
            disable_signup: false,
            require_verified_email: true,
        };
        let (app, directory, issuer) = test_app(MockUserDirectory::default(), policy);

        let token = bearer_token("admin");
        let response = sign_up(app, Some(&token), request_body("new@example.com")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["session"], Value::Null);
        assert_eq!(body["mfa"], Value::Null);
        assert_eq!(directory.creations.load(Ordering::SeqCst), 1);
        assert!(issuer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_immediate_session_positive() {
        let (app, directory, issuer) = test_app(MockUserDirectory::default(), SignupPolicy::default());

        let token = bearer_token("admin");
        let response = sign_up(app, Some(&token), request_body("new@example.com")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["session"]["accessToken"], "mock_token");
        assert_eq!(body["mfa"], Value::Null);
        assert_eq!(directory.creations.load(Ordering::SeqCst), 1);
        let calls = issuer.calls.lock().unwrap();
        assert_eq!(*calls, vec![(Uuid::parse_str(TEST_ID).unwrap(), false)]);
    }

    #[tokio::test]
    async fn test_sign_up_repeated_email_negative() {
        let (app, directory, _issuer) = test_app(MockUserDirectory::default(), SignupPolicy::default());
        let token = bearer_token("admin");

        let first = sign_up(app.clone(), Some(&token), request_body("new@example.com")).await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = sign_up(app, Some(&token), request_body("new@example.com")).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(directory.creations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sign_up_directory_failure_negative() {
        let (app, _directory, _issuer) = test_app(MockUserDirectory::default(), SignupPolicy::default());

        let token = bearer_token("admin");
        let response = sign_up(app, Some(&token), request_body("outage@example.com")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "internal-server-error");
    }

    #[tokio::test]
    async fn test_sign_up_invalid_email_negative() {
        let (app, directory, _issuer) = test_app(MockUserDirectory::default(), SignupPolicy::default());

        let token = bearer_token("admin");
        let response = sign_up(app, Some(&token), request_body("not-an-address")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "invalid-request");
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 0);
    }
}
