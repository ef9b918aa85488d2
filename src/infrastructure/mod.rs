pub mod entity;
pub mod http_mailer;
pub mod jwt_session_issuer;
pub mod postgres_user_directory;
