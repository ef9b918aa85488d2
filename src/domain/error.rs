use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Elevated role required")]
    ElevatedRoleRequired,

    #[error("Signup is disabled")]
    SignupDisabled,

    #[error("Email already in use")]
    EmailAlreadyInUse,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Empty profile field")]
    EmptyProfileField,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Verification email dispatch failed: {0}")]
    MailDispatch(String),
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail relay error: {0}")]
    Relay(String),

    #[error("Mail transport error: {0}")]
    Transport(String),
}
