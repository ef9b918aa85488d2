use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::domain::models::registration::CallerContext;

#[derive(Debug, Deserialize)]
struct BearerClaims {
    #[serde(default)]
    default_role: Option<String>,
}

/// Caller role from the Authorization header. Anything short of a valid
/// bearer token signed with our secret yields an anonymous caller.
pub fn caller_context(headers: &HeaderMap, secret: &str) -> CallerContext {
    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    else {
        return CallerContext::anonymous();
    };

    let validation = Validation::new(Algorithm::HS256);
    match decode::<BearerClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => CallerContext {
            role: data.claims.default_role,
        },
        Err(_) => CallerContext::anonymous(),
    }
}
