//! Actor context for write attribution.
//!
//! The upstream gateway authenticates the user and forwards their identity
//! in headers; this service only records who entered each document. Headers
//! are trusted because the service sits behind the gateway.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use backoffice_core::error::AppError;

/// Identity of the user performing the request.
#[derive(Debug, Clone)]
pub struct ActorContext {
    /// Stable user id, recorded as `entered_by` on ledger rows and vouchers.
    pub user_id: String,
    /// Display name, when the gateway forwards one.
    pub user_name: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for ActorContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(anyhow::anyhow!(
                    "Missing X-User-Id header (required from gateway)"
                ))
            })?;

        let user_name = parts
            .headers
            .get("X-User-Name")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        Ok(ActorContext {
            user_id: user_id.to_string(),
            user_name,
        })
    }
}
