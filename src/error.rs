use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::logs::LogEntry;
use crate::state::AppState;

/// Application error taxonomy. Handlers return this and let the
/// `IntoResponse` impl plus the `log_errors` middleware do the rest.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input (400, logged).
    #[error("{0}")]
    Validation(String),
    /// Business-rule rejection the handler phrases itself (400, not logged).
    #[error("{0}")]
    BadRequest(String),
    /// Missing/malformed credentials or unresolvable user (401, not logged).
    #[error("{0}")]
    Unauthorized(String),
    /// Owned-resource lookup miss (404, not logged).
    #[error("{0}")]
    NotFound(String),
    /// Token signature/expiry failure (401, logged).
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Attached to the response by `IntoResponse` for errors the middleware
/// should persist as a Log record.
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub message: String,
    pub stack: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let internal_message = self.to_string();
        let (status, message, logged, stack) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, true, None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, false, None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, false, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, false, None),
            AppError::Jwt(e) => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
                true,
                Some(e.to_string()),
            ),
            AppError::Database(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                    true,
                    Some(format!("{e:?}")),
                )
            }
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                    true,
                    Some(format!("{e:?}")),
                )
            }
        };

        let mut res = (status, Json(json!({ "message": message }))).into_response();
        if logged {
            res.extensions_mut().insert(ErrorDetails {
                message: internal_message,
                stack,
            });
        }
        res
    }
}

/// Outermost request layer: persists a Log record for any response carrying
/// `ErrorDetails`. A failed write is traced and dropped, never surfaced.
pub async fn log_errors(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let res = next.run(req).await;

    if let Some(details) = res.extensions().get::<ErrorDetails>().cloned() {
        let meta = json!({
            "method": method,
            "path": path,
            "status": res.status().as_u16(),
        });
        if let Err(e) = LogEntry::create(
            &state.db,
            "error",
            &details.message,
            details.stack.as_deref(),
            Some(meta),
        )
        .await
        {
            error!(error = %e, "failed to persist error log");
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(
            status_of(AppError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::BadRequest("Invalid credentials".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Unauthorized("Not authorized, no token".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::NotFound("Todo not found".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Internal(anyhow::anyhow!("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_attach_log_details_with_stack() {
        let res = AppError::Internal(anyhow::anyhow!("boom")).into_response();
        let details = res
            .extensions()
            .get::<ErrorDetails>()
            .expect("internal errors are logged");
        assert_eq!(details.message, "boom");
        assert!(details.stack.is_some());
    }

    #[test]
    fn validation_errors_attach_log_details() {
        let res = AppError::Validation("Invalid email".into()).into_response();
        let details = res.extensions().get::<ErrorDetails>().expect("logged");
        assert_eq!(details.message, "Invalid email");
        assert!(details.stack.is_none());
    }

    #[test]
    fn business_replies_are_not_logged() {
        for err in [
            AppError::BadRequest("Email already in use".into()),
            AppError::Unauthorized("User not found".into()),
            AppError::NotFound("Todo not found".into()),
        ] {
            let res = err.into_response();
            assert!(res.extensions().get::<ErrorDetails>().is_none());
        }
    }
}
