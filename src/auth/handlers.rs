use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{
        AuthResponse, ForgotPasswordRequest, LoginRequest, MeResponse, PublicUser,
        ResetPasswordRequest, SignupRequest,
    },
    extractors::CurrentUser,
    jwt::JwtKeys,
    password::{generate_reset_token, hash_password, verify_password},
    repo_types::User,
};
use crate::error::AppError;
use crate::extract::{Json, Path};
use crate::state::AppState;

const FORGOT_PASSWORD_MESSAGE: &str = "If user exists, email is sent";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password/:token", post(reset_password))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.validate()?;

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::BadRequest("Email already in use".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, payload.name.trim(), &payload.email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.validate()?;

    // Unknown email and wrong password collapse into one reply so the
    // response never reveals whether an account exists.
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(AppError::BadRequest("Invalid credentials".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(mut payload): Json<ForgotPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.validate()?;

    let Some(user) = User::find_by_email(&state.db, &payload.email).await? else {
        // Same body as the success path, no account enumeration.
        return Ok(Json(json!({ "message": FORGOT_PASSWORD_MESSAGE })));
    };

    let token = generate_reset_token();
    let expires = OffsetDateTime::now_utc() + Duration::hours(1);
    User::set_reset_token(&state.db, user.id, &token, expires).await?;

    let reset_url = format!("{}/reset-password/{}", state.config.client_url, token);
    state
        .mailer
        .send_password_reset(&user.email, &reset_url)
        .await?;

    info!(user_id = %user.id, "password reset email dispatched");
    Ok(Json(json!({ "message": FORGOT_PASSWORD_MESSAGE })))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let user = User::find_by_reset_token(&state.db, &token)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired token".into()))?;

    let hash = hash_password(&payload.password)?;
    User::reset_password(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password reset");
    Ok(Json(json!({ "message": "Password reset successful" })))
}

#[instrument(skip_all)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse { user: user.into() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn auth_response_serialization() {
        let response = AuthResponse {
            token: "jwt".into(),
            user: PublicUser {
                id: Uuid::new_v4(),
                name: "Test".into(),
                email: "test@example.com".into(),
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("\"token\":\"jwt\""));
    }
}
