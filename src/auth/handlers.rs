use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, PublicUser, RegisterRequest},
        extractors::AuthUser,
        password::{hash_password_async, verify_password_async},
        repo::StoreError,
        repo_types::NewUser,
    },
    error::ApiError,
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register).get(list_users))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if payload.username.is_empty() {
        warn!("empty username");
        return Err(ApiError::BadRequest("Username is required".into()));
    }
    if payload.password.is_empty() {
        warn!("empty password");
        return Err(ApiError::BadRequest("Password is required".into()));
    }

    let password_hash = hash_password_async(payload.password).await.map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Internal("Error signing up".into())
    })?;

    let user = state
        .users
        .create(NewUser {
            email: payload.email,
            username: payload.username,
            password_hash,
        })
        .await
        .map_err(|e| {
            // unavailability is logged once, when the error is rendered
            if matches!(e, StoreError::Conflict) {
                warn!("username or email already registered");
            }
            ApiError::from(e)
        })?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".into(),
        }),
    ))
}

/// Lists every registered user. Unauthenticated; only public fields are returned.
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = payload.username.trim();

    let user = state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(|| {
            warn!(username = %username, "login unknown username");
            ApiError::InvalidUsername
        })?;

    let ok = verify_password_async(payload.password, user.password_hash.clone())
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "verify_password failed");
            ApiError::Internal("Error logging in".into())
        })?;

    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidPassword);
    }

    let token = state.keys.sign(user.id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Internal("Error logging in".into())
    })?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        token,
        token_type: "Bearer",
        expires_in: state.keys.ttl.as_secs(),
    }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_me(user: AuthUser) -> Json<PublicUser> {
    Json(PublicUser {
        id: user.id,
        email: user.email,
        username: user.username,
        created_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("al ice@example.com"));
    }

    #[test]
    fn test_me_response_serialization() {
        let response = PublicUser {
            id: uuid::Uuid::new_v4(),
            email: "test@example.com".to_string(),
            username: "tester".to_string(),
            created_at: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("tester"));
        assert!(!json.contains("created_at"));
    }
}
