//! Authentication endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use tower_cookies::{Cookie, Cookies};

use homestay_core::models::AuthPayload;

use super::{bearer_token, require_auth};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{RecordStore, User};

const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/signin
pub async fn sign_in<S>(
    State(state): State<Arc<AppState<S>>>,
    cookies: Cookies,
    Json(req): Json<SignInRequest>,
) -> Result<Json<AuthPayload>, ApiError>
where
    S: RecordStore,
{
    let db = state.db()?;

    // Unknown user and wrong password are indistinguishable to the caller
    let user = db
        .user_by_email(&req.email)
        .ok_or(ApiError::InvalidCredentials)?;
    let valid = bcrypt::verify(&req.password, &user.password_hash)
        .map_err(|e| ApiError::Store(e.to_string()))?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    // The refresh token lives in a cookie; the access token is derived
    // from it and only ever held in client memory
    let refresh = state.tokens.issue_refresh(user.id)?;
    set_refresh_cookie(&cookies, &refresh);
    let access = state.tokens.issue_access(&refresh)?;

    Ok(Json(auth_payload(&state, access, user)))
}

/// GET /api/me
///
/// Two-stage verification: the access token must verify, and so must the
/// refresh token embedded in its payload.
pub async fn me<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<AuthPayload>, ApiError>
where
    S: RecordStore,
{
    require_auth(&state, &headers)?;

    if !state.config.use_auth {
        return Ok(Json(AuthPayload {
            access_token: None,
            user: None,
        }));
    }

    let access = bearer_token(&headers).ok_or(ApiError::InvalidToken)?;
    let access_claims = state
        .tokens
        .verify(access)
        .map_err(|_| ApiError::InvalidToken)?;
    let refresh_claims = state
        .tokens
        .verify(&access_claims.data)
        .map_err(|_| ApiError::InvalidToken)?;
    let user_id: i64 = refresh_claims
        .data
        .parse()
        .map_err(|_| ApiError::InvalidToken)?;

    let db = state.db()?;
    let user = db.user_by_id(user_id).ok_or(ApiError::InvalidToken)?;

    Ok(Json(AuthPayload {
        access_token: Some(access.to_string()),
        user: Some(user.to_public()),
    }))
}

/// GET /api/refreshToken
pub async fn refresh_token<S>(
    State(state): State<Arc<AppState<S>>>,
    cookies: Cookies,
) -> Result<Json<AuthPayload>, ApiError>
where
    S: RecordStore,
{
    if !state.config.use_auth {
        return Ok(Json(AuthPayload {
            access_token: None,
            user: None,
        }));
    }

    let refresh = cookies
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(ApiError::InvalidRefreshToken)?;
    let claims = state
        .tokens
        .verify(&refresh)
        .map_err(|_| ApiError::InvalidRefreshToken)?;
    let user_id: i64 = claims
        .data
        .parse()
        .map_err(|_| ApiError::InvalidRefreshToken)?;

    let db = state.db()?;
    let user = db
        .user_by_id(user_id)
        .ok_or(ApiError::InvalidRefreshToken)?;

    let access = state.tokens.issue_access(&refresh)?;
    Ok(Json(auth_payload(&state, access, user)))
}

/// POST /api/signout
pub async fn sign_out<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    cookies: Cookies,
) -> Result<StatusCode, ApiError>
where
    S: RecordStore,
{
    require_auth(&state, &headers)?;
    clear_refresh_cookie(&cookies);
    Ok(StatusCode::OK)
}

fn auth_payload<S: RecordStore>(state: &AppState<S>, access: String, user: &User) -> AuthPayload {
    if state.config.use_auth {
        AuthPayload {
            access_token: Some(access),
            user: Some(user.to_public()),
        }
    } else {
        AuthPayload {
            access_token: None,
            user: None,
        }
    }
}

fn set_refresh_cookie(cookies: &Cookies, token: &str) {
    let cookie = Cookie::build((REFRESH_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .build();
    cookies.add(cookie);
}

fn clear_refresh_cookie(cookies: &Cookies) {
    let cookie = Cookie::build((REFRESH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(tower_cookies::cookie::time::Duration::ZERO)
        .build();
    cookies.add(cookie);
}
