use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::utils::verify_token;

pub const AUTH_COOKIE: &str = "auth_token";

/// The staff member on whose behalf a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

/// Resolves the acting user from the `auth_token` cookie, falling back to a bearer token.
pub fn get_current_user(cookies: &Cookies, headers: &HeaderMap, secret: &str) -> Option<CurrentUser> {
    let token = cookies
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| bearer(headers))?;

    let claims = match verify_token(&token, secret) {
        Ok(claims) => claims,
        Err(err) => {
            log::debug!("rejected auth token: {}", err);
            return None;
        }
    };

    claims.user_id().map(|id| CurrentUser { id })
}
