//! Session extraction. The OAuth handshake that issues session tokens lives
//! in the web layer; this side only validates the signed token it receives,
//! either as a bearer header or a `session` cookie.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
}

/// An authenticated user session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
}

pub fn decode_session(token: &str, secret: &str) -> Result<Session, AppError> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AppError::Unauthorized)?;

    Ok(Session {
        user_id: data.claims.sub,
        email: data.claims.email,
    })
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn cookie_token(parts: &Parts) -> Option<&str> {
    let cookies = parts.headers.get(COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix("session="))
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(AppError::Unauthorized)?;
        decode_session(token, &state.config.session_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn make_token(sub: &str, exp: usize) -> String {
        let claims = SessionClaims {
            sub: sub.to_string(),
            email: Some("a@x.com".to_string()),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn test_decode_session_roundtrip() {
        let token = make_token("u1", future_exp());
        let session = decode_session(&token, SECRET).unwrap();
        assert_eq!(session.user_id, "u1");
        assert_eq!(session.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn test_decode_session_rejects_wrong_secret() {
        let token = make_token("u1", future_exp());
        assert!(matches!(
            decode_session(&token, "other-secret"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_decode_session_rejects_expired_token() {
        let token = make_token("u1", (chrono::Utc::now().timestamp() - 3600) as usize);
        assert!(matches!(
            decode_session(&token, SECRET),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_cookie_token_finds_session_among_other_cookies() {
        let (parts, _) = axum::http::Request::builder()
            .header("cookie", "theme=dark; session=tok123; lang=en")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(cookie_token(&parts), Some("tok123"));
    }

    #[test]
    fn test_bearer_token_requires_prefix() {
        let (parts, _) = axum::http::Request::builder()
            .header("authorization", "Basic abc")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}
