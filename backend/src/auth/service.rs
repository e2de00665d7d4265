//! Core business logic for the authentication system.
//!
//! Session issuance (credential check + token creation) and session
//! verification (cookie scan + signature check + live user lookup). Tokens
//! are only ever accepted after full signature verification; the embedded
//! claims are a lookup hint, never an authorization source.

use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;

use crate::database::models::User;
use crate::database::DataStore;
use crate::errors::ApiError;

use super::errors::AuthError;
use super::models::{effective_role, Claims, HandoffClaims};

/// Cookie set at login. Verification scans for any cookie whose name
/// contains this pattern, so tokens set under a prefixed name by a proxy or
/// an older deployment are still picked up.
pub const SESSION_COOKIE: &str = "session-token";

const SESSION_TTL_DAYS: i64 = 7;
const HANDOFF_TTL_MINUTES: i64 = 5;

/// Look up the account by case-folded email and verify the password.
/// Unknown account and wrong password both yield `InvalidCredentials`;
/// database failures keep their own status.
pub async fn authenticate(
    store: &dyn DataStore,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    let user = store
        .find_user_by_email(email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !bcrypt::verify(password, &user.password_hash).map_err(AuthError::Hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }
    Ok(user)
}

/// Sign a session token for the user: subject id, email, name and the
/// effective role at issuance, expiring in seven days.
pub fn issue_token(secret: &str, user: &User) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_hex(),
        email: user.email.clone(),
        name: user.name.clone(),
        role: effective_role(&user.roles).to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(SESSION_TTL_DAYS)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Decode a session token, enforcing signature and expiry. There is no
/// unsigned fallback path: a token that does not verify is simply ignored.
pub fn verify_token(secret: &str, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Resolve the inbound cookies to a live user record.
///
/// Scans every cookie whose name matches the session-token pattern and takes
/// the first one that passes signature and expiry verification. The token
/// only contributes an email; the current database record is the sole
/// authority for roles and status.
pub async fn resolve_session(
    store: &dyn DataStore,
    secret: &str,
    jar: &CookieJar,
) -> Result<User, ApiError> {
    let email = jar
        .iter()
        .filter(|cookie| cookie.name().contains(SESSION_COOKIE))
        .find_map(|cookie| verify_token(secret, cookie.value()))
        .map(|claims| claims.email)
        .ok_or(AuthError::MissingToken)?;

    store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AuthError::UnknownUser.into())
}

/// Short-lived signed state token for the OAuth redirect handoff. Carried in
/// the redirect URL, replacing any process-global pending-session storage.
pub fn issue_handoff_token(secret: &str, email: &str) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = HandoffClaims {
        email: email.to_lowercase(),
        nonce: ObjectId::new().to_hex(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(HANDOFF_TTL_MINUTES)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn redeem_handoff_token(secret: &str, token: &str) -> Option<HandoffClaims> {
    decode::<HandoffClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;

    const SECRET: &str = "test-secret";

    fn admin_user() -> User {
        let mut user = User::new("Agent", "agent@example.com", "hash".into());
        user.roles = vec![Role::Student, Role::Admin];
        user
    }

    #[test]
    fn issued_tokens_verify_and_carry_the_effective_role() {
        let user = admin_user();
        let token = issue_token(SECRET, &user).unwrap();
        let claims = verify_token(SECRET, &token).expect("token should verify");
        assert_eq!(claims.email, "agent@example.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.sub, user.id.to_hex());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(SECRET, &admin_user()).unwrap();
        assert!(verify_token("other-secret", &token).is_none());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: "000000000000000000000000".into(),
            email: "agent@example.com".into(),
            name: "Agent".into(),
            role: "user".into(),
            iat: (now - Duration::days(8)).timestamp(),
            exp: (now - Duration::days(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_none());
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let token = issue_token(SECRET, &admin_user()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = "eyJlbWFpbCI6ImV2aWxAZXhhbXBsZS5jb20ifQ";
        parts[1] = forged;
        assert!(verify_token(SECRET, &parts.join(".")).is_none());
    }

    #[test]
    fn handoff_tokens_round_trip() {
        let token = issue_handoff_token(SECRET, "Agent@Example.com").unwrap();
        let claims = redeem_handoff_token(SECRET, &token).expect("state token should verify");
        assert_eq!(claims.email, "agent@example.com");
        assert!(redeem_handoff_token("other-secret", &token).is_none());
    }
}
