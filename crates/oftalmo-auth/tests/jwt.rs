use jsonwebtoken::{encode, EncodingKey, Header};

use oftalmo_auth::error::AuthError;
use oftalmo_auth::jwt::{bearer_token, issue_token, Claims, TokenVerifier};

const SECRET: &[u8] = b"test-secret";

#[test]
fn issued_token_validates() {
    let token = issue_token(SECRET, "user-1", None, 3600).unwrap();
    let claims = TokenVerifier::new(SECRET, None).validate(&token).unwrap();
    assert_eq!(claims.sub, "user-1");
}

#[test]
fn wrong_secret_is_rejected() {
    let token = issue_token(SECRET, "user-1", None, 3600).unwrap();
    let err = TokenVerifier::new(b"other", None).validate(&token).unwrap_err();
    assert!(matches!(err, AuthError::Jwt(_)));
}

#[test]
fn issuer_must_match_when_configured() {
    let token = issue_token(SECRET, "user-1", Some("https://idp.example"), 3600).unwrap();
    assert!(TokenVerifier::new(SECRET, Some("https://idp.example")).validate(&token).is_ok());
    assert!(TokenVerifier::new(SECRET, Some("https://other")).validate(&token).is_err());
}

#[test]
fn expired_token_is_reported_as_expired() {
    let now = jiff::Timestamp::now().as_second() as u64;
    let claims = Claims {
        sub: "user-1".to_string(),
        exp: now - 3600,
        iat: now - 7200,
        iss: None,
        email: None,
        name: None,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
    let err = TokenVerifier::new(SECRET, None).validate(&token).unwrap_err();
    assert!(matches!(err, AuthError::TokenExpired));
}

#[test]
fn bearer_header_parsing() {
    assert_eq!(bearer_token("Bearer abc.def").unwrap(), "abc.def");
    assert!(matches!(bearer_token("Basic xyz"), Err(AuthError::MissingToken)));
    assert!(matches!(bearer_token("Bearer   "), Err(AuthError::MissingToken)));
}
