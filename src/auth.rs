use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
  #[error("token is not a JWT (expected three dot separated parts)")]
  Malformed,
  #[error("token payload is not base64: {0}")]
  Base64(#[from] base64::DecodeError),
  #[error("token payload is not valid JSON: {0}")]
  Payload(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
  pub exp: Option<i64>,
  pub sub: Option<String>,
}

/// Bearer token handed out by the backend's login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
  pub fn new<S: Into<String>>(raw: S) -> Token {
    Token(raw.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn bearer(&self) -> String {
    format!("Bearer {}", self.0)
  }

  /// Decodes the payload segment. The signature is not checked, the backend
  /// does that.
  pub fn claims(&self) -> Result<Claims, TokenError> {
    let parts: Vec<&str> = self.0.split('.').collect();
    if parts.len() != 3 {
      return Err(TokenError::Malformed);
    }
    let payload = URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('='))?;
    Ok(serde_json::from_slice(&payload)?)
  }

  pub fn expires_at(&self) -> Result<Option<DateTime<Utc>>, TokenError> {
    Ok(
      self
        .claims()?
        .exp
        .and_then(|exp| Utc.timestamp_opt(exp, 0).single()),
    )
  }

  // A token without an `exp` claim never expires locally.
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> Result<bool, TokenError> {
    Ok(match self.expires_at()? {
      Some(expiry) => expiry < now,
      None => false,
    })
  }

  /// Like [`Token::is_expired_at`], but a token that cannot be decoded counts
  /// as expired.
  pub fn is_expired(&self) -> bool {
    self.is_expired_at(Utc::now()).unwrap_or(true)
  }
}

impl fmt::Debug for Token {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("Token(..)")
  }
}

#[cfg(test)]
pub(crate) fn make_jwt(payload: &str) -> String {
  format!(
    "{}.{}.signature",
    URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
    URL_SAFE_NO_PAD.encode(payload)
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_claims() {
    let token = Token::new(make_jwt(r#"{"sub":"dealer@example.com","exp":1750000000}"#));
    let claims = token.claims().unwrap();
    assert_eq!(claims.sub.as_deref(), Some("dealer@example.com"));
    assert_eq!(claims.exp, Some(1750000000));
    assert_eq!(
      token.expires_at().unwrap(),
      Some(Utc.timestamp_opt(1750000000, 0).unwrap())
    );
  }

  #[test]
  fn test_is_expired_at() {
    let token = Token::new(make_jwt(r#"{"exp":1750000000}"#));
    let before = Utc.timestamp_opt(1749999999, 0).unwrap();
    let after = Utc.timestamp_opt(1750000001, 0).unwrap();
    assert!(!token.is_expired_at(before).unwrap());
    assert!(token.is_expired_at(after).unwrap());
  }

  #[test]
  fn test_token_without_exp() {
    let token = Token::new(make_jwt(r#"{"sub":"client"}"#));
    assert!(!token.is_expired());
  }

  #[test]
  fn test_malformed_tokens() {
    assert!(matches!(
      Token::new("not-a-jwt").claims(),
      Err(TokenError::Malformed)
    ));
    assert!(matches!(
      Token::new("a.$$$.c").claims(),
      Err(TokenError::Base64(_))
    ));
    assert!(Token::new("not-a-jwt").is_expired());
  }

  #[test]
  fn test_debug_hides_token() {
    let token = Token::new("secret.secret.secret");
    assert_eq!(format!("{:?}", token), "Token(..)");
    assert_eq!(token.bearer(), "Bearer secret.secret.secret");
  }
}
