//! Blocking client for the ordering backend's REST API.
//!
//! Each endpoint wrapper builds one request, attaches the bearer token when
//! the endpoint needs it and turns non-2xx responses into [`ApiError`].

use crate::auth::{Token, TokenError};
use crate::config::ClientConfig;
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub mod delivery_points;
pub mod orders;
#[cfg(test)]
mod test_server;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("no authentication token configured")]
  MissingToken,
  #[error("session expired, log in again")]
  SessionExpired,
  #[error("not allowed: {context}")]
  Forbidden { context: &'static str },
  #[error("{context} (HTTP {status})")]
  Status {
    status: StatusCode,
    context: &'static str,
  },
  #[error("backend rejected the request (HTTP {status}): {message}")]
  Backend { status: StatusCode, message: String },
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("unexpected response body: {0}")]
  Decode(#[from] serde_json::Error),
  #[error("invalid token: {0}")]
  Token(#[from] TokenError),
}

pub struct ApiClient {
  http: Client,
  config: ClientConfig,
  token: Option<Token>,
}

impl ApiClient {
  pub fn new(config: ClientConfig) -> Result<ApiClient, ApiError> {
    let http = Client::builder()
      .timeout(Duration::from_millis(config.timeout_ms))
      .build()?;
    let token = config.token.clone().map(Token::new);
    Ok(ApiClient {
      http,
      config,
      token,
    })
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  pub fn set_token(&mut self, token: Token) {
    self.token = Some(token);
  }

  pub fn clear_token(&mut self) {
    self.token = None;
  }

  fn token(&self) -> Result<&Token, ApiError> {
    self.token.as_ref().ok_or(ApiError::MissingToken)
  }

  fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
    let url = self.config.endpoint(path);
    debug!("{} {}", method, url);
    self
      .http
      .request(method, url)
      .header(CONTENT_TYPE, "application/json")
  }

  fn authed(&self, method: reqwest::Method, path: &str) -> Result<RequestBuilder, ApiError> {
    let token = self.token()?;
    Ok(self.request(method, path).header(AUTHORIZATION, token.bearer()))
  }

  // Sends and maps any non-2xx status to `ApiError::Status`.
  fn send(&self, request: RequestBuilder, context: &'static str) -> Result<Response, ApiError> {
    let response = request.send()?;
    let status = response.status();
    if !status.is_success() {
      warn!("{}: HTTP {}", context, status);
      return Err(ApiError::Status { status, context });
    }
    Ok(response)
  }

  fn send_json<T: DeserializeOwned>(
    &self,
    request: RequestBuilder,
    context: &'static str,
  ) -> Result<T, ApiError> {
    let response = self.send(request, context)?;
    read_json(response)
  }
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
  let body = response.text()?;
  Ok(serde_json::from_str(&body)?)
}

// 204 and empty bodies mean "nothing", anything else has to parse.
fn read_optional_json<T: DeserializeOwned>(response: Response) -> Result<Option<T>, ApiError> {
  if response.status() == StatusCode::NO_CONTENT {
    return Ok(None);
  }
  let body = response.text()?;
  if body.trim().is_empty() {
    return Ok(None);
  }
  Ok(Some(serde_json::from_str(&body)?))
}
