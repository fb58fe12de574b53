//! REST client shared by the gate and every feature. Requests get bearer tokens
//! from the injected session store, responses are normalized into [`Envelope`],
//! and a `401` on an authenticated call is retried once after a silent refresh.
//! Token material is never logged.

pub mod body;
pub mod envelope;
pub mod error;

pub use body::{MultipartBody, RequestBody};
pub use envelope::Envelope;
pub use error::{ApiError, ClientError};

use crate::{APP_USER_AGENT, session::SessionStore};
use reqwest::{Client, Method, StatusCode, header::CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{Instrument, debug, info, info_span, warn};
use url::Url;

/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REFRESH_PATH: &str = "user/refresh-token";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub refresh_path: String,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
        }
    }
}

/// One logical API call. Multipart-ness follows from the body.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<RequestBody>,
    include_auth: bool,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            include_auth: true,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Sends the request without an `Authorization` header and without the
    /// refresh-and-retry path.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.include_auth = false;
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn includes_auth(&self) -> bool {
        self.include_auth
    }

    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.body.as_ref().is_some_and(RequestBody::is_multipart)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(try_from = "RawTokenPair")]
struct TokenPair {
    access_token: String,
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct RawTokenPair {
    #[serde(default, rename = "accessToken")]
    access_token: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default, rename = "access_token")]
    access_token_snake: Option<String>,
    #[serde(default, rename = "refreshToken")]
    refresh_token: Option<String>,
    #[serde(default, rename = "refresh_token")]
    refresh_token_snake: Option<String>,
}

impl TryFrom<RawTokenPair> for TokenPair {
    type Error = String;

    fn try_from(raw: RawTokenPair) -> Result<Self, Self::Error> {
        let access_token = raw
            .access_token
            .or(raw.token)
            .or(raw.access_token_snake)
            .ok_or_else(|| "missing field `accessToken`".to_string())?;

        Ok(Self {
            access_token,
            refresh_token: raw.refresh_token.or(raw.refresh_token_snake),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RefreshResponse {
    Wrapped { data: TokenPair },
    Bare(TokenPair),
}

impl RefreshResponse {
    fn into_pair(self) -> TokenPair {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

pub struct ApiClient {
    http: Client,
    base_url: Url,
    refresh_path: String,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if the base URL is not an absolute http(s) URL or the HTTP
    /// client cannot be built.
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(&config.base_url)?;

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ClientError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url,
            refresh_path: config.refresh_path.clone(),
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a relative API route against the base URL.
    ///
    /// # Errors
    /// Returns an error if the path cannot be joined.
    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        let relative = path.trim().trim_start_matches('/');
        self.base_url
            .join(relative)
            .map_err(|err| ClientError::Config(format!("invalid path {path}: {err}")))
    }

    /// # Errors
    /// Returns an error on transport failure, timeout or an undecodable body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        include_auth: bool,
    ) -> Result<Envelope, ClientError> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;
        request.include_auth = include_auth;
        self.send(&request).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get(&self, path: &str) -> Result<Envelope, ClientError> {
        self.send(&ApiRequest::new(Method::GET, path)).await
    }

    /// # Errors
    /// See [`ApiClient::request`]; also fails if `body` cannot be encoded.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope, ClientError> {
        let request = ApiRequest::new(Method::POST, path).with_body(RequestBody::json(body)?);
        self.send(&request).await
    }

    /// # Errors
    /// See [`ApiClient::request`]; also fails if `body` cannot be encoded.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope, ClientError> {
        let request = ApiRequest::new(Method::PUT, path).with_body(RequestBody::json(body)?);
        self.send(&request).await
    }

    /// # Errors
    /// See [`ApiClient::request`]; also fails if `body` cannot be encoded.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope, ClientError> {
        let request = ApiRequest::new(Method::PATCH, path).with_body(RequestBody::json(body)?);
        self.send(&request).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete(&self, path: &str) -> Result<Envelope, ClientError> {
        self.send(&ApiRequest::new(Method::DELETE, path)).await
    }

    /// # Errors
    /// See [`ApiClient::request`]; also fails if the form cannot be built.
    pub async fn post_file(
        &self,
        path: &str,
        form: MultipartBody,
    ) -> Result<Envelope, ClientError> {
        let request =
            ApiRequest::new(Method::POST, path).with_body(RequestBody::Multipart(form));
        self.send(&request).await
    }

    /// Sends a request, refreshing the access token and replaying once on `401`.
    ///
    /// # Errors
    /// Returns an error on transport failure, timeout or an undecodable body. HTTP
    /// failure statuses are returned as failed envelopes.
    pub async fn send(&self, request: &ApiRequest) -> Result<Envelope, ClientError> {
        let token = if request.include_auth {
            self.session.get_token()?
        } else {
            None
        };

        let (status, body) = self.execute(request, token.as_ref()).await?;

        if status == StatusCode::UNAUTHORIZED.as_u16() && request.include_auth {
            debug!("{} {} returned 401, attempting refresh", request.method, request.path);

            match self.refresh_access_token().await {
                Ok(Some(fresh)) => {
                    let (status, body) = self.execute(request, Some(&fresh)).await?;
                    return Ok(Envelope::from_response(status, body));
                }
                Ok(None) => debug!("token refresh not possible, returning original response"),
                Err(err) => warn!("token refresh failed: {}", err),
            }
        }

        Ok(Envelope::from_response(status, body))
    }

    /// Exchanges the stored refresh token for a new access token and persists it.
    /// Returns `None` when there is no refresh token or the server rejects it.
    async fn refresh_access_token(&self) -> Result<Option<SecretString>, ClientError> {
        let Some(refresh_token) = self.session.get_refresh_token()? else {
            return Ok(None);
        };

        let request = ApiRequest::new(Method::POST, self.refresh_path.as_str())
            .with_body(RequestBody::json(&RefreshRequest {
                refresh_token: refresh_token.expose_secret(),
            })?)
            .anonymous();

        let (status, body) = self.execute(&request, None).await?;
        let envelope = Envelope::from_response(status, body);

        if !envelope.is_success() {
            debug!("refresh endpoint returned {}", status);
            return Ok(None);
        }

        let pair = envelope
            .decode::<RefreshResponse>(&self.refresh_path)?
            .into_pair();

        if pair.access_token.is_empty() {
            return Ok(None);
        }

        let access = SecretString::from(pair.access_token);
        let rotated = pair.refresh_token.filter(|t| !t.is_empty()).map(SecretString::from);
        self.session.set_session(&access, rotated.as_ref())?;

        info!("access token refreshed");

        Ok(Some(access))
    }

    async fn execute(
        &self,
        request: &ApiRequest,
        token: Option<&SecretString>,
    ) -> Result<(u16, Value), ClientError> {
        let url = self.url(&request.path)?;
        let mut builder = self.http.request(request.method.clone(), url);

        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        builder = match &request.body {
            Some(RequestBody::Multipart(form)) => builder.multipart(form.to_form()?),
            Some(RequestBody::Json(value)) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(value).map_err(ClientError::Encode)?),
            None => builder.header(CONTENT_TYPE, "application/json"),
        };

        let span = info_span!(
            "api.request",
            http.method = %request.method,
            path = %request.path,
            auth = token.is_some()
        );
        let response = builder.send().instrument(span).await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = decode_body(status, &text)?;

        debug!("{} {} -> {}", request.method, request.path, status);

        Ok((status, body))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("refresh_path", &self.refresh_path)
            .finish_non_exhaustive()
    }
}

/// Parses a body read as text. Empty bodies are `null`; anything else must be JSON.
fn decode_body(status: u16, text: &str) -> Result<Value, ClientError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(text).map_err(|source| ClientError::FailedJsonParse { status, source })
}

fn normalize_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Config("API base URL is not configured".to_string()));
    }

    let mut url = Url::parse(trimmed)
        .map_err(|err| ClientError::Config(format!("invalid API base URL {trimmed}: {err}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ClientError::Config(format!(
                "unsupported API base URL scheme {scheme}"
            )));
        }
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
