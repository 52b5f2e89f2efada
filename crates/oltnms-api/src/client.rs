// NMS REST client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection from
// credential storage, and uniform response handling. Endpoint groups (OLTs,
// ONUs, alarms, ...) are implemented as inherent methods in separate files
// to keep this module focused on transport mechanics.

use std::sync::{Arc, RwLock};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, error_message};
use crate::storage::{CredentialStorage, TOKEN_KEY};
use crate::transport::TransportConfig;

/// Called when the backend rejects the stored credentials with a 401.
///
/// By the time the hook runs, the token and cached user have already been
/// removed from storage. Implementations typically move the session to its
/// anonymous state and redirect to the login route.
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self);
}

/// A decoded success body.
///
/// JSON responses are parsed; anything else is kept as text. A 204 or an
/// empty body is `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
    Empty,
}

impl Payload {
    /// Deserialize into `T`. Text bodies decode as a JSON string and empty
    /// bodies as `null`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, Error> {
        let (value, raw) = match self {
            Self::Json(v) => {
                let raw = v.to_string();
                (v, raw)
            }
            Self::Text(s) => (serde_json::Value::String(s.clone()), s),
            Self::Empty => (serde_json::Value::Null, String::new()),
        };
        serde_json::from_value(value).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: raw,
        })
    }
}

/// HTTP client for the NMS backend.
///
/// Every request path is relative to `{base}/api/`. The bearer token is read
/// from storage on each request, so a login or logout in another part of the
/// process takes effect on the very next call.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn CredentialStorage>,
    on_unauthorized: RwLock<Option<Arc<dyn UnauthorizedHandler>>>,
}

impl ApiClient {
    /// Build a client against `base_url` (the backend origin, e.g.
    /// `http://localhost:8000`). A trailing `/api` is accepted too.
    pub fn new(
        base_url: &str,
        storage: Arc<dyn CredentialStorage>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, api_root(base_url)?, storage))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, storage: Arc<dyn CredentialStorage>) -> Self {
        Self {
            http,
            base_url,
            storage,
            on_unauthorized: RwLock::new(None),
        }
    }

    /// The resolved API root (always ends in `/api/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn storage(&self) -> &Arc<dyn CredentialStorage> {
        &self.storage
    }

    /// Install the 401 hook, replacing any previous one.
    pub fn set_unauthorized_handler(&self, handler: Arc<dyn UnauthorizedHandler>) {
        match self.on_unauthorized.write() {
            Ok(mut slot) => *slot = Some(handler),
            Err(poisoned) => *poisoned.into_inner() = Some(handler),
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.send(Method::GET, path, &[], None::<&()>).await?.decode()
    }

    /// GET with query parameters. Callers pass only the pairs that are set.
    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        self.send(Method::GET, path, params, None::<&()>).await?.decode()
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T, Error> {
        self.send(Method::POST, path, &[], Some(body)).await?.decode()
    }

    /// POST without a request body (action endpoints such as reboot).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.send(Method::POST, path, &[], None::<&()>).await?.decode()
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T, Error> {
        self.send(Method::PUT, path, &[], Some(body)).await?.decode()
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.send(Method::DELETE, path, &[], None::<&()>).await?.decode()
    }

    /// Issue one request and return the decoded body. No retries.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&impl Serialize>,
    ) -> Result<Payload, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut req = self.http.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            let json = serde_json::to_vec(body).map_err(Error::Serialization)?;
            req = req.header(CONTENT_TYPE, "application/json").body(json);
        }
        let resp = self.authorize(req).send().await.map_err(Error::Network)?;
        self.handle_response(resp).await
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.storage.get(TOKEN_KEY) {
            Some(token) if !token.is_empty() => req.header(AUTHORIZATION, format!("Bearer {token}")),
            _ => req,
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response(&self, resp: Response) -> Result<Payload, Error> {
        let status = resp.status();

        let payload = read_payload(resp, status.is_success()).await?;

        if status.is_success() {
            return Ok(payload);
        }

        let body = match payload {
            Payload::Json(v) => Some(v),
            Payload::Text(s) => Some(serde_json::Value::String(s)),
            Payload::Empty => None,
        };
        let message = error_message(status.as_u16(), body.as_ref());

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
            return Err(Error::Unauthorized { message });
        }

        debug!(status = status.as_u16(), %message, "request failed");
        Err(Error::Http {
            status: status.as_u16(),
            message,
            body,
        })
    }

    /// Drop stored credentials and notify the handler.
    fn expire_session(&self) {
        if let Err(e) = self.storage.clear_session() {
            warn!(error = %e, "failed to clear credentials after 401");
        }
        let handler = match self.on_unauthorized.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        if let Some(handler) = handler {
            handler.on_unauthorized();
        }
    }
}

/// Normalise a backend origin into the `/api/` root used for joins.
fn api_root(base_url: &str) -> Result<Url, Error> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let root = if trimmed.ends_with("/api") {
        format!("{trimmed}/")
    } else {
        format!("{trimmed}/api/")
    };
    Ok(Url::parse(&root)?)
}

/// Read the body. Malformed JSON is an error only on success responses;
/// an unparseable error body is kept as text so the status still surfaces.
async fn read_payload(resp: Response, strict: bool) -> Result<Payload, Error> {
    let is_json = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let text = resp.text().await.map_err(Error::Network)?;
    if text.is_empty() {
        return Ok(Payload::Empty);
    }
    if !is_json {
        return Ok(Payload::Text(text));
    }
    match serde_json::from_str(&text) {
        Ok(value) => Ok(Payload::Json(value)),
        Err(_) if !strict => Ok(Payload::Text(text)),
        Err(e) => Err(Error::Deserialization {
            message: e.to_string(),
            body: preview(&text),
        }),
    }
}

fn preview(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn api_root_normalises_suffixes() {
        for input in [
            "http://localhost:8000",
            "http://localhost:8000/",
            "http://localhost:8000/api",
            "http://localhost:8000/api/",
        ] {
            assert_eq!(api_root(input).unwrap().as_str(), "http://localhost:8000/api/");
        }
    }

    #[test]
    fn api_root_keeps_path_prefix() {
        assert_eq!(
            api_root("https://nms.example.net/backend").unwrap().as_str(),
            "https://nms.example.net/backend/api/"
        );
    }

    #[test]
    fn rejects_garbage_base() {
        assert!(matches!(api_root("not a url"), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn payload_decoding() {
        let v: String = Payload::Text("pong".into()).decode().unwrap();
        assert_eq!(v, "pong");
        Payload::Empty.decode::<()>().unwrap();
        let opt: Option<u32> = Payload::Empty.decode().unwrap();
        assert!(opt.is_none());
        let err = Payload::Json(serde_json::json!({"a": 1})).decode::<Vec<u32>>();
        assert!(matches!(err, Err(Error::Deserialization { .. })));
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let long = "x".repeat(500);
        let p = preview(&long);
        assert_eq!(p.len(), 203);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }
}
