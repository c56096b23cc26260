//! # REST Bindings
//!
//! [`HttpApi`] is the shared transport: base URL, bearer token, timeout, and the mapping
//! from HTTP responses onto [`Envelope`]s and [`ApiError`]s. [`RestCollection`] and
//! [`RestDocument`] bind it to the store traits for one resource each.
//!
//! ## Response mapping
//!
//! | Response | Result |
//! |----------|--------|
//! | 2xx with an envelope body | `Ok(envelope)` |
//! | non-2xx with a `success: false` envelope | `Ok(envelope)`, the server declined |
//! | non-2xx without an envelope | `Err(ApiError::Status)` |
//! | undecodable body | `Err(ApiError::Decode)` |
//! | no response | `Err(ApiError::Network)` |

pub mod collection;
pub mod document;

pub use collection::{RestCollection, RestResource};
pub use document::{RestDocument, RestSingleton};

use reqwest::{Client, Method, StatusCode};
use resource_store::{ApiError, ApiResult, Envelope};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Transport shared by every endpoint binding.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends a request and decodes the envelope around a `T`.
    pub async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%method, %url, "Request");

        let mut request = self.client.request(method, &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()));
        }
        warn!(%url, status = status.as_u16(), "Request failed");
        failed_response(status, &text)
    }

    /// Like [`send`](Self::send) for endpoints whose data is irrelevant, such as deletes.
    pub async fn send_unit<B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        let envelope: Envelope<IgnoredAny> = self.send(method, path, body).await?;
        Ok(Envelope {
            success: envelope.success,
            data: envelope.data.map(|_| ()),
            message: envelope.message,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send::<(), T>(Method::GET, path, None).await
    }
}

/// A failed status either carries a declining envelope or is a transport error.
fn failed_response<T>(status: StatusCode, body: &str) -> ApiResult<T> {
    match serde_json::from_str::<Envelope<IgnoredAny>>(body) {
        Ok(envelope) if !envelope.success => Ok(Envelope {
            success: false,
            data: None,
            message: envelope.message,
        }),
        _ => Err(ApiError::Status {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        }),
    }
}
