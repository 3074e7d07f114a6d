//! HTTP broker for the DMX core API.
//!
//! Owns the mapping from HTTP outcomes to [`TransportError`] variants. Nothing
//! above this module ever looks at a status code.

use async_trait::async_trait;
use dmx_gatekeeper_core::{BrokerError, Resource, ResourceKind, TransportError, Violations};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::DownstreamConfig;
use crate::traits::ResourceBroker;

/// Header carrying the gateway's access key to the downstream API.
pub const ACCESS_KEY_HEADER: &str = "x-access-key";

/// Broker for every resource type served by the DMX core API.
#[derive(Debug, Clone)]
pub struct DmxApiBroker {
    http_client: HttpClient,
    base_url: String,
}

/// The subset of an RFC 7807 problem-details body the broker reads.
#[derive(Debug, Default, Deserialize)]
struct ProblemDetails {
    #[serde(default, alias = "Title")]
    title: Option<String>,
    #[serde(default, alias = "Errors")]
    errors: Violations,
}

impl DmxApiBroker {
    /// Builds a broker with a pooled client honoring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the access key is not a valid header value or the
    /// HTTP client cannot be created.
    pub fn new(config: &DownstreamConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.access_key {
            let mut value = HeaderValue::from_str(key)?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(ACCESS_KEY_HEADER), value);
        }

        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(10)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self, kind: ResourceKind) -> String {
        format!("{}/{}", self.base_url, kind.collection_path())
    }

    fn item_url(&self, kind: ResourceKind, id: Uuid) -> String {
        format!("{}/{}/{}", self.base_url, kind.collection_path(), id)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<T, BrokerError> {
        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                let context = format!("building request for {url}");
                BrokerError::Unexpected(anyhow::Error::new(e).context(context))
            } else {
                TransportError::Connectivity {
                    message: e.to_string(),
                }
                .into()
            }
        })?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "downstream API responded");

        if status.is_success() {
            let body = response.bytes().await.map_err(|e| TransportError::Connectivity {
                message: e.to_string(),
            })?;
            return serde_json::from_slice(&body).map_err(|e| {
                TransportError::Serialization {
                    message: e.to_string(),
                }
                .into()
            });
        }

        // A body that cannot be read is treated as empty; the status alone
        // still determines the variant.
        let body = response.text().await.unwrap_or_default();
        Err(map_failure_status(status, url, body).into())
    }
}

/// Maps a non-success response onto its transport failure.
fn map_failure_status(status: StatusCode, url: &str, body: String) -> TransportError {
    match status {
        StatusCode::BAD_REQUEST => {
            let problem: ProblemDetails = serde_json::from_str(&body).unwrap_or_default();
            TransportError::BadRequest {
                message: problem.title.unwrap_or(body),
                errors: problem.errors,
            }
        }
        StatusCode::UNAUTHORIZED => TransportError::Unauthorized { message: body },
        StatusCode::FORBIDDEN => TransportError::Forbidden { message: body },
        StatusCode::NOT_FOUND if body.trim().is_empty() => TransportError::UrlNotFound {
            url: url.to_string(),
        },
        StatusCode::NOT_FOUND => TransportError::NotFound { message: body },
        _ => TransportError::Status {
            status: status.as_u16(),
            message: body,
        },
    }
}

#[async_trait]
impl<R: Resource> ResourceBroker<R> for DmxApiBroker {
    async fn post(&self, resource: &R) -> Result<R, BrokerError> {
        let url = self.collection_url(R::KIND);
        self.send(self.http_client.post(&url).json(resource), &url).await
    }

    async fn get(&self, id: Uuid) -> Result<R, BrokerError> {
        let url = self.item_url(R::KIND, id);
        self.send(self.http_client.get(&url), &url).await
    }

    async fn get_all(&self) -> Result<Vec<R>, BrokerError> {
        let url = self.collection_url(R::KIND);
        self.send(self.http_client.get(&url), &url).await
    }

    async fn put(&self, resource: &R) -> Result<R, BrokerError> {
        let url = self.collection_url(R::KIND);
        self.send(self.http_client.put(&url).json(resource), &url).await
    }

    async fn delete(&self, id: Uuid) -> Result<R, BrokerError> {
        let url = self.item_url(R::KIND, id);
        self.send(self.http_client.delete(&url), &url).await
    }
}
