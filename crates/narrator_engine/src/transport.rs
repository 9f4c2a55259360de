use std::time::Duration;

use narrator_core::{
    NarrationRequest, NarrationResponse, ProcessRequest, ProcessResponse, TransportError,
};
use narrator_logging::{narrator_debug, narrator_info, narrator_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// Where the companion server listens.
pub const DEFAULT_SERVICE_BASE: &str = "http://127.0.0.1:8080/";
const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub probe_timeout: Duration,
    /// Generation can take minutes; this is the only timeout a run has.
    pub request_timeout: Duration,
}

impl ServiceSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(600),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_SERVICE_BASE).expect("default service base url"))
    }
}

#[async_trait::async_trait]
pub trait TransportClient: Send + Sync {
    /// `GET /`; `false` on any failure.
    async fn probe(&self) -> bool;
    /// `POST /generate_narration`.
    async fn send(&self, request: &NarrationRequest) -> Result<NarrationResponse, TransportError>;
    /// `POST /process`.
    async fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: ServiceSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.settings.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| TransportError::Network(format!("invalid endpoint {path}: {err}")))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, TransportError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let payload = serde_json::to_vec(body)
            .map_err(|err| TransportError::Decode(format!("could not encode request: {err}")))?;
        narrator_debug!("POST {url} ({} bytes)", payload.len());

        let response = self
            .client
            .post(url)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .body(payload)
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        if !status.is_success() {
            narrator_warn!("{path} answered {status}");
            return Err(TransportError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|err| TransportError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl TransportClient for ReqwestTransport {
    async fn probe(&self) -> bool {
        let result = self
            .client
            .get(self.settings.base_url.clone())
            .timeout(self.settings.probe_timeout)
            .send()
            .await;
        match result {
            Ok(response) => {
                let reachable = response.status().is_success();
                narrator_info!("probe {} -> {}", self.settings.base_url, response.status());
                reachable
            }
            Err(err) => {
                narrator_warn!("probe {} failed: {err}", self.settings.base_url);
                false
            }
        }
    }

    async fn send(&self, request: &NarrationRequest) -> Result<NarrationResponse, TransportError> {
        self.post_json("generate_narration", request).await
    }

    async fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse, TransportError> {
        self.post_json("process", request).await
    }
}
