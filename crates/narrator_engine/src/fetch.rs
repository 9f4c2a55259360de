//! Loads the page that stands in for the active tab.
use std::time::Duration;

use futures_util::StreamExt;
use narrator_logging::narrator_debug;
use reqwest::header::CONTENT_TYPE;

use crate::{FetchError, LoadedPage};

/// Limits for loading the page that stands in for the active tab.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Media types accepted as a page; parameters such as `charset` are ignored.
    pub html_types: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            html_types: vec!["text/html".to_string(), "application/xhtml+xml".to_string()],
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)"
                .to_string(),
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<LoadedPage, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn accepts(&self, content_type: &str) -> bool {
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        self.settings
            .html_types
            .iter()
            .any(|html| html.eq_ignore_ascii_case(media_type))
    }

    fn check_size(&self, len: u64) -> Result<(), FetchError> {
        if len > self.settings.max_bytes {
            return Err(FetchError::TooLarge {
                limit: self.settings.max_bytes,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<LoadedPage, FetchError> {
        let target = reqwest::Url::parse(url).map_err(|err| FetchError::InvalidUrl {
            url: url.to_string(),
            message: err.to_string(),
        })?;

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        if let Some(len) = response.content_length() {
            self.check_size(len)?;
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(ct) = content_type.as_deref().filter(|ct| !self.accepts(ct)) {
            return Err(FetchError::NotHtml(ct.to_string()));
        }

        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(classify)?;
            self.check_size((body.len() + chunk.len()) as u64)?;
            body.extend_from_slice(&chunk);
        }
        narrator_debug!("fetched {} bytes from {final_url}", body.len());

        Ok(LoadedPage {
            final_url,
            content_type,
            body,
        })
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_redirect() {
        FetchError::TooManyRedirects
    } else {
        FetchError::Network(err.to_string())
    }
}
