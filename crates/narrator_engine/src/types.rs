use crate::DecodeError;

/// Raw page as it came off the wire, after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid page url {url:?}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("page answered with status {0}")]
    Status(u16),
    #[error("page load timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("page is larger than {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("not an html page ({0})")]
    NotHtml(String),
    #[error("page unreachable: {0}")]
    Network(String),
}

/// A fault raised inside the extraction procedure. Never escapes an extractor:
/// it is folded into `ExtractionResult::error`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionFault {
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
}

/// The page could not be reached at all, so no extraction ran.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("no page loaded for {0}")]
    NotLoaded(String),
    #[error("page fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
