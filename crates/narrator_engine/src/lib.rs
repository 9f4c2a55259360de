//! Narrator engine: page access, content extraction, service transport and the effect runner.
mod decode;
mod extract;
mod fetch;
mod orchestrator;
mod page;
mod transport;
mod types;

pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use extract::{
    normalize_whitespace, truncate_chars, utc_clock, Clock, Extractor, LayeredExtractor,
    PageSnapshot, StrictExtractor, StrictPolicy, CONTENT_SELECTORS,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use orchestrator::{millis_cache_buster, CacheBuster, NullViewSink, Orchestrator, ViewSink};
pub use page::{Extractors, HttpPageAccessor, PageAccessor, SnapshotPageAccessor};
pub use transport::{ReqwestTransport, ServiceSettings, TransportClient, DEFAULT_SERVICE_BASE};
pub use types::{ExtractionFault, FetchError, LoadedPage, PageError};
