//! The host capability that runs the extraction procedure inside a page.
use narrator_core::{ExtractionMode, ExtractionResult};
use narrator_logging::narrator_info;

use crate::{
    decode_html, Clock, Extractor, Fetcher, LayeredExtractor, PageError, PageSnapshot,
    ReqwestFetcher, StrictExtractor, StrictPolicy,
};

#[async_trait::async_trait]
pub trait PageAccessor: Send + Sync {
    /// Executes the extraction procedure in the page at `url` and returns its
    /// structured result. `Err` means the procedure could not run at all.
    async fn run_extraction(
        &self,
        url: &str,
        mode: ExtractionMode,
    ) -> Result<ExtractionResult, PageError>;
}

/// One extractor per [`ExtractionMode`].
pub struct Extractors {
    layered: LayeredExtractor,
    strict: StrictExtractor,
}

impl Default for Extractors {
    fn default() -> Self {
        Self {
            layered: LayeredExtractor::default(),
            strict: StrictExtractor::default(),
        }
    }
}

impl Extractors {
    pub fn new(layered: LayeredExtractor, strict: StrictExtractor) -> Self {
        Self { layered, strict }
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            layered: LayeredExtractor::new(clock.clone()),
            strict: StrictExtractor::new(StrictPolicy::default(), clock),
        }
    }

    pub fn extract(&self, page: &PageSnapshot, mode: ExtractionMode) -> ExtractionResult {
        match mode {
            ExtractionMode::Layered => self.layered.extract(page),
            ExtractionMode::Strict => self.strict.extract(page),
        }
    }
}

/// A page already held in memory, e.g. a DOM serialized by the host.
pub struct SnapshotPageAccessor {
    snapshot: PageSnapshot,
    extractors: Extractors,
}

impl SnapshotPageAccessor {
    pub fn new(snapshot: PageSnapshot, extractors: Extractors) -> Self {
        Self {
            snapshot,
            extractors,
        }
    }
}

#[async_trait::async_trait]
impl PageAccessor for SnapshotPageAccessor {
    async fn run_extraction(
        &self,
        url: &str,
        mode: ExtractionMode,
    ) -> Result<ExtractionResult, PageError> {
        if url != self.snapshot.url {
            return Err(PageError::NotLoaded(url.to_string()));
        }
        Ok(self.extractors.extract(&self.snapshot, mode))
    }
}

/// Loads the page over HTTP and extracts from the decoded document.
pub struct HttpPageAccessor<F = ReqwestFetcher> {
    fetcher: F,
    extractors: Extractors,
}

impl<F: Fetcher> HttpPageAccessor<F> {
    pub fn new(fetcher: F, extractors: Extractors) -> Self {
        Self {
            fetcher,
            extractors,
        }
    }
}

#[async_trait::async_trait]
impl<F: Fetcher> PageAccessor for HttpPageAccessor<F> {
    async fn run_extraction(
        &self,
        url: &str,
        mode: ExtractionMode,
    ) -> Result<ExtractionResult, PageError> {
        let page = self.fetcher.fetch(url).await?;
        let decoded = decode_html(&page.body, page.content_type.as_deref())?;
        narrator_info!(
            "loaded {} ({} bytes, {})",
            page.final_url,
            page.body.len(),
            decoded.encoding_label
        );
        let snapshot = PageSnapshot::new(page.final_url, decoded.html);
        Ok(self.extractors.extract(&snapshot, mode))
    }
}
