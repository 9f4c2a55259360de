//! Effect runner for the panel state machine.
//!
//! Every message goes through `narrator_core::update`; the resulting effects
//! are awaited one at a time and their outcomes fed back as messages until the
//! run settles. Page extraction, the probe and the service call are the only
//! suspension points.
use std::collections::VecDeque;
use std::sync::Arc;

use narrator_core::{
    render, update, ActiveTab, Effect, Flow, Msg, PanelState, PanelViewModel, RenderContext,
    ServiceResponse, VoiceOption,
};
use narrator_logging::{narrator_debug, narrator_info, narrator_warn};
use url::Url;

use crate::{PageAccessor, TransportClient};

/// Receives the panel view every time it changes.
pub trait ViewSink: Send + Sync {
    fn publish(&self, view: &PanelViewModel);
}

#[derive(Debug, Default)]
pub struct NullViewSink;

impl ViewSink for NullViewSink {
    fn publish(&self, _view: &PanelViewModel) {}
}

pub type CacheBuster = Arc<dyn Fn() -> String + Send + Sync>;

pub fn millis_cache_buster() -> CacheBuster {
    Arc::new(|| chrono::Utc::now().timestamp_millis().to_string())
}

pub struct Orchestrator<P, T> {
    state: PanelState,
    page: P,
    transport: T,
    media_base: Url,
    cache_buster: CacheBuster,
    sink: Box<dyn ViewSink>,
}

impl<P: PageAccessor, T: TransportClient> Orchestrator<P, T> {
    /// `media_base` resolves server-relative media paths; normally the service base URL.
    pub fn new(page: P, transport: T, media_base: Url) -> Self {
        Self {
            state: PanelState::new(),
            page,
            transport,
            media_base,
            cache_buster: millis_cache_buster(),
            sink: Box::new(NullViewSink),
        }
    }

    pub fn with_sink(mut self, sink: impl ViewSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_cache_buster(mut self, cache_buster: CacheBuster) -> Self {
        self.cache_buster = cache_buster;
        self
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn view(&self) -> PanelViewModel {
        self.state.view()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn select_voice(&mut self, voice: VoiceOption) -> PanelViewModel {
        self.dispatch(Msg::VoiceSelected(voice)).await
    }

    pub async fn set_isolation(&mut self, enabled: bool) -> PanelViewModel {
        self.dispatch(Msg::IsolationToggled(enabled)).await
    }

    /// Runs one orchestration pass to a terminal state.
    pub async fn click(&mut self, flow: Flow, tab: Option<ActiveTab>) -> PanelViewModel {
        self.dispatch(Msg::RunClicked { flow, tab }).await
    }

    pub async fn dispatch(&mut self, msg: Msg) -> PanelViewModel {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            narrator_logging::set_run_seq(self.state.run_seq());
            self.publish_if_dirty();

            for effect in effects {
                let reply = self.execute(effect).await;
                inbox.push_back(reply);
            }
        }
        narrator_info!("run settled in {:?}", self.state.ui());
        self.state.view()
    }

    fn publish_if_dirty(&mut self) {
        if self.state.consume_dirty() {
            self.sink.publish(&self.state.view());
        }
    }

    async fn execute(&self, effect: Effect) -> Msg {
        match effect {
            Effect::ProbeServer => {
                let reachable = self.transport.probe().await;
                Msg::ProbeCompleted { reachable }
            }
            Effect::ExtractPage { url, mode } => {
                narrator_debug!("extracting {url} in {mode:?} mode");
                let result = self.page.run_extraction(&url, mode).await.map_err(|err| {
                    narrator_warn!("page access failed for {url}: {err}");
                    err.to_string()
                });
                Msg::ExtractionCompleted(result)
            }
            Effect::SendNarration(request) => {
                narrator_info!(
                    "requesting narration url={} voice={} isolation={}",
                    request.url,
                    request.voice_type,
                    request.isolation
                );
                let result = self.transport.send(&request).await;
                Msg::ResponseReceived(result.map(ServiceResponse::Narration))
            }
            Effect::SendSummary(request) => {
                narrator_info!(
                    "requesting summary url={} content_len={}",
                    request.url,
                    request.content.len()
                );
                let result = self.transport.process(&request).await;
                Msg::ResponseReceived(result.map(ServiceResponse::Summary))
            }
            Effect::RenderResult { response, voice } => {
                let ctx = RenderContext {
                    base_url: self.media_base.clone(),
                    cache_buster: Some((self.cache_buster)()),
                };
                Msg::RenderCompleted(render(&response, voice, &ctx))
            }
        }
    }
}
