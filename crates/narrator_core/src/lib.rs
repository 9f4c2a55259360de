//! Narrator core: pure orchestration state machine, data model and result rendering.
mod effect;
mod model;
mod msg;
mod render;
mod state;
mod update;
mod view_model;
mod voice;

pub use effect::Effect;
pub use model::{
    ActiveTab, ExtractionMode, ExtractionResult, Flow, NarrationRequest, NarrationResponse,
    ProcessRequest, ProcessResponse, ServiceResponse, TransportError, MAX_TEXT_CHARS,
};
pub use msg::Msg;
pub use render::{
    notes_to_html, render, resolve_media, Fragment, RenderContext, DEMO_BANNER,
    VIDEO_UNAVAILABLE,
};
pub use state::{PanelState, PendingRequest, RunFailure, StatusKind, StatusLine, UiState};
pub use update::{update, NETWORK_HINT, NO_SERVER_HINT};
pub use view_model::{voice_choices, PanelViewModel, VoiceChoiceView};
pub use voice::{UnknownVoice, VoiceOption};
