use std::fmt;

use crate::view_model::PanelViewModel;
use crate::{ActiveTab, Flow, Fragment, NarrationRequest, ProcessRequest, VoiceOption};

/// Why a run ended in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunFailure {
    NoTab,
    NoServer,
    NoContent,
    RequestError,
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunFailure::NoTab => write!(f, "no active tab"),
            RunFailure::NoServer => write!(f, "server unreachable"),
            RunFailure::NoContent => write!(f, "no content"),
            RunFailure::RequestError => write!(f, "request error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Connecting,
    Extracting,
    Requesting,
    Rendering,
    Done,
    Failed(RunFailure),
}

impl UiState {
    pub fn is_terminal(self) -> bool {
        matches!(self, UiState::Done | UiState::Failed(_))
    }

    pub fn is_in_flight(self) -> bool {
        !matches!(self, UiState::Idle) && !self.is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Success,
    Error,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

/// The request currently awaiting a reply from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    Narration(NarrationRequest),
    Summary(ProcessRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelState {
    ui: UiState,
    flow: Flow,
    voice: VoiceOption,
    isolation: bool,
    run_seq: u64,
    tab: Option<ActiveTab>,
    pending: Option<PendingRequest>,
    status_log: Vec<StatusLine>,
    fragments: Vec<Fragment>,
    dirty: bool,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> PanelViewModel {
        PanelViewModel {
            ui_state: self.ui,
            flow: self.flow,
            voice: self.voice,
            isolation: self.isolation,
            run_enabled: !self.ui.is_in_flight(),
            busy: self.ui.is_in_flight(),
            status_lines: self.status_log.clone(),
            fragments: self.fragments.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn ui(&self) -> UiState {
        self.ui
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn voice(&self) -> VoiceOption {
        self.voice
    }

    pub fn isolation(&self) -> bool {
        self.isolation
    }

    /// Increases by one on every accepted click.
    pub fn run_seq(&self) -> u64 {
        self.run_seq
    }

    pub fn tab(&self) -> Option<&ActiveTab> {
        self.tab.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    pub fn status_log(&self) -> &[StatusLine] {
        &self.status_log
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub(crate) fn set_voice(&mut self, voice: VoiceOption) {
        if self.voice != voice {
            self.voice = voice;
            self.dirty = true;
        }
    }

    pub(crate) fn set_isolation(&mut self, enabled: bool) {
        if self.isolation != enabled {
            self.isolation = enabled;
            self.dirty = true;
        }
    }

    /// Back to `Idle` with everything from the previous run discarded.
    pub(crate) fn reset_for_run(&mut self, flow: Flow) {
        self.ui = UiState::Idle;
        self.flow = flow;
        self.run_seq += 1;
        self.tab = None;
        self.pending = None;
        self.status_log.clear();
        self.fragments.clear();
        self.dirty = true;
    }

    pub(crate) fn set_tab(&mut self, tab: ActiveTab) {
        self.tab = Some(tab);
    }

    pub(crate) fn set_pending(&mut self, request: PendingRequest) {
        self.pending = Some(request);
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending = None;
    }

    pub(crate) fn push_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status_log.push(StatusLine {
            kind,
            text: text.into(),
        });
        self.dirty = true;
    }

    /// Moves to `next` and logs the transition.
    pub(crate) fn enter(&mut self, next: UiState, kind: StatusKind, text: impl Into<String>) {
        self.ui = next;
        self.push_status(kind, text);
    }

    pub(crate) fn fail(&mut self, reason: RunFailure, text: impl Into<String>) {
        self.pending = None;
        self.enter(UiState::Failed(reason), StatusKind::Error, text);
    }

    pub(crate) fn append_fragments(&mut self, fragments: Vec<Fragment>) {
        self.fragments.extend(fragments);
        self.dirty = true;
    }
}
