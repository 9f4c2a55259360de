use crate::{
    Effect, ExtractionResult, Flow, Msg, NarrationRequest, NarrationResponse, PanelState,
    PendingRequest, ProcessRequest, RunFailure, ServiceResponse, StatusKind, TransportError,
    UiState,
};

pub const NO_SERVER_HINT: &str =
    "Hint: make sure the companion narration server is running on port 8080.";
pub const NETWORK_HINT: &str = "Hint: the panel cannot reach the server. Ensure the companion server process is running and accepts cross-origin (CORS) requests.";

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not belong to the current state (a late probe result, a
/// second click while a run is in flight) leave the state untouched.
pub fn update(mut state: PanelState, msg: Msg) -> (PanelState, Vec<Effect>) {
    let effects = match msg {
        Msg::VoiceSelected(voice) => {
            if !state.ui().is_in_flight() {
                state.set_voice(voice);
            }
            Vec::new()
        }
        Msg::IsolationToggled(enabled) => {
            if !state.ui().is_in_flight() {
                state.set_isolation(enabled);
            }
            Vec::new()
        }
        Msg::RunClicked { flow, tab } => {
            if state.ui().is_in_flight() {
                return (state, Vec::new());
            }
            state.reset_for_run(flow);

            let Some(tab) = tab.filter(|tab| !tab.url.trim().is_empty()) else {
                state.fail(RunFailure::NoTab, "No active tab found.");
                return (state, Vec::new());
            };
            state.set_tab(tab);
            state.enter(
                UiState::Connecting,
                StatusKind::Info,
                "Connecting to narration server...",
            );
            vec![Effect::ProbeServer]
        }
        Msg::ProbeCompleted { reachable } => {
            if state.ui() != UiState::Connecting {
                return (state, Vec::new());
            }
            if reachable {
                let url = state.tab().map(|tab| tab.url.clone()).unwrap_or_default();
                state.enter(
                    UiState::Extracting,
                    StatusKind::Info,
                    "Server connected. Reading page content...",
                );
                vec![Effect::ExtractPage {
                    url,
                    mode: state.flow().extraction_mode(),
                }]
            } else {
                state.fail(RunFailure::NoServer, "Cannot connect to the narration server.");
                state.push_status(StatusKind::Hint, NO_SERVER_HINT);
                Vec::new()
            }
        }
        Msg::ExtractionCompleted(result) => {
            if state.ui() != UiState::Extracting {
                return (state, Vec::new());
            }
            match result {
                Err(fault) => {
                    state.fail(
                        RunFailure::NoContent,
                        format!("Could not read the page: {fault}"),
                    );
                    Vec::new()
                }
                Ok(extraction) => request_from_extraction(&mut state, extraction),
            }
        }
        Msg::ResponseReceived(result) => {
            if state.ui() != UiState::Requesting {
                return (state, Vec::new());
            }
            state.clear_pending();
            match result {
                Ok(response) => {
                    state.enter(
                        UiState::Rendering,
                        StatusKind::Info,
                        response_status_text(&response),
                    );
                    vec![Effect::RenderResult {
                        response,
                        voice: state.voice(),
                    }]
                }
                Err(err) => {
                    let is_network = matches!(err, TransportError::Network(_));
                    state.fail(RunFailure::RequestError, format!("Request failed: {err}"));
                    if is_network {
                        state.push_status(StatusKind::Hint, NETWORK_HINT);
                    }
                    Vec::new()
                }
            }
        }
        Msg::RenderCompleted(fragments) => {
            if state.ui() != UiState::Rendering {
                return (state, Vec::new());
            }
            state.append_fragments(fragments);
            state.enter(UiState::Done, StatusKind::Success, "Done!");
            Vec::new()
        }
    };

    (state, effects)
}

fn request_from_extraction(state: &mut PanelState, extraction: ExtractionResult) -> Vec<Effect> {
    if let Some(fault) = &extraction.error {
        state.push_status(
            StatusKind::Warning,
            format!("Page extraction reported a problem: {fault}"),
        );
    }
    let url = state.tab().map(|tab| tab.url.clone()).unwrap_or_default();

    match state.flow() {
        Flow::Summary => {
            if !extraction.has_text() {
                state.fail(RunFailure::NoContent, "No text found on page.");
                return Vec::new();
            }
            state.push_status(
                StatusKind::Info,
                format!("Read {} characters from the page.", extraction.text.chars().count()),
            );
            let request = ProcessRequest {
                content: extraction.text,
                url,
            };
            state.set_pending(PendingRequest::Summary(request.clone()));
            state.enter(
                UiState::Requesting,
                StatusKind::Info,
                "Generating summary video...",
            );
            vec![Effect::SendSummary(request)]
        }
        Flow::Narration => {
            let title = if extraction.title.is_empty() {
                state
                    .tab()
                    .and_then(|tab| tab.title.clone())
                    .filter(|title| !title.trim().is_empty())
                    .unwrap_or_else(|| "untitled page".to_string())
            } else {
                extraction.title.clone()
            };
            state.push_status(
                StatusKind::Info,
                format!(
                    "Read {} characters from \"{title}\".",
                    extraction.text.chars().count()
                ),
            );
            let request = NarrationRequest {
                url,
                voice_type: state.voice(),
                isolation: state.isolation(),
            };
            state.set_pending(PendingRequest::Narration(request.clone()));
            let isolation_note = if request.isolation {
                " with isolation"
            } else {
                ""
            };
            state.enter(
                UiState::Requesting,
                StatusKind::Info,
                format!(
                    "Generating narration ({}){isolation_note}...",
                    request.voice_type.label()
                ),
            );
            vec![Effect::SendNarration(request)]
        }
    }
}

fn response_status_text(response: &ServiceResponse) -> &'static str {
    match response {
        ServiceResponse::Narration(NarrationResponse::Demo { .. }) => {
            "Server is running in demo mode."
        }
        ServiceResponse::Narration(NarrationResponse::Complete { .. }) => {
            "Narration generated. Preparing results..."
        }
        ServiceResponse::Summary(_) => "Summary generated. Preparing results...",
    }
}
