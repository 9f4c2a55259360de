use crate::{ActiveTab, ExtractionResult, Flow, Fragment, ServiceResponse, TransportError, VoiceOption};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a narration voice.
    VoiceSelected(VoiceOption),
    /// User toggled the isolation checkbox.
    IsolationToggled(bool),
    /// User clicked the run button; `tab` is `None` when the host has no active page.
    RunClicked { flow: Flow, tab: Option<ActiveTab> },
    /// Health probe finished.
    ProbeCompleted { reachable: bool },
    /// Page extraction finished; `Err` carries a page-access fault.
    ExtractionCompleted(Result<ExtractionResult, String>),
    /// The service replied, or the request failed.
    ResponseReceived(Result<ServiceResponse, TransportError>),
    /// Renderer output for the response.
    RenderCompleted(Vec<Fragment>),
}
