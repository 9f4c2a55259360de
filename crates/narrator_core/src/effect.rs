use crate::{ExtractionMode, NarrationRequest, ProcessRequest, ServiceResponse, VoiceOption};

/// Side effects requested by [`crate::update`]; the runner reports each outcome back as a `Msg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// `GET /`, answered with `Msg::ProbeCompleted`.
    ProbeServer,
    /// Run extraction in the page at `url`, answered with `Msg::ExtractionCompleted`.
    ExtractPage { url: String, mode: ExtractionMode },
    SendNarration(NarrationRequest),
    SendSummary(ProcessRequest),
    /// Answered with `Msg::RenderCompleted`.
    RenderResult {
        response: ServiceResponse,
        voice: VoiceOption,
    },
}
