use crate::{Flow, Fragment, StatusKind, StatusLine, UiState, VoiceOption};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelViewModel {
    pub ui_state: UiState,
    pub flow: Flow,
    pub voice: VoiceOption,
    pub isolation: bool,
    /// The run button; disabled while a run is in flight.
    pub run_enabled: bool,
    /// Loading indicator next to the run button.
    pub busy: bool,
    pub status_lines: Vec<StatusLine>,
    pub fragments: Vec<Fragment>,
    pub dirty: bool,
}

impl PanelViewModel {
    pub fn last_status(&self) -> Option<&StatusLine> {
        self.status_lines.last()
    }

    pub fn has_errors(&self) -> bool {
        self.status_lines
            .iter()
            .any(|line| line.kind == StatusKind::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceChoiceView {
    pub voice: VoiceOption,
    pub label: &'static str,
    pub selected: bool,
}

/// Entries for the voice picker, in display order.
pub fn voice_choices(selected: VoiceOption) -> Vec<VoiceChoiceView> {
    VoiceOption::ALL
        .into_iter()
        .map(|voice| VoiceChoiceView {
            voice,
            label: voice.label(),
            selected: voice == selected,
        })
        .collect()
}
