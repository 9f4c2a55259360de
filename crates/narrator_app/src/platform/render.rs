use std::sync::Mutex;

use narrator_core::{Fragment, PanelViewModel, StatusKind, UiState};
use narrator_engine::ViewSink;

/// Prints the panel to stdout: status lines as they are appended, fragments once the run is done.
#[derive(Default)]
pub struct TerminalPanel {
    printed_lines: Mutex<usize>,
}

impl ViewSink for TerminalPanel {
    fn publish(&self, view: &PanelViewModel) {
        let Ok(mut printed) = self.printed_lines.lock() else {
            return;
        };
        if view.status_lines.len() < *printed {
            // A new run cleared the log.
            *printed = 0;
        }
        for line in &view.status_lines[*printed..] {
            println!("{} {}", status_marker(line.kind), line.text);
        }
        *printed = view.status_lines.len();

        if view.ui_state == UiState::Done {
            for fragment in &view.fragments {
                println!("{}", render_fragment(fragment));
            }
        }
    }
}

fn status_marker(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Info => "[..]",
        StatusKind::Warning => "[!!]",
        StatusKind::Success => "[ok]",
        StatusKind::Error => "[XX]",
        StatusKind::Hint => "[hint]",
    }
}

fn render_fragment(fragment: &Fragment) -> String {
    match fragment {
        Fragment::DemoBanner { message } => format!("== {message}"),
        Fragment::Narrative { text } => format!("Narrative:\n{text}"),
        Fragment::Audio { src } => format!("Audio: {src}"),
        Fragment::Video { src } => format!("Video: {src}"),
        Fragment::EmbeddedDocument { src } => format!("Embedded player: {src}"),
        Fragment::Notes { copy_text, .. } => format!("Notes:\n{copy_text}"),
        Fragment::VoiceInfo { selected, options } => format!(
            "Voice: {} (available: {})",
            selected.label(),
            options.join(", ")
        ),
        Fragment::Notice { message } => format!("Note: {message}"),
    }
}
