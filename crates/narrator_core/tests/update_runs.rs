use narrator_core::{
    render, update, ActiveTab, Effect, ExtractionResult, Flow, Fragment, Msg, NarrationResponse,
    PanelState, RenderContext, ServiceResponse, StatusKind, UiState,
};
use url::Url;

fn drive(state: PanelState, msg: Msg, log: &mut Vec<UiState>) -> (PanelState, Vec<Effect>) {
    let (state, effects) = update(state, msg);
    log.push(state.ui());
    (state, effects)
}

fn complete_response() -> ServiceResponse {
    ServiceResponse::Narration(NarrationResponse::Complete {
        narrative: "...".into(),
        mp3_url: Some("/files/out.mp3".into()),
        video_url: None,
        notes: Some("Line1\nLine2".into()),
        voice_type: "professional".into(),
        voice_options: None,
    })
}

fn finished_run() -> PanelState {
    let mut states = Vec::new();
    let (state, _) = drive(
        PanelState::new(),
        Msg::RunClicked {
            flow: Flow::Narration,
            tab: Some(ActiveTab::new("https://example.com/article")),
        },
        &mut states,
    );
    let (state, _) = drive(state, Msg::ProbeCompleted { reachable: true }, &mut states);
    let (state, _) = drive(
        state,
        Msg::ExtractionCompleted(Ok(ExtractionResult {
            text: "Example Heading\nExample paragraph text...".into(),
            ..ExtractionResult::default()
        })),
        &mut states,
    );
    let (state, effects) = drive(
        state,
        Msg::ResponseReceived(Ok(complete_response())),
        &mut states,
    );

    let fragments = match effects.as_slice() {
        [Effect::RenderResult { response, voice }] => render(
            response,
            *voice,
            &RenderContext::new(Url::parse("http://127.0.0.1:8080").unwrap()),
        ),
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, effects) = drive(state, Msg::RenderCompleted(fragments), &mut states);
    assert!(effects.is_empty());
    assert_eq!(
        states,
        vec![
            UiState::Connecting,
            UiState::Extracting,
            UiState::Requesting,
            UiState::Rendering,
            UiState::Done,
        ]
    );
    state
}

#[test]
fn complete_run_ends_done_with_audio_and_notes() {
    let state = finished_run();
    let view = state.view();

    assert_eq!(view.ui_state, UiState::Done);
    assert!(view.run_enabled);
    assert_eq!(
        view.fragments,
        vec![
            Fragment::Audio {
                src: "http://127.0.0.1:8080/files/out.mp3".into()
            },
            Fragment::Notes {
                html: "Line1<br>Line2".into(),
                copy_text: "Line1\nLine2".into(),
            },
        ]
    );
    assert_eq!(view.last_status().unwrap().kind, StatusKind::Success);
    assert!(!view.has_errors());
}

#[test]
fn status_log_only_grows_during_a_run() {
    let state = finished_run();
    let lines = state.status_log();

    assert!(lines.len() >= 5);
    assert_eq!(lines.first().unwrap().text, "Connecting to narration server...");
    assert_eq!(lines.last().unwrap().text, "Done!");
}

#[test]
fn new_click_after_done_discards_previous_output() {
    let state = finished_run();
    let seq = state.run_seq();
    let (state, effects) = update(
        state,
        Msg::RunClicked {
            flow: Flow::Summary,
            tab: Some(ActiveTab::new("https://example.com/other")),
        },
    );

    assert_eq!(effects, vec![Effect::ProbeServer]);
    assert_eq!(state.ui(), UiState::Connecting);
    assert_eq!(state.run_seq(), seq + 1);
    assert!(state.fragments().is_empty());
    assert_eq!(state.status_log().len(), 1);
    assert_eq!(state.flow(), Flow::Summary);
}

#[test]
fn new_click_after_failure_restarts() {
    let (state, _) = update(
        PanelState::new(),
        Msg::RunClicked {
            flow: Flow::Narration,
            tab: None,
        },
    );
    assert!(state.ui().is_terminal());

    let (state, effects) = update(
        state,
        Msg::RunClicked {
            flow: Flow::Narration,
            tab: Some(ActiveTab::new("https://example.com")),
        },
    );
    assert_eq!(state.ui(), UiState::Connecting);
    assert_eq!(effects, vec![Effect::ProbeServer]);
    assert!(!state.view().has_errors());
}
