use anyhow::Context;
use clap::Parser;
use narrator_core::{voice_choices, ActiveTab, PanelViewModel, UiState};
use narrator_engine::{
    Extractors, FetchSettings, HttpPageAccessor, Orchestrator, ReqwestFetcher, ReqwestTransport,
    ServiceSettings,
};
use narrator_logging::{narrator_error, narrator_info};

use super::{args, logging, render::TerminalPanel};

/// Headless host: the page URL plays the active tab, stdout plays the panel.
pub fn run_app() -> anyhow::Result<()> {
    let options = args::Options::parse();
    logging::initialize(options.log, options.verbose);

    if options.list_voices {
        for choice in voice_choices(options.voice) {
            let marker = if choice.selected { "*" } else { " " };
            println!("{marker} {:<16} {}", choice.voice.tag(), choice.label);
        }
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building runtime")?;

    let settings = ServiceSettings::default();
    let media_base = settings.base_url.clone();
    let transport = ReqwestTransport::new(settings).context("building service client")?;
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).context("building page client")?;
    let page = HttpPageAccessor::new(fetcher, Extractors::default());

    let view = runtime.block_on(async {
        let mut orchestrator =
            Orchestrator::new(page, transport, media_base).with_sink(TerminalPanel::default());
        orchestrator.select_voice(options.voice).await;
        orchestrator.set_isolation(options.isolation).await;
        let tab = options.tab_url.clone().map(|url| {
            let tab = ActiveTab::new(url);
            match options.tab_title.clone() {
                Some(title) => tab.with_title(title),
                None => tab,
            }
        });
        orchestrator.click(options.flow(), tab).await
    });

    settle(&view)
}

/// Maps the settled panel to the process outcome; a failed run is an error.
fn settle(view: &PanelViewModel) -> anyhow::Result<()> {
    match view.ui_state {
        UiState::Done => {
            narrator_info!("run finished with {} fragments", view.fragments.len());
            Ok(())
        }
        UiState::Failed(reason) => {
            narrator_error!("run failed: {reason}");
            anyhow::bail!("run failed: {reason}")
        }
        other => anyhow::bail!("run stopped in non-terminal state {other:?}"),
    }
}
