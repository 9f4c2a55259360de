//! Maps a finished service response to panel fragments.
//!
//! Rendering is pure: it never touches the network or the source page, and it
//! never reads orchestration state beyond what is passed in.
use url::Url;

use crate::{NarrationResponse, ProcessResponse, ServiceResponse, VoiceOption};

pub const DEMO_BANNER: &str =
    "Demo mode: the narration service is not fully configured, so only illustrative text was generated.";
pub const VIDEO_UNAVAILABLE: &str = "Video generation completed but file not available";

/// One unit of output in the results panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    DemoBanner { message: String },
    Narrative { text: String },
    Audio { src: String },
    Video { src: String },
    /// Markup document shown in an embedded frame.
    EmbeddedDocument { src: String },
    /// `html` is display-ready; `copy_text` is what the copy button puts on the clipboard.
    Notes { html: String, copy_text: String },
    VoiceInfo {
        selected: VoiceOption,
        options: Vec<String>,
    },
    Notice { message: String },
}

impl Fragment {
    pub fn is_media(&self) -> bool {
        matches!(
            self,
            Fragment::Audio { .. } | Fragment::Video { .. } | Fragment::EmbeddedDocument { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Server-relative media paths resolve against this.
    pub base_url: Url,
    /// Appended as `t=<value>` to freshly generated summary video.
    pub cache_buster: Option<String>,
}

impl RenderContext {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            cache_buster: None,
        }
    }
}

pub fn render(response: &ServiceResponse, voice: VoiceOption, ctx: &RenderContext) -> Vec<Fragment> {
    match response {
        ServiceResponse::Narration(narration) => render_narration(narration, voice, ctx),
        ServiceResponse::Summary(summary) => render_summary(summary, ctx),
    }
}

fn render_narration(
    response: &NarrationResponse,
    voice: VoiceOption,
    ctx: &RenderContext,
) -> Vec<Fragment> {
    match response {
        NarrationResponse::Demo { narrative } => vec![
            Fragment::DemoBanner {
                message: DEMO_BANNER.to_string(),
            },
            Fragment::Narrative {
                text: narrative.clone(),
            },
        ],
        NarrationResponse::Complete {
            mp3_url,
            video_url,
            notes,
            voice_options,
            ..
        } => {
            let mut fragments = Vec::new();
            if let Some(mp3) = non_empty(mp3_url) {
                fragments.push(Fragment::Audio {
                    src: resolve_media(&ctx.base_url, mp3, None),
                });
            }
            if let Some(video) = non_empty(video_url) {
                let src = resolve_media(&ctx.base_url, video, None);
                if denotes_markup_document(&src) {
                    fragments.push(Fragment::EmbeddedDocument { src });
                } else {
                    fragments.push(Fragment::Video { src });
                }
            }
            if let Some(notes) = non_empty(notes) {
                fragments.push(notes_fragment(notes));
            }
            if let Some(options) = voice_options {
                fragments.push(Fragment::VoiceInfo {
                    selected: voice,
                    options: options.clone(),
                });
            }
            fragments
        }
    }
}

fn render_summary(response: &ProcessResponse, ctx: &RenderContext) -> Vec<Fragment> {
    let mut fragments = Vec::with_capacity(2);
    match non_empty(&response.video_url) {
        Some(video) => fragments.push(Fragment::Video {
            src: resolve_media(&ctx.base_url, video, ctx.cache_buster.as_deref()),
        }),
        None => fragments.push(Fragment::Notice {
            message: VIDEO_UNAVAILABLE.to_string(),
        }),
    }
    fragments.push(notes_fragment(&response.script));
    fragments
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn notes_fragment(notes: &str) -> Fragment {
    Fragment::Notes {
        html: notes_to_html(notes),
        copy_text: notes.to_string(),
    }
}

/// Escapes markup and turns line breaks into `<br>`.
pub fn notes_to_html(notes: &str) -> String {
    let mut html = String::with_capacity(notes.len() + 16);
    let mut chars = notes.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' => html.push_str("&amp;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '"' => html.push_str("&quot;"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                html.push_str("<br>");
            }
            '\n' => html.push_str("<br>"),
            other => html.push(other),
        }
    }
    html
}

/// Resolves a server-relative path; absolute URLs pass through unchanged.
pub fn resolve_media(base: &Url, path: &str, cache_buster: Option<&str>) -> String {
    match base.join(path) {
        Ok(mut url) => {
            if let Some(stamp) = cache_buster {
                url.query_pairs_mut().append_pair("t", stamp);
            }
            url.to_string()
        }
        Err(_) => path.to_string(),
    }
}

fn denotes_markup_document(src: &str) -> bool {
    let path = match Url::parse(src) {
        Ok(url) => url.path().to_ascii_lowercase(),
        Err(_) => src
            .split(['?', '#'])
            .next()
            .unwrap_or(src)
            .to_ascii_lowercase(),
    };
    path.ends_with(".html") || path.ends_with(".htm")
}
