use serde::{Deserialize, Serialize};

use crate::VoiceOption;

/// Maximum number of characters kept in [`ExtractionResult::text`].
pub const MAX_TEXT_CHARS: usize = 5_000;

/// Text and metadata read from a page.
///
/// On the fault path `error` is set and `text` is empty, while `title` and
/// `source_url` carry whatever could still be read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub text: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub source_url: String,
    pub captured_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// The page the run is started against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTab {
    pub url: String,
    pub title: Option<String>,
}

impl ActiveTab {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
        }
    }

    /// Title the host reports for the tab; used when the page itself has none.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Which conversation a run performs with the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// `POST /generate_narration`; tolerant of empty extraction output.
    #[default]
    Narration,
    /// `POST /process`; refuses to send an empty extraction.
    Summary,
}

/// How much of the page the extraction keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// article -> main -> known content selectors -> body.
    Layered,
    /// Boilerplate removed, qualifying headings/paragraphs only.
    Strict,
}

impl Flow {
    pub fn extraction_mode(self) -> ExtractionMode {
        match self {
            Flow::Narration => ExtractionMode::Layered,
            Flow::Summary => ExtractionMode::Strict,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrationRequest {
    pub url: String,
    pub voice_type: VoiceOption,
    pub isolation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRequest {
    pub content: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NarrationResponse {
    Demo {
        narrative: String,
    },
    Complete {
        #[serde(default)]
        narrative: String,
        #[serde(default)]
        mp3_url: Option<String>,
        #[serde(default)]
        video_url: Option<String>,
        #[serde(default)]
        notes: Option<String>,
        #[serde(default)]
        voice_type: String,
        #[serde(default)]
        voice_options: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessResponse {
    #[serde(default)]
    pub video_url: Option<String>,
    pub script: String,
}

/// A finished reply from the service, whichever flow produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceResponse {
    Narration(NarrationResponse),
    Summary(ProcessResponse),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("failed to reach server: {0}")]
    Network(String),
    #[error("server error ({status} {status_text}): {body}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },
    #[error("invalid response body: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::{NarrationRequest, NarrationResponse};
    use crate::VoiceOption;
    use pretty_assertions::assert_eq;

    #[test]
    fn complete_response_tolerates_missing_media() {
        let json = r#"{"status":"complete","narrative":"n","notes":"a\nb","voice_type":"friendly"}"#;
        let response: NarrationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response,
            NarrationResponse::Complete {
                narrative: "n".into(),
                mp3_url: None,
                video_url: None,
                notes: Some("a\nb".into()),
                voice_type: "friendly".into(),
                voice_options: None,
            }
        );
    }

    #[test]
    fn demo_response_is_recognised_by_status() {
        let json = r#"{"status":"demo","narrative":"just a demo"}"#;
        let response: NarrationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response,
            NarrationResponse::Demo {
                narrative: "just a demo".into()
            }
        );
    }

    #[test]
    fn unknown_status_does_not_decode() {
        let json = r#"{"status":"pending","narrative":"x"}"#;
        assert!(serde_json::from_str::<NarrationResponse>(json).is_err());
    }

    #[test]
    fn narration_request_uses_wire_names() {
        let request = NarrationRequest {
            url: "https://example.com".into(),
            voice_type: VoiceOption::GooglePremium,
            isolation: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "url": "https://example.com",
                "voice_type": "google_premium",
                "isolation": true
            })
        );
    }
}
