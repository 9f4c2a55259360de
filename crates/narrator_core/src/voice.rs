use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Narration voice offered by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceOption {
    #[default]
    Professional,
    Friendly,
    Energetic,
    Sophisticated,
    GooglePremium,
}

impl VoiceOption {
    pub const ALL: [VoiceOption; 5] = [
        VoiceOption::Professional,
        VoiceOption::Friendly,
        VoiceOption::Energetic,
        VoiceOption::Sophisticated,
        VoiceOption::GooglePremium,
    ];

    /// Wire tag sent as `voice_type`.
    pub fn tag(self) -> &'static str {
        match self {
            VoiceOption::Professional => "professional",
            VoiceOption::Friendly => "friendly",
            VoiceOption::Energetic => "energetic",
            VoiceOption::Sophisticated => "sophisticated",
            VoiceOption::GooglePremium => "google_premium",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VoiceOption::Professional => "Professional Narrator",
            VoiceOption::Friendly => "Friendly Storyteller",
            VoiceOption::Energetic => "Energetic Presenter",
            VoiceOption::Sophisticated => "Sophisticated Voice",
            VoiceOption::GooglePremium => "Google Premium Voice",
        }
    }
}

impl fmt::Display for VoiceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown voice option {0:?}")]
pub struct UnknownVoice(pub String);

impl FromStr for VoiceOption {
    type Err = UnknownVoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        VoiceOption::ALL
            .into_iter()
            .find(|voice| voice.tag().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownVoice(s.to_string()))
    }
}
