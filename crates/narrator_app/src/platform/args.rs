use clap::Parser;
use narrator_core::{Flow, VoiceOption};

use super::logging::LogDestination;

/// Panel controls as set up before the run button is pressed.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "narrator_app")]
#[command(about = "Narrate or summarize a web page through the local narration service")]
#[command(version)]
pub struct Options {
    /// Page playing the active tab; omit to reproduce a host without one
    pub tab_url: Option<String>,

    /// Title the host reports for the tab
    #[arg(long)]
    pub tab_title: Option<String>,

    /// Generate a summary video instead of a narration
    #[arg(long)]
    pub summary: bool,

    /// Narration voice
    #[arg(long, default_value_t = VoiceOption::default(), value_parser = str::parse::<VoiceOption>)]
    pub voice: VoiceOption,

    /// Ask the service for voice isolation
    #[arg(long)]
    pub isolation: bool,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the voice options and exit
    #[arg(long)]
    pub list_voices: bool,
}

impl Options {
    pub fn flow(&self) -> Flow {
        if self.summary {
            Flow::Summary
        } else {
            Flow::Narration
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Options, clap::Error> {
        Options::try_parse_from(std::iter::once("narrator_app").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_valid() {
        Options::command().debug_assert();
    }

    #[test]
    fn defaults_to_narration_with_professional_voice() {
        let options = parse(&["https://example.com"]).unwrap();
        assert_eq!(options.tab_url.as_deref(), Some("https://example.com"));
        assert_eq!(options.flow(), Flow::Narration);
        assert_eq!(options.voice, VoiceOption::Professional);
        assert_eq!(options.log, LogDestination::Terminal);
        assert!(!options.isolation);
    }

    #[test]
    fn flags_configure_the_panel() {
        let options = parse(&[
            "--summary",
            "--voice",
            "google_premium",
            "--isolation",
            "--log",
            "file",
            "--tab-title",
            "Example",
            "https://example.com",
        ])
        .unwrap();
        assert_eq!(options.flow(), Flow::Summary);
        assert_eq!(options.voice, VoiceOption::GooglePremium);
        assert_eq!(options.log, LogDestination::File);
        assert_eq!(options.tab_title.as_deref(), Some("Example"));
        assert!(options.isolation);
    }

    #[test]
    fn missing_url_is_allowed() {
        assert_eq!(parse(&[]).unwrap().tab_url, None);
    }

    #[test]
    fn unknown_voice_is_an_error() {
        assert!(parse(&["--voice", "robot"]).is_err());
    }

    #[test]
    fn second_url_is_rejected() {
        assert!(parse(&["https://a.example", "https://b.example"]).is_err());
    }
}
