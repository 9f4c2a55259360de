use std::sync::Arc;

use narrator_core::{ExtractionMode, MAX_TEXT_CHARS};
use narrator_engine::{
    normalize_whitespace, Clock, Extractor, Extractors, LayeredExtractor, PageAccessor,
    PageError, PageSnapshot, SnapshotPageAccessor, StrictExtractor, StrictPolicy,
};
use pretty_assertions::assert_eq;

const URL: &str = "https://example.com/article";
const STAMP: &str = "2024-05-01T12:00:00+00:00";

fn fixed_clock() -> Clock {
    Arc::new(|| STAMP.to_string())
}

fn layered(html: &str) -> narrator_core::ExtractionResult {
    LayeredExtractor::new(fixed_clock()).extract(&PageSnapshot::new(URL, html))
}

fn strict(html: &str, policy: StrictPolicy) -> narrator_core::ExtractionResult {
    StrictExtractor::new(policy, fixed_clock()).extract(&PageSnapshot::new(URL, html))
}

#[test]
fn article_wins_over_other_containers() {
    let html = r#"
    <html><head><title> Story  Title </title>
      <meta name="description" content="A short story">
      <meta name="keywords" content="fiction, test">
    </head>
    <body>
      <main><p>Main text should lose</p></main>
      <div class="content">Content div should lose</div>
      <article>
        <h1>Heading</h1>
        <p>First   paragraph
           continues here.</p>


        <p>Second paragraph.</p>
      </article>
    </body></html>
    "#;
    let result = layered(html);

    assert_eq!(
        result.text,
        "Heading\nFirst paragraph\ncontinues here.\nSecond paragraph."
    );
    assert_eq!(result.title, "Story Title");
    assert_eq!(result.description, "A short story");
    assert_eq!(result.keywords, "fiction, test");
    assert_eq!(result.source_url, URL);
    assert_eq!(result.captured_at, STAMP);
    assert!(result.error.is_none());
}

#[test]
fn main_is_used_without_article() {
    let html = r#"<body><nav>Menu</nav><main><p>Main body</p></main></body>"#;
    assert_eq!(layered(html).text, "Main body");
}

#[test]
fn known_selectors_are_probed_in_order() {
    let html = r#"
    <body>
      <div id="content">Id content</div>
      <div class="entry-content">Entry content</div>
    </body>"#;
    assert_eq!(layered(html).text, "Entry content");
}

#[test]
fn body_is_the_last_resort() {
    let html = r#"<html><head><title>T</title></head>
      <body><div>Plain   body</div><script>var x = 1;</script><span>text</span></body></html>"#;
    let result = layered(html);
    assert_eq!(result.text, "Plain body\ntext");
}

#[test]
fn missing_metadata_is_empty() {
    let result = layered("<body><p>x</p></body>");
    assert_eq!(result.title, "");
    assert_eq!(result.description, "");
    assert_eq!(result.keywords, "");
}

#[test]
fn layered_output_is_capped_and_clean() {
    let paragraph = "word   ".repeat(400);
    let html = format!(
        "<article>{}</article>",
        (0..10).map(|_| format!("<p>{paragraph}</p>\n\n")).collect::<String>()
    );
    let result = layered(&html);

    assert!(result.text.chars().count() <= MAX_TEXT_CHARS);
    assert!(!result.text.contains("  "));
    assert!(!result.text.contains("\n\n"));
    assert!(!result.text.ends_with(' '));
}

#[test]
fn bad_selector_becomes_error_result_with_metadata() {
    let extractor = LayeredExtractor::new(fixed_clock())
        .with_content_selectors(vec!["div[[broken".to_string()]);
    let html = r#"<html><head><title>Still here</title>
      <meta name="description" content=" Kept anyway ">
      <meta name="keywords" content="a, b">
    </head><body><p>text</p></body></html>"#;
    let result = extractor.extract(&PageSnapshot::new(URL, html));

    assert!(result.error.as_deref().unwrap().contains("div[[broken"));
    assert_eq!(result.title, "Still here");
    assert_eq!(result.description, "Kept anyway");
    assert_eq!(result.keywords, "a, b");
    assert_eq!(result.source_url, URL);
    assert_eq!(result.captured_at, STAMP);
    assert_eq!(result.text, "");
}

#[test]
fn strict_drops_boilerplate_and_short_fragments() {
    let html = r#"
    <html><head><title>Example</title><style>p { color: red; }</style></head>
    <body>
      <header><h1>Site header that is long enough to qualify</h1></header>
      <nav><p>Navigation paragraph that is long enough to count</p></nav>
      <h1>Example Heading that is long enough</h1>
      <p>Short one.</p>
      <p>Example paragraph text that easily clears the threshold.</p>
      <aside><p>Sidebar paragraph that is long enough to count too</p></aside>
      <footer><p>Footer paragraph that is long enough to count as well</p></footer>
    </body></html>"#;
    let result = strict(html, StrictPolicy::default());

    assert_eq!(
        result.text,
        "Example Heading that is long enough\nExample paragraph text that easily clears the threshold."
    );
    assert_eq!(result.title, "Example");
}

#[test]
fn strict_honours_fragment_limit_and_threshold() {
    let items: String = (0..30)
        .map(|i| format!("<li>List item number {i:02} with padding</li>"))
        .collect();
    let html = format!("<ul>{items}</ul>");
    let policy = StrictPolicy {
        min_fragment_chars: 20,
        max_fragments: Some(20),
        ..StrictPolicy::default()
    };
    let result = strict(&html, policy);

    let lines: Vec<&str> = result.text.lines().collect();
    assert_eq!(lines.len(), 20);
    assert_eq!(lines[0], "List item number 00 with padding");
    assert_eq!(lines[19], "List item number 19 with padding");
}

#[test]
fn strict_emits_nested_blocks_once() {
    let html = r#"<body>
      <blockquote><p>A quotation that is long enough to be kept.</p></blockquote>
      <ul><li><p>List item paragraph that is long enough too.</p></li></ul>
    </body>"#;
    let result = strict(html, StrictPolicy::default());

    assert_eq!(
        result.text,
        "A quotation that is long enough to be kept.\nList item paragraph that is long enough too."
    );
}

#[test]
fn strict_truncates_to_character_cap() {
    let paragraph = format!("<p>{}</p>", "é".repeat(200));
    let html = paragraph.repeat(50);
    let result = strict(&html, StrictPolicy::default());

    assert_eq!(result.text.chars().count(), MAX_TEXT_CHARS);
}

#[test]
fn strict_on_empty_page_yields_empty_text() {
    let result = strict("<html><body><p>tiny</p></body></html>", StrictPolicy::default());
    assert_eq!(result.text, "");
    assert!(result.error.is_none());
}

#[test]
fn normalized_article_equals_normalized_source_text() {
    let inner = "  Alpha\t beta \n\n gamma  ";
    let html = format!("<main>ignored</main><article>{inner}</article>");
    assert_eq!(layered(&html).text, normalize_whitespace(inner));
}

#[tokio::test]
async fn snapshot_accessor_runs_requested_mode() {
    let html = r#"<body><article><p>Tiny</p><p>A paragraph well over thirty characters.</p></article></body>"#;
    let accessor = SnapshotPageAccessor::new(
        PageSnapshot::new(URL, html),
        Extractors::with_clock(fixed_clock()),
    );

    let layered = accessor
        .run_extraction(URL, ExtractionMode::Layered)
        .await
        .unwrap();
    let strict = accessor
        .run_extraction(URL, ExtractionMode::Strict)
        .await
        .unwrap();

    assert_eq!(layered.text, "Tiny\nA paragraph well over thirty characters.");
    assert_eq!(strict.text, "A paragraph well over thirty characters.");
}

#[tokio::test]
async fn snapshot_accessor_refuses_other_pages() {
    let accessor = SnapshotPageAccessor::new(
        PageSnapshot::new(URL, "<p>x</p>"),
        Extractors::default(),
    );
    let err = accessor
        .run_extraction("https://other.example.com", ExtractionMode::Layered)
        .await
        .unwrap_err();
    assert!(matches!(err, PageError::NotLoaded(_)));
}
