use std::collections::HashSet;
use std::sync::Arc;

use ego_tree::{NodeId, NodeRef};
use narrator_core::{ExtractionResult, MAX_TEXT_CHARS};
use narrator_logging::{narrator_debug, narrator_warn};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::ExtractionFault;

/// Produces the `captured_at` timestamp.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

pub fn utc_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().to_rfc3339())
}

/// Containers probed, in order, when the page has neither `article` nor `main`.
pub const CONTENT_SELECTORS: [&str; 7] = [
    ".content",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".story-content",
    "#content",
    "#main-content",
];

const BOILERPLATE: &str = "script, style, noscript, template, nav, header, footer, aside";
const TEXT_BLOCKS: &str = "h1, h2, h3, h4, h5, h6, p, li, blockquote";
const NON_TEXT: [&str; 4] = ["script", "style", "noscript", "template"];
const BLOCK_ELEMENTS: [&str; 22] = [
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "footer", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "li", "main", "p", "section", "tr",
];

/// The document the extraction procedure runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

pub trait Extractor: Send + Sync {
    /// Never fails; internal faults end up in `ExtractionResult::error`.
    fn extract(&self, page: &PageSnapshot) -> ExtractionResult;
}

/// Layered fallback: `article`, then `main`, then the first known content
/// container, then the whole body.
pub struct LayeredExtractor {
    content_selectors: Vec<String>,
    max_chars: usize,
    clock: Clock,
}

impl Default for LayeredExtractor {
    fn default() -> Self {
        Self::new(utc_clock())
    }
}

impl LayeredExtractor {
    pub fn new(clock: Clock) -> Self {
        Self {
            content_selectors: CONTENT_SELECTORS.iter().map(|s| s.to_string()).collect(),
            max_chars: MAX_TEXT_CHARS,
            clock,
        }
    }

    pub fn with_content_selectors(mut self, selectors: Vec<String>) -> Self {
        self.content_selectors = selectors;
        self
    }

    fn select_text(&self, doc: &Html) -> Result<String, ExtractionFault> {
        let mut chain = vec!["article".to_string(), "main".to_string()];
        chain.extend(self.content_selectors.iter().cloned());

        for css in &chain {
            let sel = compile(css)?;
            if let Some(node) = doc.select(&sel).next() {
                narrator_debug!("layered extraction matched {css}");
                return Ok(visible_text(*node));
            }
        }

        let body = compile("body")?;
        narrator_debug!("layered extraction fell back to body");
        Ok(doc
            .select(&body)
            .next()
            .map(|node| visible_text(*node))
            .unwrap_or_else(|| visible_text(*doc.root_element())))
    }
}

impl Extractor for LayeredExtractor {
    fn extract(&self, page: &PageSnapshot) -> ExtractionResult {
        let doc = Html::parse_document(&page.html);
        let captured_at = (self.clock)();
        let outcome = read_metadata(&doc).and_then(|meta| {
            self.select_text(&doc).map(|raw| (meta, raw))
        });
        match outcome {
            Ok((meta, raw)) => meta.into_result(
                truncate_chars(&normalize_whitespace(&raw), self.max_chars),
                page,
                captured_at,
            ),
            Err(fault) => fault_result(&doc, page, captured_at, fault),
        }
    }
}

/// Boilerplate removal plus a filtered scan of headings and text blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrictPolicy {
    /// A fragment is kept only if it is longer than this many characters.
    pub min_fragment_chars: usize,
    pub max_fragments: Option<usize>,
    pub max_chars: usize,
}

impl Default for StrictPolicy {
    fn default() -> Self {
        Self {
            min_fragment_chars: 30,
            max_fragments: None,
            max_chars: MAX_TEXT_CHARS,
        }
    }
}

pub struct StrictExtractor {
    policy: StrictPolicy,
    clock: Clock,
}

impl Default for StrictExtractor {
    fn default() -> Self {
        Self::new(StrictPolicy::default(), utc_clock())
    }
}

impl StrictExtractor {
    pub fn new(policy: StrictPolicy, clock: Clock) -> Self {
        Self { policy, clock }
    }

    fn collect_fragments(&self, doc: &mut Html) -> Result<String, ExtractionFault> {
        let boilerplate = compile(BOILERPLATE)?;
        let ids: Vec<_> = doc.select(&boilerplate).map(|el| el.id()).collect();
        for id in ids {
            if let Some(mut node) = doc.tree.get_mut(id) {
                node.detach();
            }
        }

        let blocks = compile(TEXT_BLOCKS)?;
        let matched: Vec<ElementRef<'_>> = doc.select(&blocks).collect();
        let matched_ids: HashSet<NodeId> = matched.iter().map(|el| el.id()).collect();
        let limit = self.policy.max_fragments.unwrap_or(usize::MAX);
        // Outermost blocks only: a `p` inside an `li` is already part of the item's text.
        let fragments: Vec<String> = matched
            .iter()
            .filter(|el| !el.ancestors().any(|up| matched_ids.contains(&up.id())))
            .map(|el| normalize_whitespace(&visible_text(**el)))
            .filter(|text| text.chars().count() > self.policy.min_fragment_chars)
            .take(limit)
            .collect();
        narrator_debug!("strict extraction kept {} fragments", fragments.len());
        Ok(fragments.join("\n"))
    }
}

impl Extractor for StrictExtractor {
    fn extract(&self, page: &PageSnapshot) -> ExtractionResult {
        let mut doc = Html::parse_document(&page.html);
        let captured_at = (self.clock)();
        let meta = match read_metadata(&doc) {
            Ok(meta) => meta,
            Err(fault) => return fault_result(&doc, page, captured_at, fault),
        };
        match self.collect_fragments(&mut doc) {
            Ok(joined) => meta.into_result(
                truncate_chars(&joined, self.policy.max_chars),
                page,
                captured_at,
            ),
            Err(fault) => fault_result(&doc, page, captured_at, fault),
        }
    }
}

struct PageMetadata {
    title: String,
    description: String,
    keywords: String,
}

impl PageMetadata {
    fn into_result(self, text: String, page: &PageSnapshot, captured_at: String) -> ExtractionResult {
        ExtractionResult {
            text,
            title: self.title,
            description: self.description,
            keywords: self.keywords,
            source_url: page.url.clone(),
            captured_at,
            error: None,
        }
    }
}

fn read_metadata(doc: &Html) -> Result<PageMetadata, ExtractionFault> {
    let description = compile(r#"meta[name="description"]"#)?;
    let keywords = compile(r#"meta[name="keywords"]"#)?;
    Ok(PageMetadata {
        title: best_effort_title(doc),
        description: meta_content(doc, &description),
        keywords: meta_content(doc, &keywords),
    })
}

/// Metadata read without propagating selector faults; used once the
/// extraction procedure has already failed.
fn best_effort_metadata(doc: &Html) -> PageMetadata {
    let named = |name: &str| {
        Selector::parse(&format!(r#"meta[name="{name}"]"#))
            .map(|sel| meta_content(doc, &sel))
            .unwrap_or_default()
    };
    PageMetadata {
        title: best_effort_title(doc),
        description: named("description"),
        keywords: named("keywords"),
    }
}

fn meta_content(doc: &Html, sel: &Selector) -> String {
    doc.select(sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

fn best_effort_title(doc: &Html) -> String {
    Selector::parse("title")
        .ok()
        .and_then(|sel| doc.select(&sel).next().map(|t| t.text().collect::<String>()))
        .map(|t| normalize_whitespace(&t))
        .unwrap_or_default()
}

fn fault_result(
    doc: &Html,
    page: &PageSnapshot,
    captured_at: String,
    fault: ExtractionFault,
) -> ExtractionResult {
    narrator_warn!("extraction fault on {}: {}", page.url, fault);
    let mut result = best_effort_metadata(doc).into_result(String::new(), page, captured_at);
    result.error = Some(fault.to_string());
    result
}

fn compile(css: &str) -> Result<Selector, ExtractionFault> {
    Selector::parse(css).map_err(|err| ExtractionFault::Selector {
        selector: css.to_string(),
        message: err.to_string(),
    })
}

/// Text of an element as a reader would see it: script-like subtrees are
/// skipped and block boundaries become line breaks.
fn visible_text(node: NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    push_visible_text(node, &mut out);
    out
}

fn push_visible_text(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if NON_TEXT.contains(&name) {
                    continue;
                }
                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.push('\n');
                }
                push_visible_text(child, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Collapses horizontal whitespace runs to one space and line-break runs
/// (with any whitespace around them) to one `\n`, then trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    enum Pending {
        None,
        Space,
        Newline,
    }

    let mut out = String::with_capacity(text.len());
    let mut pending = Pending::None;
    for c in text.chars() {
        if c == '\n' || c == '\r' {
            pending = Pending::Newline;
        } else if c.is_whitespace() {
            if matches!(pending, Pending::None) {
                pending = Pending::Space;
            }
        } else {
            if !out.is_empty() {
                match pending {
                    Pending::Newline => out.push('\n'),
                    Pending::Space => out.push(' '),
                    Pending::None => {}
                }
            }
            pending = Pending::None;
            out.push(c);
        }
    }
    out
}

/// Keeps at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].trim_end().to_string(),
        None => text.to_string(),
    }
}
