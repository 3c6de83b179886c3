//! Linearized Markdown rendering
//!
//! Walks the main content of a page depth-first with an explicit stack and
//! emits one token per recognized element. Tokens are concatenated without
//! separators; each token carries its own line breaks.

use crate::crawler::parser::{extract_title, image_source};
use crate::render::node::{ListKind, NodeKind};
use crate::render::AssetMap;
use crate::url::resolve;
use chrono::{DateTime, Local};
use scraper::{ElementRef, Html, Node, Selector};
use std::fmt;
use url::Url;

/// Title used when a page has no `<title>`
pub const DEFAULT_TITLE: &str = "Web Page";

/// One emitted piece of the text document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Heading { level: u8, text: String },
    Paragraph(String),
    Link { text: String, href: String },
    Image { alt: String, src: String },
    InlineCode(String),
    CodeBlock(String),
    ListItem { list: ListKind, text: String },
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heading { level, text } => {
                write!(f, "\n{} {}\n", "#".repeat(usize::from(*level)), text)
            }
            Self::Paragraph(text) => write!(f, "\n{}\n", text),
            Self::Link { text, href } => write!(f, "[{}]({})", text, href),
            Self::Image { alt, src } => write!(f, "\n![{}]({})\n", alt, src),
            Self::InlineCode(text) => write!(f, "`{}`", text),
            Self::CodeBlock(text) => write!(f, "\n```\n{}\n```\n", text),
            Self::ListItem { list, text } => write!(f, "{}{}\n", list.marker(), text),
        }
    }
}

/// Traversal context for one pending element
#[derive(Clone, Copy)]
struct Frame<'a> {
    element: ElementRef<'a>,
    /// Inside a heading or paragraph
    in_text_container: bool,
    in_preformatted: bool,
    /// Kind of the direct parent when it is a list
    parent_list: Option<ListKind>,
}

/// Renders a complete Markdown document: metadata header followed by the body
pub fn render_markdown(
    document: &Html,
    page_url: &Url,
    base_url: &Url,
    assets: &AssetMap,
    retrieved_at: DateTime<Local>,
) -> String {
    let title = extract_title(document);
    let mut output = markdown_header(title.as_deref(), page_url, retrieved_at);
    for token in tokenize(document, base_url, assets) {
        output.push_str(&token.to_string());
    }
    output
}

/// Formats the metadata header placed above the rendered body
pub fn markdown_header(title: Option<&str>, page_url: &Url, retrieved_at: DateTime<Local>) -> String {
    format!(
        "# {}\n\nSource: {}\nScraped: {}\n\n---\n\n",
        title.unwrap_or(DEFAULT_TITLE),
        page_url,
        retrieved_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Produces the body tokens of a document in document order
///
/// Images found in `assets` point at their local copy; any other image
/// points at its absolute remote URL.
pub fn tokenize(document: &Html, base_url: &Url, assets: &AssetMap) -> Vec<Token> {
    let root = content_root(document);
    let mut tokens = Vec::new();

    let mut stack = Vec::new();
    push_children(
        &mut stack,
        Frame {
            element: root,
            in_text_container: false,
            in_preformatted: false,
            parent_list: None,
        },
        NodeKind::classify(root.value().name()),
    );

    while let Some(frame) = stack.pop() {
        let kind = NodeKind::classify(frame.element.value().name());
        if kind == NodeKind::Boilerplate {
            continue;
        }

        if let Some(token) = token_for(kind, &frame, base_url, assets) {
            tokens.push(token);
        }

        push_children(&mut stack, frame, kind);
    }

    tokens
}

/// Picks the subtree holding the page's main content
fn content_root(document: &Html) -> ElementRef<'_> {
    ["main", "article", "body"]
        .iter()
        .filter_map(|tag| Selector::parse(tag).ok())
        .find_map(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element())
}

/// Pushes element children in reverse so they pop in document order
fn push_children<'a>(stack: &mut Vec<Frame<'a>>, parent: Frame<'a>, kind: NodeKind) {
    let children: Vec<ElementRef<'a>> = parent
        .element
        .children()
        .filter_map(ElementRef::wrap)
        .collect();

    let parent_list = ListKind::from_tag(parent.element.value().name());
    for element in children.into_iter().rev() {
        stack.push(Frame {
            element,
            in_text_container: parent.in_text_container || kind.is_text_container(),
            in_preformatted: parent.in_preformatted || kind == NodeKind::Preformatted,
            parent_list,
        });
    }
}

fn token_for(kind: NodeKind, frame: &Frame<'_>, base_url: &Url, assets: &AssetMap) -> Option<Token> {
    let element = frame.element;

    match kind {
        NodeKind::Heading(level) => Some(Token::Heading {
            level,
            text: visible_text(element).trim().to_string(),
        }),
        NodeKind::Paragraph => {
            let text = visible_text(element).trim().to_string();
            (!text.is_empty()).then_some(Token::Paragraph(text))
        }
        NodeKind::Anchor => {
            if frame.in_text_container {
                return None;
            }
            let text = visible_text(element).trim().to_string();
            let href = element.value().attr("href").unwrap_or("").trim();
            (!text.is_empty() && !href.is_empty()).then(|| Token::Link {
                text,
                href: href.to_string(),
            })
        }
        NodeKind::Image => {
            let source = image_source(element.value())?;
            let alt = element.value().attr("alt").unwrap_or("image").to_string();
            Some(Token::Image {
                alt,
                src: image_target(source, base_url, assets),
            })
        }
        NodeKind::InlineCode => {
            if frame.in_preformatted {
                return None;
            }
            let text = visible_text(element);
            (!text.is_empty()).then_some(Token::InlineCode(text))
        }
        NodeKind::Preformatted => Some(Token::CodeBlock(visible_text(element).trim().to_string())),
        NodeKind::ListItem => {
            let list = frame.parent_list?;
            let text = visible_text(element)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            (!text.is_empty()).then_some(Token::ListItem { list, text })
        }
        NodeKind::Boilerplate | NodeKind::Other => None,
    }
}

/// Local path for a localized image, otherwise the absolute remote URL
fn image_target(source: &str, base_url: &Url, assets: &AssetMap) -> String {
    match resolve(base_url, source) {
        Ok(absolute) => assets
            .get(absolute.as_str())
            .cloned()
            .unwrap_or_else(|| absolute.to_string()),
        Err(_) => source.to_string(),
    }
}

/// Concatenated text of an element, leaving out boilerplate subtrees
fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    let mut stack = vec![*element];

    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(chunk) => text.push_str(chunk),
            Node::Element(el) if NodeKind::classify(el.name()) == NodeKind::Boilerplate => {}
            _ => {
                let children: Vec<_> = node.children().collect();
                stack.extend(children.into_iter().rev());
            }
        }
    }

    text
}
