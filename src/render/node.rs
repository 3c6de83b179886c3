//! Element classification for rendering

/// Rendering role of an element, decided by its tag name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `h1` through `h6`; the level is 1-based
    Heading(u8),
    Paragraph,
    Anchor,
    Image,
    InlineCode,
    Preformatted,
    ListItem,
    /// Navigation and script-like subtrees that are never rendered as text
    Boilerplate,
    Other,
}

impl NodeKind {
    /// Classifies a lowercase tag name
    pub fn classify(tag: &str) -> Self {
        match tag {
            "h1" => Self::Heading(1),
            "h2" => Self::Heading(2),
            "h3" => Self::Heading(3),
            "h4" => Self::Heading(4),
            "h5" => Self::Heading(5),
            "h6" => Self::Heading(6),
            "p" => Self::Paragraph,
            "a" => Self::Anchor,
            "img" => Self::Image,
            "code" => Self::InlineCode,
            "pre" => Self::Preformatted,
            "li" => Self::ListItem,
            "script" | "style" | "nav" | "footer" | "header" | "noscript" | "template" => {
                Self::Boilerplate
            }
            _ => Self::Other,
        }
    }

    /// Returns true for elements whose text is emitted as a whole block
    ///
    /// Anchors inside these are not emitted again as separate links.
    pub fn is_text_container(self) -> bool {
        matches!(self, Self::Heading(_) | Self::Paragraph)
    }
}

/// Kind of list a list item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    /// Returns the list kind for `ul`/`ol`, None for any other tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ul" => Some(Self::Unordered),
            "ol" => Some(Self::Ordered),
            _ => None,
        }
    }

    /// Line prefix for items of this list
    pub fn marker(self) -> &'static str {
        match self {
            Self::Unordered => "- ",
            Self::Ordered => "1. ",
        }
    }
}
