use crate::portable_text::{BlockStyle, HeadingLevel, ListKind};

/// The root of an editable rich-text document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorDocument {
    pub children: Vec<EditorNode>,
}

impl EditorDocument {
    pub fn new(children: Vec<EditorNode>) -> Self {
        Self { children }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Text content of the document, one line per top-level block or list item.
    pub fn text_content(&self) -> String {
        let mut lines = Vec::new();
        for node in &self.children {
            node.collect_lines(&mut lines);
        }
        lines.join("\n")
    }
}

/// Top-level nodes of the editor tree.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorNode {
    Paragraph(Vec<InlineNode>),
    Heading(HeadingLevel, Vec<InlineNode>),
    Quote(Vec<InlineNode>),
    List(ListNode),
    Code(CodeNode),
    Image(ImageNode),
    /// A node type the host editor knows but this crate does not.
    Unknown(String),
}

impl EditorNode {
    pub fn paragraph(children: Vec<InlineNode>) -> Self {
        EditorNode::Paragraph(children)
    }

    fn collect_lines(&self, lines: &mut Vec<String>) {
        match self {
            EditorNode::Paragraph(children)
            | EditorNode::Heading(_, children)
            | EditorNode::Quote(children) => lines.push(inline_text(children)),
            EditorNode::List(list) => list.collect_lines(lines),
            EditorNode::Code(code) => lines.push(code.code.clone()),
            EditorNode::Image(_) | EditorNode::Unknown(_) => {}
        }
    }
}

/// Inline content of paragraph-like containers.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    Text(TextNode),
    Link(LinkNode),
    Image(ImageNode),
    Unknown(String),
}

impl InlineNode {
    pub fn text(text: impl Into<String>) -> Self {
        InlineNode::Text(TextNode::new(text, TextFormat::empty()))
    }

    pub fn formatted(text: impl Into<String>, format: TextFormat) -> Self {
        InlineNode::Text(TextNode::new(text, format))
    }

    pub fn link(url: impl Into<String>, children: Vec<InlineNode>) -> Self {
        InlineNode::Link(LinkNode {
            url: url.into(),
            children,
        })
    }

    /// Whether this node or any descendant carries text.
    pub fn has_text(&self) -> bool {
        match self {
            InlineNode::Text(_) => true,
            InlineNode::Link(link) => link.children.iter().any(InlineNode::has_text),
            InlineNode::Image(_) | InlineNode::Unknown(_) => false,
        }
    }
}

fn inline_text(children: &[InlineNode]) -> String {
    let mut out = String::new();
    for child in children {
        match child {
            InlineNode::Text(text) => out.push_str(&text.text),
            InlineNode::Link(link) => out.push_str(&inline_text(&link.children)),
            InlineNode::Image(_) | InlineNode::Unknown(_) => {}
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub text: String,
    pub format: TextFormat,
}

impl TextNode {
    pub fn new(text: impl Into<String>, format: TextFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }
}

bitflags::bitflags! {
    /// Format bits of a text leaf.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextFormat: u8 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const CODE = 1 << 2;
    }
}

impl Default for TextFormat {
    fn default() -> Self {
        TextFormat::empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkNode {
    pub url: String,
    pub children: Vec<InlineNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    pub src: String,
    pub alt: String,
}

impl ImageNode {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeNode {
    pub code: String,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListNode {
    pub kind: ListKind,
    pub items: Vec<ListItemNode>,
}

impl ListNode {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    fn collect_lines(&self, lines: &mut Vec<String>) {
        for item in &self.items {
            lines.push(inline_text(&item.children));
            for nested in &item.nested {
                nested.collect_lines(lines);
            }
        }
    }
}

/// A list item: its own inline content followed by any nested lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItemNode {
    /// Paragraph style of the item's own line; usually `Normal`.
    pub style: BlockStyle,
    pub children: Vec<InlineNode>,
    pub nested: Vec<ListNode>,
}

impl ListItemNode {
    pub fn new(children: Vec<InlineNode>) -> Self {
        Self {
            style: BlockStyle::Normal,
            children,
            nested: Vec::new(),
        }
    }

    pub fn with_style(mut self, style: BlockStyle) -> Self {
        self.style = style;
        self
    }
}
