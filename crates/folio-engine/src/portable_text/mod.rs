//! # Portable Text
//!
//! Typed model of the Portable Text JSON schema as persisted by the CMS.
//!
//! ## Shape
//!
//! A value is a JSON array of blocks, each tagged by `_type`:
//!
//! - **`block`**: a [`TextBlock`] of [`Span`]s with block-scoped [`MarkDef`]s
//! - **`image`**: an [`ImageBlock`] with `alt` and `asset.url`
//! - **`code`**: a [`CodeBlock`] with optional `language`
//! - **`footnote`**: a [`FootnoteBlock`] holding the definition's text blocks
//!
//! Anything else is kept as [`Block::Unknown`] when parsed leniently, so that
//! newer content never breaks older readers.
//!
//! ## Marks
//!
//! A span's `marks` entry is either a decorator (`strong`, `em`, `code`) or the
//! `_key` of a mark definition declared in the *same* block. Marks never cross
//! block boundaries.

mod parse;

pub use parse::{DecodeError, DecodeWarning};

use serde::{Deserialize, Serialize};

/// Decorator mark for bold text.
pub const STRONG: &str = "strong";
/// Decorator mark for italic text.
pub const EM: &str = "em";
/// Decorator mark for inline code.
pub const CODE: &str = "code";

/// An ordered sequence of blocks; one document snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortableText {
    pub blocks: Vec<Block>,
}

impl PortableText {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// The normalized form of an empty document: one normal block holding one
    /// empty span.
    pub fn empty_document(block_key: String, span_key: String) -> Self {
        Self::new(vec![Block::Text(TextBlock::empty(
            block_key,
            span_key,
            BlockStyle::Normal,
        ))])
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a PortableText {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// A single Portable Text block, discriminated by `_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Block {
    #[serde(rename = "block")]
    Text(TextBlock),
    #[serde(rename = "image")]
    Image(ImageBlock),
    #[serde(rename = "code")]
    Code(CodeBlock),
    #[serde(rename = "footnote")]
    Footnote(FootnoteBlock),
    /// A block type this crate does not understand.
    #[serde(other, skip_serializing)]
    Unknown,
}

impl Block {
    /// The `_type` tag this block serializes with.
    pub fn type_name(&self) -> &'static str {
        match self {
            Block::Text(_) => "block",
            Block::Image(_) => "image",
            Block::Code(_) => "code",
            Block::Footnote(_) => "footnote",
            Block::Unknown => "unknown",
        }
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Block::Text(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageBlock> {
        match self {
            Block::Image(block) => Some(block),
            _ => None,
        }
    }
}

/// Paragraph-level text style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockStyle {
    #[default]
    Normal,
    Heading(HeadingLevel),
    Blockquote,
}

impl From<String> for BlockStyle {
    fn from(value: String) -> Self {
        match value.as_str() {
            "blockquote" => BlockStyle::Blockquote,
            other => other
                .strip_prefix('h')
                .and_then(|n| n.parse::<u8>().ok())
                .and_then(HeadingLevel::new)
                .map(BlockStyle::Heading)
                .unwrap_or(BlockStyle::Normal),
        }
    }
}

impl From<BlockStyle> for String {
    fn from(style: BlockStyle) -> Self {
        match style {
            BlockStyle::Normal => "normal".to_string(),
            BlockStyle::Heading(level) => format!("h{}", level.get()),
            BlockStyle::Blockquote => "blockquote".to_string(),
        }
    }
}

/// Heading depth, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub fn new(level: u8) -> Option<Self> {
        (1..=6).contains(&level).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// List flavour carried by `listItem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub style: BlockStyle,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(default)]
    pub mark_defs: Vec<MarkDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<ListKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

impl TextBlock {
    pub fn new(key: String, style: BlockStyle) -> Self {
        Self {
            key,
            style,
            children: Vec::new(),
            mark_defs: Vec::new(),
            list_item: None,
            level: None,
        }
    }

    /// A block with a single empty span, used wherever a block must not be empty.
    pub fn empty(key: String, span_key: String, style: BlockStyle) -> Self {
        let mut block = Self::new(key, style);
        block.children.push(Span::new(span_key, String::new(), Vec::new()));
        block
    }

    /// Concatenated text of all spans.
    pub fn plain_text(&self) -> String {
        self.children.iter().map(|span| span.text.as_str()).collect()
    }

    pub fn mark_def(&self, key: &str) -> Option<&MarkDef> {
        self.mark_defs.iter().find(|def| def.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "span")]
pub struct Span {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

impl Span {
    pub fn new(key: String, text: String, marks: Vec<String>) -> Self {
        Self { key, text, marks }
    }

    pub fn has_mark(&self, mark: &str) -> bool {
        self.marks.iter().any(|m| m == mark)
    }
}

/// Block-scoped metadata for marks that are not plain decorators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum MarkDef {
    #[serde(rename = "link")]
    Link {
        #[serde(rename = "_key")]
        key: String,
        #[serde(default)]
        href: String,
    },
    #[serde(rename = "footnoteReference")]
    FootnoteReference {
        #[serde(rename = "_key")]
        key: String,
        identifier: String,
    },
}

impl MarkDef {
    pub fn key(&self) -> &str {
        match self {
            MarkDef::Link { key, .. } | MarkDef::FootnoteReference { key, .. } => key,
        }
    }

    /// The link target, if this is a link with a non-empty `href`.
    pub fn link_href(&self) -> Option<&str> {
        match self {
            MarkDef::Link { href, .. } if !href.is_empty() => Some(href),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    pub asset: ImageAsset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootnoteBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    pub identifier: String,
    #[serde(default, serialize_with = "serialize_nested_blocks")]
    pub children: Vec<TextBlock>,
}

/// Nested text blocks carry their own `_type` tag, like top-level ones.
fn serialize_nested_blocks<S: serde::Serializer>(
    children: &[TextBlock],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(children.iter().cloned().map(Block::Text))
}
