//! # MDX Import
//!
//! One-way conversion of legacy Markdown/MDX posts into Portable Text.
//!
//! The source is walked as a `pulldown-cmark` event stream rather than an
//! editor tree, so the walking rules differ from [`crate::codec::encode`]:
//!
//! - Lists tag the first text block of each item with `listItem`/`level`
//! - Block quotes restyle the first text block inside them as `blockquote`
//! - An image-only paragraph becomes a standalone image block
//! - Raw HTML (including `<!-- comments -->`), MDX `{...}` expressions and
//!   comments, and MDX `import`/`export` lines are dropped, which is how
//!   truncate markers stay out of persisted content. Code and front matter
//!   are never touched.
//! - A list item with no text of its own tags nothing
//!
//! Keys come from a counter that restarts for every conversion.

pub mod excerpt;

use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel as MdHeadingLevel, Options, Parser, Tag, TagEnd,
};
use regex::Regex;

use crate::codec::builder::{LinkMark, TextAccumulator};
use crate::keys::{CounterKeys, KeySource};
use crate::portable_text::{
    Block, BlockStyle, CODE, CodeBlock, EM, FootnoteBlock, HeadingLevel, ImageAsset, ImageBlock,
    ListKind, PortableText, STRONG, TextBlock,
};

static MDX_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{/\*.*?\*/\}").expect("valid regex"));
/// Single-line `{...}` expression, allowing one level of nested braces.
static MDX_EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?:[^{}\n]|\{[^{}\n]*\})*\}").expect("valid regex"));
static MDX_ESM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:import|export)\s.*$").expect("valid regex"));

/// Converts MDX source into Portable Text with keys `key1`, `key2`, ...
pub fn convert_mdx_to_portable_text(source: &str) -> PortableText {
    convert_with_keys(source, &mut CounterKeys::new())
}

pub fn convert_with_keys<K: KeySource + ?Sized>(source: &str, keys: &mut K) -> PortableText {
    let options = Options::ENABLE_FOOTNOTES | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS;
    let cleaned = strip_mdx_syntax(source, options);

    let mut converter = Converter::new(keys);
    for event in Parser::new_ext(&cleaned, options) {
        converter.handle(event);
    }
    converter.finish()
}

/// Removes MDX-only constructs that CommonMark would otherwise read as text.
///
/// Code blocks, inline code and front matter are left as written.
fn strip_mdx_syntax(source: &str, options: Options) -> String {
    let literal: Vec<Range<usize>> = Parser::new_ext(source, options)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_) | Tag::MetadataBlock(_)) | Event::Code(_) => {
                Some(range)
            }
            _ => None,
        })
        .collect();

    let mut cuts: Vec<Range<usize>> = [&*MDX_COMMENT, &*MDX_ESM, &*MDX_EXPRESSION]
        .into_iter()
        .flat_map(|re| re.find_iter(source))
        .map(|m| m.range())
        .filter(|cut| !literal.iter().any(|range| range.contains(&cut.start)))
        .collect();
    cuts.sort_by_key(|cut| cut.start);

    let mut out = String::with_capacity(source.len());
    let mut pos = 0;
    for cut in cuts {
        // Overlapping matches were already removed with the earlier cut.
        if cut.start < pos {
            continue;
        }
        out.push_str(&source[pos..cut.start]);
        pos = cut.end;
    }
    out.push_str(&source[pos..]);
    out
}

/// Inline decorators or links currently open.
#[derive(Debug)]
enum InlineMark {
    Decorator(&'static str),
    Link(LinkMark),
}

/// What plain text events are currently feeding.
#[derive(Debug)]
enum Capture {
    None,
    /// Front matter; discarded.
    Metadata,
    Code { language: Option<String>, code: String },
    ImageAlt { url: String, alt: String },
}

/// Where finished blocks are written.
enum Sink {
    Document,
    Footnote { identifier: String, children: Vec<TextBlock> },
}

struct Converter<'k, K: KeySource + ?Sized> {
    keys: &'k mut K,
    blocks: Vec<Block>,
    sinks: Vec<Sink>,
    current: Option<TextAccumulator>,
    marks: Vec<InlineMark>,
    capture: Capture,
    /// Kinds of the lists currently open, outermost first.
    lists: Vec<ListKind>,
    /// Item tag for the next text block opened.
    pending_item: Option<(ListKind, u32)>,
    /// Set when a blockquote opened and its first text block is not yet styled.
    pending_quote: bool,
}

impl<'k, K: KeySource + ?Sized> Converter<'k, K> {
    fn new(keys: &'k mut K) -> Self {
        Self {
            keys,
            blocks: Vec::new(),
            sinks: vec![Sink::Document],
            current: None,
            marks: Vec::new(),
            capture: Capture::None,
            lists: Vec::new(),
            pending_item: None,
            pending_quote: false,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match &mut self.capture {
            Capture::None => {}
            Capture::Metadata => {
                if matches!(event, Event::End(TagEnd::MetadataBlock(_))) {
                    self.capture = Capture::None;
                }
                return;
            }
            Capture::Code { code, .. } => {
                match event {
                    Event::Text(text) => code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => self.finish_code_block(),
                    _ => {}
                }
                return;
            }
            Capture::ImageAlt { alt, .. } => {
                match event {
                    Event::Text(text) | Event::Code(text) => alt.push_str(&text),
                    Event::SoftBreak | Event::HardBreak => alt.push(' '),
                    Event::End(TagEnd::Image) => self.finish_image(),
                    _ => {}
                }
                return;
            }
        }

        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.push_text(&text, None),
            Event::Code(text) => self.push_text(&text, Some(CODE)),
            Event::SoftBreak | Event::HardBreak => self.push_text("\n", None),
            Event::FootnoteReference(label) => self.push_footnote_reference(&label),
            Event::Html(_) | Event::InlineHtml(_) => {
                log::debug!("dropping raw HTML from MDX source");
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.flush_current();
                self.open_block(BlockStyle::Normal);
            }
            Tag::Heading { level, .. } => {
                self.flush_current();
                let style = HeadingLevel::new(heading_level(level))
                    .map_or(BlockStyle::Normal, BlockStyle::Heading);
                self.open_block(style);
            }
            Tag::BlockQuote(_) => {
                self.flush_current();
                self.pending_quote = true;
            }
            Tag::CodeBlock(kind) => {
                self.flush_current();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.capture = Capture::Code {
                    language,
                    code: String::new(),
                };
            }
            Tag::List(start) => {
                self.flush_current();
                self.lists.push(if start.is_some() {
                    ListKind::Number
                } else {
                    ListKind::Bullet
                });
            }
            Tag::Item => {
                self.flush_current();
                if let Some(kind) = self.lists.last() {
                    self.pending_item = Some((*kind, self.lists.len() as u32));
                }
            }
            Tag::FootnoteDefinition(label) => {
                self.flush_current();
                self.sinks.push(Sink::Footnote {
                    identifier: label.to_string(),
                    children: Vec::new(),
                });
            }
            Tag::Emphasis => self.marks.push(InlineMark::Decorator(EM)),
            Tag::Strong => self.marks.push(InlineMark::Decorator(STRONG)),
            Tag::Link { dest_url, .. } => {
                let key = self.keys.next_link_key();
                self.marks.push(InlineMark::Link(LinkMark {
                    key,
                    href: dest_url.to_string(),
                }));
            }
            Tag::Image { dest_url, .. } => {
                self.capture = Capture::ImageAlt {
                    url: dest_url.to_string(),
                    alt: String::new(),
                };
            }
            Tag::MetadataBlock(_) => self.capture = Capture::Metadata,
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Heading(_) => self.flush_current(),
            TagEnd::Item => {
                self.flush_current();
                // An item without text (empty, or only an image) tags nothing.
                self.pending_item = None;
            }
            TagEnd::BlockQuote(_) => {
                self.flush_current();
                self.pending_quote = false;
            }
            TagEnd::List(_) => {
                self.flush_current();
                self.lists.pop();
                self.pending_item = None;
            }
            TagEnd::FootnoteDefinition => {
                self.flush_current();
                if let Some(Sink::Footnote {
                    identifier,
                    children,
                }) = self.sinks.pop()
                {
                    let key = self.keys.next_key();
                    self.emit(Block::Footnote(FootnoteBlock {
                        key,
                        identifier,
                        children,
                    }));
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Link => {
                self.marks.pop();
            }
            _ => {}
        }
    }

    /// Opens a text block, consuming any pending list or quote tagging.
    fn open_block(&mut self, style: BlockStyle) {
        let style = if std::mem::take(&mut self.pending_quote) {
            BlockStyle::Blockquote
        } else {
            style
        };
        let mut acc = TextAccumulator::new(style);
        if let Some((kind, level)) = self.pending_item.take() {
            acc = acc.with_list_item(kind, level);
        }
        self.current = Some(acc);
    }

    fn ensure_block(&mut self) {
        // Tight list items carry text without a paragraph.
        if self.current.is_none() {
            self.open_block(BlockStyle::Normal);
        }
    }

    fn active_marks(&self) -> (Vec<&'static str>, Vec<LinkMark>) {
        let mut decorators = Vec::new();
        let mut links = Vec::new();
        for mark in &self.marks {
            match mark {
                InlineMark::Decorator(name) => {
                    if !decorators.contains(name) {
                        decorators.push(*name);
                    }
                }
                InlineMark::Link(link) => links.push(link.clone()),
            }
        }
        (decorators, links)
    }

    fn push_text(&mut self, text: &str, extra: Option<&'static str>) {
        let (mut decorators, links) = self.active_marks();
        if let Some(mark) = extra
            && !decorators.contains(&mark)
        {
            decorators.push(mark);
        }
        self.ensure_block();
        if let Some(acc) = self.current.as_mut() {
            acc.push_span(self.keys, text, &decorators, &links);
        }
    }

    fn push_footnote_reference(&mut self, label: &str) {
        let (decorators, links) = self.active_marks();
        self.ensure_block();
        if let Some(acc) = self.current.as_mut() {
            acc.push_footnote_reference(self.keys, label, &decorators, &links, label);
        }
    }

    fn finish_code_block(&mut self) {
        if let Capture::Code { language, code } = std::mem::replace(&mut self.capture, Capture::None) {
            let key = self.keys.next_key();
            let code = code.strip_suffix('\n').unwrap_or(&code).to_string();
            self.emit(Block::Code(CodeBlock {
                key,
                code,
                language,
            }));
        }
    }

    /// Emits the image between whatever text preceded it and whatever follows.
    fn finish_image(&mut self) {
        if let Capture::ImageAlt { url, alt } = std::mem::replace(&mut self.capture, Capture::None) {
            if let Some(acc) = self.current.as_mut()
                && let Some(block) = acc.flush(self.keys)
            {
                self.emit(Block::Text(block));
            }
            let key = self.keys.next_key();
            self.emit(Block::Image(ImageBlock {
                key,
                alt: (!alt.is_empty()).then_some(alt),
                asset: ImageAsset { url },
            }));
        }
    }

    fn flush_current(&mut self) {
        if let Some(mut acc) = self.current.take()
            && let Some(block) = acc.flush(self.keys)
        {
            self.emit(Block::Text(block));
        }
    }

    fn emit(&mut self, block: Block) {
        match self.sinks.last_mut() {
            Some(Sink::Footnote { children, .. }) => match block {
                Block::Text(text) => children.push(text),
                other => log::debug!(
                    "dropping {} block inside footnote definition",
                    other.type_name()
                ),
            },
            _ => self.blocks.push(block),
        }
    }

    fn finish(mut self) -> PortableText {
        self.flush_current();
        while self.sinks.len() > 1 {
            self.end(TagEnd::FootnoteDefinition);
        }
        PortableText::new(self.blocks)
    }
}

fn heading_level(level: MdHeadingLevel) -> u8 {
    match level {
        MdHeadingLevel::H1 => 1,
        MdHeadingLevel::H2 => 2,
        MdHeadingLevel::H3 => 3,
        MdHeadingLevel::H4 => 4,
        MdHeadingLevel::H5 => 5,
        MdHeadingLevel::H6 => 6,
    }
}
