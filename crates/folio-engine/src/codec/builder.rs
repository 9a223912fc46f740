use std::collections::{HashMap, HashSet};

use crate::keys::KeySource;
use crate::portable_text::{BlockStyle, ListKind, MarkDef, Span, TextBlock};

/// A link mark that is active while walking inline content.
#[derive(Debug, Clone)]
pub(crate) struct LinkMark {
    pub key: String,
    pub href: String,
}

/// Accumulates spans and mark definitions for one paragraph-like container.
///
/// A container may be split into several text blocks when an image interrupts
/// it; each flushed block declares its own mark definitions, so a link that
/// straddles the split is re-declared under a fresh key in the later block.
#[derive(Debug)]
pub(crate) struct TextAccumulator {
    style: BlockStyle,
    list: Option<(ListKind, u32)>,
    spans: Vec<Span>,
    mark_defs: Vec<MarkDef>,
    /// Link keys declared by blocks already flushed from this container.
    retired: HashSet<String>,
    /// Caller key -> key used in the current block.
    local_keys: HashMap<String, String>,
    /// The last span is a footnote reference and must not absorb more text.
    footnote_tail: bool,
}

impl TextAccumulator {
    pub fn new(style: BlockStyle) -> Self {
        Self {
            style,
            list: None,
            spans: Vec::new(),
            mark_defs: Vec::new(),
            retired: HashSet::new(),
            local_keys: HashMap::new(),
            footnote_tail: false,
        }
    }

    /// Tags the first block flushed from this container as a list item.
    pub fn with_list_item(mut self, kind: ListKind, level: u32) -> Self {
        self.list = Some((kind, level));
        self
    }

    /// Appends text with the given marks. Text continuing a span with
    /// identical marks is merged into it.
    pub fn push_span<K: KeySource + ?Sized>(
        &mut self,
        keys: &mut K,
        text: &str,
        decorators: &[&str],
        links: &[LinkMark],
    ) {
        let marks = self.resolve_marks(keys, decorators, links);
        if let Some(last) = self.spans.last_mut()
            && last.marks == marks
            && !self.footnote_tail
        {
            last.text.push_str(text);
            return;
        }
        self.spans.push(Span::new(keys.next_key(), text.to_string(), marks));
        self.footnote_tail = false;
    }

    /// Pushes a span carrying a footnote reference mark.
    pub fn push_footnote_reference<K: KeySource + ?Sized>(
        &mut self,
        keys: &mut K,
        text: &str,
        decorators: &[&str],
        links: &[LinkMark],
        identifier: &str,
    ) {
        let key = format!("footnote-{}", keys.next_key());
        self.mark_defs.push(MarkDef::FootnoteReference {
            key: key.clone(),
            identifier: identifier.to_string(),
        });
        let mut marks = self.resolve_marks(keys, decorators, links);
        marks.push(key);
        self.spans.push(Span::new(keys.next_key(), text.to_string(), marks));
        self.footnote_tail = true;
    }

    fn resolve_marks<K: KeySource + ?Sized>(
        &mut self,
        keys: &mut K,
        decorators: &[&str],
        links: &[LinkMark],
    ) -> Vec<String> {
        let mut marks: Vec<String> = decorators.iter().map(|d| d.to_string()).collect();
        for link in links {
            let key = self.declare_link(keys, link);
            if !marks.contains(&key) {
                marks.push(key);
            }
        }
        marks
    }

    fn declare_link<K: KeySource + ?Sized>(&mut self, keys: &mut K, link: &LinkMark) -> String {
        if let Some(local) = self.local_keys.get(&link.key) {
            return local.clone();
        }
        let local = if self.retired.contains(&link.key) {
            keys.next_link_key()
        } else {
            link.key.clone()
        };
        self.mark_defs.push(MarkDef::Link {
            key: local.clone(),
            href: link.href.clone(),
        });
        self.local_keys.insert(link.key.clone(), local.clone());
        local
    }

    /// Takes the accumulated spans as a text block, if there are any.
    pub fn flush<K: KeySource + ?Sized>(&mut self, keys: &mut K) -> Option<TextBlock> {
        if self.spans.is_empty() {
            return None;
        }

        let mut block = TextBlock::new(keys.next_key(), self.style);
        block.children = std::mem::take(&mut self.spans);
        block.mark_defs = std::mem::take(&mut self.mark_defs);
        if let Some((kind, level)) = self.list.take() {
            block.list_item = Some(kind);
            block.level = Some(level);
        }

        self.retired.extend(self.local_keys.drain().map(|(original, _)| original));
        self.footnote_tail = false;
        Some(block)
    }

    /// A block with one empty span in this container's style.
    pub fn empty_block<K: KeySource + ?Sized>(&mut self, keys: &mut K) -> TextBlock {
        let mut block = TextBlock::empty(keys.next_key(), keys.next_key(), self.style);
        if let Some((kind, level)) = self.list.take() {
            block.list_item = Some(kind);
            block.level = Some(level);
        }
        block
    }
}
