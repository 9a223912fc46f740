use crate::editor::{EditorDocument, EditorNode, InlineNode, ListNode, TextFormat};
use crate::keys::{KeySource, UuidKeys};
use crate::portable_text::{
    Block, BlockStyle, CODE, CodeBlock, EM, ImageAsset, ImageBlock, PortableText, STRONG,
};

use super::builder::{LinkMark, TextAccumulator};

/// Encodes an editor document as Portable Text using random keys.
pub fn encode(doc: &EditorDocument) -> PortableText {
    encode_with_keys(doc, &mut UuidKeys)
}

/// Encodes an editor document as Portable Text, drawing keys from `keys`.
///
/// Encoding is total: unknown nodes are skipped and an empty document yields
/// one normal block holding one empty span.
pub fn encode_with_keys<K: KeySource + ?Sized>(doc: &EditorDocument, keys: &mut K) -> PortableText {
    let mut encoder = Encoder {
        keys,
        blocks: Vec::new(),
    };

    for node in &doc.children {
        encoder.encode_node(node);
    }

    if encoder.blocks.is_empty() {
        let block_key = encoder.keys.next_key();
        let span_key = encoder.keys.next_key();
        return PortableText::empty_document(block_key, span_key);
    }
    PortableText::new(encoder.blocks)
}

/// Marks for a text leaf, in the fixed order strong, em, code.
pub(crate) fn format_marks(format: TextFormat) -> Vec<&'static str> {
    let mut marks = Vec::new();
    if format.contains(TextFormat::BOLD) {
        marks.push(STRONG);
    }
    if format.contains(TextFormat::ITALIC) {
        marks.push(EM);
    }
    if format.contains(TextFormat::CODE) {
        marks.push(CODE);
    }
    marks
}

struct Encoder<'k, K: KeySource + ?Sized> {
    keys: &'k mut K,
    blocks: Vec<Block>,
}

impl<K: KeySource + ?Sized> Encoder<'_, K> {
    fn encode_node(&mut self, node: &EditorNode) {
        match node {
            EditorNode::Paragraph(children) => {
                self.encode_container(TextAccumulator::new(BlockStyle::Normal), children)
            }
            EditorNode::Heading(level, children) => {
                self.encode_container(TextAccumulator::new(BlockStyle::Heading(*level)), children)
            }
            EditorNode::Quote(children) => {
                self.encode_container(TextAccumulator::new(BlockStyle::Blockquote), children)
            }
            EditorNode::List(list) => self.encode_list(list, 1),
            EditorNode::Code(code) => {
                let key = self.keys.next_key();
                self.blocks.push(Block::Code(CodeBlock {
                    key,
                    code: code.code.clone(),
                    language: code.language.clone(),
                }));
            }
            EditorNode::Image(image) => self.push_image(&image.src, &image.alt),
            EditorNode::Unknown(kind) => {
                log::debug!("skipping unknown editor node `{kind}`");
            }
        }
    }

    fn encode_list(&mut self, list: &ListNode, level: u32) {
        for item in &list.items {
            let acc = TextAccumulator::new(item.style).with_list_item(list.kind, level);
            self.encode_container(acc, &item.children);
            for nested in &item.nested {
                self.encode_list(nested, level + 1);
            }
        }
    }

    fn encode_container(&mut self, mut acc: TextAccumulator, children: &[InlineNode]) {
        let start = self.blocks.len();
        let mut links = Vec::new();
        self.encode_inline(&mut acc, children, &mut links);

        if let Some(block) = acc.flush(self.keys) {
            self.blocks.push(Block::Text(block));
        } else if self.blocks.len() == start {
            // Empty containers still round-trip as an empty paragraph.
            let block = acc.empty_block(self.keys);
            self.blocks.push(Block::Text(block));
        }
    }

    fn encode_inline(
        &mut self,
        acc: &mut TextAccumulator,
        children: &[InlineNode],
        links: &mut Vec<LinkMark>,
    ) {
        for child in children {
            match child {
                InlineNode::Text(text) => {
                    let marks = format_marks(text.format);
                    acc.push_span(self.keys, &text.text, &marks, links);
                }
                InlineNode::Link(link) => {
                    if !child.has_text() {
                        log::debug!("skipping link to {} without text", link.url);
                        continue;
                    }
                    links.push(LinkMark {
                        key: self.keys.next_link_key(),
                        href: link.url.clone(),
                    });
                    self.encode_inline(acc, &link.children, links);
                    links.pop();
                }
                InlineNode::Image(image) => {
                    if let Some(block) = acc.flush(self.keys) {
                        self.blocks.push(Block::Text(block));
                    }
                    self.push_image(&image.src, &image.alt);
                }
                InlineNode::Unknown(kind) => {
                    log::debug!("skipping unknown inline node `{kind}`");
                }
            }
        }
    }

    fn push_image(&mut self, src: &str, alt: &str) {
        let key = self.keys.next_key();
        self.blocks.push(Block::Image(ImageBlock {
            key,
            alt: (!alt.is_empty()).then(|| alt.to_string()),
            asset: ImageAsset {
                url: src.to_string(),
            },
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{ImageNode, ListItemNode};
    use crate::keys::CounterKeys;
    use crate::portable_text::{HeadingLevel, ListKind, MarkDef};
    use pretty_assertions::assert_eq;

    #[test]
    fn marks_follow_fixed_format_order() {
        assert_eq!(
            format_marks(TextFormat::CODE | TextFormat::BOLD | TextFormat::ITALIC),
            vec!["strong", "em", "code"]
        );
        assert!(format_marks(TextFormat::empty()).is_empty());
    }

    #[test]
    fn keys_are_drawn_from_the_given_source() {
        let doc = EditorDocument::new(vec![EditorNode::paragraph(vec![
            InlineNode::text("See "),
            InlineNode::link(
                "https://docs.rs",
                vec![InlineNode::formatted("docs", TextFormat::BOLD)],
            ),
        ])]);

        let value = encode_with_keys(&doc, &mut CounterKeys::new());
        let block = value.blocks[0].as_text().unwrap();

        assert_eq!(block.key, "key4");
        assert_eq!(block.children[0].key, "key1");
        assert_eq!(block.children[1].key, "key3");
        assert_eq!(block.children[1].marks, vec!["strong", "link-key2"]);
        assert_eq!(
            block.mark_defs,
            vec![MarkDef::Link {
                key: "link-key2".into(),
                href: "https://docs.rs".into()
            }]
        );
    }

    #[test]
    fn heading_style_is_kept() {
        let level = HeadingLevel::new(3).unwrap();
        let doc = EditorDocument::new(vec![EditorNode::Heading(
            level,
            vec![InlineNode::text("Title")],
        )]);

        let value = encode_with_keys(&doc, &mut CounterKeys::new());

        assert_eq!(value.blocks[0].as_text().unwrap().style, BlockStyle::Heading(level));
    }

    #[test]
    fn empty_list_item_is_an_empty_tagged_block() {
        let mut list = ListNode::new(ListKind::Number);
        list.items.push(ListItemNode::new(vec![]));
        let doc = EditorDocument::new(vec![EditorNode::List(list)]);

        let value = encode_with_keys(&doc, &mut CounterKeys::new());
        let block = value.blocks[0].as_text().unwrap();

        assert_eq!(block.list_item, Some(ListKind::Number));
        assert_eq!(block.level, Some(1));
        assert_eq!(block.plain_text(), "");
    }

    #[test]
    fn image_only_paragraph_emits_no_empty_text_block() {
        let doc = EditorDocument::new(vec![EditorNode::paragraph(vec![InlineNode::Image(
            ImageNode::new("/a.png", ""),
        )])]);

        let value = encode_with_keys(&doc, &mut CounterKeys::new());

        assert_eq!(value.len(), 1);
        let image = value.blocks[0].as_image().unwrap();
        assert_eq!(image.alt, None);
        assert_eq!(image.asset.url, "/a.png");
    }
}
