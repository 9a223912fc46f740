use crate::editor::{
    CodeNode, EditorDocument, EditorNode, ImageNode, InlineNode, LinkNode, ListItemNode, ListNode,
    TextFormat,
};
use crate::portable_text::{
    Block, BlockStyle, CODE, DecodeError, DecodeWarning, EM, ListKind, PortableText, STRONG, Span,
    TextBlock,
};

/// A freshly built editor document plus everything that was skipped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub document: EditorDocument,
    pub warnings: Vec<DecodeWarning>,
}

/// Decodes a Portable Text JSON payload into a new editor document.
///
/// Only an unreadable payload (invalid JSON, non-array root) is an error;
/// callers should then keep their current document. Blocks that cannot be
/// represented are skipped and reported in [`Decoded::warnings`].
pub fn decode(json: &str) -> Result<Decoded, DecodeError> {
    let (value, mut warnings) = PortableText::from_json_lenient(json)?;
    let decoded = decode_value(&value);
    warnings.extend(decoded.warnings);

    for warning in &warnings {
        log::warn!("Portable Text decode: {warning}");
    }

    Ok(Decoded {
        document: decoded.document,
        warnings,
    })
}

/// Decodes an already parsed Portable Text value.
pub fn decode_value(value: &PortableText) -> Decoded {
    let mut out = Vec::new();
    let mut warnings = Vec::new();
    let mut lists = ListStack::default();

    for (index, block) in value.iter().enumerate() {
        if let Block::Text(text) = block
            && let Some(kind) = text.list_item
        {
            let level = text.level.unwrap_or(1).max(1) as usize;
            let item = ListItemNode::new(decode_spans(text)).with_style(text.style);
            lists.push_item(&mut out, kind, level, item);
            continue;
        }
        lists.close_all(&mut out);

        match block {
            Block::Text(text) => out.push(decode_container(text)),
            Block::Image(image) => {
                if image.asset.url.is_empty() {
                    warnings.push(DecodeWarning::MalformedBlock {
                        index,
                        type_name: "image".into(),
                        reason: "empty asset url".into(),
                    });
                    continue;
                }
                out.push(EditorNode::Image(ImageNode::new(
                    image.asset.url.clone(),
                    image.alt.clone().unwrap_or_default(),
                )));
            }
            Block::Code(code) => out.push(EditorNode::Code(CodeNode {
                code: code.code.clone(),
                language: code.language.clone(),
            })),
            Block::Footnote(_) => warnings.push(DecodeWarning::UnsupportedBlock {
                index,
                type_name: "footnote".into(),
            }),
            // Reported when the payload was parsed.
            Block::Unknown => {}
        }
    }
    lists.close_all(&mut out);

    Decoded {
        document: EditorDocument::new(out),
        warnings,
    }
}

fn decode_container(block: &TextBlock) -> EditorNode {
    let children = decode_spans(block);
    match block.style {
        BlockStyle::Normal => EditorNode::Paragraph(children),
        BlockStyle::Heading(level) => EditorNode::Heading(level, children),
        BlockStyle::Blockquote => EditorNode::Quote(children),
    }
}

pub(crate) fn span_format(span: &Span) -> TextFormat {
    let mut format = TextFormat::empty();
    if span.has_mark(STRONG) {
        format.insert(TextFormat::BOLD);
    }
    if span.has_mark(EM) {
        format.insert(TextFormat::ITALIC);
    }
    if span.has_mark(CODE) {
        format.insert(TextFormat::CODE);
    }
    format
}

/// Turns spans into inline nodes. Consecutive spans that share a link mark
/// are grouped under one link node so per-run formatting survives.
fn decode_spans(block: &TextBlock) -> Vec<InlineNode> {
    let mut out = Vec::new();
    let mut open_link: Option<(String, LinkNode)> = None;

    for span in &block.children {
        if span.text.is_empty() {
            continue;
        }
        let text = InlineNode::formatted(span.text.clone(), span_format(span));

        let link = span.marks.iter().find_map(|mark| {
            block
                .mark_def(mark)
                .and_then(|def| def.link_href())
                .map(|href| (mark.clone(), href.to_string()))
        });

        let Some((key, href)) = link else {
            if let Some((_, node)) = open_link.take() {
                out.push(InlineNode::Link(node));
            }
            out.push(text);
            continue;
        };

        let continues = matches!(&open_link, Some((open_key, _)) if *open_key == key);
        if continues {
            if let Some((_, node)) = open_link.as_mut() {
                node.children.push(text);
            }
        } else {
            if let Some((_, node)) = open_link.take() {
                out.push(InlineNode::Link(node));
            }
            open_link = Some((
                key,
                LinkNode {
                    url: href,
                    children: vec![text],
                },
            ));
        }
    }

    if let Some((_, node)) = open_link {
        out.push(InlineNode::Link(node));
    }
    out
}

/// Regroups flat `listItem`/`level` blocks into nested list nodes.
///
/// `open[d]` is the list currently open at depth `d + 1`.
#[derive(Default)]
struct ListStack {
    open: Vec<ListNode>,
}

impl ListStack {
    fn push_item(&mut self, out: &mut Vec<EditorNode>, kind: ListKind, level: usize, item: ListItemNode) {
        // Levels can only deepen one step at a time.
        let level = level.min(self.open.len() + 1);

        while self.open.len() > level {
            self.close_top(out);
        }
        if self.open.len() == level
            && self.open.last().is_some_and(|list| list.kind != kind)
        {
            self.close_top(out);
        }
        if self.open.len() < level {
            self.open.push(ListNode::new(kind));
        }
        if let Some(list) = self.open.last_mut() {
            list.items.push(item);
        }
    }

    fn close_top(&mut self, out: &mut Vec<EditorNode>) {
        let Some(list) = self.open.pop() else {
            return;
        };
        match self.open.last_mut().and_then(|parent| parent.items.last_mut()) {
            Some(parent_item) => parent_item.nested.push(list),
            None => out.push(EditorNode::List(list)),
        }
    }

    fn close_all(&mut self, out: &mut Vec<EditorNode>) {
        while !self.open.is_empty() {
            self.close_top(out);
        }
    }
}
