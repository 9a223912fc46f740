// Shared by the integration test binaries; not every binary uses every helper.
#![allow(dead_code)]

use folio_engine::portable_text::{Block, PortableText, TextBlock};

/// Key-independent description of a value: one entry per block, spans as
/// `text{decorators}->href`.
pub fn shape(value: &PortableText) -> Vec<String> {
    value.iter().map(describe_block).collect()
}

pub fn describe_block(block: &Block) -> String {
    match block {
        Block::Text(text) => {
            let style = String::from(text.style);
            let list = match (text.list_item, text.level) {
                (Some(kind), Some(level)) => format!(" {kind:?}@{level}"),
                _ => String::new(),
            };
            format!("{style}{list}: {}", describe_spans(text))
        }
        Block::Image(image) => format!(
            "image {} alt={}",
            image.asset.url,
            image.alt.as_deref().unwrap_or("")
        ),
        Block::Code(code) => format!("code {:?} {}", code.language, code.code),
        Block::Footnote(footnote) => format!("footnote {}", footnote.identifier),
        Block::Unknown => "unknown".to_string(),
    }
}

fn describe_spans(block: &TextBlock) -> String {
    block
        .children
        .iter()
        .map(|span| {
            let mut decorators: Vec<&str> = span
                .marks
                .iter()
                .map(String::as_str)
                .filter(|mark| block.mark_def(mark).is_none())
                .collect();
            decorators.sort_unstable();
            let href = span
                .marks
                .iter()
                .find_map(|mark| block.mark_def(mark).and_then(|def| def.link_href()))
                .map(|href| format!("->{href}"))
                .unwrap_or_default();
            format!("{}{{{}}}{href}", span.text, decorators.join(","))
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}
