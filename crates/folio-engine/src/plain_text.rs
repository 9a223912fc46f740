//! Plain-text rendering of Portable Text, one line per block, used as the
//! input of the version diff.

use crate::portable_text::{Block, DecodeError, PortableText};

pub fn extract_plain_text(value: &PortableText) -> String {
    value
        .iter()
        .map(block_plain_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads a stored payload leniently and renders it as plain text.
pub fn extract_plain_text_from_json(json: &str) -> Result<String, DecodeError> {
    let (value, _warnings) = PortableText::from_json_lenient(json)?;
    Ok(extract_plain_text(&value))
}

pub fn block_plain_text(block: &Block) -> String {
    match block {
        Block::Text(text) => text.plain_text(),
        Block::Code(code) => match code.language.as_deref() {
            Some(language) if !language.is_empty() => format!("[code:{language}]\n{}", code.code),
            _ => format!("[code]\n{}", code.code),
        },
        Block::Image(image) => match image.alt.as_deref() {
            Some(alt) if !alt.is_empty() => format!("[image: {alt}]"),
            _ => "[image]".to_string(),
        },
        Block::Footnote(footnote) => {
            let body = footnote
                .children
                .iter()
                .map(|child| child.plain_text())
                .collect::<Vec<_>>()
                .join(" ");
            format!("[^{}] {body}", footnote.identifier)
        }
        Block::Unknown => String::new(),
    }
}
