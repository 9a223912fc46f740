use serde_json::Value;

use super::{Block, MarkDef, PortableText};

/// Reasons a Portable Text payload could not be read at all.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid Portable Text JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Portable Text root must be an array, found {0}")]
    NotAnArray(&'static str),
}

/// A block that was dropped or ignored while reading a payload.
///
/// Warnings never abort a decode; they are returned so callers can surface them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeWarning {
    #[error("block {index} has no _type")]
    MissingType { index: usize },
    #[error("block {index} has unknown type `{type_name}`")]
    UnknownBlockType { index: usize, type_name: String },
    #[error("block {index} of type `{type_name}` is malformed: {reason}")]
    MalformedBlock {
        index: usize,
        type_name: String,
        reason: String,
    },
    #[error("block {index} of type `{type_name}` cannot be edited")]
    UnsupportedBlock { index: usize, type_name: String },
    #[error("block {index} has an unsupported mark definition `{type_name}`; its marks are ignored")]
    IgnoredMarkDef { index: usize, type_name: String },
    #[error("block {index} has an unsupported inline object `{type_name}`")]
    UnsupportedInline { index: usize, type_name: String },
}

const KNOWN_TYPES: [&str; 4] = ["block", "image", "code", "footnote"];
const MARK_DEF_TYPES: [&str; 2] = ["link", "footnoteReference"];

impl PortableText {
    /// Reads a Portable Text payload block by block.
    ///
    /// Only a payload that is not JSON, or whose root is not an array, is an
    /// error. Individual blocks with an unknown `_type` are kept as
    /// [`Block::Unknown`]; blocks that fail to deserialize are dropped. Both
    /// cases are reported as warnings.
    pub fn from_json_lenient(json: &str) -> Result<(Self, Vec<DecodeWarning>), DecodeError> {
        let root: Value = serde_json::from_str(json)?;
        Self::from_value_lenient(root)
    }

    pub fn from_value_lenient(root: Value) -> Result<(Self, Vec<DecodeWarning>), DecodeError> {
        let items = match root {
            Value::Array(items) => items,
            other => return Err(DecodeError::NotAnArray(json_kind(&other))),
        };

        let mut blocks = Vec::with_capacity(items.len());
        let mut warnings = Vec::new();

        for (index, item) in items.into_iter().enumerate() {
            let Some(type_name) = item.get("_type").and_then(Value::as_str) else {
                warnings.push(DecodeWarning::MissingType { index });
                blocks.push(Block::Unknown);
                continue;
            };

            if !KNOWN_TYPES.contains(&type_name) {
                warnings.push(DecodeWarning::UnknownBlockType {
                    index,
                    type_name: type_name.to_string(),
                });
                blocks.push(Block::Unknown);
                continue;
            }

            let type_name = type_name.to_string();
            let mut item = item;
            match type_name.as_str() {
                "block" => prune_text_block(&mut item, index, &mut warnings),
                "footnote" => {
                    if let Some(children) = item.get_mut("children").and_then(Value::as_array_mut) {
                        for child in children {
                            prune_text_block(child, index, &mut warnings);
                        }
                    }
                }
                _ => {}
            }

            match serde_json::from_value::<Block>(item) {
                Ok(block) => blocks.push(block),
                Err(e) => warnings.push(DecodeWarning::MalformedBlock {
                    index,
                    type_name,
                    reason: e.to_string(),
                }),
            }
        }

        Ok((Self::new(blocks), warnings))
    }
}

/// Removes the mark definitions and inline objects of a text block that this
/// crate cannot represent, so the block's text still loads. Spans keep the
/// marks that pointed at a removed definition; they resolve to nothing.
fn prune_text_block(block: &mut Value, index: usize, warnings: &mut Vec<DecodeWarning>) {
    if let Some(defs) = block.get_mut("markDefs").and_then(Value::as_array_mut) {
        defs.retain(|def| {
            let type_name = def.get("_type").and_then(Value::as_str).unwrap_or_default();
            if MARK_DEF_TYPES.contains(&type_name)
                && serde_json::from_value::<MarkDef>(def.clone()).is_ok()
            {
                return true;
            }
            warnings.push(DecodeWarning::IgnoredMarkDef {
                index,
                type_name: type_name.to_string(),
            });
            false
        });
    }

    if let Some(children) = block.get_mut("children").and_then(Value::as_array_mut) {
        children.retain(|child| match child.get("_type").and_then(Value::as_str) {
            Some(type_name) if type_name != "span" => {
                warnings.push(DecodeWarning::UnsupportedInline {
                    index,
                    type_name: type_name.to_string(),
                });
                false
            }
            _ => true,
        });
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
