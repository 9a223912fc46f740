//! # Editor Model
//!
//! The rich-text editor's document, modelled as a closed tree of node variants
//! (see [`node`]), and [`Editor`], the host-side state that owns the current
//! document.
//!
//! Loading Portable Text never mutates the current tree in place: a complete
//! new tree is decoded first and swapped in only when decoding succeeded, so a
//! bad payload can never leave the editor half-rebuilt.

pub mod node;

pub use node::{
    CodeNode, EditorDocument, EditorNode, ImageNode, InlineNode, LinkNode, ListItemNode, ListNode,
    TextFormat, TextNode,
};

use crate::codec::{decode, encode};
use crate::portable_text::{DecodeError, DecodeWarning, PortableText};

/// Owns the document currently shown by the editor.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    document: EditorDocument,
    /// Incremented every time the document is replaced
    version: u64,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: EditorDocument) -> Self {
        Self {
            document,
            version: 0,
        }
    }

    pub fn document(&self) -> &EditorDocument {
        &self.document
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replaces the whole document.
    pub fn set_document(&mut self, document: EditorDocument) {
        self.document = document;
        self.version += 1;
    }

    pub fn to_portable_text(&self) -> PortableText {
        encode(&self.document)
    }

    /// Replaces the document with the decoded payload.
    ///
    /// On error the current document is kept unchanged. On success the
    /// warnings for any skipped blocks are returned.
    pub fn load_portable_text(&mut self, json: &str) -> Result<Vec<DecodeWarning>, DecodeError> {
        let decoded = decode(json).inspect_err(|e| {
            log::error!("Keeping current document, Portable Text could not be loaded: {e}");
        })?;

        self.set_document(decoded.document);
        Ok(decoded.warnings)
    }
}
