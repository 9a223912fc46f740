pub mod codec;
pub mod diff;
pub mod editor;
pub mod keys;
pub mod mdx;
pub mod plain_text;
pub mod portable_text;

// Re-export key types for easier usage
pub use codec::{Decoded, decode, decode_value, encode, encode_with_keys};
pub use diff::{DiffKind, DiffLine, VersionDiff, compute_diff, diff_versions};
pub use editor::{Editor, EditorDocument, EditorNode, InlineNode, TextFormat};
pub use keys::{CounterKeys, KeySource, UuidKeys};
pub use mdx::excerpt::{extract_excerpt, has_truncate_marker};
pub use mdx::{convert_mdx_to_portable_text, convert_with_keys};
pub use plain_text::{extract_plain_text, extract_plain_text_from_json};
pub use portable_text::{Block, DecodeError, DecodeWarning, PortableText};
