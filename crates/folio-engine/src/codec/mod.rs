//! # Portable Text Codec
//!
//! Converts between the editor tree ([`crate::editor`]) and Portable Text
//! ([`crate::portable_text`]).
//!
//! - **`encode`**: walks the editor tree in document order, accumulating spans
//!   and block-scoped mark definitions per container. Images split a container
//!   into separate blocks. Total over any input.
//! - **`decode`**: builds a brand-new editor tree from a payload. Unreadable
//!   payloads are errors; unrepresentable blocks are skipped with warnings.
//! - **`builder`**: the span accumulator shared with the MDX converter.
//!
//! Keys are drawn from an explicit [`crate::keys::KeySource`] per call.

pub(crate) mod builder;
pub mod decode;
pub mod encode;

pub use decode::{Decoded, decode, decode_value};
pub use encode::{encode, encode_with_keys};
