//! Key generation for Portable Text `_key` fields.
//!
//! Keys only need to be unique within a single encode or conversion call, so
//! every call receives its own [`KeySource`] instead of sharing global state.

use uuid::Uuid;

pub trait KeySource {
    fn next_key(&mut self) -> String;

    /// A key for a link mark definition (`link-<key>`).
    fn next_link_key(&mut self) -> String {
        format!("link-{}", self.next_key())
    }
}

/// Random v4 UUID keys, used when encoding editor documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidKeys;

impl KeySource for UuidKeys {
    fn next_key(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic keys from a counter starting at 1.
///
/// Construct a fresh instance per conversion; the counter is never shared.
#[derive(Debug, Default, Clone)]
pub struct CounterKeys {
    issued: u64,
}

impl CounterKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for CounterKeys {
    fn next_key(&mut self) -> String {
        self.issued += 1;
        format!("key{}", self.issued)
    }
}
