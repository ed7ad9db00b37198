//! Fragment normalization and transcript assembly.
//!
//! Each recognized fragment becomes a sentence: first letter uppercased,
//! remainder lowercased, guaranteed terminal punctuation and exactly one
//! trailing space. Assembly is then plain concatenation, which keeps a
//! resumed run byte-identical to an uninterrupted one.

use crate::defaults;

/// Normalizes raw service text into a sentence fragment.
///
/// Returns `None` for blank text (the service recognized nothing usable).
pub fn normalize_fragment(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut fragment = String::with_capacity(trimmed.len() + 2);
    let mut chars = trimmed.chars();
    if let Some(first) = chars.next() {
        fragment.extend(first.to_uppercase());
        for c in chars {
            fragment.extend(c.to_lowercase());
        }
    }

    if !fragment.ends_with(['.', '!', '?']) {
        fragment.push('.');
    }
    fragment.push(' ');
    Some(fragment)
}

/// Ordered, append-only collection of transcribed fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptBuilder {
    fragments: Vec<String>,
}

impl TranscriptBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a builder from checkpointed fragments.
    pub fn from_fragments(fragments: Vec<String>) -> Self {
        Self { fragments }
    }

    /// Appends a normalized fragment.
    pub fn push(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    /// The fragments accumulated so far, in chunk order.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Returns true if nothing has been transcribed yet.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Assembles the final transcript.
    ///
    /// An empty builder yields the explicit no-speech sentinel rather than
    /// an empty string.
    pub fn finish(&self) -> String {
        if self.fragments.is_empty() {
            return defaults::NO_SPEECH_TEXT.to_string();
        }
        self.fragments.concat()
    }
}
