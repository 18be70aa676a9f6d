//! TokenCounter trait - pluggable token counting capability
//!
//! The segmenter treats token counting as a black box: deterministic
//! text -> count under a named encoding. Implementations live in the
//! `segmenter` crate (tiktoken-backed, byte-estimate fallback).

/// Deterministic token counting under a named encoding.
pub trait TokenCounter: Send + Sync {
    /// Count the tokens in `text`.
    ///
    /// Must be deterministic for a fixed encoding: identical input always
    /// yields an identical count.
    fn count(&self, text: &str) -> usize;

    /// Name of the encoding this counter implements (used for logging).
    fn encoding(&self) -> &str;
}
