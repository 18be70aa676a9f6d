//! # Segmenter
//!
//! Token-bounded text segmentation.
//!
//! Recursively partitions a text into a lossless, ordered sequence of
//! segments, each strictly below a token budget, preferring structurally
//! meaningful cut points (paragraph boundaries, line breaks, spaces). The
//! recursion is realized as an explicit iterative worklist so pathological
//! inputs surface an error instead of overflowing the stack.

mod error;
mod score;
mod splitter;
mod tokenizer;

pub use error::SegmenterError;
pub use splitter::{segment, split_records};
pub use tokenizer::{counter_for, ByteEstimateCounter};

#[cfg(feature = "tiktoken")]
pub use tokenizer::TiktokenCounter;
