//! Token counter implementations
//!
//! The default backend is tiktoken (feature `tiktoken`, enabled by default);
//! a cheap byte-length estimate is always available as a fallback.

use contracts::TokenCounter;

use crate::error::SegmenterError;

/// Rough token estimate of one token per four bytes.
///
/// Deterministic and dependency-free; useful for tests and for builds
/// without the `tiktoken` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteEstimateCounter;

/// Encoding name accepted by [`counter_for`] for the byte estimate.
pub const BYTE_ESTIMATE_ENCODING: &str = "byte-estimate";

impl TokenCounter for ByteEstimateCounter {
    fn count(&self, text: &str) -> usize {
        text.len().div_ceil(4)
    }

    fn encoding(&self) -> &str {
        BYTE_ESTIMATE_ENCODING
    }
}

/// BPE-accurate token counting backed by `tiktoken-rs`.
#[cfg(feature = "tiktoken")]
pub struct TiktokenCounter {
    bpe: tiktoken_rs::CoreBPE,
    encoding: String,
}

#[cfg(feature = "tiktoken")]
impl std::fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "tiktoken")]
impl TiktokenCounter {
    /// Build a counter for a named encoding.
    ///
    /// # Errors
    /// [`SegmenterError::UnknownEncoding`] for names tiktoken does not ship,
    /// [`SegmenterError::TokenizerInit`] when the BPE tables fail to load.
    pub fn new(encoding: &str) -> Result<Self, SegmenterError> {
        let bpe = match encoding {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "r50k_base" => tiktoken_rs::r50k_base(),
            other => {
                return Err(SegmenterError::UnknownEncoding {
                    name: other.to_string(),
                })
            }
        }
        .map_err(|e| SegmenterError::TokenizerInit {
            encoding: encoding.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            bpe,
            encoding: encoding.to_string(),
        })
    }
}

#[cfg(feature = "tiktoken")]
impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn encoding(&self) -> &str {
        &self.encoding
    }
}

/// Resolve a counter from an encoding name.
///
/// `"byte-estimate"` always resolves to [`ByteEstimateCounter`]. Other names
/// go to the tiktoken backend; without the `tiktoken` feature they fall back
/// to the byte estimate with a warning.
pub fn counter_for(encoding: &str) -> Result<Box<dyn TokenCounter>, SegmenterError> {
    if encoding == BYTE_ESTIMATE_ENCODING {
        return Ok(Box::new(ByteEstimateCounter));
    }

    #[cfg(feature = "tiktoken")]
    {
        Ok(Box::new(TiktokenCounter::new(encoding)?))
    }

    #[cfg(not(feature = "tiktoken"))]
    {
        tracing::warn!(
            encoding,
            "tiktoken feature disabled, falling back to byte estimate"
        );
        Ok(Box::new(ByteEstimateCounter))
    }
}
