//! Worklist-based segmentation
//!
//! The original formulation is a binary recursion: score every index, split
//! at the best one, recurse on both halves. Here the recursion is an explicit
//! stack of byte ranges into the original text, processed depth-first
//! left-first so the output order matches the input text. An iteration cap
//! and a degenerate-split check bound the worklist on pathological inputs.

use contracts::{ProgressCallback, ProgressEvent, TextRecord, TokenCounter};
use tracing::{debug, instrument, trace};

use crate::error::SegmenterError;
use crate::score::position_weight;

/// Partition `text` into an ordered, lossless sequence of segments, each
/// with a token count strictly below `budget`.
///
/// A text already below the budget is returned as a single unchanged
/// segment; a text at exactly `budget` tokens is still split. Identical
/// inputs always produce identical output.
///
/// # Errors
/// Returns [`SegmenterError::DegenerateSplit`] or
/// [`SegmenterError::NonConvergent`] when a range cannot be reduced below
/// the budget (e.g. a single character worth more tokens than the budget).
pub fn segment(
    text: &str,
    budget: usize,
    counter: &dyn TokenCounter,
) -> Result<Vec<String>, SegmenterError> {
    let char_len = text.chars().count();
    // Full binary expansion of an L-char text visits at most 2L-1 ranges.
    let max_visits = 2 * char_len + 1;
    let mut visits = 0usize;

    let mut segments = Vec::new();
    let mut pending = vec![(0usize, text.len())];

    while let Some((start, end)) = pending.pop() {
        visits += 1;
        if visits > max_visits {
            return Err(SegmenterError::NonConvergent { visits, char_len });
        }

        let slice = &text[start..end];
        if counter.count(slice) < budget {
            segments.push(slice.to_string());
            continue;
        }

        let cut = best_split(slice);
        if cut == 0 {
            let offset = text[..start].chars().count();
            return Err(SegmenterError::DegenerateSplit { offset });
        }
        trace!(start, end, cut, "splitting range");

        // Right pushed first so the left half is processed next (in-order output).
        pending.push((start + cut, end));
        pending.push((start, start + cut));
    }

    Ok(segments)
}

/// Expand records whose content exceeds the budget into suffixed child
/// records, firing one split progress event per original record.
///
/// Records that fit in a single segment pass through unchanged; expanded
/// records are replaced by children with identities `"{path}_{index}"`.
#[instrument(skip_all, fields(records = records.len(), budget))]
pub fn split_records(
    records: Vec<TextRecord>,
    budget: usize,
    counter: &dyn TokenCounter,
    progress: &ProgressCallback,
) -> Result<Vec<TextRecord>, SegmenterError> {
    if records.is_empty() {
        return Err(SegmenterError::NoRecords);
    }

    let total = records.len();
    let mut result = Vec::with_capacity(total);

    for record in records {
        let pieces =
            segment(&record.content, budget, counter).map_err(|e| e.for_record(&record.path))?;

        if pieces.len() > 1 {
            debug!(path = %record.path, segments = pieces.len(), "record split");
            for (index, piece) in pieces.into_iter().enumerate() {
                result.push(record.derive_segment(index, piece));
            }
        } else {
            result.push(record.clone());
        }

        progress(ProgressEvent::Split { record, total });
    }

    Ok(result)
}

/// Scan all char positions and return the byte offset of the best cut.
///
/// The running score at each position is the position weight times the
/// structural weights: paragraph boundaries (newline before newline) weigh
/// 50, plain line breaks 5; a newline opening a non-indented line multiplies
/// by another 50, a space by 2. The first strictly greater score wins, so
/// ties resolve to the earliest index.
fn best_split(s: &str) -> usize {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let char_len = chars.len();

    let mut best_score = 0.0_f64;
    let mut best_byte = 0usize;
    // Char index of the most recent newline seen during the scan.
    let mut last_newline: Option<usize> = None;

    for (ci, &(byte_idx, ch)) in chars.iter().enumerate() {
        let mut score = position_weight(ci, char_len) * newline_weight(&chars, ci);

        if ch == '\n' {
            let continuation = last_newline
                .and_then(|prev| chars.get(prev + 1))
                .map(|&(_, after)| after == '\t')
                .unwrap_or(false);
            if !continuation {
                score *= 50.0;
            }
            last_newline = Some(ci);
        }
        if ch == ' ' {
            score *= 2.0;
        }

        if score > best_score {
            best_score = score;
            best_byte = byte_idx;
        }
    }

    best_byte
}

/// Weight for the character at `ci`: 50 for a blank-line boundary, 5 for a
/// plain newline, 1 otherwise (including the final character).
fn newline_weight(chars: &[(usize, char)], ci: usize) -> f64 {
    if ci + 1 == chars.len() || chars[ci].1 != '\n' {
        return 1.0;
    }
    if chars[ci + 1].1 == '\n' {
        50.0
    } else {
        5.0
    }
}
