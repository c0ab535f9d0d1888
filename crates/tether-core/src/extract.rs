//! Bounded line-range text extraction.
//!
//! Every document-reading tool funnels its text through [`extract_lines`]
//! so that a single call can never flood the model's context window. The
//! function is pure and deterministic; failures carry a concrete retry
//! suggestion because the model uses them to self-correct.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel end line meaning "to end of file".
pub const END_OF_FILE: i64 = -1;

/// Hard limits applied to a single extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionLimits {
    /// Maximum number of lines one call may return.
    pub max_lines: usize,
    /// Maximum number of characters one call may return.
    pub max_chars: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_lines: 500,
            max_chars: 50_000,
        }
    }
}

/// Result of one bounded extraction. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub total_lines: usize,
    /// 1-based, clamped start of the returned range. 0 when empty.
    pub effective_start_line: usize,
    /// 1-based, clamped end of the returned range. 0 when empty.
    pub effective_end_line: usize,
    pub text: String,
    pub is_empty: bool,
}

impl Extraction {
    fn empty() -> Self {
        Self {
            total_lines: 0,
            effective_start_line: 0,
            effective_end_line: 0,
            text: String::new(),
            is_empty: true,
        }
    }
}

/// Extraction failure. Every variant is safe to replay to the model; the
/// suggestions are part of the contract, letting the model retry without
/// guessing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("start line {start_line} is beyond the end of the file ({total_lines} lines)")]
    StartBeyondEnd {
        start_line: usize,
        total_lines: usize,
    },

    #[error(
        "requested range spans {requested} lines, which exceeds the limit of {max_lines}. \
         Try lines {suggested_start} to {suggested_end} instead."
    )]
    SpanTooLarge {
        requested: usize,
        max_lines: usize,
        suggested_start: usize,
        suggested_end: usize,
    },

    #[error(
        "extracted text is {chars} characters, which exceeds the limit of {max_chars}. \
         Try requesting about {suggested_lines} lines at a time."
    )]
    TooManyChars {
        chars: usize,
        max_chars: usize,
        suggested_lines: usize,
    },
}

/// Extract a bounded line range from `text`.
///
/// `start_line` is 1-based; `end_line` is 1-based or [`END_OF_FILE`].
/// Out-of-range requests are clamped where harmless and rejected with a
/// descriptive error where the model clearly asked for something else
/// (a start line past the end of the file, a span over the line budget,
/// or a slice over the character budget).
pub fn extract_lines(
    text: &str,
    start_line: usize,
    end_line: i64,
    limits: &ExtractionLimits,
) -> Result<Extraction, ExtractError> {
    // Empty text or a single empty line is an explicit empty result,
    // never an error.
    if text.is_empty() || text == "\n" {
        return Ok(Extraction::empty());
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let total_lines = lines.len();

    // A start past the end of the file is a real mistake the model should
    // hear about; the default start of 1 is always tolerated.
    if start_line > total_lines && start_line != 1 {
        return Err(ExtractError::StartBeyondEnd {
            start_line,
            total_lines,
        });
    }

    let effective_start = start_line.clamp(1, total_lines);
    let effective_end = if end_line < 0 {
        total_lines
    } else {
        (end_line as usize).clamp(effective_start, total_lines)
    };

    let requested = effective_end - effective_start + 1;
    if requested > limits.max_lines {
        return Err(ExtractError::SpanTooLarge {
            requested,
            max_lines: limits.max_lines,
            suggested_start: effective_start,
            suggested_end: effective_start + limits.max_lines - 1,
        });
    }

    let extracted = lines[effective_start - 1..effective_end].join("\n");
    let chars = extracted.chars().count();
    if chars > limits.max_chars {
        let average_chars_per_line = (chars / requested).max(1);
        return Err(ExtractError::TooManyChars {
            chars,
            max_chars: limits.max_chars,
            suggested_lines: (limits.max_chars / average_chars_per_line).max(1),
        });
    }

    Ok(Extraction {
        total_lines,
        effective_start_line: effective_start,
        effective_end_line: effective_end,
        text: extracted,
        is_empty: false,
    })
}
