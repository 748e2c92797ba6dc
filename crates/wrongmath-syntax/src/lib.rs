//! # WrongMath Syntax
//!
//! Splits recognized text that mixes prose with LaTeX math into typed
//! [`Segment`]s.
//!
//! The pipeline is two pure stages:
//!
//! ```text
//! raw OCR text ──normalize()──► normalized text ──Segmenter──► [Segment]
//! ```
//!
//! Four math conventions are recognized, tried in this order at every
//! position: `\[...\]`, `\(...\)`, `$$...$$` and `$...$`. An opener without a
//! closer is never an error; it is kept as plain text.
//!
//! ```
//! use wrongmath_syntax::{segment, Segment};
//!
//! let segments = segment(r"\(a\) and $b$");
//! assert_eq!(segments.len(), 3);
//! assert!(matches!(segments[1], Segment::Text { content: " and ", .. }));
//! ```

pub mod normalize;
pub mod segmenter;
pub mod stats;


pub use normalize::normalize;
pub use segmenter::{Segmenter, segment};
pub use stats::SegmentStats;

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` in the normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The delimiter convention that produced a math segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DelimiterKind {
    /// `\[ ... \]`
    BracketDisplay,
    /// `\( ... \)`
    ParenInline,
    /// `$$ ... $$`
    DollarDisplay,
    /// `$ ... $`
    DollarInline,
}

impl DelimiterKind {
    pub fn opener(self) -> &'static str {
        match self {
            DelimiterKind::BracketDisplay => r"\[",
            DelimiterKind::ParenInline => r"\(",
            DelimiterKind::DollarDisplay => "$$",
            DelimiterKind::DollarInline => "$",
        }
    }

    pub fn closer(self) -> &'static str {
        match self {
            DelimiterKind::BracketDisplay => r"\]",
            DelimiterKind::ParenInline => r"\)",
            DelimiterKind::DollarDisplay => "$$",
            DelimiterKind::DollarInline => "$",
        }
    }

    /// Whether math in this delimiter renders as a block.
    pub fn is_display(self) -> bool {
        matches!(
            self,
            DelimiterKind::BracketDisplay | DelimiterKind::DollarDisplay
        )
    }
}

/// A successful delimiter match at some position of the input.
///
/// Only lives for the duration of one segmentation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterMatch {
    pub kind: DelimiterKind,
    /// Offset of the opening marker.
    pub start: usize,
    pub content_start: usize,
    pub content_end: usize,
    /// Offset just past the closing marker.
    pub match_end: usize,
}

impl DelimiterMatch {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.match_end)
    }

    pub fn content_span(&self) -> Span {
        Span::new(self.content_start, self.content_end)
    }
}

/// A contiguous, typed slice of the normalized text.
///
/// Contents borrow from the input; nothing is copied during segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment<'a> {
    Text {
        content: &'a str,
        span: Span,
    },
    Math {
        /// Expression body without its delimiters. May be empty.
        content: &'a str,
        display_mode: bool,
        delimiter: DelimiterKind,
        span: Span,
    },
}

impl<'a> Segment<'a> {
    pub fn span(&self) -> Span {
        match *self {
            Segment::Text { span, .. } | Segment::Math { span, .. } => span,
        }
    }

    pub fn content(&self) -> &'a str {
        match *self {
            Segment::Text { content, .. } | Segment::Math { content, .. } => content,
        }
    }

    pub fn source_start(&self) -> usize {
        self.span().start
    }

    pub fn source_end(&self) -> usize {
        self.span().end
    }

    pub fn is_math(&self) -> bool {
        matches!(self, Segment::Math { .. })
    }

    /// The exact source slice this segment covers, delimiters included.
    ///
    /// Returns `None` when the span does not fit `source`, i.e. the segment
    /// was produced from some other text.
    pub fn source_text<'s>(&self, source: &'s str) -> Option<&'s str> {
        let span = self.span();
        source.get(span.start..span.end)
    }
}

/// Normalized text together with its segmentation.
///
/// This is the `normalize + segment` capability handed to UI layers: it owns
/// the normalized text so that segments and their source ranges stay valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    /// Normalizes `raw` and prepares it for segmentation.
    pub fn parse(raw: &str) -> Self {
        Self {
            text: normalize(raw),
        }
    }

    /// Uses `text` as-is, skipping normalization.
    pub fn from_normalized(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn segmenter(&self) -> Segmenter<'_> {
        Segmenter::new(&self.text)
    }

    pub fn segments(&self) -> Vec<Segment<'_>> {
        segment(&self.text)
    }
}
