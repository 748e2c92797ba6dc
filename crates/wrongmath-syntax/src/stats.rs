use crate::Segment;
use serde::{Deserialize, Serialize};

/// Summary counts over a segmentation, reported alongside recognition results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub text_segments: usize,
    pub inline_math: usize,
    pub display_math: usize,
    /// Unicode scalar values covered by all segments.
    pub characters: usize,
}

impl SegmentStats {
    pub fn collect(segments: &[Segment<'_>], source: &str) -> Self {
        let mut stats = Self::default();
        for segment in segments {
            match segment {
                Segment::Text { .. } => stats.text_segments += 1,
                Segment::Math {
                    display_mode: true,
                    ..
                } => stats.display_math += 1,
                Segment::Math { .. } => stats.inline_math += 1,
            }
            stats.characters += match segment.source_text(source) {
                Some(text) => text.chars().count(),
                None => delimited_len(segment),
            };
        }
        stats
    }

    pub fn math_segments(&self) -> usize {
        self.inline_math + self.display_math
    }
}

/// Character count rebuilt from the segment alone. Delimiters are ASCII.
fn delimited_len(segment: &Segment<'_>) -> usize {
    let delimiters = match segment {
        Segment::Text { .. } => 0,
        Segment::Math { delimiter, .. } => delimiter.opener().len() + delimiter.closer().len(),
    };
    segment.content().chars().count() + delimiters
}
