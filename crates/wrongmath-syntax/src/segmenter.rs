use crate::{DelimiterKind, DelimiterMatch, Segment, Span};
use std::cell::OnceCell;

/// A segmenter for text mixing prose and LaTeX math.
///
/// ## Overview
///
/// The segmenter performs a **single left-to-right scan** over normalized
/// text and yields [`Segment`]s that partition the whole input. At every
/// candidate position it tries, in order:
///
/// 1. `\[` ... `\]` (display)
/// 2. `\(` ... `\)` (inline)
/// 3. `$$` ... `$$` (display) when the `$` is doubled, otherwise `$` ... `$` (inline)
///
/// If nothing matches (no opener, or an opener whose closer never appears),
/// the scan jumps to the nearest later position where an opener could start.
/// Skipped bytes accumulate into one text run, emitted when the next math
/// segment is found or the input ends.
///
/// ## Guarantees
///
/// - **Full coverage**: emitted spans are contiguous and cover `[0, len)`.
/// - **Termination**: the cursor strictly increases on every step.
/// - **Linear time**: an opener whose closer does not occur later fails
///   without rescanning the rest of the input.
/// - **Zero-copy**: segment contents are `&str` slices into the input.
/// - **Infallible**: unterminated markers degrade to text.
///
/// Offsets are bytes. All markers are ASCII, so every boundary falls on a
/// UTF-8 character boundary.
///
/// ## Examples
///
/// ```
/// use wrongmath_syntax::{Segment, Segmenter};
///
/// let mut segmenter = Segmenter::new("$$x^2$$");
/// match segmenter.next() {
///     Some(Segment::Math { content, display_mode, .. }) => {
///         assert_eq!(content, "x^2");
///         assert!(display_mode);
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// assert!(segmenter.next().is_none());
/// ```
///
/// An opener with no closer stays text:
///
/// ```
/// use wrongmath_syntax::{segment, Segment};
///
/// let segments = segment("cost is $5 today");
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].content(), "cost is $5 today");
/// ```
pub struct Segmenter<'a> {
    /// The normalized text being segmented.
    input: &'a str,
    /// Scan cursor (byte offset).
    position: usize,
    /// Start of the text run not yet emitted.
    text_start: usize,
    /// Math segment found while a text run was still pending.
    pending: Option<Segment<'a>>,
    /// Last offset of each closer in `input`, indexed by [`closer_slot`].
    /// Filled on first use.
    last_closers: OnceCell<[Option<usize>; 4]>,
}

fn closer_slot(kind: DelimiterKind) -> usize {
    match kind {
        DelimiterKind::BracketDisplay => 0,
        DelimiterKind::ParenInline => 1,
        DelimiterKind::DollarDisplay => 2,
        DelimiterKind::DollarInline => 3,
    }
}

impl<'a> Segmenter<'a> {
    /// Creates a new `Segmenter` over `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            text_start: 0,
            pending: None,
            last_closers: OnceCell::new(),
        }
    }

    /// Offset of the last occurrence of `kind`'s closer, if any.
    fn last_closer(&self, kind: DelimiterKind) -> Option<usize> {
        let input = self.input;
        self.last_closers.get_or_init(|| {
            [
                DelimiterKind::BracketDisplay,
                DelimiterKind::ParenInline,
                DelimiterKind::DollarDisplay,
                DelimiterKind::DollarInline,
            ]
            .map(|kind| input.rfind(kind.closer()))
        })[closer_slot(kind)]
    }

    /// Attempts a delimiter match with its opener at `at`.
    ///
    /// Returns `None` if there is no opener at `at` or its closer does not
    /// occur anywhere later in the input.
    pub fn match_at(&self, at: usize) -> Option<DelimiterMatch> {
        let rest = self.input.as_bytes().get(at..)?;
        let kind = match rest {
            [b'\\', b'[', ..] => DelimiterKind::BracketDisplay,
            [b'\\', b'(', ..] => DelimiterKind::ParenInline,
            [b'$', b'$', ..] => DelimiterKind::DollarDisplay,
            [b'$', ..] => DelimiterKind::DollarInline,
            _ => return None,
        };

        let content_start = at + kind.opener().len();
        // A closer that cannot be ahead of us fails without rescanning the tail.
        if self.last_closer(kind)? < content_start {
            return None;
        }
        let content_end = content_start + self.input[content_start..].find(kind.closer())?;
        Some(DelimiterMatch {
            kind,
            start: at,
            content_start,
            content_end,
            match_end: content_end + kind.closer().len(),
        })
    }

    /// Finds the nearest offset at or after `from` where an opener (`\[`,
    /// `\(` or `$`) begins. The earliest one wins regardless of kind.
    pub fn next_opener(&self, from: usize) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let mut i = from;
        while i < bytes.len() {
            match bytes[i] {
                b'$' => return Some(i),
                b'\\' if matches!(bytes.get(i + 1), Some(b'[') | Some(b'(')) => return Some(i),
                _ => i += 1,
            }
        }
        None
    }

    fn text(&self, start: usize, end: usize) -> Segment<'a> {
        Segment::Text {
            content: &self.input[start..end],
            span: Span::new(start, end),
        }
    }

    fn math(&self, m: DelimiterMatch) -> Segment<'a> {
        Segment::Math {
            content: &self.input[m.content_start..m.content_end],
            display_mode: m.kind.is_display(),
            delimiter: m.kind,
            span: m.span(),
        }
    }

    /// Emits whatever text run is still pending, up to `end`.
    fn flush_text(&mut self, end: usize) -> Option<Segment<'a>> {
        if self.text_start < end {
            let text = self.text(self.text_start, end);
            self.text_start = end;
            Some(text)
        } else {
            None
        }
    }
}

impl<'a> Iterator for Segmenter<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(segment) = self.pending.take() {
            return Some(segment);
        }

        while self.position < self.input.len() {
            if let Some(m) = self.match_at(self.position) {
                let math = self.math(m);
                let text = self.flush_text(m.start);
                self.position = m.match_end;
                self.text_start = m.match_end;
                return match text {
                    Some(text) => {
                        self.pending = Some(math);
                        Some(text)
                    }
                    None => Some(math),
                };
            }

            self.position = self
                .next_opener(self.position + 1)
                .unwrap_or(self.input.len());
        }

        self.flush_text(self.input.len())
    }
}

impl std::iter::FusedIterator for Segmenter<'_> {}

/// Segments `text` into an ordered sequence covering the whole input.
pub fn segment(text: &str) -> Vec<Segment<'_>> {
    let segments: Vec<_> = Segmenter::new(text).collect();
    log::debug!(
        "segmented {} bytes into {} segments ({} math)",
        text.len(),
        segments.len(),
        segments.iter().filter(|s| s.is_math()).count()
    );
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shapes(input: &str) -> Vec<(bool, &str, Option<bool>)> {
        segment(input)
            .into_iter()
            .map(|s| match s {
                Segment::Text { content, .. } => (false, content, None),
                Segment::Math {
                    content,
                    display_mode,
                    ..
                } => (true, content, Some(display_mode)),
            })
            .collect()
    }

    #[test]
    fn test_delimiter_priority() {
        let input = r"\(a\) and $b$";
        assert_eq!(
            shapes(input),
            vec![
                (true, "a", Some(false)),
                (false, " and ", None),
                (true, "b", Some(false)),
            ]
        );
    }

    #[test]
    fn test_bracket_display() {
        let segments = segment(r"see \[ E = mc^2 \] here");
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments[1],
            Segment::Math {
                content: " E = mc^2 ",
                display_mode: true,
                delimiter: DelimiterKind::BracketDisplay,
                span: Span::new(4, 18),
            }
        );
    }

    #[test]
    fn test_unterminated_dollar_is_text() {
        let input = "cost is $5 today";
        let segments = segment(input);
        assert_eq!(
            segments,
            vec![Segment::Text {
                content: input,
                span: Span::new(0, input.len()),
            }]
        );
    }

    #[test]
    fn test_empty_display_body() {
        let segments = segment("$$$$");
        assert_eq!(
            segments,
            vec![Segment::Math {
                content: "",
                display_mode: true,
                delimiter: DelimiterKind::DollarDisplay,
                span: Span::new(0, 4),
            }]
        );
    }

    #[test]
    fn test_double_dollar_is_not_two_inlines() {
        assert_eq!(shapes("$$x^2$$"), vec![(true, "x^2", Some(true))]);
    }

    #[test]
    fn test_single_dollar_closes_on_first_dollar() {
        // The inline closer is the first `$` even when it starts a `$$`.
        assert_eq!(
            shapes("$a$$b$$"),
            vec![(true, "a", Some(false)), (true, "b", Some(true))]
        );
    }

    #[test]
    fn test_unterminated_double_dollar_reconsidered_one_byte_later() {
        // `$$a$` has no `$$` closer; the scan moves to offset 1 where `$a$` is inline math.
        assert_eq!(
            shapes("$$a$"),
            vec![(false, "$", None), (true, "a", Some(false))]
        );
    }

    #[test]
    fn test_unterminated_escape_then_dollar() {
        assert_eq!(
            shapes(r"\[ x and $y$"),
            vec![(false, r"\[ x and ", None), (true, "y", Some(false))]
        );
    }

    #[test]
    fn test_escape_opener_wins_over_later_dollar() {
        assert_eq!(
            shapes(r"\($x$\)"),
            vec![(true, "$x$", Some(false))]
        );
    }

    #[test]
    fn test_lone_backslash_is_text() {
        assert_eq!(shapes(r"a \ b \"), vec![(false, r"a \ b \", None)]);
    }

    #[test]
    fn test_adjacent_math() {
        assert_eq!(
            shapes(r"$a$\(b\)\[c\]"),
            vec![
                (true, "a", Some(false)),
                (true, "b", Some(false)),
                (true, "c", Some(true)),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_multi_byte_text_around_math() {
        let input = "résumé $α$ fin";
        let segments = segment(input);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].content(), "résumé ");
        assert_eq!(segments[1].content(), "α");
        assert_eq!(segments[1].source_text(input), Some("$α$"));
    }

    #[test]
    fn test_match_at() {
        let segmenter = Segmenter::new(r"x \(y\)");
        assert_eq!(segmenter.match_at(0), None);
        let m = segmenter.match_at(2).unwrap();
        assert_eq!(m.kind, DelimiterKind::ParenInline);
        assert_eq!((m.content_start, m.content_end, m.match_end), (4, 5, 7));
        assert_eq!(segmenter.match_at(100), None);
    }

    #[test]
    fn test_match_at_closer_only_behind() {
        let segmenter = Segmenter::new(r"a\) $x$ \(b $");
        assert_eq!(segmenter.match_at(8), None);
        assert_eq!(segmenter.match_at(4).map(|m| m.match_end), Some(7));
        assert_eq!(segmenter.match_at(12), None);
        assert_eq!(segmenter.match_at(6).map(|m| m.content_end), Some(12));
    }

    #[test]
    fn test_next_opener_earliest_wins() {
        let segmenter = Segmenter::new(r"ab $c \[d");
        assert_eq!(segmenter.next_opener(0), Some(3));
        assert_eq!(segmenter.next_opener(4), Some(6));
        assert_eq!(segmenter.next_opener(7), None);
    }

    #[test]
    fn test_segmenter_is_fused() {
        let mut segmenter = Segmenter::new("$a$");
        assert!(segmenter.next().is_some());
        assert!(segmenter.next().is_none());
        assert!(segmenter.next().is_none());
    }
}
