use crate::{AsyncRenderer, RenderAdapter, RenderOutcome, Renderer};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;
use wrongmath_syntax::Segment;

/// One displayable piece of the final output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DisplayUnit<V> {
    /// Literal text, shown verbatim.
    Text { text: String },
    /// Rendered math flowing with the surrounding text.
    Inline { visual: V },
    /// Rendered math on its own line.
    Block { visual: V },
    /// Math that failed to render, shown as its original delimited source.
    Error { source: String, display_mode: bool },
}

impl<V> DisplayUnit<V> {
    fn rendered(visual: V, display_mode: bool) -> Self {
        if display_mode {
            DisplayUnit::Block { visual }
        } else {
            DisplayUnit::Inline { visual }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DisplayUnit::Error { .. })
    }
}

/// The original slice of a math segment, delimiters included.
fn original_source(segment: &Segment<'_>, source: &str) -> String {
    match (segment.source_text(source), segment) {
        (Some(original), _) => original.to_string(),
        // Segment does not belong to `source`; rebuild it from its parts.
        (None, Segment::Math { content, delimiter, .. }) => {
            format!("{}{}{}", delimiter.opener(), content, delimiter.closer())
        }
        (None, Segment::Text { content, .. }) => content.to_string(),
    }
}

/// Builds display units for `segments`, rendering math through `renderer`.
///
/// `source` is the normalized text the segments were produced from. Output
/// order matches segment order one-to-one; render failures become
/// [`DisplayUnit::Error`] and never abort assembly.
pub fn assemble<R: Renderer>(
    segments: &[Segment<'_>],
    source: &str,
    renderer: &R,
) -> Vec<DisplayUnit<R::Visual>> {
    let adapter = RenderAdapter::new(renderer);
    let units: Vec<_> = segments
        .iter()
        .map(|segment| match *segment {
            Segment::Text { content, .. } => DisplayUnit::Text {
                text: content.to_string(),
            },
            Segment::Math {
                content,
                display_mode,
                ..
            } => {
                let delimited = original_source(segment, source);
                match adapter.render(content, display_mode, &delimited) {
                    RenderOutcome::Rendered(visual) => DisplayUnit::rendered(visual, display_mode),
                    RenderOutcome::Failed(original) => DisplayUnit::Error {
                        source: original,
                        display_mode,
                    },
                }
            }
        })
        .collect();

    log::debug!(
        "assembled {} units ({} failed)",
        units.len(),
        units.iter().filter(|u| u.is_error()).count()
    );
    units
}

/// Like [`assemble`], but renders all math segments concurrently.
///
/// Each math segment becomes its own task; results are written back by
/// segment index, so completion order never affects output order. A task
/// that errors or panics leaves the error fallback in place.
pub async fn assemble_async<R>(
    segments: &[Segment<'_>],
    source: &str,
    renderer: Arc<R>,
) -> Vec<DisplayUnit<R::Visual>>
where
    R: AsyncRenderer + 'static,
{
    let mut units = Vec::with_capacity(segments.len());
    let mut tasks = JoinSet::new();

    for (index, segment) in segments.iter().enumerate() {
        match *segment {
            Segment::Text { content, .. } => units.push(DisplayUnit::Text {
                text: content.to_string(),
            }),
            Segment::Math {
                content,
                display_mode,
                ..
            } => {
                let original = original_source(segment, source);
                units.push(DisplayUnit::Error {
                    source: original.clone(),
                    display_mode,
                });

                let renderer = Arc::clone(&renderer);
                let expression = content.to_string();
                tasks.spawn(async move {
                    match renderer.render(&expression, display_mode).await {
                        Ok(visual) => Some((index, DisplayUnit::rendered(visual, display_mode))),
                        Err(e) => {
                            log::warn!("Failed to render {:?}: {}", original, e);
                            None
                        }
                    }
                });
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some((index, unit))) => units[index] = unit,
            Ok(None) => {}
            Err(e) => log::warn!("Render task aborted: {}", e),
        }
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderError;
    use async_trait::async_trait;
    use std::time::Duration;
    use wrongmath_syntax::segment;

    struct AlwaysFails;

    impl Renderer for AlwaysFails {
        type Visual = String;

        fn render(&self, _: &str, _: bool) -> Result<String, RenderError> {
            Err(RenderError::Backend("nope".to_string()))
        }
    }

    struct Upper;

    impl Renderer for Upper {
        type Visual = String;

        fn render(&self, expression: &str, _: bool) -> Result<String, RenderError> {
            Ok(expression.to_uppercase())
        }
    }

    fn text(s: &str) -> DisplayUnit<String> {
        DisplayUnit::Text {
            text: s.to_string(),
        }
    }

    #[test]
    fn test_render_failure_keeps_original_delimiters() {
        let source = "before $bad$ after";
        let units = assemble(&segment(source), source, &AlwaysFails);
        assert_eq!(
            units,
            vec![
                text("before "),
                DisplayUnit::Error {
                    source: "$bad$".to_string(),
                    display_mode: false,
                },
                text(" after"),
            ]
        );
    }

    #[test]
    fn test_display_mode_selects_block() {
        let source = r"a \[x\] b \(y\)";
        let units = assemble(&segment(source), source, &Upper);
        assert_eq!(
            units,
            vec![
                text("a "),
                DisplayUnit::Block {
                    visual: "X".to_string()
                },
                text(" b "),
                DisplayUnit::Inline {
                    visual: "Y".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_original_rebuilt_for_foreign_source() {
        let segments = segment("$$q$$");
        let units = assemble(&segments, "", &AlwaysFails);
        assert_eq!(
            units,
            vec![DisplayUnit::Error {
                source: "$$q$$".to_string(),
                display_mode: true,
            }]
        );
    }

    #[test]
    fn test_empty_segments() {
        let units = assemble(&[], "", &Upper);
        assert!(units.is_empty());
    }

    /// Finishes later for earlier expressions, so completion order is reversed.
    struct SlowFirst;

    #[async_trait]
    impl AsyncRenderer for SlowFirst {
        type Visual = String;

        async fn render(
            &self,
            expression: &str,
            _display_mode: bool,
        ) -> Result<String, RenderError> {
            let delay: u64 = expression.parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(50 - delay * 10)).await;
            if expression == "3" {
                return Err(RenderError::Backend("three".to_string()));
            }
            if expression == "4" {
                panic!("four");
            }
            Ok(format!("<{}>", expression))
        }
    }

    #[tokio::test]
    async fn test_async_preserves_segment_order() {
        let source = "$0$ a $1$ b $$2$$ c $3$ d $4$";
        let segments = segment(source);
        let units = assemble_async(&segments, source, Arc::new(SlowFirst)).await;

        assert_eq!(
            units,
            vec![
                DisplayUnit::Inline {
                    visual: "<0>".to_string()
                },
                text(" a "),
                DisplayUnit::Inline {
                    visual: "<1>".to_string()
                },
                text(" b "),
                DisplayUnit::Block {
                    visual: "<2>".to_string()
                },
                text(" c "),
                DisplayUnit::Error {
                    source: "$3$".to_string(),
                    display_mode: false,
                },
                text(" d "),
                DisplayUnit::Error {
                    source: "$4$".to_string(),
                    display_mode: false,
                },
            ]
        );
    }

    #[test]
    fn test_units_json() {
        let source = "x $y$";
        let units = assemble(&segment(source), source, &AlwaysFails);
        let json = serde_json::to_string(&units).unwrap();
        expect_test::expect![[r#"[{"type":"text","text":"x "},{"type":"error","source":"$y$","display_mode":false}]"#]]
            .assert_eq(&json);
    }
}
