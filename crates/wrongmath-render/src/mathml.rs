use crate::{RenderError, Renderer};
use latex2mathml::{DisplayStyle, latex_to_mathml};

/// Marker `latex2mathml` leaves in its output for tokens it could not parse.
const PARSE_ERROR_MARKER: &str = "[PARSE ERROR:";

/// Renders LaTeX expressions to MathML markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathMlRenderer;

impl Renderer for MathMlRenderer {
    type Visual = String;

    fn render(&self, expression: &str, display_mode: bool) -> Result<String, RenderError> {
        let style = if display_mode {
            DisplayStyle::Block
        } else {
            DisplayStyle::Inline
        };

        let mathml =
            latex_to_mathml(expression, style).map_err(|e| RenderError::Backend(e.to_string()))?;

        // Partial output with an embedded error is still a failure for display purposes.
        if mathml.contains(PARSE_ERROR_MARKER) {
            return Err(RenderError::Backend(format!(
                "unsupported LaTeX in {:?}",
                expression
            )));
        }
        Ok(mathml)
    }
}
