use crate::{DisplayUnit, RenderConfig};
use std::borrow::Cow;

/// Emits display units as an HTML fragment.
///
/// Text and failed sources are escaped. Visuals are trusted markup (e.g.
/// MathML from the renderer) and inserted as-is.
pub fn to_html<V: AsRef<str>>(units: &[DisplayUnit<V>], config: &RenderConfig) -> String {
    let mut out = String::new();
    for unit in units {
        match unit {
            DisplayUnit::Text { text } => out.push_str(&html_escape(text)),
            DisplayUnit::Inline { visual } => {
                out.push_str(&format!(
                    "<span class=\"{}\">{}</span>",
                    html_escape(&config.inline_class),
                    visual.as_ref()
                ));
            }
            DisplayUnit::Block { visual } => {
                out.push_str(&format!(
                    "<div class=\"{}\">{}</div>",
                    html_escape(&config.block_class),
                    visual.as_ref()
                ));
            }
            DisplayUnit::Error {
                source,
                display_mode,
            } => {
                let tag = if *display_mode { "pre" } else { "code" };
                out.push_str(&format!(
                    "<{tag} class=\"{}\" title=\"math render error\">{}</{tag}>",
                    html_escape(&config.error_class),
                    html_escape(source)
                ));
            }
        }
    }
    out
}

/// Replaces markup-significant characters with entity references so the
/// result is safe both as element text and inside a quoted attribute.
fn html_escape(text: &str) -> Cow<'_, str> {
    const SPECIAL: [char; 5] = ['&', '<', '>', '"', '\''];
    if !text.contains(SPECIAL) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        let entity = match ch {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&#39;",
            _ => {
                escaped.push(ch);
                continue;
            }
        };
        escaped.push_str(entity);
    }
    Cow::Owned(escaped)
}
