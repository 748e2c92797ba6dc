use crate::{RenderError, RenderOutcome, Renderer};
use std::panic::{self, AssertUnwindSafe};

/// Guards a [`Renderer`] so that no failure escapes it.
///
/// Backend errors and panics both become [`RenderOutcome::Failed`] with the
/// original source text supplied by the caller.
pub struct RenderAdapter<R> {
    inner: R,
}

impl<R: Renderer> RenderAdapter<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Renders `expression`; on failure returns `original` untouched.
    pub fn render(
        &self,
        expression: &str,
        display_mode: bool,
        original: &str,
    ) -> RenderOutcome<R::Visual> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.inner.render(expression, display_mode)
        }))
        .unwrap_or_else(|payload| Err(RenderError::Panicked(panic_message(payload.as_ref()))));

        match result {
            Ok(visual) => RenderOutcome::Rendered(visual),
            Err(e) => {
                log::warn!("Failed to render {:?}: {}", original, e);
                RenderOutcome::Failed(original.to_string())
            }
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
