//! # WrongMath Render
//!
//! Turns a segmentation produced by [`wrongmath_syntax`] into display units.
//!
//! ## Architecture
//!
//! ```text
//! [Segment] ──assemble()──► [DisplayUnit] ──to_html()──► HTML
//!               │
//!               └─ per math segment: RenderAdapter ─► Renderer (MathML, cache, ...)
//! ```
//!
//! The formula typesetter is an external capability modeled by the
//! [`Renderer`] trait (or [`AsyncRenderer`]). Whatever the backend does, a
//! failure never escapes assembly: the [`RenderAdapter`] converts errors and
//! panics into [`RenderOutcome::Failed`] carrying the original delimited
//! source, which becomes a [`DisplayUnit::Error`] the user can see and fix.
//!
//! ## Examples
//!
//! ```
//! use wrongmath_render::{assemble, DisplayUnit, MathMlRenderer};
//! use wrongmath_syntax::segment;
//!
//! let source = "area $r^2$";
//! let units = assemble(&segment(source), source, &MathMlRenderer);
//! assert!(matches!(units[0], DisplayUnit::Text { ref text } if text == "area "));
//! assert!(matches!(units[1], DisplayUnit::Inline { .. }));
//! ```

pub mod adapter;
pub mod assemble;
pub mod cache;
pub mod config;
pub mod html;
pub mod mathml;

pub use adapter::RenderAdapter;
pub use assemble::{DisplayUnit, assemble, assemble_async};
pub use cache::CachedRenderer;
pub use config::{ConfigError, RenderConfig};
pub use html::to_html;
pub use mathml::MathMlRenderer;

use async_trait::async_trait;
use thiserror::Error;

/// Why an expression could not be typeset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("renderer rejected expression: {0}")]
    Backend(String),
    #[error("renderer panicked: {0}")]
    Panicked(String),
}

/// Result of handing one math segment to the render adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome<V> {
    Rendered(V),
    /// Holds the original source slice, delimiters included.
    Failed(String),
}

/// A formula typesetting capability.
///
/// Implementations must be deterministic for identical input.
pub trait Renderer {
    /// The rendered form of an expression (markup, a node handle, ...).
    type Visual;

    fn render(&self, expression: &str, display_mode: bool) -> Result<Self::Visual, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    type Visual = R::Visual;

    fn render(&self, expression: &str, display_mode: bool) -> Result<Self::Visual, RenderError> {
        (**self).render(expression, display_mode)
    }
}

/// A typesetting capability that completes asynchronously.
#[async_trait]
pub trait AsyncRenderer: Send + Sync {
    type Visual: Send + 'static;

    async fn render(&self, expression: &str, display_mode: bool)
    -> Result<Self::Visual, RenderError>;
}
