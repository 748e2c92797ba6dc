use crate::{RenderError, Renderer};
use dashmap::DashMap;

/// Memoizes a deterministic [`Renderer`] by `(expression, display_mode)`.
///
/// Both successes and backend errors are cached. Panics are not: they unwind
/// through before anything is stored.
pub struct CachedRenderer<R: Renderer> {
    inner: R,
    cache: DashMap<(String, bool), Result<R::Visual, RenderError>>,
}

impl<R: Renderer> CachedRenderer<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

impl<R> Renderer for CachedRenderer<R>
where
    R: Renderer,
    R::Visual: Clone,
{
    type Visual = R::Visual;

    fn render(&self, expression: &str, display_mode: bool) -> Result<R::Visual, RenderError> {
        let key = (expression.to_string(), display_mode);
        if let Some(hit) = self.cache.get(&key) {
            return hit.value().clone();
        }

        let result = self.inner.render(expression, display_mode);
        self.cache.insert(key, result.clone());
        result
    }
}
