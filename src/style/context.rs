//! Rendering defaults owned by the caller
//!
//! A [`StyleContext`] holds the [`StyleParams`] new figures are built from.
//! Profiles are applied either for the rest of the context's life
//! ([`StyleContext::use_style`]) or for a bounded scope
//! ([`StyleContext::scoped`], [`StyleContext::with_style`]). Both go through
//! the same [`StyleContext::apply`] / [`StyleContext::reset`] pair.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use super::error::StyleError;
use super::params::StyleParams;
use super::profile::{LoadedStyle, StyleLibrary};

/// Parameters captured before a profile was applied
#[derive(Debug, Clone, PartialEq)]
#[must_use = "dropping a snapshot loses the defaults it captured"]
pub struct StyleSnapshot(StyleParams);

#[derive(Debug, Clone, Default)]
pub struct StyleContext {
    params: StyleParams,
    library: StyleLibrary,
}

impl StyleContext {
    /// A context with built-in defaults, loading profiles from `library`
    pub fn new(library: StyleLibrary) -> Self {
        Self {
            params: StyleParams::default(),
            library,
        }
    }

    pub fn params(&self) -> &StyleParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut StyleParams {
        &mut self.params
    }

    pub fn library(&self) -> &StyleLibrary {
        &self.library
    }

    /// Apply a loaded profile, returning what it replaced.
    ///
    /// Values are validated before anything is written.
    pub fn apply(&mut self, style: &LoadedStyle) -> Result<StyleSnapshot, StyleError> {
        let mut next = self.params.clone();
        next.apply_sheet(&style.sheet)
            .map_err(|e| StyleError::InvalidValue {
                path: style.path.clone(),
                source_text: style.source.clone(),
                key: e.key,
                span: e.span,
                message: e.message,
            })?;
        debug!(profile = %style.profile, "applied style");
        Ok(StyleSnapshot(std::mem::replace(&mut self.params, next)))
    }

    /// Put back parameters captured by [`StyleContext::apply`]
    pub fn reset(&mut self, snapshot: StyleSnapshot) {
        self.params = snapshot.0;
    }

    /// Restore the built-in defaults
    pub fn reset_defaults(&mut self) {
        self.params = StyleParams::default();
    }

    /// Apply a profile for the rest of this context's life
    pub fn use_style(&mut self, tag: &str) -> Result<(), StyleError> {
        let style = self.library.load(tag)?;
        let _previous = self.apply(&style)?;
        Ok(())
    }

    /// Apply a profile until the returned guard is dropped
    pub fn scoped(&mut self, tag: &str) -> Result<StyleScope<'_>, StyleError> {
        let style = self.library.load(tag)?;
        let snapshot = self.apply(&style)?;
        Ok(StyleScope {
            ctx: self,
            snapshot: Some(snapshot),
        })
    }

    /// Run `f` with a profile applied, restoring the previous defaults afterwards
    pub fn with_style<T>(
        &mut self,
        tag: &str,
        f: impl FnOnce(&mut StyleContext) -> T,
    ) -> Result<T, StyleError> {
        let mut scope = self.scoped(tag)?;
        Ok(f(&mut scope))
    }
}

/// Guard returned by [`StyleContext::scoped`]
///
/// Dereferences to the context; restores the prior defaults on drop, including
/// during unwinding.
pub struct StyleScope<'a> {
    ctx: &'a mut StyleContext,
    snapshot: Option<StyleSnapshot>,
}

impl Deref for StyleScope<'_> {
    type Target = StyleContext;

    fn deref(&self) -> &StyleContext {
        self.ctx
    }
}

impl DerefMut for StyleScope<'_> {
    fn deref_mut(&mut self) -> &mut StyleContext {
        self.ctx
    }
}

impl Drop for StyleScope<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.ctx.reset(snapshot);
        }
    }
}
