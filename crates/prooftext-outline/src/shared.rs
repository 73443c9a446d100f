use std::sync::{Arc, Mutex, MutexGuard};

use crate::edit::Edit;
use crate::ir::{Label, RenderedLine};
use crate::outline::{Outline, OutlineError};

/// An [`Outline`] shared between editors.
///
/// Edits are serialised through a mutex, so a renumbering walk is never
/// observed halfway. Cloning the handle shares the same outline.
#[derive(Debug, Clone, Default)]
pub struct SharedOutline {
    inner: Arc<Mutex<Outline>>,
}

impl SharedOutline {
    pub fn new(outline: Outline) -> Self {
        Self {
            inner: Arc::new(Mutex::new(outline)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Outline>, OutlineError> {
        self.inner.lock().map_err(|_| OutlineError::Poisoned)
    }

    pub fn apply(&self, edit: &Edit) -> Result<Option<Label>, OutlineError> {
        self.lock()?.apply(edit)
    }

    /// Runs `f` with exclusive access to the outline.
    pub fn with<R>(&self, f: impl FnOnce(&mut Outline) -> R) -> Result<R, OutlineError> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    pub fn snapshot(&self) -> Result<Outline, OutlineError> {
        Ok(self.lock()?.clone())
    }

    pub fn render_labels(&self) -> Result<Vec<RenderedLine>, OutlineError> {
        Ok(self.lock()?.render_labels())
    }
}
