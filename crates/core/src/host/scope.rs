//! Scoped creation with rollback on every exit path.

use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::geometry::Geometry;
use crate::model::{ElementId, ElementKind};

use super::Surface;

/// Tracks elements created for one subject and deletes them when dropped
/// without [`commit`](CreationScope::commit).
///
/// Early returns through `?` and unwinding panics both roll back, so a
/// failed single-subject conversion never leaves half its output behind.
pub struct CreationScope<'s, S: Surface + ?Sized> {
    surface: &'s mut S,
    created: Vec<ElementId>,
    committed: bool,
}

impl<'s, S: Surface + ?Sized> CreationScope<'s, S> {
    pub fn new(surface: &'s mut S) -> Self {
        Self {
            surface,
            created: Vec::new(),
            committed: false,
        }
    }

    pub fn create_element(&mut self, kind: ElementKind, geometry: Geometry) -> Result<ElementId> {
        let id = self.surface.create_element(kind, geometry)?;
        self.created.push(id);
        Ok(id)
    }

    pub fn create_table(&mut self, rows: usize, cols: usize, geometry: Geometry) -> Result<ElementId> {
        let id = self.surface.create_table(rows, cols, geometry)?;
        self.created.push(id);
        Ok(id)
    }

    pub fn created(&self) -> &[ElementId] {
        &self.created
    }

    /// Keeps everything created so far and returns it in creation order.
    pub fn commit(mut self) -> Vec<ElementId> {
        self.committed = true;
        std::mem::take(&mut self.created)
    }
}

impl<S: Surface + ?Sized> Deref for CreationScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for CreationScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for CreationScope<'_, S> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for id in self.created.drain(..).rev() {
            if let Err(err) = self.surface.delete(id) {
                tracing::warn!(%id, %err, "rollback could not delete element");
            }
        }
    }
}
