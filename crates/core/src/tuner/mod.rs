//! Interactive spacing and size adjustment.
//!
//! A [`SpacingTuner`] session is driven by a UI: every parameter change marks
//! the session [`TunerState::PreviewPending`], and the host's event loop
//! calls [`SpacingTuner::poll`] with the current time so the preview is only
//! recomputed once input has settled for [`EngineConfig::preview_debounce`].
//! The tuner never holds the surface; each call that touches geometry
//! borrows it.

mod layout;
mod selection;

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

pub use layout::{LayoutParams, Snapshot, solve};
pub use selection::BulkSelection;

use crate::config::EngineConfig;
use crate::error::{GridError, Result};
use crate::geometry::{Axis, EPSILON};
use crate::host::{Operation, Surface};
use crate::layout::Grid;
use crate::model::ElementId;
use crate::report::Summary;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TunerState {
    /// Surface matches the baseline (or the original, after a reset).
    Idle,
    /// Parameters changed since the last commit.
    PreviewPending,
    /// Last preview was committed as the new baseline.
    Committed,
    /// Session over; the original geometry was restored.
    Cancelled,
}

/// One open adjustment session over a grid.
#[derive(Debug, Clone)]
pub struct SpacingTuner {
    rows: Vec<Vec<ElementId>>,
    original: Snapshot,
    baseline: Snapshot,
    anchor: (f64, f64),
    axis: Axis,
    selected: BTreeSet<usize>,
    delta: f64,
    spacing: f64,
    default_spacing: f64,
    min_size: f64,
    debounce: Duration,
    changed_at: Option<Instant>,
    state: TunerState,
}

impl SpacingTuner {
    /// Captures the grid's current geometry and normalizes it to the
    /// default spacing.
    pub fn open<S: Surface + ?Sized>(surface: &mut S, grid: &Grid, config: &EngineConfig) -> Result<Self> {
        let rows: Vec<Vec<ElementId>> = grid.rows().iter().map(|r| r.iter().map(|e| e.id).collect()).collect();
        let mut original = Snapshot::with_capacity(grid.len());
        for id in rows.iter().flatten() {
            original.insert(*id, surface.geometry(*id)?);
        }
        let anchor = original.values().fold((f64::INFINITY, f64::INFINITY), |(l, t), g| {
            (l.min(g.left), t.min(g.top))
        });

        let mut tuner = Self {
            rows,
            original,
            baseline: Snapshot::new(),
            anchor,
            axis: Axis::Rows,
            selected: BTreeSet::new(),
            delta: 0.0,
            spacing: config.default_spacing,
            default_spacing: config.default_spacing,
            min_size: config.min_element_size,
            debounce: config.preview_debounce,
            changed_at: None,
            state: TunerState::Idle,
        };
        tuner.baseline = tuner.layout(&tuner.original, 0.0);
        apply(surface, &tuner.baseline)?;
        tracing::debug!(
            rows = tuner.rows.len(),
            spacing = tuner.spacing,
            "tuner opened"
        );
        Ok(tuner)
    }

    pub fn state(&self) -> TunerState {
        self.state
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn original(&self) -> &Snapshot {
        &self.original
    }

    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    /// Number of rows or columns selectable on the current axis.
    pub fn line_count(&self) -> usize {
        match self.axis {
            Axis::Rows => self.rows.len(),
            Axis::Columns => self.rows.iter().map(Vec::len).max().unwrap_or(0),
        }
    }

    /// Switches between row and column selection. The selection is cleared
    /// when the axis changes.
    pub fn set_axis(&mut self, axis: Axis, now: Instant) -> Result<()> {
        self.ensure_open()?;
        if axis != self.axis {
            self.axis = axis;
            self.selected.clear();
            self.touch(now);
        }
        Ok(())
    }

    /// Flips one row or column in or out of the selection.
    pub fn toggle(&mut self, index: usize, now: Instant) -> Result<()> {
        self.ensure_open()?;
        if index >= self.line_count() {
            return Err(GridError::precondition(format!(
                "no {} at index {index}",
                match self.axis {
                    Axis::Rows => "row",
                    Axis::Columns => "column",
                }
            )));
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        self.touch(now);
        Ok(())
    }

    pub fn select(&mut self, bulk: BulkSelection, now: Instant) -> Result<()> {
        self.ensure_open()?;
        self.selected = bulk.indices(self.line_count());
        self.touch(now);
        Ok(())
    }

    /// Signed size change for the selected rows or columns, in points.
    pub fn set_delta(&mut self, delta: f64, now: Instant) -> Result<()> {
        self.ensure_open()?;
        self.delta = delta;
        self.touch(now);
        Ok(())
    }

    /// Gap between rows and between columns, in points.
    pub fn set_spacing(&mut self, spacing: f64, now: Instant) -> Result<()> {
        self.ensure_open()?;
        self.spacing = spacing.max(0.0);
        self.touch(now);
        Ok(())
    }

    /// Recomputes the preview once input has been quiet for the debounce
    /// interval. Returns whether a preview ran.
    pub fn poll<S: Surface + ?Sized>(&mut self, surface: &mut S, now: Instant) -> Result<bool> {
        self.ensure_open()?;
        match self.changed_at {
            Some(at) if now.saturating_duration_since(at) >= self.debounce => {
                self.preview(surface)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Lays the grid out from the baseline with the current parameters.
    pub fn preview<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        self.ensure_open()?;
        let geometry = self.layout(&self.baseline, self.delta);
        self.changed_at = None;
        self.state = TunerState::PreviewPending;
        apply(surface, &geometry)
    }

    /// Keeps the previewed geometry as the new baseline and zeroes the delta.
    pub fn commit<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<Summary> {
        self.ensure_open()?;
        let geometry = self.layout(&self.baseline, self.delta);
        apply(surface, &geometry)?;

        let mut summary = Summary::new(Operation::AdjustSpacing);
        summary.rows = self.rows.len();
        summary.columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        summary.modified = geometry
            .iter()
            .filter(|(id, g)| self.original.get(*id).is_none_or(|o| !o.approx_eq(g, EPSILON)))
            .count();

        self.baseline = geometry;
        self.delta = 0.0;
        self.changed_at = None;
        self.state = TunerState::Committed;
        Ok(summary)
    }

    /// Puts every element back where the session found it. The baseline is
    /// recomputed at the default spacing; the selection is kept.
    pub fn reset<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        self.ensure_open()?;
        apply(surface, &self.original)?;
        self.delta = 0.0;
        self.spacing = self.default_spacing;
        self.baseline = self.layout(&self.original, 0.0);
        self.changed_at = None;
        self.state = TunerState::Idle;
        Ok(())
    }

    /// Restores the original geometry and closes the session.
    pub fn cancel<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        self.ensure_open()?;
        self.state = TunerState::Cancelled;
        self.changed_at = None;
        apply(surface, &self.original)
    }

    fn layout(&self, base: &Snapshot, delta: f64) -> Snapshot {
        let params = LayoutParams {
            axis: self.axis,
            selected: &self.selected,
            delta,
            spacing: self.spacing,
            anchor: self.anchor,
            min_size: self.min_size,
        };
        solve(&self.rows, base, &params)
    }

    fn touch(&mut self, now: Instant) {
        self.changed_at = Some(now);
        self.state = TunerState::PreviewPending;
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            TunerState::Cancelled => Err(GridError::SessionClosed),
            _ => Ok(()),
        }
    }
}

/// Writes every geometry in the snapshot, attempting all of them before
/// reporting the first failure.
fn apply<S: Surface + ?Sized>(surface: &mut S, snapshot: &Snapshot) -> Result<()> {
    let mut first_err = None;
    for (id, g) in snapshot {
        if let Err(err) = surface.set_geometry(*id, *g) {
            tracing::warn!(%id, %err, "could not move element");
            first_err.get_or_insert(err);
        }
    }
    first_err.map_or(Ok(()), Err)
}
