//! Public entry point.
//!
//! [`Engine`] owns the host surface, the feature gate and the configuration.
//! Each method checks the gate, validates the selection before touching
//! anything, then runs one operation and returns its [`Summary`].
//! [`Engine::run`] wraps a [`Command`] so that no error or panic escapes to
//! the host.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::assign::assign_and_place;
use crate::config::EngineConfig;
use crate::convert::{elements_to_table, table_to_elements, tables_to_elements};
use crate::editor::MatrixEditor;
use crate::error::{GridError, Result};
use crate::geometry::Axis;
use crate::host::{AllowAll, FeatureGate, Operation, Surface};
use crate::layout::Cell;
use crate::model::{DuplicateSettings, ElementId, MarginSettings, MatrixSettings, SplitSettings};
use crate::report::Summary;
use crate::selection::{grid_members, resolve_grid, resolve_subject, tables_in};
use crate::shapes::{apply_margins, create_matrix, duplicate_to_grid, split_element};
use crate::tuner::{BulkSelection, SpacingTuner};

/// One-shot spacing adjustment, as driven from the command line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpacingRequest {
    #[serde(default = "default_axis")]
    pub axis: Axis,
    /// Bulk selection, applied before `lines`.
    #[serde(default)]
    pub select: Option<BulkSelection>,
    /// Row or column indices to toggle.
    #[serde(default)]
    pub lines: Vec<usize>,
    #[serde(default)]
    pub delta: f64,
    /// Gap between rows and columns; the configured default when absent.
    #[serde(default)]
    pub spacing: Option<f64>,
}

fn default_axis() -> Axis {
    Axis::Rows
}

/// A public operation with its settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    TableToElements,
    ElementsToTable,
    AddRow,
    AddColumn,
    AddHeaderRow,
    CreateSeparators,
    RealignSeparators,
    RemoveSeparators,
    AssignToCells {
        #[serde(default)]
        containers: Vec<ElementId>,
    },
    CreateMatrix(MatrixSettings),
    DuplicateToGrid(DuplicateSettings),
    SplitElement(SplitSettings),
    ApplyMargins(MarginSettings),
    AdjustSpacing(SpacingRequest),
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Command::TableToElements => Operation::TableToElements,
            Command::ElementsToTable => Operation::ElementsToTable,
            Command::AddRow => Operation::AddRow,
            Command::AddColumn => Operation::AddColumn,
            Command::AddHeaderRow => Operation::AddHeaderRow,
            Command::CreateSeparators => Operation::CreateSeparators,
            Command::RealignSeparators => Operation::RealignSeparators,
            Command::RemoveSeparators => Operation::RemoveSeparators,
            Command::AssignToCells { .. } => Operation::AssignToCells,
            Command::CreateMatrix(_) => Operation::CreateMatrix,
            Command::DuplicateToGrid(_) => Operation::DuplicateToGrid,
            Command::SplitElement(_) => Operation::SplitElement,
            Command::ApplyMargins(_) => Operation::ApplyMargins,
            Command::AdjustSpacing(_) => Operation::AdjustSpacing,
        }
    }
}

/// Outcome of [`Engine::run`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    Done { summary: Summary },
    /// Nothing was changed: the gate or a precondition said no.
    Refused { operation: Operation, message: String },
    /// The host failed, or something unexpected happened.
    Failed { operation: Operation, message: String },
}

impl Report {
    pub fn is_done(&self) -> bool {
        matches!(self, Report::Done { .. })
    }

    pub fn summary(&self) -> Option<&Summary> {
        match self {
            Report::Done { summary } => Some(summary),
            _ => None,
        }
    }

    fn from_error(operation: Operation, err: GridError) -> Self {
        let message = err.to_string();
        match err {
            GridError::Precondition(_) | GridError::GridDetection { .. } | GridError::FeatureDenied(_) => {
                Report::Refused { operation, message }
            }
            _ => Report::Failed { operation, message },
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Done { summary } => write!(f, "{summary}"),
            Report::Refused { operation, message } => write!(f, "Cannot {operation}: {message}"),
            Report::Failed { operation, message } => write!(f, "{operation} failed: {message}"),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown error")
}

/// Layout engine over one host surface.
pub struct Engine<S: Surface, G: FeatureGate = AllowAll> {
    surface: S,
    gate: G,
    config: EngineConfig,
}

impl<S: Surface> Engine<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, EngineConfig::default())
    }

    pub fn with_config(surface: S, config: EngineConfig) -> Self {
        Self {
            surface,
            gate: AllowAll,
            config,
        }
    }
}

impl<S: Surface, G: FeatureGate> Engine<S, G> {
    pub fn with_gate(surface: S, gate: G, config: EngineConfig) -> Self {
        Self { surface, gate, config }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn check(&self, op: Operation) -> Result<()> {
        self.config.validate()?;
        if self.gate.allows(op) {
            Ok(())
        } else {
            tracing::debug!(%op, "operation denied by feature gate");
            Err(GridError::FeatureDenied(op))
        }
    }

    /// The single selected element.
    fn single_selected(&self, what: &str) -> Result<ElementId> {
        match self.surface.selection().as_slice() {
            [only] => Ok(*only),
            _ => Err(GridError::precondition(format!("select exactly one {what}"))),
        }
    }

    /// Converts every selected table into free elements. A single table
    /// rolls back and fails as a whole; with several, each is independent.
    pub fn table_to_elements(&mut self) -> Result<Summary> {
        self.check(Operation::TableToElements)?;
        let tables = tables_in(&self.surface, &self.surface.selection())?;
        match tables.as_slice() {
            [] => Err(GridError::precondition("select at least one table")),
            [one] => table_to_elements(&mut self.surface, *one, &self.config),
            many => Ok(tables_to_elements(&mut self.surface, many, &self.config)),
        }
    }

    pub fn elements_to_table(&mut self) -> Result<Summary> {
        self.check(Operation::ElementsToTable)?;
        let grid = resolve_grid(&self.surface, &self.surface.selection(), &self.config)?;
        elements_to_table(&mut self.surface, &grid)
    }

    pub fn add_row(&mut self) -> Result<Summary> {
        self.check(Operation::AddRow)?;
        let subject = resolve_subject(&self.surface, &self.surface.selection(), &self.config)?;
        MatrixEditor::new(&mut self.surface, &self.config).add_row(&subject)
    }

    pub fn add_column(&mut self) -> Result<Summary> {
        self.check(Operation::AddColumn)?;
        let subject = resolve_subject(&self.surface, &self.surface.selection(), &self.config)?;
        MatrixEditor::new(&mut self.surface, &self.config).add_column(&subject)
    }

    pub fn add_header_row(&mut self) -> Result<Summary> {
        self.check(Operation::AddHeaderRow)?;
        let subject = resolve_subject(&self.surface, &self.surface.selection(), &self.config)?;
        MatrixEditor::new(&mut self.surface, &self.config).add_header_row(&subject)
    }

    pub fn create_separators(&mut self) -> Result<Summary> {
        self.check(Operation::CreateSeparators)?;
        let grid = resolve_grid(&self.surface, &self.surface.selection(), &self.config)?;
        MatrixEditor::new(&mut self.surface, &self.config).create_separators(&grid)
    }

    pub fn realign_separators(&mut self) -> Result<Summary> {
        self.check(Operation::RealignSeparators)?;
        let grid = resolve_grid(&self.surface, &self.surface.selection(), &self.config)?;
        MatrixEditor::new(&mut self.surface, &self.config).realign_separators(&grid)
    }

    pub fn remove_separators(&mut self) -> Result<Summary> {
        self.check(Operation::RemoveSeparators)?;
        Ok(MatrixEditor::new(&mut self.surface, &self.config).remove_separators())
    }

    /// Centres the selected elements in cells.
    ///
    /// With `containers` empty the selection must hold exactly one table,
    /// whose cells are used. Otherwise each container's rectangle is a cell,
    /// in the given order. Every other selected element is a target.
    pub fn assign_to_cells(&mut self, containers: &[ElementId]) -> Result<Summary> {
        self.check(Operation::AssignToCells)?;
        let selection = self.surface.selection();
        let (cells, excluded) = if containers.is_empty() {
            let tables = tables_in(&self.surface, &selection)?;
            let [table] = tables.as_slice() else {
                return Err(GridError::precondition(
                    "select exactly one table together with the elements to place",
                ));
            };
            (Cell::from_table(&self.surface, *table)?, vec![*table])
        } else {
            let mut cells = Vec::with_capacity(containers.len());
            for (col, id) in containers.iter().enumerate() {
                cells.push(Cell {
                    row: 0,
                    col,
                    geometry: self.surface.geometry(*id)?,
                });
            }
            (cells, containers.to_vec())
        };
        let targets: Vec<ElementId> = grid_members(&self.surface, &selection)?
            .into_iter()
            .map(|e| e.id)
            .filter(|id| !excluded.contains(id))
            .collect();
        if targets.is_empty() {
            return Err(GridError::precondition("select the elements to place into cells"));
        }
        assign_and_place(&mut self.surface, &targets, &cells)
    }

    /// Draws a new matrix at the first selected element's top-left corner,
    /// or at the slide origin with nothing selected.
    pub fn create_matrix(&mut self, settings: &MatrixSettings) -> Result<Summary> {
        self.check(Operation::CreateMatrix)?;
        let origin = match self.surface.selection().first() {
            Some(id) => {
                let g = self.surface.geometry(*id)?;
                (g.left, g.top)
            }
            None => (0.0, 0.0),
        };
        create_matrix(&mut self.surface, settings, origin)
    }

    pub fn duplicate_to_grid(&mut self, settings: &DuplicateSettings) -> Result<Summary> {
        self.check(Operation::DuplicateToGrid)?;
        let source = self.single_selected("element to duplicate")?;
        duplicate_to_grid(&mut self.surface, source, settings)
    }

    pub fn split_element(&mut self, settings: &SplitSettings) -> Result<Summary> {
        self.check(Operation::SplitElement)?;
        let source = self.single_selected("element to split")?;
        split_element(&mut self.surface, source, settings, &self.config)
    }

    pub fn apply_margins(&mut self, settings: &MarginSettings) -> Result<Summary> {
        self.check(Operation::ApplyMargins)?;
        let selection = self.surface.selection();
        if selection.is_empty() {
            return Err(GridError::precondition("select elements or tables to set margins on"));
        }
        apply_margins(&mut self.surface, &selection, settings)
    }

    /// Starts an interactive spacing session over the selected grid.
    pub fn open_tuner(&mut self) -> Result<SpacingTuner> {
        self.check(Operation::AdjustSpacing)?;
        let grid = resolve_grid(&self.surface, &self.surface.selection(), &self.config)?;
        SpacingTuner::open(&mut self.surface, &grid, &self.config)
    }

    /// Runs a whole tuner session in one go and commits it.
    pub fn adjust_spacing(&mut self, request: &SpacingRequest) -> Result<Summary> {
        let mut tuner = self.open_tuner()?;
        let now = Instant::now();
        tuner.set_axis(request.axis, now)?;
        if let Some(bulk) = request.select {
            tuner.select(bulk, now)?;
        }
        for &line in &request.lines {
            tuner.toggle(line, now)?;
        }
        tuner.set_delta(request.delta, now)?;
        if let Some(spacing) = request.spacing {
            tuner.set_spacing(spacing, now)?;
        }
        tuner.commit(&mut self.surface)
    }

    fn dispatch(&mut self, command: &Command) -> Result<Summary> {
        match command {
            Command::TableToElements => self.table_to_elements(),
            Command::ElementsToTable => self.elements_to_table(),
            Command::AddRow => self.add_row(),
            Command::AddColumn => self.add_column(),
            Command::AddHeaderRow => self.add_header_row(),
            Command::CreateSeparators => self.create_separators(),
            Command::RealignSeparators => self.realign_separators(),
            Command::RemoveSeparators => self.remove_separators(),
            Command::AssignToCells { containers } => self.assign_to_cells(containers),
            Command::CreateMatrix(settings) => self.create_matrix(settings),
            Command::DuplicateToGrid(settings) => self.duplicate_to_grid(settings),
            Command::SplitElement(settings) => self.split_element(settings),
            Command::ApplyMargins(settings) => self.apply_margins(settings),
            Command::AdjustSpacing(request) => self.adjust_spacing(request),
        }
    }

    /// Runs `command`, turning every error and panic into a [`Report`].
    pub fn run(&mut self, command: &Command) -> Report {
        let operation = command.operation();
        match catch_unwind(AssertUnwindSafe(|| self.dispatch(command))) {
            Ok(Ok(summary)) => {
                tracing::info!(%operation, "{summary}");
                Report::Done { summary }
            }
            Ok(Err(err)) => {
                tracing::warn!(%operation, %err, "operation did not complete");
                Report::from_error(operation, err)
            }
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                tracing::error!(%operation, detail, "operation panicked");
                Report::Failed {
                    operation,
                    message: "an unexpected error occurred, nothing further was changed".to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::host::DenyList;
    use crate::host::MemorySurface;

    #[test]
    fn command_json_is_tagged() {
        let cmd: Command = serde_json::from_str(
            r#"{"command": "split_element", "rows": 2, "columns": 3, "spacing": 4.0}"#,
        )
        .unwrap();
        assert_eq!(cmd.operation(), Operation::SplitElement);
        let cmd: Command = serde_json::from_str(r#"{"command": "add_row"}"#).unwrap();
        assert_eq!(cmd, Command::AddRow);
    }

    #[test]
    fn denied_operation_is_refused() {
        let gate = DenyList::new([Operation::AddRow]);
        let mut engine = Engine::with_gate(MemorySurface::new(), gate, EngineConfig::default());
        assert_eq!(engine.add_row(), Err(GridError::FeatureDenied(Operation::AddRow)));
        let report = engine.run(&Command::AddRow);
        assert_eq!(report.to_string(), "Cannot add row: add row is not available");
    }

    #[test]
    fn invalid_config_is_refused_without_changes() {
        let mut surface = MemorySurface::new();
        let ids: Vec<ElementId> = [0.0, 100.0]
            .map(|left| surface.add_shape(Geometry::new(left, 0.0, 80.0, 60.0)))
            .to_vec();
        surface.select(&ids);
        let before = surface.clone();
        let config = EngineConfig {
            min_tolerance: 40.0,
            max_tolerance: 10.0,
            ..EngineConfig::default()
        };
        let mut engine = Engine::with_config(surface, config);
        assert!(engine.add_row().unwrap_err().is_precondition());
        let report = engine.run(&Command::AddRow);
        assert!(matches!(report, Report::Refused { .. }), "{report}");
        assert_eq!(engine.surface().nodes(), before.nodes());
    }

    #[test]
    fn panic_payloads_are_read() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("boom"));
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown error");
    }
}
