//! In-memory host surface.
//!
//! A complete [`Surface`] over a single slide held in memory. It backs the
//! command-line tool (the struct is the JSON document format) and the tests,
//! which can also inject host failures through [`Faults`].

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{GridError, Result};
use crate::geometry::Geometry;
use crate::model::{ElementId, ElementKind, Style, StylePart};

use super::{StyleTarget, Surface};

/// Line height as a multiple of the font size when fitting text.
const LINE_SPACING: f64 = 1.2;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellData {
    pub text: String,
    pub style: Style,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub row_heights: Vec<f64>,
    pub column_widths: Vec<f64>,
    /// Row-major cells.
    pub cells: Vec<Vec<CellData>>,
}

impl TableData {
    fn uniform(rows: usize, cols: usize, frame: Geometry) -> Self {
        Self {
            row_heights: vec![frame.height / rows as f64; rows],
            column_widths: vec![frame.width / cols as f64; cols],
            cells: vec![vec![CellData::default(); cols]; rows],
        }
    }

    fn cell(&self, row: usize, col: usize) -> Result<&CellData> {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or(GridError::CellOutOfRange { row, col })
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut CellData> {
        self.cells
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(GridError::CellOutOfRange { row, col })
    }
}

/// One element on the slide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: ElementId,
    pub kind: ElementKind,
    pub geometry: Geometry,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub name: SmolStr,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableData>,
}

/// Host failures to simulate.
#[derive(Clone, Debug, Default)]
pub struct Faults {
    /// Creation fails once this many elements have been created.
    pub create_budget: Option<usize>,
    pub style: FxHashSet<StyleTarget>,
    pub text: FxHashSet<StyleTarget>,
    pub geometry: FxHashSet<ElementId>,
    pub delete: FxHashSet<ElementId>,
    /// Creation panics instead of failing, as a crashing host would.
    pub panic_on_create: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySurface {
    /// Elements back to front.
    nodes: Vec<Node>,
    selection: Vec<ElementId>,
    next_id: u64,
    metadata_enabled: bool,
    /// Grow text elements to fit their text whenever text is written.
    auto_fit_text: bool,
    #[serde(skip)]
    faults: Faults,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, enabled: bool) -> Self {
        self.metadata_enabled = enabled;
        self
    }

    pub fn with_auto_fit(mut self, enabled: bool) -> Self {
        self.auto_fit_text = enabled;
        self
    }

    pub fn faults_mut(&mut self) -> &mut Faults {
        &mut self.faults
    }

    pub fn select(&mut self, ids: &[ElementId]) {
        self.selection = ids.to_vec();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Ids of every element of the given kind, back to front.
    pub fn ids_of_kind(&self, kind: ElementKind) -> Vec<ElementId> {
        self.nodes
            .iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.id)
            .collect()
    }

    /// Adds a shape, bypassing fault injection.
    pub fn add_shape(&mut self, geometry: Geometry) -> ElementId {
        self.insert(ElementKind::Shape, geometry, None)
    }

    pub fn add_text(&mut self, geometry: Geometry, text: &str) -> ElementId {
        let id = self.insert(ElementKind::TextFrame, geometry, None);
        if let Some(node) = self.nodes.last_mut() {
            node.text = text.to_string();
        }
        id
    }

    pub fn set_rotation(&mut self, id: ElementId, degrees: f64) -> Result<()> {
        self.node_mut(id)?.rotation = degrees;
        Ok(())
    }

    /// Adds a table with explicit row heights and column widths.
    pub fn add_table(&mut self, left: f64, top: f64, row_heights: &[f64], column_widths: &[f64]) -> ElementId {
        let frame = Geometry::new(
            left,
            top,
            column_widths.iter().sum(),
            row_heights.iter().sum(),
        );
        let table = TableData {
            row_heights: row_heights.to_vec(),
            column_widths: column_widths.to_vec(),
            cells: vec![vec![CellData::default(); column_widths.len()]; row_heights.len()],
        };
        self.insert(ElementKind::Table, frame, Some(table))
    }

    fn insert(&mut self, kind: ElementKind, geometry: Geometry, table: Option<TableData>) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        let style = if kind.is_line() {
            Style {
                fill: crate::model::FillStyle {
                    visible: false,
                    ..Default::default()
                },
                ..Default::default()
            }
        } else {
            Style::default()
        };
        self.nodes.push(Node {
            id,
            kind,
            geometry,
            rotation: 0.0,
            name: SmolStr::new(format!("{kind:?} {}", id.0)),
            text: String::new(),
            style,
            metadata: IndexMap::new(),
            table,
        });
        id
    }

    fn position(&self, id: ElementId) -> Result<usize> {
        self.nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(GridError::ElementNotFound(id))
    }

    fn node(&self, id: ElementId) -> Result<&Node> {
        self.get(id).ok_or(GridError::ElementNotFound(id))
    }

    fn node_mut(&mut self, id: ElementId) -> Result<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(GridError::ElementNotFound(id))
    }

    fn table(&self, id: ElementId) -> Result<&TableData> {
        self.node(id)?
            .table
            .as_ref()
            .ok_or_else(|| GridError::host("table", format!("element {id} is not a table")))
    }

    fn table_node_mut(&mut self, id: ElementId) -> Result<(&mut Geometry, &mut TableData)> {
        let node = self.node_mut(id)?;
        match node.table.as_mut() {
            Some(table) => Ok((&mut node.geometry, table)),
            None => Err(GridError::host("table", format!("element {id} is not a table"))),
        }
    }

    fn take_create_budget(&mut self) -> Result<()> {
        if let Some(budget) = self.faults.create_budget.as_mut() {
            if *budget == 0 {
                return Err(GridError::host("create", "host refused to create element"));
            }
            *budget -= 1;
        }
        Ok(())
    }

    fn fitted_height(text: &str, style: &Style) -> f64 {
        let lines = text.lines().count().max(1) as f64;
        lines * style.font.size * LINE_SPACING + style.margins.top + style.margins.bottom
    }
}

impl Surface for MemorySurface {
    fn selection(&self) -> Vec<ElementId> {
        self.selection
            .iter()
            .copied()
            .filter(|id| self.get(*id).is_some())
            .collect()
    }

    fn elements(&self) -> Vec<ElementId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    fn kind(&self, id: ElementId) -> Result<ElementKind> {
        Ok(self.node(id)?.kind)
    }

    fn geometry(&self, id: ElementId) -> Result<Geometry> {
        Ok(self.node(id)?.geometry)
    }

    fn set_geometry(&mut self, id: ElementId, geometry: Geometry) -> Result<()> {
        if self.faults.geometry.contains(&id) {
            return Err(GridError::host("set_geometry", format!("element {id} is locked")));
        }
        let node = self.node_mut(id)?;
        if let Some(table) = node.table.as_mut() {
            let old = node.geometry;
            if old.height > 0.0 {
                let k = geometry.height / old.height;
                table.row_heights.iter_mut().for_each(|h| *h *= k);
            }
            if old.width > 0.0 {
                let k = geometry.width / old.width;
                table.column_widths.iter_mut().for_each(|w| *w *= k);
            }
        }
        node.geometry = geometry;
        Ok(())
    }

    fn rotation(&self, id: ElementId) -> Result<f64> {
        Ok(self.node(id)?.rotation)
    }

    fn name(&self, id: ElementId) -> Result<String> {
        Ok(self.node(id)?.name.to_string())
    }

    fn set_name(&mut self, id: ElementId, name: &str) -> Result<()> {
        self.node_mut(id)?.name = SmolStr::new(name);
        Ok(())
    }

    fn supports_metadata(&self) -> bool {
        self.metadata_enabled
    }

    fn metadata(&self, id: ElementId, key: &str) -> Result<Option<String>> {
        Ok(self.node(id)?.metadata.get(key).cloned())
    }

    fn set_metadata(&mut self, id: ElementId, key: &str, value: &str) -> Result<()> {
        if !self.metadata_enabled {
            return Err(GridError::host("set_metadata", "metadata is disabled"));
        }
        self.node_mut(id)?
            .metadata
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn create_element(&mut self, kind: ElementKind, geometry: Geometry) -> Result<ElementId> {
        if kind.is_table() {
            return Err(GridError::host("create_element", "use create_table for tables"));
        }
        if self.faults.panic_on_create {
            panic!("host crashed while creating {kind:?}");
        }
        self.take_create_budget()?;
        Ok(self.insert(kind, geometry, None))
    }

    fn create_table(&mut self, rows: usize, cols: usize, geometry: Geometry) -> Result<ElementId> {
        if rows == 0 || cols == 0 {
            return Err(GridError::host("create_table", "a table needs at least one cell"));
        }
        self.take_create_budget()?;
        let table = TableData::uniform(rows, cols, geometry);
        Ok(self.insert(ElementKind::Table, geometry, Some(table)))
    }

    fn delete(&mut self, id: ElementId) -> Result<()> {
        if self.faults.delete.contains(&id) {
            return Err(GridError::host("delete", format!("element {id} is locked")));
        }
        let pos = self.position(id)?;
        self.nodes.remove(pos);
        self.selection.retain(|s| *s != id);
        Ok(())
    }

    fn bring_to_front(&mut self, id: ElementId) -> Result<()> {
        let pos = self.position(id)?;
        let node = self.nodes.remove(pos);
        self.nodes.push(node);
        Ok(())
    }

    fn autosize(&mut self, id: ElementId) -> Result<()> {
        let node = self.node_mut(id)?;
        if !node.kind.has_text_frame() {
            return Ok(());
        }
        node.geometry.height = Self::fitted_height(&node.text, &node.style);
        Ok(())
    }

    fn text(&self, target: StyleTarget) -> Result<String> {
        match target {
            StyleTarget::Element(id) => Ok(self.node(id)?.text.clone()),
            StyleTarget::Cell { table, row, col } => Ok(self.table(table)?.cell(row, col)?.text.clone()),
        }
    }

    fn set_text(&mut self, target: StyleTarget, text: &str) -> Result<()> {
        if self.faults.text.contains(&target) {
            return Err(GridError::host("set_text", format!("{target} rejected text")));
        }
        match target {
            StyleTarget::Element(id) => {
                let auto_fit = self.auto_fit_text;
                let node = self.node_mut(id)?;
                if !node.kind.has_text_frame() {
                    return Err(GridError::host("set_text", format!("element {id} has no text frame")));
                }
                node.text = text.to_string();
                if auto_fit {
                    let fitted = Self::fitted_height(&node.text, &node.style);
                    node.geometry.height = node.geometry.height.max(fitted);
                }
            }
            StyleTarget::Cell { table, row, col } => {
                let (_, data) = self.table_node_mut(table)?;
                data.cell_mut(row, col)?.text = text.to_string();
            }
        }
        Ok(())
    }

    fn style(&self, target: StyleTarget) -> Result<Style> {
        match target {
            StyleTarget::Element(id) => Ok(self.node(id)?.style.clone()),
            StyleTarget::Cell { table, row, col } => Ok(self.table(table)?.cell(row, col)?.style.clone()),
        }
    }

    fn set_style_part(&mut self, target: StyleTarget, part: StylePart) -> Result<()> {
        if self.faults.style.contains(&target) {
            return Err(GridError::host(
                "set_style",
                format!("{target} rejected {}", part.name()),
            ));
        }
        match target {
            StyleTarget::Element(id) => part.apply_to(&mut self.node_mut(id)?.style),
            StyleTarget::Cell { table, row, col } => {
                let (_, data) = self.table_node_mut(table)?;
                part.apply_to(&mut data.cell_mut(row, col)?.style);
            }
        }
        Ok(())
    }

    fn can_bulk_clone_style(&self, src: ElementId, dst: ElementId) -> bool {
        match (self.get(src), self.get(dst)) {
            (Some(a), Some(b)) => {
                a.kind.has_text_frame()
                    && b.kind.has_text_frame()
                    && !self.faults.style.contains(&StyleTarget::Element(dst))
            }
            _ => false,
        }
    }

    fn clone_style(&mut self, src: ElementId, dst: ElementId) -> Result<()> {
        let style = self.node(src)?.style.clone();
        self.node_mut(dst)?.style = style;
        Ok(())
    }

    fn table_size(&self, table: ElementId) -> Result<(usize, usize)> {
        let data = self.table(table)?;
        Ok((data.row_heights.len(), data.column_widths.len()))
    }

    fn row_height(&self, table: ElementId, row: usize) -> Result<f64> {
        self.table(table)?
            .row_heights
            .get(row)
            .copied()
            .ok_or(GridError::CellOutOfRange { row, col: 0 })
    }

    fn column_width(&self, table: ElementId, col: usize) -> Result<f64> {
        self.table(table)?
            .column_widths
            .get(col)
            .copied()
            .ok_or(GridError::CellOutOfRange { row: 0, col })
    }

    fn set_row_height(&mut self, table: ElementId, row: usize, height: f64) -> Result<()> {
        let (frame, data) = self.table_node_mut(table)?;
        let slot = data
            .row_heights
            .get_mut(row)
            .ok_or(GridError::CellOutOfRange { row, col: 0 })?;
        *slot = height;
        frame.height = data.row_heights.iter().sum();
        Ok(())
    }

    fn set_column_width(&mut self, table: ElementId, col: usize, width: f64) -> Result<()> {
        let (frame, data) = self.table_node_mut(table)?;
        let slot = data
            .column_widths
            .get_mut(col)
            .ok_or(GridError::CellOutOfRange { row: 0, col })?;
        *slot = width;
        frame.width = data.column_widths.iter().sum();
        Ok(())
    }

    fn insert_row(&mut self, table: ElementId, at: usize) -> Result<()> {
        let (frame, data) = self.table_node_mut(table)?;
        if at > data.row_heights.len() {
            return Err(GridError::CellOutOfRange { row: at, col: 0 });
        }
        let template = at.saturating_sub(1);
        let height = data.row_heights.get(template).copied().unwrap_or_default();
        let cols = data.column_widths.len();
        data.row_heights.insert(at, height);
        data.cells.insert(at, vec![CellData::default(); cols]);
        frame.height = data.row_heights.iter().sum();
        Ok(())
    }

    fn insert_column(&mut self, table: ElementId, at: usize) -> Result<()> {
        let (frame, data) = self.table_node_mut(table)?;
        if at > data.column_widths.len() {
            return Err(GridError::CellOutOfRange { row: 0, col: at });
        }
        let template = at.saturating_sub(1);
        let width = data.column_widths.get(template).copied().unwrap_or_default();
        data.column_widths.insert(at, width);
        for row in &mut data.cells {
            row.insert(at, CellData::default());
        }
        frame.width = data.column_widths.iter().sum();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_budget_fails_after_limit() {
        let mut s = MemorySurface::new();
        s.faults_mut().create_budget = Some(1);
        let g = Geometry::new(0.0, 0.0, 10.0, 10.0);
        assert!(s.create_element(ElementKind::Shape, g).is_ok());
        assert!(matches!(
            s.create_element(ElementKind::Shape, g),
            Err(GridError::Host { op: "create", .. })
        ));
    }

    #[test]
    fn row_insert_grows_frame() {
        let mut s = MemorySurface::new();
        let t = s.add_table(0.0, 0.0, &[40.0, 50.0], &[60.0, 70.0]);
        s.insert_row(t, 2).unwrap();
        assert_eq!(s.table_size(t).unwrap(), (3, 2));
        assert_eq!(s.row_height(t, 2).unwrap(), 50.0);
        assert_eq!(s.geometry(t).unwrap().height, 140.0);
        s.insert_column(t, 0).unwrap();
        assert_eq!(s.column_width(t, 0).unwrap(), 60.0);
        assert_eq!(s.geometry(t).unwrap().width, 190.0);
    }

    #[test]
    fn autosize_fits_lines() {
        let mut s = MemorySurface::new();
        let id = s.add_text(Geometry::new(0.0, 0.0, 50.0, 5.0), "a\nb");
        s.autosize(id).unwrap();
        let expected = 2.0 * 18.0 * LINE_SPACING + 7.2;
        assert!((s.geometry(id).unwrap().height - expected).abs() < 1e-9);
    }

    #[test]
    fn bring_to_front_reorders() {
        let mut s = MemorySurface::new();
        let a = s.add_shape(Geometry::default());
        let b = s.add_shape(Geometry::default());
        s.bring_to_front(a).unwrap();
        assert_eq!(s.elements(), vec![b, a]);
    }
}
