//! In-memory view host.
//!
//! [`MemoryHost`] keeps a small retained element tree: a container holding a
//! table with a header row and data rows, where each row has one slot per
//! column and each slot holds one cell. Moving content re-parents the cell
//! node, so the node keeps its id, classes, children and click wiring.
//!
//! Widths are deterministic: the container width is whatever was last set
//! with [`MemoryHost::resize_parent`], and the table width is the sum of the
//! widths of its visible columns.

mod node;
mod render;

use std::collections::{BTreeMap, HashMap};

use unicode_width::UnicodeWidthStr;

pub use node::{Node, NodeKind};

use crate::error::HostError;
use crate::host::ViewHost;
use crate::types::{
    CellDescriptor, ChromeKind, ClickAction, ColumnDescriptor, RowDescriptor, ViewRef,
};

/// Header label and minimum column width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: String,
    pub width: u32,
}

impl ColumnSpec {
    pub fn new(label: impl Into<String>, width: u32) -> Self {
        Self {
            label: label.into(),
            width,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryHost {
    nodes: HashMap<ViewRef, Node>,
    next_id: u64,
    parent_width: u32,
    container: Option<ViewRef>,
    table: Option<ViewRef>,
    header_row: Option<ViewRef>,
    headers: Vec<ViewRef>,
    rows: Vec<ViewRef>,
    /// `slots[row][col]`
    slots: Vec<Vec<ViewRef>>,
    /// `cells[row][col]`
    cells: Vec<Vec<ViewRef>>,
    aux_rows: BTreeMap<usize, ViewRef>,
    observed: Vec<ViewRef>,
    layout_passes: usize,
}

impl MemoryHost {
    /// Empty container of the given width, without a table.
    pub fn new(parent_width: u32) -> Self {
        let mut host = Self {
            nodes: HashMap::new(),
            next_id: 0,
            parent_width,
            container: None,
            table: None,
            header_row: None,
            headers: Vec::new(),
            rows: Vec::new(),
            slots: Vec::new(),
            cells: Vec::new(),
            aux_rows: BTreeMap::new(),
            observed: Vec::new(),
            layout_passes: 0,
        };
        let container = host.insert(NodeKind::Container, "", 0, None);
        host.container = Some(container);
        host
    }

    /// Container with a table built from `columns` and `rows`.
    ///
    /// Each cell's width is the display width of its label.
    pub fn with_table<R, C, S>(parent_width: u32, columns: Vec<ColumnSpec>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut host = Self::new(parent_width);
        host.build_table(columns, rows);
        host
    }

    /// Table with `columns` and `rows` generated cells labelled `r{row}c{col}`.
    pub fn generated(parent_width: u32, columns: Vec<ColumnSpec>, rows: usize) -> Self {
        let count = columns.len();
        let rows = (0..rows).map(|row| (0..count).map(move |col| format!("r{row}c{col}")));
        Self::with_table(parent_width, columns, rows)
    }

    fn build_table<R, C, S>(&mut self, columns: Vec<ColumnSpec>, rows: R)
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = self.insert(NodeKind::Table, "", 0, self.container);
        self.table = Some(table);

        let header_row = self.insert(NodeKind::HeaderRow, "", 0, Some(table));
        self.header_row = Some(header_row);
        let mut headers = Vec::with_capacity(columns.len());
        for spec in columns {
            headers.push(self.insert(NodeKind::Header, spec.label, spec.width, Some(header_row)));
        }
        self.headers = headers;

        self.replace_rows(rows);
    }

    /// Swap the data rows for new content. Auxiliary rows are left alone;
    /// the engine is expected to be told through
    /// [`content_changed`](crate::engine::TranspositionEngine::content_changed).
    pub fn replace_rows<R, C, S>(&mut self, rows: R)
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(table) = self.table else {
            return;
        };

        // Cells may live in auxiliary rows, outside their row's subtree.
        for cell in std::mem::take(&mut self.cells).into_iter().flatten() {
            self.remove_subtree(cell);
        }
        for row in std::mem::take(&mut self.rows) {
            self.remove_subtree(row);
        }
        self.slots.clear();

        for labels in rows {
            let row = self.insert(NodeKind::Row, "", 0, Some(table));
            let mut row_slots = Vec::new();
            let mut row_cells = Vec::new();
            for label in labels {
                let label: String = label.into();
                let width = label.width() as u32;
                let slot = self.insert(NodeKind::Slot, "", 0, Some(row));
                let cell = self.insert(NodeKind::Cell, label, width, Some(slot));
                row_slots.push(slot);
                row_cells.push(cell);
            }
            self.rows.push(row);
            self.slots.push(row_slots);
            self.cells.push(row_cells);
        }
    }

    fn insert(
        &mut self,
        kind: NodeKind,
        label: impl Into<String>,
        width: u32,
        parent: Option<ViewRef>,
    ) -> ViewRef {
        let id = ViewRef(self.next_id);
        self.next_id += 1;
        let mut node = Node::new(id, kind, label, width);
        node.parent = parent;
        self.nodes.insert(id, node);
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.push(id);
        }
        id
    }

    fn insert_at(&mut self, parent: ViewRef, child: ViewRef, at: usize) -> Result<(), HostError> {
        let node = self
            .nodes
            .get_mut(&parent)
            .ok_or(HostError::UnknownView(parent))?;
        let at = at.min(node.children.len());
        node.children.insert(at, child);
        if let Some(child) = self.nodes.get_mut(&child) {
            child.parent = Some(parent);
        }
        Ok(())
    }

    fn detach(&mut self, child: ViewRef) {
        let parent = self.nodes.get(&child).and_then(|n| n.parent);
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|&c| c != child);
        }
        if let Some(child) = self.nodes.get_mut(&child) {
            child.parent = None;
        }
    }

    fn remove_subtree(&mut self, root: ViewRef) {
        self.detach(root);
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                stack.extend(node.children);
            }
        }
    }

    fn node_mut(&mut self, id: ViewRef) -> Result<&mut Node, HostError> {
        self.nodes.get_mut(&id).ok_or(HostError::UnknownView(id))
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn node(&self, id: ViewRef) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn container(&self) -> Option<ViewRef> {
        self.container
    }

    pub fn headers(&self) -> &[ViewRef] {
        &self.headers
    }

    pub fn rows(&self) -> &[ViewRef] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<ViewRef> {
        self.cells.get(row).and_then(|cells| cells.get(col)).copied()
    }

    pub fn slot(&self, row: usize, col: usize) -> Option<ViewRef> {
        self.slots.get(row).and_then(|slots| slots.get(col)).copied()
    }

    /// Auxiliary row following `row`, if one exists.
    pub fn auxiliary_row(&self, row: usize) -> Option<ViewRef> {
        self.aux_rows.get(&row).copied()
    }

    pub fn auxiliary_row_count(&self) -> usize {
        self.aux_rows.len()
    }

    pub fn children(&self, id: ViewRef) -> &[ViewRef] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    pub fn is_visible(&self, id: ViewRef) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.visible)
    }

    /// Chrome elements currently attached anywhere in the tree.
    pub fn chrome_elements(&self) -> Vec<ViewRef> {
        let mut chrome: Vec<ViewRef> = self
            .nodes
            .values()
            .filter(|n| matches!(n.kind, NodeKind::Chrome(_)))
            .map(|n| n.id)
            .collect();
        chrome.sort();
        chrome
    }

    /// Click action wired to `element`.
    pub fn click_action(&self, element: ViewRef) -> Option<ClickAction> {
        self.nodes.get(&element).and_then(|n| n.click)
    }

    pub fn observed(&self) -> &[ViewRef] {
        &self.observed
    }

    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    pub fn parent_width(&self) -> u32 {
        self.parent_width
    }

    /// Change the container width. The caller forwards the change to the
    /// engine with `handle_resize`.
    pub fn resize_parent(&mut self, width: u32) {
        self.parent_width = width;
    }

    /// Column index of a cell node.
    pub fn column_of_cell(&self, cell: ViewRef) -> Option<usize> {
        self.cells
            .iter()
            .find_map(|cells| cells.iter().position(|&c| c == cell))
    }

    /// Width of column `col` as currently laid out.
    pub fn column_width(&self, col: usize) -> u32 {
        let header = self.headers.get(col).and_then(|h| self.nodes.get(h));
        let content = self
            .slots
            .iter()
            .filter_map(|row| row.get(col))
            .flat_map(|slot| self.children(*slot))
            .filter_map(|c| self.nodes.get(c))
            .filter(|n| n.visible)
            .map(|n| n.width)
            .max()
            .unwrap_or(0);

        match header {
            Some(header) if header.visible => header.width.max(content),
            _ => content,
        }
    }

    fn table_width(&self) -> u32 {
        (0..self.headers.len()).map(|col| self.column_width(col)).sum()
    }
}

impl ViewHost for MemoryHost {
    fn table(&self) -> Option<ViewRef> {
        self.table
    }

    fn parent(&self) -> Option<ViewRef> {
        self.container
    }

    fn resolve_columns(&self) -> Vec<ColumnDescriptor> {
        self.headers
            .iter()
            .map(|&header| ColumnDescriptor { header })
            .collect()
    }

    fn resolve_rows(&self) -> Vec<RowDescriptor> {
        self.rows.iter().map(|&row| RowDescriptor { row }).collect()
    }

    fn resolve_cell(&self, row: usize, col: usize) -> Option<CellDescriptor> {
        Some(CellDescriptor {
            content: self.cell(row, col)?,
            container: self.slot(row, col)?,
        })
    }

    fn cell_count(&self, row: usize) -> usize {
        self.cells.get(row).map_or(0, Vec::len)
    }

    fn parent_of(&self, view: ViewRef) -> Option<ViewRef> {
        self.nodes.get(&view).and_then(|n| n.parent)
    }

    fn move_content(
        &mut self,
        content: ViewRef,
        from: ViewRef,
        to: ViewRef,
        at: usize,
    ) -> Result<(), HostError> {
        if !self.nodes.contains_key(&to) {
            return Err(HostError::UnknownView(to));
        }
        let current = self
            .nodes
            .get(&content)
            .ok_or(HostError::UnknownView(content))?
            .parent;
        if current != Some(from) {
            return Err(HostError::NotInContainer {
                content,
                container: from,
            });
        }

        self.detach(content);
        self.insert_at(to, content, at)
    }

    fn create_auxiliary_row(&mut self, row: usize) -> Result<ViewRef, HostError> {
        let table = self.table.ok_or(HostError::Unsupported {
            view: ViewRef(u64::MAX),
            operation: "auxiliary rows without a table",
        })?;
        let original = *self.rows.get(row).ok_or(HostError::Unsupported {
            view: table,
            operation: "auxiliary row for a missing row",
        })?;

        let aux = self.insert(NodeKind::AuxiliaryRow, "", 0, None);
        // Directly after its original row.
        let position = self
            .children(table)
            .iter()
            .position(|&c| c == original)
            .map_or(usize::MAX, |p| p + 1);
        self.insert_at(table, aux, position)?;
        self.aux_rows.insert(row, aux);
        Ok(aux)
    }

    fn destroy_auxiliary_row(&mut self, aux_row: ViewRef) -> Result<(), HostError> {
        let node = self
            .nodes
            .get(&aux_row)
            .ok_or(HostError::UnknownView(aux_row))?;
        if node.kind != NodeKind::AuxiliaryRow {
            return Err(HostError::Unsupported {
                view: aux_row,
                operation: "destroy_auxiliary_row",
            });
        }
        // Live content is never destroyed with its auxiliary row.
        if !node.children.is_empty() {
            return Err(HostError::Unsupported {
                view: aux_row,
                operation: "destroying a non-empty auxiliary row",
            });
        }
        self.remove_subtree(aux_row);
        self.aux_rows.retain(|_, &mut id| id != aux_row);
        Ok(())
    }

    fn set_visibility(&mut self, element: ViewRef, visible: bool) -> Result<(), HostError> {
        self.node_mut(element)?.visible = visible;
        Ok(())
    }

    fn add_class(&mut self, element: ViewRef, class: &str) -> Result<(), HostError> {
        let node = self.node_mut(element)?;
        if !node.has_class(class) {
            node.classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&mut self, element: ViewRef, class: &str) -> Result<(), HostError> {
        self.node_mut(element)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn has_class(&self, element: ViewRef, class: &str) -> bool {
        self.nodes.get(&element).is_some_and(|n| n.has_class(class))
    }

    fn create_chrome_element(
        &mut self,
        kind: ChromeKind,
        within: ViewRef,
        at: usize,
    ) -> Result<ViewRef, HostError> {
        if !self.nodes.contains_key(&within) {
            return Err(HostError::UnknownView(within));
        }
        let element = self.insert(NodeKind::Chrome(kind), "", 0, None);
        self.insert_at(within, element, at)?;
        Ok(element)
    }

    fn attach_click_handler(
        &mut self,
        element: ViewRef,
        action: ClickAction,
    ) -> Result<(), HostError> {
        self.node_mut(element)?.click = Some(action);
        Ok(())
    }

    fn remove_chrome_element(&mut self, element: ViewRef) -> Result<(), HostError> {
        let node = self
            .nodes
            .get(&element)
            .ok_or(HostError::UnknownView(element))?;
        if !matches!(node.kind, NodeKind::Chrome(_)) {
            return Err(HostError::Unsupported {
                view: element,
                operation: "remove_chrome_element",
            });
        }
        self.remove_subtree(element);
        Ok(())
    }

    fn measure_width(&self, element: ViewRef) -> Result<u32, HostError> {
        let node = self
            .nodes
            .get(&element)
            .ok_or(HostError::UnknownView(element))?;
        Ok(match node.kind {
            NodeKind::Container => self.parent_width,
            NodeKind::Table | NodeKind::HeaderRow => self.table_width(),
            NodeKind::Row => {
                let row = self.rows.iter().position(|&r| r == element);
                row.and_then(|r| self.slots.get(r))
                    .map(|slots| {
                        slots
                            .iter()
                            .flat_map(|slot| self.children(*slot))
                            .filter_map(|c| self.nodes.get(c))
                            .filter(|n| n.visible)
                            .map(|n| n.width)
                            .sum::<u32>()
                    })
                    .unwrap_or(0)
            }
            _ => node.width,
        })
    }

    fn observe_width_changes(&mut self, element: ViewRef) -> Result<(), HostError> {
        if !self.nodes.contains_key(&element) {
            return Err(HostError::UnknownView(element));
        }
        if !self.observed.contains(&element) {
            self.observed.push(element);
        }
        Ok(())
    }

    fn request_layout(&mut self) {
        self.layout_passes += 1;
    }
}
