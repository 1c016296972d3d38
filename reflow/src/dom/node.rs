use crate::types::{ChromeKind, ClickAction, ViewRef};

/// Role of a node inside the in-memory table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The container bounding the table.
    Container,
    Table,
    HeaderRow,
    Header,
    /// Original data row.
    Row,
    /// Fixed position of one column inside a row; holds the cell when it is
    /// not transposed.
    Slot,
    Cell,
    AuxiliaryRow,
    Chrome(ChromeKind),
}

/// One element of the retained tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: ViewRef,
    pub kind: NodeKind,
    pub label: String,
    /// Intrinsic width of the node's own content.
    pub width: u32,
    pub visible: bool,
    pub classes: Vec<String>,
    pub parent: Option<ViewRef>,
    pub children: Vec<ViewRef>,
    pub click: Option<ClickAction>,
}

impl Node {
    pub(crate) fn new(id: ViewRef, kind: NodeKind, label: impl Into<String>, width: u32) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            width,
            visible: true,
            classes: Vec::new(),
            parent: None,
            children: Vec::new(),
            click: None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}
