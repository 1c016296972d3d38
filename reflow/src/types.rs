use std::fmt;

/// Opaque handle to an element owned by the view host.
///
/// Handles are stable for the lifetime of the element, including across
/// relocations between containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewRef(pub u64);

impl fmt::Display for ViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// Direction of a width change relative to the previous snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WidthDirection {
    Growing,
    Shrinking,
    #[default]
    None,
}

impl WidthDirection {
    /// Classify `current` against `previous`.
    pub fn between(previous: u32, current: u32) -> Self {
        if current < previous {
            Self::Shrinking
        } else if current > previous {
            Self::Growing
        } else {
            Self::None
        }
    }
}

/// A measured pair of widths together with their change directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidthSnapshot {
    pub parent_width: u32,
    pub table_width: u32,
    pub parent_direction: WidthDirection,
    pub table_direction: WidthDirection,
}

impl WidthSnapshot {
    /// Initial snapshot: shrinking if the table already overflows its parent.
    pub fn initial(parent_width: u32, table_width: u32) -> Self {
        let direction = if table_width > parent_width {
            WidthDirection::Shrinking
        } else {
            WidthDirection::None
        };
        Self {
            parent_width,
            table_width,
            parent_direction: direction,
            table_direction: direction,
        }
    }

    /// Build the snapshot that follows `self` given freshly measured widths.
    pub fn next(&self, parent_width: u32, table_width: u32) -> Self {
        Self {
            parent_width,
            table_width,
            parent_direction: WidthDirection::between(self.parent_width, parent_width),
            table_direction: WidthDirection::between(self.table_width, table_width),
        }
    }

    /// Same snapshot with only the table width replaced.
    pub fn with_table_width(self, table_width: u32) -> Self {
        Self {
            table_width,
            ..self
        }
    }
}

/// Global transposition state, emitted whenever the outermost collapsible
/// column changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranspositionState {
    /// At least one column lives in auxiliary rows.
    Transposed,
    /// Every column is in its original position.
    Default,
}

/// Kinds of chrome the engine asks the host to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromeKind {
    /// Per-row expand/collapse indicator.
    Caret,
}

/// Action routed back to the engine when a chrome element is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickAction {
    ToggleAuxiliaryRow { row: usize },
}

/// Header of one column as exposed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub header: ViewRef,
}

/// One original data row as exposed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowDescriptor {
    pub row: ViewRef,
}

/// One data cell: its live content and the container it originally lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellDescriptor {
    pub content: ViewRef,
    pub container: ViewRef,
}

/// Per-column state owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnState {
    pub index: usize,
    pub collapsed: bool,
    pub header: ViewRef,
    /// One entry per row, in row order.
    pub cells: Vec<CellDescriptor>,
}
