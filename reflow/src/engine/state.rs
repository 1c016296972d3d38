use crate::aux_row::AuxiliaryRowManager;
use crate::breakpoints::BreakpointTracker;
use crate::chrome::RowIndicators;
use crate::config::ReflowConfig;
use crate::error::{ReflowError, MIN_TABLE_EXTENT};
use crate::host::ViewHost;
use crate::types::{ColumnState, ViewRef};

/// Everything the engine mutates, owned in one place.
///
/// Rebuilt wholesale whenever the table content changes structurally.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub(crate) columns: Vec<ColumnState>,
    pub(crate) breakpoints: BreakpointTracker,
    pub(crate) aux_rows: Vec<AuxiliaryRowManager>,
    pub(crate) indicators: RowIndicators,
    pub(crate) row_count: usize,
    pub(crate) visible_columns: usize,
    /// Rightmost visible, collapsible column.
    pub(crate) next_to_remove: usize,
    /// Rightmost column that may ever collapse.
    pub(crate) max_to_remove: usize,
}

impl EngineState {
    /// Resolve columns, rows and cells from the host.
    ///
    /// Only reads from the host, so a failure leaves nothing behind.
    pub(crate) fn resolve<H: ViewHost + ?Sized>(
        host: &H,
        config: &ReflowConfig,
    ) -> Result<Self, ReflowError> {
        let rows = host.resolve_rows();
        if rows.len() < MIN_TABLE_EXTENT {
            return Err(ReflowError::InsufficientRows { found: rows.len() });
        }

        let headers = host.resolve_columns();
        if headers.len() < MIN_TABLE_EXTENT {
            return Err(ReflowError::InsufficientHeaders {
                found: headers.len(),
            });
        }

        for row in 0..rows.len() {
            let found = host.cell_count(row);
            if found < MIN_TABLE_EXTENT {
                return Err(ReflowError::InsufficientCells { row, found });
            }
        }

        let total = headers.len();
        let mut columns = Vec::with_capacity(total);
        for (index, header) in headers.iter().enumerate() {
            let mut cells = Vec::with_capacity(rows.len());
            for row in 0..rows.len() {
                let cell = host
                    .resolve_cell(row, index)
                    .ok_or(ReflowError::MissingView("data cell"))?;
                cells.push(cell);
            }
            columns.push(ColumnState {
                index,
                collapsed: false,
                header: header.header,
                cells,
            });
        }

        let max_to_remove = if config.preserve_last_column {
            total - 2
        } else {
            total - 1
        };

        Ok(Self {
            columns,
            breakpoints: BreakpointTracker::new(total),
            aux_rows: Vec::new(),
            indicators: RowIndicators::default(),
            row_count: rows.len(),
            visible_columns: total,
            next_to_remove: max_to_remove,
            max_to_remove,
        })
    }

    pub(crate) fn total_columns(&self) -> usize {
        self.columns.len()
    }

    /// Content of the first cell of every row, where indicators go.
    pub(crate) fn first_cells(&self) -> Vec<ViewRef> {
        self.columns
            .first()
            .map(|column| column.cells.iter().map(|cell| cell.content).collect())
            .unwrap_or_default()
    }

    /// Whether any auxiliary row still shows content.
    pub(crate) fn aux_rows_in_use(&self) -> bool {
        self.aux_rows
            .iter()
            .any(|aux| aux.slots().iter().any(|slot| slot.visible))
    }
}
