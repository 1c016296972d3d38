//! Error types

use crate::types::ViewRef;

/// Minimum number of rows, headers and cells per row a table needs before
/// columns can be transposed.
pub const MIN_TABLE_EXTENT: usize = 3;

/// Errors raised by the transposition engine.
///
/// Every variant is a structural precondition violation and is fatal to the
/// operation that raised it.
#[derive(Debug, thiserror::Error)]
pub enum ReflowError {
    /// Fewer than three data rows were found.
    #[error("Cannot build a responsive table with less than 3 rows. Found {found}")]
    InsufficientRows { found: usize },

    /// Fewer than three header cells were found.
    #[error("Cannot build a responsive table with less than 3 headers. Found {found}")]
    InsufficientHeaders { found: usize },

    /// A row has fewer than three data cells.
    #[error("Cannot build a responsive table with less than 3 cells in row {row}. Found {found}")]
    InsufficientCells { row: usize, found: usize },

    /// Column 0 can never be transposed.
    #[error("Trying to transpose the first column, which is not supported")]
    FirstColumn,

    /// The last column is pinned by `preserve_last_column`.
    #[error("Trying to transpose last column {column}, although preserve_last_column is set")]
    PreservedLastColumn { column: usize },

    /// Column index past the end of the table.
    #[error("Column {column} out of range for table with {total} columns")]
    ColumnOutOfRange { column: usize, total: usize },

    /// A required view reference was missing when it was needed.
    #[error("Missing view reference: {0}")]
    MissingView(&'static str),

    /// A row toggle was requested while no auxiliary rows exist.
    #[error("Row {row} has no auxiliary row")]
    NoAuxiliaryRow { row: usize },

    /// The host rejected an operation.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors reported by a [`ViewHost`](crate::host::ViewHost).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The handle does not name a live element.
    #[error("Unknown view {0}")]
    UnknownView(ViewRef),

    /// The content is not a child of the container it was moved from.
    #[error("View {content} is not inside {container}")]
    NotInContainer { content: ViewRef, container: ViewRef },

    /// The element cannot take part in the requested operation.
    #[error("View {view} does not support {operation}")]
    Unsupported {
        view: ViewRef,
        operation: &'static str,
    },
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Indicator style '{field}' must not be empty")]
    EmptyIndicatorStyle { field: &'static str },

    #[error("Collapsed and expanded indicator styles must differ (both '{0}')")]
    IdenticalIndicatorStyles(String),
}
