//! The capability set the engine needs from the rendering substrate.

use crate::error::HostError;
use crate::types::{
    CellDescriptor, ChromeKind, ClickAction, ColumnDescriptor, RowDescriptor, ViewRef,
};

/// Rendering substrate seen by the transposition engine.
///
/// The engine never creates or copies cell content. It only asks the host to
/// relocate existing content, so anything attached to that content (bindings,
/// handlers, focus) travels with it.
///
/// Callbacks are data: click handlers are [`ClickAction`] values the host
/// hands back through
/// [`TranspositionEngine::click`](crate::engine::TranspositionEngine::click),
/// and width changes are delivered through
/// [`TranspositionEngine::handle_resize`](crate::engine::TranspositionEngine::handle_resize).
pub trait ViewHost {
    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// The table element.
    fn table(&self) -> Option<ViewRef>;

    /// The container whose width bounds the table.
    fn parent(&self) -> Option<ViewRef>;

    /// Header cells in column order.
    fn resolve_columns(&self) -> Vec<ColumnDescriptor>;

    /// Original data rows in display order.
    fn resolve_rows(&self) -> Vec<RowDescriptor>;

    /// The data cell at `(row, col)`.
    fn resolve_cell(&self, row: usize, col: usize) -> Option<CellDescriptor>;

    /// Number of data cells in a row.
    fn cell_count(&self, row: usize) -> usize;

    /// Current container of a piece of content.
    fn parent_of(&self, view: ViewRef) -> Option<ViewRef>;

    // -------------------------------------------------------------------------
    // Relocation
    // -------------------------------------------------------------------------

    /// Move live content from one container to another at `at`.
    ///
    /// `at` is clamped to the number of children in `to`.
    fn move_content(
        &mut self,
        content: ViewRef,
        from: ViewRef,
        to: ViewRef,
        at: usize,
    ) -> Result<(), HostError>;

    /// Create the auxiliary row that follows original row `row`.
    fn create_auxiliary_row(&mut self, row: usize) -> Result<ViewRef, HostError>;

    fn destroy_auxiliary_row(&mut self, aux_row: ViewRef) -> Result<(), HostError>;

    // -------------------------------------------------------------------------
    // Presentation
    // -------------------------------------------------------------------------

    fn set_visibility(&mut self, element: ViewRef, visible: bool) -> Result<(), HostError>;

    fn add_class(&mut self, element: ViewRef, class: &str) -> Result<(), HostError>;

    fn remove_class(&mut self, element: ViewRef, class: &str) -> Result<(), HostError>;

    fn has_class(&self, element: ViewRef, class: &str) -> bool;

    /// Create a chrome element as child `at` of `within`.
    fn create_chrome_element(
        &mut self,
        kind: ChromeKind,
        within: ViewRef,
        at: usize,
    ) -> Result<ViewRef, HostError>;

    fn attach_click_handler(
        &mut self,
        element: ViewRef,
        action: ClickAction,
    ) -> Result<(), HostError>;

    fn remove_chrome_element(&mut self, element: ViewRef) -> Result<(), HostError>;

    // -------------------------------------------------------------------------
    // Measurement
    // -------------------------------------------------------------------------

    fn measure_width(&self, element: ViewRef) -> Result<u32, HostError>;

    /// Start reporting width changes of `element` to the engine.
    fn observe_width_changes(&mut self, element: ViewRef) -> Result<(), HostError>;

    /// Flush pending layout so the next measurement reflects recent moves.
    fn request_layout(&mut self) {}
}
