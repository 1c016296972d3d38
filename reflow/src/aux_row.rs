//! Auxiliary rows: per-row containers for the content of collapsed columns.

use serde::Deserialize;

use crate::error::ReflowError;
use crate::host::ViewHost;
use crate::types::ViewRef;

/// How the insertion position inside an auxiliary row is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStrategy {
    /// Always insert first. O(1), but only correct while columns collapse
    /// right to left and restore left to right.
    #[default]
    Backwards,
    /// Insert after every visible slot with a lower column index. O(columns),
    /// correct for any collapse order.
    Arbitrary,
}

/// One column's entry inside an auxiliary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransposedRowSlot {
    /// Header cell shown as the entry's label.
    pub header: ViewRef,
    /// Live cell content.
    pub content: ViewRef,
    /// Whether the content currently occupies a position in the auxiliary row.
    pub visible: bool,
}

/// Logical state of one original row's auxiliary row.
#[derive(Debug, Clone)]
pub struct AuxiliaryRowManager {
    row: usize,
    handle: ViewRef,
    slots: Vec<TransposedRowSlot>,
    strategy: OrderStrategy,
    visible: bool,
}

impl AuxiliaryRowManager {
    /// Wrap a freshly created auxiliary row. The row starts hidden.
    pub fn new<H: ViewHost + ?Sized>(
        host: &mut H,
        row: usize,
        handle: ViewRef,
        slots: Vec<TransposedRowSlot>,
        strategy: OrderStrategy,
    ) -> Result<Self, ReflowError> {
        host.set_visibility(handle, false)?;
        Ok(Self {
            row,
            handle,
            slots,
            strategy,
            visible: false,
        })
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn handle(&self) -> ViewRef {
        self.handle
    }

    pub fn slots(&self) -> &[TransposedRowSlot] {
        &self.slots
    }

    pub fn strategy(&self) -> OrderStrategy {
        self.strategy
    }

    /// Whether the auxiliary row itself is expanded.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Column indices whose slots are shown, in column order.
    pub fn shown_columns(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.visible)
            .map(|(col, _)| col)
            .collect()
    }

    /// Mark `col` as shown and move its content into this row.
    pub fn show<H: ViewHost + ?Sized>(&mut self, host: &mut H, col: usize) -> Result<(), ReflowError> {
        let total = self.slots.len();
        let slot = self
            .slots
            .get_mut(col)
            .ok_or(ReflowError::ColumnOutOfRange { column: col, total })?;
        slot.visible = true;
        let content = slot.content;

        let at = self.insertion_index(col);

        if host.parent_of(content) != Some(self.handle) {
            let from = host
                .parent_of(content)
                .ok_or(ReflowError::MissingView("cell container"))?;
            log::debug!(
                "[aux_row] row {} moving column {} content {} to index {}",
                self.row,
                col,
                content,
                at
            );
            host.move_content(content, from, self.handle, at)?;
        }

        Ok(())
    }

    /// Mark `col` as hidden. The caller moves the content back.
    pub fn hide(&mut self, col: usize) {
        if let Some(slot) = self.slots.get_mut(col) {
            slot.visible = false;
        }
    }

    /// Expand or collapse this auxiliary row. Returns true if it is now visible.
    pub fn toggle_visibility<H: ViewHost + ?Sized>(&mut self, host: &mut H) -> Result<bool, ReflowError> {
        let visible = !self.visible;
        log::debug!("[aux_row] row {} visible={}", self.row, visible);
        host.set_visibility(self.handle, visible)?;
        self.visible = visible;
        Ok(self.visible)
    }

    fn insertion_index(&self, col: usize) -> usize {
        match self.strategy {
            OrderStrategy::Backwards => 0,
            OrderStrategy::Arbitrary => self.slots[..col].iter().filter(|s| s.visible).count(),
        }
    }
}
