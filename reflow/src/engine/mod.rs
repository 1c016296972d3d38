//! The transposition engine.
//!
//! The engine watches the width of a table and its parent. When the parent
//! shrinks below the table, the rightmost collapsible column moves into
//! per-row auxiliary rows; when the parent grows past the width at which a
//! column collapsed (plus the margin), that column moves back.
//!
//! Every width event is handled as a sequence of single-column steps. A step
//! that changes the table width enqueues a new snapshot instead of recursing,
//! and the queue is drained before the triggering call returns.

mod state;

use std::collections::VecDeque;

pub use state::EngineState;

use crate::aux_row::{AuxiliaryRowManager, TransposedRowSlot};
use crate::breakpoints::BreakpointTracker;
use crate::chrome::RowIndicators;
use crate::config::ReflowConfig;
use crate::error::ReflowError;
use crate::host::ViewHost;
use crate::observer::WidthObserver;
use crate::stream::{CancellationToken, EventStream, Subscription};
use crate::types::{
    ClickAction, ColumnState, TranspositionState, ViewRef, WidthDirection, WidthSnapshot,
};

pub struct TranspositionEngine {
    config: ReflowConfig,
    table: ViewRef,
    parent: ViewRef,
    state: EngineState,
    observer: WidthObserver,
    transpositions: EventStream<TranspositionState>,
    pending: VecDeque<WidthSnapshot>,
    /// Cancelled when the content set is replaced. Child of `lifecycle`.
    epoch: CancellationToken,
    /// Cancelled on teardown.
    lifecycle: CancellationToken,
}

impl TranspositionEngine {
    /// Set the engine up against the host's current table and evaluate the
    /// initial widths, collapsing columns until the table fits.
    pub fn mount<H: ViewHost + ?Sized>(
        host: &mut H,
        config: ReflowConfig,
    ) -> Result<Self, ReflowError> {
        config.validate()?;

        let table = host.table().ok_or(ReflowError::MissingView("table"))?;
        let parent = host.parent().ok_or(ReflowError::MissingView("table parent"))?;

        let observer = WidthObserver::new(host.measure_width(parent)?, host.measure_width(table)?);

        let lifecycle = CancellationToken::new();
        let mut engine = Self {
            config,
            table,
            parent,
            state: EngineState::default(),
            observer,
            transpositions: EventStream::new(),
            pending: VecDeque::new(),
            epoch: lifecycle.child_token(),
            lifecycle,
        };

        engine.initialize(host)?;
        host.observe_width_changes(parent)?;

        let initial = engine.observer.latest();
        log::debug!("[engine] mounted, initial snapshot {initial:?}");
        engine.dispatch(host, initial)?;

        Ok(engine)
    }

    fn initialize<H: ViewHost + ?Sized>(&mut self, host: &mut H) -> Result<(), ReflowError> {
        let mut state = EngineState::resolve(host, &self.config)?;
        state.indicators = RowIndicators::create(host, &self.config, &state.first_cells())?;

        log::debug!(
            "[engine] initialized {} columns x {} rows, collapsible up to column {}",
            state.total_columns(),
            state.row_count,
            state.max_to_remove
        );

        self.state = state;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Width events
    // -------------------------------------------------------------------------

    /// Re-measure after the parent container changed width and collapse or
    /// restore columns as needed. Ignored after teardown.
    pub fn handle_resize<H: ViewHost + ?Sized>(&mut self, host: &mut H) -> Result<(), ReflowError> {
        if self.lifecycle.is_cancelled() {
            return Ok(());
        }

        let parent_width = host.measure_width(self.parent)?;
        let table_width = host.measure_width(self.table)?;

        match self.observer.observe(parent_width, table_width) {
            Some(snapshot) => self.dispatch(host, snapshot),
            None => Ok(()),
        }
    }

    /// Drain the snapshot queue, starting with `snapshot`.
    fn dispatch<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        snapshot: WidthSnapshot,
    ) -> Result<(), ReflowError> {
        self.pending.push_back(snapshot);

        while let Some(snapshot) = self.pending.pop_front() {
            if let Err(err) = self.step(host, snapshot) {
                self.pending.clear();
                return Err(err);
            }
        }

        Ok(())
    }

    /// Apply the decision rule to one snapshot.
    fn step<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        snapshot: WidthSnapshot,
    ) -> Result<(), ReflowError> {
        let margin = self.config.width_margin;

        match snapshot.parent_direction {
            WidthDirection::Shrinking => {
                let overflows = i64::from(snapshot.table_width) - i64::from(margin)
                    > i64::from(snapshot.parent_width);
                if !overflows {
                    return Ok(());
                }

                let col = self.state.next_to_remove;
                if col == 0 {
                    log::warn!(
                        "[engine] table ({}) still overflows parent ({}) with every column collapsed",
                        snapshot.table_width,
                        snapshot.parent_width
                    );
                    return Ok(());
                }

                self.state.breakpoints.record(col, snapshot.parent_width);
                self.transpose_column(host, col)?;
                self.redispatch(host, snapshot)
            }
            WidthDirection::Growing => {
                let col = self.state.next_to_remove + 1;
                if col > self.state.max_to_remove {
                    return Ok(());
                }

                if self
                    .state
                    .breakpoints
                    .cleared_by(col, snapshot.parent_width, margin)
                {
                    self.transpose_column(host, col)?;
                    self.redispatch(host, snapshot)?;
                }
                Ok(())
            }
            WidthDirection::None => Ok(()),
        }
    }

    /// Queue `snapshot` again with the table re-measured.
    fn redispatch<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        snapshot: WidthSnapshot,
    ) -> Result<(), ReflowError> {
        let table_width = host.measure_width(self.table)?;
        let next = snapshot.with_table_width(table_width);
        if self.observer.push(next) {
            self.pending.push_back(next);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Transposition
    // -------------------------------------------------------------------------

    /// Collapse `col` if it is visible, restore it if it is collapsed.
    ///
    /// Rejects column 0, columns past the end, and the last column while
    /// `preserve_last_column` is set, without touching any state.
    pub fn transpose_column<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        col: usize,
    ) -> Result<(), ReflowError> {
        let total = self.state.total_columns();
        if col == 0 {
            return Err(ReflowError::FirstColumn);
        }
        if col >= total {
            return Err(ReflowError::ColumnOutOfRange { column: col, total });
        }
        if col == total - 1 && self.config.preserve_last_column {
            return Err(ReflowError::PreservedLastColumn { column: col });
        }

        let collapsed = self.state.columns[col].collapsed;
        log::debug!(
            "[engine] transposing column {} ({})",
            col,
            if collapsed { "restore" } else { "collapse" }
        );

        if collapsed {
            self.restore_column(host, col)?;
        } else {
            self.collapse_column(host, col)?;
        }

        self.state.columns[col].collapsed = !collapsed;
        host.request_layout();

        if col == self.state.max_to_remove {
            let state = if collapsed {
                TranspositionState::Default
            } else {
                TranspositionState::Transposed
            };
            self.publish(host, state)?;
        }

        Ok(())
    }

    fn restore_column<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        col: usize,
    ) -> Result<(), ReflowError> {
        let column = &self.state.columns[col];

        for aux in self.state.aux_rows.iter_mut() {
            aux.hide(col);

            let cell = column
                .cells
                .get(aux.row())
                .ok_or(ReflowError::MissingView("data cell"))?;
            // Content dropped by the host together with its old row set has
            // nothing to return to.
            let Some(from) = host.parent_of(cell.content) else {
                log::debug!("[engine] column {} row {} content is gone", col, aux.row());
                continue;
            };
            if from != cell.container {
                host.move_content(cell.content, from, cell.container, 0)?;
            }
        }

        if col == self.state.max_to_remove && !self.state.aux_rows_in_use() {
            for aux in self.state.aux_rows.drain(..) {
                host.destroy_auxiliary_row(aux.handle())?;
            }
        }

        host.set_visibility(column.header, true)?;

        self.state.visible_columns += 1;
        self.state.next_to_remove += 1;
        debug_assert!(
            self.state.next_to_remove <= self.state.max_to_remove,
            "restore moved the cursor past column {}",
            self.state.max_to_remove
        );
        Ok(())
    }

    fn collapse_column<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        col: usize,
    ) -> Result<(), ReflowError> {
        if self.state.aux_rows.is_empty() {
            self.create_auxiliary_rows(host)?;
        }

        for aux in self.state.aux_rows.iter_mut() {
            aux.show(host, col)?;
        }

        host.set_visibility(self.state.columns[col].header, false)?;

        debug_assert!(
            self.state.next_to_remove > 0,
            "collapse with every collapsible column already collapsed"
        );
        self.state.visible_columns -= 1;
        self.state.next_to_remove = self.state.next_to_remove.saturating_sub(1);
        Ok(())
    }

    /// One hidden auxiliary row per original row, with a slot per column.
    fn create_auxiliary_rows<H: ViewHost + ?Sized>(&mut self, host: &mut H) -> Result<(), ReflowError> {
        let mut aux_rows = Vec::with_capacity(self.state.row_count);

        for row in 0..self.state.row_count {
            let slots = self
                .state
                .columns
                .iter()
                .map(|column| {
                    column
                        .cells
                        .get(row)
                        .map(|cell| TransposedRowSlot {
                            header: column.header,
                            content: cell.content,
                            visible: false,
                        })
                        .ok_or(ReflowError::MissingView("data cell"))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let handle = host.create_auxiliary_row(row)?;
            aux_rows.push(AuxiliaryRowManager::new(
                host,
                row,
                handle,
                slots,
                self.config.order_strategy,
            )?);
        }

        log::debug!("[engine] created {} auxiliary rows", aux_rows.len());
        self.state.aux_rows = aux_rows;
        Ok(())
    }

    /// Update the indicators for the current epoch, then notify subscribers.
    fn publish<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        state: TranspositionState,
    ) -> Result<(), ReflowError> {
        log::debug!("[engine] transposition state -> {state:?}");
        if !self.epoch.is_cancelled() {
            self.state
                .indicators
                .apply_state(host, &self.config, state)?;
        }
        self.transpositions.emit(state);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Row interaction
    // -------------------------------------------------------------------------

    /// Expand or collapse the auxiliary row of `row`. Returns true if it is
    /// now visible.
    pub fn toggle_row<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        row: usize,
    ) -> Result<bool, ReflowError> {
        let aux = self
            .state
            .aux_rows
            .get_mut(row)
            .ok_or(ReflowError::NoAuxiliaryRow { row })?;
        let visible = aux.toggle_visibility(host)?;
        self.state
            .indicators
            .apply_row_toggle(host, &self.config, row, visible)?;
        Ok(visible)
    }

    /// Run a click action the host received.
    pub fn handle_click_action<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        action: ClickAction,
    ) -> Result<bool, ReflowError> {
        match action {
            ClickAction::ToggleAuxiliaryRow { row } => self.toggle_row(host, row),
        }
    }

    /// Route a click on `element`.
    ///
    /// Returns `None` if the element is not one of this engine's indicators,
    /// otherwise the new visibility of the toggled row.
    pub fn click<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        element: ViewRef,
    ) -> Result<Option<bool>, ReflowError> {
        match self.state.indicators.row_of(element) {
            Some(row) => self.toggle_row(host, row).map(Some),
            None => Ok(None),
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Undo every transposition against the current content and rebuild all
    /// state against the host's new content set.
    ///
    /// If the new content cannot be initialized, the engine is left empty:
    /// width events become no-ops until a later reinitialize succeeds.
    pub fn reinitialize<H: ViewHost + ?Sized>(&mut self, host: &mut H) -> Result<(), ReflowError> {
        log::debug!("[engine] reinitializing");
        self.epoch.cancel();

        for col in 0..self.state.total_columns() {
            if self.state.columns[col].collapsed {
                self.transpose_column(host, col)?;
            }
        }

        for aux in self.state.aux_rows.drain(..) {
            host.destroy_auxiliary_row(aux.handle())?;
        }
        self.state.indicators.remove_all(host)?;
        self.state = EngineState::default();

        self.epoch = self.lifecycle.child_token();
        self.initialize(host)
    }

    /// Reinitialize after the host swapped its rows or columns, then collapse
    /// the new content until it fits again.
    pub fn content_changed<H: ViewHost + ?Sized>(&mut self, host: &mut H) -> Result<(), ReflowError> {
        if self.lifecycle.is_cancelled() {
            return Ok(());
        }

        self.reinitialize(host)?;

        let table_width = host.measure_width(self.table)?;
        let snapshot = WidthSnapshot {
            table_width,
            parent_direction: WidthDirection::Shrinking,
            ..self.observer.latest()
        };
        // Every column was just restored, so the rule has to run even when
        // the snapshot repeats the latest one.
        self.observer.push(snapshot);
        self.dispatch(host, snapshot)
    }

    /// Stop reacting to widths, end all streams and detach the indicators.
    /// Columns stay where they are.
    pub fn teardown<H: ViewHost + ?Sized>(&mut self, host: &mut H) -> Result<(), ReflowError> {
        if self.lifecycle.is_cancelled() {
            return Ok(());
        }
        log::debug!("[engine] teardown");

        self.lifecycle.cancel();
        self.pending.clear();
        self.observer.complete();
        self.transpositions.complete();
        self.state.indicators.remove_all(host)
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle.is_cancelled()
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Listen to transposition state changes until teardown.
    pub fn subscribe_transpositions(
        &self,
        callback: impl FnMut(&TranspositionState) + 'static,
    ) -> Subscription {
        self.transpositions
            .subscribe_until(self.lifecycle.clone(), callback)
    }

    /// Listen to transposition state changes until the content is replaced.
    pub fn subscribe_transpositions_in_epoch(
        &self,
        callback: impl FnMut(&TranspositionState) + 'static,
    ) -> Subscription {
        self.transpositions
            .subscribe_until(self.epoch.clone(), callback)
    }

    /// Listen to width snapshots. The latest snapshot is delivered right away.
    pub fn subscribe_widths(
        &self,
        callback: impl FnMut(&WidthSnapshot) + 'static,
    ) -> Subscription {
        self.observer
            .subscribe_until(self.lifecycle.clone(), callback)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &ReflowConfig {
        &self.config
    }

    pub fn table(&self) -> ViewRef {
        self.table
    }

    pub fn parent(&self) -> ViewRef {
        self.parent
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn columns(&self) -> &[ColumnState] {
        &self.state.columns
    }

    pub fn breakpoints(&self) -> &BreakpointTracker {
        &self.state.breakpoints
    }

    pub fn total_column_count(&self) -> usize {
        self.state.total_columns()
    }

    /// Number of original data rows.
    pub fn row_count(&self) -> usize {
        self.state.row_count
    }

    pub fn visible_column_count(&self) -> usize {
        self.state.visible_columns
    }

    pub fn next_column_to_remove(&self) -> usize {
        self.state.next_to_remove
    }

    pub fn max_column_to_remove(&self) -> usize {
        self.state.max_to_remove
    }

    pub fn auxiliary_rows(&self) -> &[AuxiliaryRowManager] {
        &self.state.aux_rows
    }

    pub fn indicators(&self) -> &RowIndicators {
        &self.state.indicators
    }

    /// Latest width snapshot seen by the engine.
    pub fn latest_snapshot(&self) -> WidthSnapshot {
        self.observer.latest()
    }

    /// Whether any column currently lives in auxiliary rows.
    pub fn is_transposed(&self) -> bool {
        self.state.columns.iter().any(|column| column.collapsed)
    }

    /// Token cancelled when the current content epoch ends.
    pub fn epoch_token(&self) -> CancellationToken {
        self.epoch.clone()
    }
}
