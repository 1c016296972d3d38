/// Parent widths at which each column last collapsed.
///
/// Index-aligned with the table's columns. An unset slot means the column has
/// never collapsed since the last reset; [`as_raw`](Self::as_raw) reports
/// those as `-1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakpointTracker {
    slots: Vec<Option<u32>>,
}

impl BreakpointTracker {
    pub fn new(columns: usize) -> Self {
        Self {
            slots: vec![None; columns],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<u32> {
        self.slots.get(column).copied().flatten()
    }

    /// Remember that `column` collapsed at `parent_width`.
    pub fn record(&mut self, column: usize, parent_width: u32) {
        if let Some(slot) = self.slots.get_mut(column) {
            *slot = Some(parent_width);
        }
    }

    /// Forget every breakpoint and resize to `columns` slots.
    pub fn reset(&mut self, columns: usize) {
        self.slots.clear();
        self.slots.resize(columns, None);
    }

    /// Whether `parent_width` minus `margin` clears the breakpoint of
    /// `column`. Unset slots compare as `-1`, so any width clears them.
    pub fn cleared_by(&self, column: usize, parent_width: u32, margin: u32) -> bool {
        let threshold = self.get(column).map_or(-1, i64::from);
        i64::from(parent_width) - i64::from(margin) > threshold
    }

    /// Breakpoints with `-1` for unset slots.
    pub fn as_raw(&self) -> Vec<i64> {
        self.slots
            .iter()
            .map(|slot| slot.map_or(-1, i64::from))
            .collect()
    }
}
