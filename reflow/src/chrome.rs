//! Row indicators ("carets") that expand and collapse auxiliary rows.

use crate::config::ReflowConfig;
use crate::error::{HostError, ReflowError};
use crate::host::ViewHost;
use crate::types::{ChromeKind, ClickAction, TranspositionState, ViewRef};

/// Indicator placed in the first cell of one original row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowIndicator {
    pub row: usize,
    /// Cell the indicator was inserted into.
    pub cell: ViewRef,
    pub element: ViewRef,
}

/// All indicators of one content epoch.
#[derive(Debug, Clone, Default)]
pub struct RowIndicators {
    indicators: Vec<RowIndicator>,
}

impl RowIndicators {
    /// Create one hidden, collapsed indicator per row, in front of the cell's
    /// existing children.
    ///
    /// If any creation fails, the indicators created so far are removed again.
    pub fn create<H: ViewHost + ?Sized>(
        host: &mut H,
        config: &ReflowConfig,
        first_cells: &[ViewRef],
    ) -> Result<Self, ReflowError> {
        let mut created = Self::default();

        for (row, &cell) in first_cells.iter().enumerate() {
            match Self::create_one(host, config, row, cell) {
                Ok(indicator) => created.indicators.push(indicator),
                Err(err) => {
                    // Best effort: the original error is what the caller needs.
                    let _ = created.remove_all(host);
                    return Err(err);
                }
            }
        }

        Ok(created)
    }

    fn create_one<H: ViewHost + ?Sized>(
        host: &mut H,
        config: &ReflowConfig,
        row: usize,
        cell: ViewRef,
    ) -> Result<RowIndicator, ReflowError> {
        let element = host.create_chrome_element(ChromeKind::Caret, cell, 0)?;
        let indicator = RowIndicator { row, cell, element };
        if let Err(err) = wire_indicator(host, config, row, element) {
            let _ = host.remove_chrome_element(element);
            return Err(err.into());
        }
        Ok(indicator)
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowIndicator> {
        self.indicators.iter()
    }

    pub fn get(&self, row: usize) -> Option<&RowIndicator> {
        self.indicators.get(row)
    }

    /// Row of the indicator `element`, if it is one of ours.
    pub fn row_of(&self, element: ViewRef) -> Option<usize> {
        self.indicators
            .iter()
            .find(|indicator| indicator.element == element)
            .map(|indicator| indicator.row)
    }

    /// Swap the style of one indicator after its row was toggled.
    pub fn apply_row_toggle<H: ViewHost + ?Sized>(
        &self,
        host: &mut H,
        config: &ReflowConfig,
        row: usize,
        expanded: bool,
    ) -> Result<(), ReflowError> {
        let Some(indicator) = self.get(row) else {
            return Err(ReflowError::MissingView("row indicator"));
        };
        let (from, to) = if expanded {
            (&config.collapsed_indicator_style, &config.expanded_indicator_style)
        } else {
            (&config.expanded_indicator_style, &config.collapsed_indicator_style)
        };
        host.remove_class(indicator.element, from)?;
        host.add_class(indicator.element, to)?;
        Ok(())
    }

    /// Follow a transposition state change: indicators only show while the
    /// table is transposed, and always start out collapsed.
    pub fn apply_state<H: ViewHost + ?Sized>(
        &self,
        host: &mut H,
        config: &ReflowConfig,
        state: TranspositionState,
    ) -> Result<(), ReflowError> {
        for indicator in &self.indicators {
            match state {
                TranspositionState::Default => {
                    host.set_visibility(indicator.element, false)?;
                }
                TranspositionState::Transposed => {
                    host.set_visibility(indicator.element, true)?;
                    if host.has_class(indicator.element, &config.expanded_indicator_style) {
                        host.remove_class(indicator.element, &config.expanded_indicator_style)?;
                        host.add_class(indicator.element, &config.collapsed_indicator_style)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Detach every indicator from its cell. Indicators whose cell was
    /// already dropped by the host are skipped.
    pub fn remove_all<H: ViewHost + ?Sized>(&mut self, host: &mut H) -> Result<(), ReflowError> {
        for indicator in self.indicators.drain(..) {
            if host.parent_of(indicator.element).is_some() {
                host.remove_chrome_element(indicator.element)?;
            }
        }
        Ok(())
    }
}

fn wire_indicator<H: ViewHost + ?Sized>(
    host: &mut H,
    config: &ReflowConfig,
    row: usize,
    element: ViewRef,
) -> Result<(), HostError> {
    host.add_class(element, &config.collapsed_indicator_style)?;
    host.set_visibility(element, false)?;
    host.attach_click_handler(element, ClickAction::ToggleAuxiliaryRow { row })
}
