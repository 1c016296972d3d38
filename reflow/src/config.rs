//! Engine configuration.

use serde::Deserialize;

use crate::aux_row::OrderStrategy;
use crate::error::ConfigError;

/// Default safety margin between table and parent width.
pub const DEFAULT_WIDTH_MARGIN: u32 = 100;

/// Per-table configuration for the transposition engine.
///
/// Deserializable so hosts can keep it next to their own settings; missing
/// fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReflowConfig {
    /// Never transpose the last column.
    pub preserve_last_column: bool,

    /// Style token applied to a row indicator while its auxiliary row is hidden.
    pub collapsed_indicator_style: String,

    /// Style token applied to a row indicator while its auxiliary row is shown.
    pub expanded_indicator_style: String,

    /// Buffer that keeps collapse and restore apart so the table does not
    /// oscillate at a single width.
    pub width_margin: u32,

    /// How content is ordered inside auxiliary rows.
    pub order_strategy: OrderStrategy,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            preserve_last_column: false,
            collapsed_indicator_style: "fa-toggle-right".to_string(),
            expanded_indicator_style: "fa-toggle-down".to_string(),
            width_margin: DEFAULT_WIDTH_MARGIN,
            order_strategy: OrderStrategy::default(),
        }
    }
}

impl ReflowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the last column in place.
    pub fn preserve_last_column(mut self, preserve: bool) -> Self {
        self.preserve_last_column = preserve;
        self
    }

    /// Set the collapsed and expanded indicator style tokens.
    pub fn indicator_styles(
        mut self,
        collapsed: impl Into<String>,
        expanded: impl Into<String>,
    ) -> Self {
        self.collapsed_indicator_style = collapsed.into();
        self.expanded_indicator_style = expanded.into();
        self
    }

    pub fn width_margin(mut self, margin: u32) -> Self {
        self.width_margin = margin;
        self
    }

    pub fn order_strategy(mut self, strategy: OrderStrategy) -> Self {
        self.order_strategy = strategy;
        self
    }

    /// Check the configuration before an engine is mounted with it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collapsed_indicator_style.trim().is_empty() {
            return Err(ConfigError::EmptyIndicatorStyle {
                field: "collapsed_indicator_style",
            });
        }
        if self.expanded_indicator_style.trim().is_empty() {
            return Err(ConfigError::EmptyIndicatorStyle {
                field: "expanded_indicator_style",
            });
        }
        // Both tokens live on the same element and are swapped on toggle.
        if self.collapsed_indicator_style == self.expanded_indicator_style {
            return Err(ConfigError::IdenticalIndicatorStyles(
                self.collapsed_indicator_style.clone(),
            ));
        }
        Ok(())
    }
}
