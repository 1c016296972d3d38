use unicode_width::UnicodeWidthStr;

use super::{MemoryHost, NodeKind};
use crate::types::ViewRef;

const COLLAPSED_GLYPH: &str = "▸ ";
const EXPANDED_GLYPH: &str = "▾ ";
const DETAIL_INDENT: &str = "    ";

impl MemoryHost {
    /// Render the table as plain text lines.
    ///
    /// Columns are padded to their laid-out width, widened where a rendered
    /// cell (indicator glyph included) needs more display columns. Visible
    /// auxiliary rows are rendered below their row as `header: value` lines.
    /// A visible indicator renders as a glyph in front of its cell, expanded
    /// when it carries `expanded_class`.
    pub fn render_lines(&self, expanded_class: &str) -> Vec<String> {
        let rendered: Vec<Vec<String>> = self
            .slots
            .iter()
            .map(|slots| {
                slots
                    .iter()
                    .map(|slot| self.render_slot(*slot, expanded_class))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                rendered
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|text| text.width())
                    .fold(self.column_width(col) as usize, usize::max)
            })
            .collect();

        let mut lines = Vec::new();

        let mut header_line = String::new();
        for (col, header) in self.headers.iter().enumerate() {
            let Some(node) = self.node(*header) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            header_line.push_str(&pad(&node.label, widths[col]));
        }
        lines.push(header_line.trim_end().to_string());

        for (row, cells) in rendered.iter().enumerate() {
            let mut line = String::new();
            for (col, text) in cells.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                line.push_str(&pad(text, widths[col]));
            }
            lines.push(line.trim_end().to_string());

            if let Some(aux) = self.auxiliary_row(row) {
                if self.is_visible(aux) {
                    lines.extend(self.render_details(aux, expanded_class));
                }
            }
        }

        lines
    }

    fn render_slot(&self, slot: ViewRef, expanded_class: &str) -> String {
        self.children(slot)
            .iter()
            .map(|cell| self.render_cell(*cell, expanded_class))
            .collect()
    }

    fn render_cell(&self, cell: ViewRef, expanded_class: &str) -> String {
        let Some(node) = self.node(cell) else {
            return String::new();
        };
        if !node.visible {
            return String::new();
        }

        let mut out = String::new();
        for child in &node.children {
            let Some(chrome) = self.node(*child) else {
                continue;
            };
            if matches!(chrome.kind, NodeKind::Chrome(_)) && chrome.visible {
                out.push_str(if chrome.has_class(expanded_class) {
                    EXPANDED_GLYPH
                } else {
                    COLLAPSED_GLYPH
                });
            }
        }
        out.push_str(&node.label);
        out
    }

    fn render_details(&self, aux: ViewRef, expanded_class: &str) -> Vec<String> {
        self.children(aux)
            .iter()
            .map(|content| {
                let header = self
                    .column_of_cell(*content)
                    .and_then(|col| self.headers.get(col))
                    .and_then(|h| self.node(*h))
                    .map(|h| h.label.as_str())
                    .unwrap_or_default();
                format!(
                    "{DETAIL_INDENT}{}: {}",
                    header.trim(),
                    self.render_cell(*content, expanded_class)
                )
            })
            .collect()
    }
}

/// Pad `text` with spaces to `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}
