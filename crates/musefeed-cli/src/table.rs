// SPDX-License-Identifier: Apache-2.0

//! Aligned column output for feed and interest listings.

/// Renders rows as aligned columns, clipping long cells with an ellipsis.
///
/// Prompts can run to hundreds of characters, so the printer carries an
/// optional per-cell width cap applied as rows are added.
pub struct TablePrinter {
    column_widths: Vec<usize>,
    max_cell_width: Option<usize>,
    rows: Vec<Vec<String>>,
}

impl TablePrinter {
    /// Creates a printer with the given column count and no width cap.
    pub fn new(column_count: usize) -> Self {
        Self {
            column_widths: vec![0; column_count],
            max_cell_width: None,
            rows: Vec::new(),
        }
    }

    /// Caps every cell at `max` characters; longer cells are clipped with
    /// a trailing ellipsis.
    pub fn with_max_cell_width(mut self, max: usize) -> Self {
        self.max_cell_width = Some(max);
        self
    }

    /// Adds a row, clipping cells and widening columns as needed.
    pub fn add_row(&mut self, cells: &[&str]) {
        let cells: Vec<String> = cells.iter().map(|cell| self.clip(cell)).collect();
        for (i, cell) in cells.iter().enumerate() {
            if i < self.column_widths.len() {
                self.column_widths[i] = self.column_widths[i].max(cell.chars().count());
            }
        }
        self.rows.push(cells);
    }

    fn clip(&self, cell: &str) -> String {
        let Some(max) = self.max_cell_width else {
            return cell.to_string();
        };
        if cell.chars().count() <= max {
            return cell.to_string();
        }
        let kept: String = cell.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }

    /// Renders the table as a formatted string.
    pub fn render(&self) -> String {
        use std::fmt::Write;
        let mut output = String::new();

        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let last = i == row.len() - 1;
                if last {
                    output.push_str(cell);
                } else {
                    let width = self.column_widths.get(i).copied().unwrap_or(0);
                    let _ = write!(output, "{cell:<width$}  ");
                }
            }
            output.push('\n');
        }

        output
    }
}
