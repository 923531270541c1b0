#![forbid(unsafe_code)]

//! Grid layout strategy.
//!
//! Items live on a 2D cell grid. Each row and column carries a minimum size
//! and a stretch weight; at resize time every line is sized independently by
//! the allocator and an item receives the extent of the lines it spans.
//!
//! Cell locations are always clamped inside the grid: an out-of-range
//! origin or an oversized span comes from dynamic user actions, not
//! programmer mistakes, so it is corrected silently and no item is ever
//! dropped. The line setters are the opposite. Addressing a row or column
//! that does not exist is a contract violation and fails fast.

use crate::allocator::{SlotSpec, distribute};
use crate::registry::ItemRegistry;
use crate::{LayoutError, SizeHint};
use std::collections::HashMap;
use std::fmt;
use trellis_core::geometry::BoxF;
use trellis_core::widget::WidgetId;

/// Minimum size and stretch weight of one row or column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineInfo {
    /// Minimum extent of the line.
    pub min: f32,
    /// Stretch weight of the line.
    pub stretch: f32,
}

/// Where an item sits on the grid, in cell units.
///
/// Always inside the grid: `x < columns`, `y < rows`, `x + w <= columns`,
/// `y + h <= rows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLocation {
    /// Leftmost column.
    pub x: usize,
    /// Topmost row.
    pub y: usize,
    /// Columns spanned.
    pub w: usize,
    /// Rows spanned.
    pub h: usize,
}

/// Configuration errors for the grid's line setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A column index at or past the column count.
    ColumnOutOfRange {
        /// Requested column.
        column: usize,
        /// Current column count.
        columns: usize,
    },
    /// A row index at or past the row count.
    RowOutOfRange {
        /// Requested row.
        row: usize,
        /// Current row count.
        rows: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnOutOfRange { column, columns } => write!(
                f,
                "cannot address column {column} in a {columns} column(s) wide layout"
            ),
            Self::RowOutOfRange { row, rows } => {
                write!(f, "cannot address row {row} in a {rows} row(s) high layout")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Arranges items on a 2D cell grid.
#[derive(Debug, Clone)]
pub struct GridLayout {
    columns: usize,
    rows: usize,
    margin: f32,
    registry: ItemRegistry,
    columns_info: Vec<LineInfo>,
    rows_info: Vec<LineInfo>,
    locations: HashMap<WidgetId, CellLocation>,
}

impl GridLayout {
    /// Create a grid with the given dimensions and inter-cell margin.
    ///
    /// Dimensions are clamped to at least one cell each way.
    #[must_use]
    pub fn new(columns: usize, rows: usize, margin: f32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            columns,
            rows,
            margin: margin.max(0.0),
            registry: ItemRegistry::new(),
            columns_info: vec![LineInfo::default(); columns],
            rows_info: vec![LineInfo::default(); rows],
            locations: HashMap::new(),
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of registered items.
    #[must_use]
    pub fn items_count(&self) -> usize {
        self.registry.len()
    }

    /// Registered items in physical order.
    #[must_use]
    pub fn items(&self) -> &[WidgetId] {
        self.registry.items()
    }

    /// Stored location of an item.
    #[must_use]
    pub fn location_of(&self, item: WidgetId) -> Option<CellLocation> {
        self.locations.get(&item).copied()
    }

    /// Resize the grid, discarding all per-line customization.
    ///
    /// Every line-info entry is reinitialized to `{min: 0, stretch: 0}`;
    /// callers must re-apply their stretch and minimum settings afterwards.
    /// Existing item locations are re-clamped into the new bounds.
    pub fn set_grid(&mut self, columns: usize, rows: usize) {
        self.columns = columns.max(1);
        self.rows = rows.max(1);
        self.reset_grid_info();

        let (columns, rows) = (self.columns, self.rows);
        for location in self.locations.values_mut() {
            *location = clamp_location(
                columns,
                rows,
                location.x,
                location.y,
                location.w,
                location.h,
            );
        }
    }

    fn reset_grid_info(&mut self) {
        self.columns_info = vec![LineInfo::default(); self.columns];
        self.rows_info = vec![LineInfo::default(); self.rows];
    }

    /// Register an item covering the cells `[x, x+w) x [y, y+h)`.
    ///
    /// The location is clamped so the span stays inside the grid even when
    /// the caller requests an out-of-range origin or an oversized span.
    /// Returns the physical index.
    pub fn add_item(
        &mut self,
        item: WidgetId,
        x: usize,
        y: usize,
        w: usize,
        h: usize,
    ) -> Result<usize, LayoutError> {
        let physical = self.registry.insert(item)?;
        self.locations
            .insert(item, clamp_location(self.columns, self.rows, x, y, w, h));
        Ok(physical)
    }

    /// Remove an item, returning the physical index it occupied.
    pub fn remove_item(&mut self, item: WidgetId) -> Result<usize, LayoutError> {
        let physical = self.registry.remove(item)?;
        if self.locations.remove(&item).is_none() {
            tracing::warn!(item = %item, "no cell location recorded for removed item");
        }
        Ok(physical)
    }

    /// Set the stretch weight of a column.
    pub fn set_column_stretch(&mut self, column: usize, stretch: f32) -> Result<(), GridError> {
        let info = self.column_info_mut(column)?;
        info.stretch = stretch;
        Ok(())
    }

    /// Set the minimum width of a column.
    pub fn set_column_minimum_width(&mut self, column: usize, width: f32) -> Result<(), GridError> {
        let info = self.column_info_mut(column)?;
        info.min = width;
        Ok(())
    }

    /// Set the minimum width of every column.
    pub fn set_columns_minimum_width(&mut self, width: f32) {
        for info in &mut self.columns_info {
            info.min = width;
        }
    }

    /// Set the stretch weight of a row.
    pub fn set_row_stretch(&mut self, row: usize, stretch: f32) -> Result<(), GridError> {
        let info = self.row_info_mut(row)?;
        info.stretch = stretch;
        Ok(())
    }

    /// Set the minimum height of a row.
    pub fn set_row_minimum_height(&mut self, row: usize, height: f32) -> Result<(), GridError> {
        let info = self.row_info_mut(row)?;
        info.min = height;
        Ok(())
    }

    /// Set the minimum height of every row.
    pub fn set_rows_minimum_height(&mut self, height: f32) {
        for info in &mut self.rows_info {
            info.min = height;
        }
    }

    fn column_info_mut(&mut self, column: usize) -> Result<&mut LineInfo, GridError> {
        if column >= self.columns {
            return Err(GridError::ColumnOutOfRange {
                column,
                columns: self.columns,
            });
        }
        Ok(&mut self.columns_info[column])
    }

    fn row_info_mut(&mut self, row: usize) -> Result<&mut LineInfo, GridError> {
        if row >= self.rows {
            return Err(GridError::RowOutOfRange {
                row,
                rows: self.rows,
            });
        }
        Ok(&mut self.rows_info[row])
    }

    /// Compute every item's target rectangle inside `window`.
    ///
    /// Column widths and row heights are distributed independently from the
    /// accumulated per-line minimums and stretches; the minimum of an item
    /// confined to a single cell is folded into its line first. An item
    /// spanning several lines receives their summed extents plus the
    /// margins it crosses.
    pub fn layout(&self, window: &BoxF, hints: &[SizeHint]) -> Result<Vec<BoxF>, LayoutError> {
        let count = self.items_count();
        if hints.len() != count {
            return Err(LayoutError::HintCountMismatch {
                expected: count,
                actual: hints.len(),
            });
        }
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut column_slots: Vec<SlotSpec> = self
            .columns_info
            .iter()
            .map(|info| SlotSpec::new(info.min, info.stretch))
            .collect();
        let mut row_slots: Vec<SlotSpec> = self
            .rows_info
            .iter()
            .map(|info| SlotSpec::new(info.min, info.stretch))
            .collect();

        for (physical, &item) in self.registry.items().iter().enumerate() {
            let Some(location) = self.locations.get(&item) else {
                continue;
            };
            let hint = hints[physical];
            if location.w == 1 {
                let slot = &mut column_slots[location.x];
                slot.min = slot.min.max(hint.min.w);
            }
            if location.h == 1 {
                let slot = &mut row_slots[location.y];
                slot.min = slot.min.max(hint.min.h);
            }
        }

        let column_margins = (self.columns - 1) as f32 * self.margin;
        let row_margins = (self.rows - 1) as f32 * self.margin;
        let widths = distribute(window.w - column_margins, &column_slots);
        let heights = distribute(window.h - row_margins, &row_slots);
        if !widths.fits() || !heights.fits() {
            tracing::debug!(
                width_deficit = widths.deficit,
                height_deficit = heights.deficit,
                "line minimums exceed the window; layout overflows"
            );
        }

        // Left edge of every column, top edge of every row (y-up).
        let mut column_edges = Vec::with_capacity(self.columns);
        let mut cursor = window.left_bound();
        for width in &widths.sizes {
            column_edges.push(cursor);
            cursor += width + self.margin;
        }
        let mut row_edges = Vec::with_capacity(self.rows);
        let mut cursor = window.top_bound();
        for height in &heights.sizes {
            row_edges.push(cursor);
            cursor -= height + self.margin;
        }

        let mut boxes = vec![BoxF::ZERO; count];
        for (physical, &item) in self.registry.items().iter().enumerate() {
            let Some(location) = self.locations.get(&item) else {
                continue;
            };
            let w: f32 = widths.sizes[location.x..location.x + location.w]
                .iter()
                .sum::<f32>()
                + (location.w - 1) as f32 * self.margin;
            let h: f32 = heights.sizes[location.y..location.y + location.h]
                .iter()
                .sum::<f32>()
                + (location.h - 1) as f32 * self.margin;
            let left = column_edges[location.x];
            let top = row_edges[location.y];
            boxes[physical] = BoxF::new(left + w / 2.0, top - h / 2.0, w, h);
        }

        Ok(boxes)
    }
}

/// Clamp a requested cell location fully inside a `columns` x `rows` grid.
fn clamp_location(
    columns: usize,
    rows: usize,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
) -> CellLocation {
    let x = x.min(columns - 1);
    let y = y.min(rows - 1);
    CellLocation {
        x,
        y,
        w: w.clamp(1, columns - x),
        h: h.clamp(1, rows - y),
    }
}
