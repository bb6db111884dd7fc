/// Width (in layout units) at which the grid switches from 2 to 3 columns
pub const WIDE_BREAKPOINT: u32 = 540;

/// Layout units per terminal cell
pub const UNITS_PER_CELL: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlan {
    pub columns: usize,
    pub rows: usize,
}

impl GridPlan {
    /// Grid cell (column, row) of the `index`th item, filling column by column
    pub fn cell(&self, index: usize) -> (usize, usize) {
        if self.rows == 0 {
            return (0, 0);
        }
        (index / self.rows, index % self.rows)
    }
}

pub fn cells_to_units(cells: u16) -> u32 {
    cells as u32 * UNITS_PER_CELL
}

/// Rows needed to lay out `item_count` items in a fixed-column grid
pub fn plan_rows(item_count: usize, viewport_width: u32) -> GridPlan {
    let columns = if viewport_width >= WIDE_BREAKPOINT { 3 } else { 2 };
    GridPlan {
        columns,
        rows: item_count.div_ceil(columns),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_viewport() {
        assert_eq!(plan_rows(11, 600), GridPlan { columns: 3, rows: 4 });
        assert_eq!(plan_rows(9, 540).rows, 3);
    }

    #[test]
    fn test_narrow_viewport() {
        assert_eq!(plan_rows(11, 400), GridPlan { columns: 2, rows: 6 });
        assert_eq!(plan_rows(11, 539).columns, 2);
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(plan_rows(0, 800).rows, 0);
        assert_eq!(plan_rows(0, 800).cell(3), (0, 0));
    }

    #[test]
    fn test_column_major_cells() {
        let plan = plan_rows(11, 600);
        assert_eq!(plan.cell(0), (0, 0));
        assert_eq!(plan.cell(3), (0, 3));
        assert_eq!(plan.cell(4), (1, 0));
        assert_eq!(plan.cell(10), (2, 2));
    }

    #[test]
    fn test_cells_to_units() {
        // 68 columns is the first terminal width on the wide side
        assert!(cells_to_units(67) < WIDE_BREAKPOINT);
        assert!(cells_to_units(68) >= WIDE_BREAKPOINT);
    }
}
