//! Bringing a table into the shape the editor expects after edits or import.

use tapestry_model::ContentModelTable;
use tapestry_model::creators::create_table_cell;

use super::{MIN_CELL_WIDTH, MIN_ROW_HEIGHT, add_empty_line, invalidate_cell};

/// Width given to a column with no declared width, by column count.
fn default_width(column_count: usize) -> f64 {
    match column_count {
        0..=4 => 120.0,
        5..=6 => 100.0,
        _ => 70.0,
    }
}

/// Normalize `table` in place:
///
/// - collapsed borders with border-box sizing
/// - every row as wide as the widest one
/// - no span out of the first row or column
/// - every cell holds at least an empty line
/// - columns and rows no smaller than the minimum size
/// - rows or columns made only of placeholders are folded into their owner
///
/// Only cells that actually change lose their cached element.
pub fn normalize_table(table: &mut ContentModelTable) {
    if table.format.border_collapse != Some(true) || table.format.use_border_box != Some(true) {
        table.format.border_collapse = Some(true);
        table.format.use_border_box = Some(true);
        table.cached_element = None;
    }

    let column_count = table.column_count();
    for (row_index, row) in table.rows.iter_mut().enumerate() {
        while row.cells.len() < column_count {
            let mut cell = create_table_cell(false, false, false, None);
            add_empty_line(&mut cell);
            row.cells.push(cell);
            row.cached_element = None;
        }
        for (col, cell) in row.cells.iter_mut().enumerate() {
            let mut changed = false;
            if row_index == 0 && cell.span_above {
                cell.span_above = false;
                changed = true;
            }
            if col == 0 && cell.span_left {
                cell.span_left = false;
                changed = true;
            }
            if !cell.is_placeholder() && cell.blocks.is_empty() {
                add_empty_line(cell);
                changed = true;
            }
            if changed {
                invalidate_cell(cell);
            }
        }
        if row.height < MIN_ROW_HEIGHT {
            row.height = MIN_ROW_HEIGHT;
            row.cached_element = None;
        }
    }

    if table.widths.len() != column_count {
        table.widths.resize(column_count, default_width(column_count));
        table.cached_element = None;
    }
    for width in table.widths.iter_mut() {
        if *width < MIN_CELL_WIDTH {
            *width = MIN_CELL_WIDTH;
            table.cached_element = None;
        }
    }

    fold_placeholder_rows(table);
    fold_placeholder_columns(table);
}

/// Drop rows whose every cell spans from above, giving their height to the
/// row above.
fn fold_placeholder_rows(table: &mut ContentModelTable) {
    let mut row = 1;
    while row < table.rows.len() {
        let all_spanned = table.rows[row].cells.iter().all(|c| c.span_above);
        if !all_spanned || table.rows[row].cells.is_empty() {
            row += 1;
            continue;
        }
        let removed = table.rows.remove(row);
        let above = &mut table.rows[row - 1];
        above.height += removed.height;
        above.cached_element = None;
        for cell in above.cells.iter_mut() {
            invalidate_cell(cell);
        }
        tracing::debug!(target: "tapestry::table", row, "folded placeholder row");
    }
}

/// Drop columns whose every cell spans from the left, giving their width to
/// the column on the left.
fn fold_placeholder_columns(table: &mut ContentModelTable) {
    let mut col = 1;
    while col < table.column_count() {
        let all_spanned = table
            .rows
            .iter()
            .all(|row| row.cells.get(col).is_none_or(|c| c.span_left));
        if !all_spanned {
            col += 1;
            continue;
        }
        for row in table.rows.iter_mut() {
            if col < row.cells.len() {
                row.cells.remove(col);
            }
            if let Some(cell) = row.cells.get_mut(col - 1) {
                invalidate_cell(cell);
            }
        }
        if col < table.widths.len() {
            let width = table.widths.remove(col);
            table.widths[col - 1] += width;
        }
        table.cached_element = None;
        tracing::debug!(target: "tapestry::table", col, "folded placeholder column");
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use super::*;
    use tapestry_model::creators::create_table;

    #[test]
    fn test_pads_rows_and_widths() {
        let mut table = grid(2, 2);
        table.rows[1].cells.pop();
        table.widths.clear();
        normalize_table(&mut table);

        assert_eq!(texts(&table), vec![vec!["00", "01"], vec!["10", ""]]);
        assert_eq!(table.widths, vec![120.0, 120.0]);
        assert_eq!(table.format.border_collapse, Some(true));
        assert!(table.rows[0].cells[0].cached_element.is_some());
    }

    #[test]
    fn test_clears_spans_on_edges() {
        let mut table = grid(2, 2);
        table.rows[0].cells[1].span_above = true;
        table.rows[1].cells[0].span_left = true;
        normalize_table(&mut table);

        assert_eq!(shape(&table), "..|..");
        assert_eq!(table.rows[0].cells[1].cached_element, None);
        assert!(table.rows[1].cells[1].cached_element.is_some());
    }

    #[test]
    fn test_minimum_sizes() {
        let mut table = grid(1, 2);
        table.rows[0].height = 5.0;
        table.widths = vec![10.0, 200.0];
        normalize_table(&mut table);

        assert_eq!(table.rows[0].height, MIN_ROW_HEIGHT);
        assert_eq!(table.widths, vec![MIN_CELL_WIDTH, 200.0]);
    }

    #[test]
    fn test_folds_placeholder_row_and_column() {
        let mut table = grid(2, 3);
        table.rows[1].cells.iter_mut().for_each(|c| c.span_above = true);
        for row in table.rows.iter_mut() {
            row.cells[2].span_left = true;
        }
        normalize_table(&mut table);

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].height, 60.0);
        assert_eq!(table.widths, vec![100.0, 200.0]);
        assert_eq!(shape(&table), "..");
    }

    #[test]
    fn test_empty_cells_get_a_line() {
        let mut table = create_table(1, None);
        table.rows[0].cells.push(create_table_cell(false, false, false, None));
        normalize_table(&mut table);

        assert_eq!(table.rows[0].cells[0].blocks.len(), 1);
        assert_eq!(table.widths, vec![120.0]);
    }
}
