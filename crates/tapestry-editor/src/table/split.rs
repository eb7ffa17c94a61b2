//! Splitting selected cells in two.
//!
//! A split first undoes an existing merge on the far side of the selection;
//! only when there is none does it grow the grid by a column or row, which
//! the unselected part of the table absorbs as a span.

use tapestry_model::ContentModelTable;
use tapestry_model::creators::{create_table_cell, create_table_row};

use super::{
    MIN_CELL_WIDTH, MIN_ROW_HEIGHT, add_empty_line, get_selected_cells, invalidate_cell,
    invalidate_owner,
};

/// Split every selected cell into a left and a right half.
pub fn split_table_cell_horizontally(table: &mut ContentModelTable) {
    let Some(sel) = get_selected_cells(table) else {
        return;
    };
    let in_range = |row: usize| row >= sel.first_row && row <= sel.last_row;

    for col in (sel.first_column..=sel.last_column).rev() {
        let already_merged = (sel.first_row..=sel.last_row)
            .all(|row| table.cell(row, col + 1).is_some_and(|c| c.span_left));

        if already_merged {
            for row in sel.first_row..=sel.last_row {
                if let Some(cell) = table.cell_mut(row, col + 1) {
                    cell.span_left = false;
                    invalidate_cell(cell);
                }
                invalidate_owner(table, row, col);
            }
            continue;
        }

        for row in 0..table.rows.len() {
            let Some(source) = table.cell(row, col) else {
                continue;
            };
            let mut cell = create_table_cell(
                !in_range(row),
                source.span_above,
                source.is_header,
                Some(&source.format),
            );
            cell.dataset = source.dataset.clone();
            if in_range(row) {
                cell.is_selected = source.is_selected;
                if !cell.span_above {
                    add_empty_line(&mut cell);
                }
            }
            table.rows[row].cells.insert(col + 1, cell);
            invalidate_owner(table, row, col);
        }

        let width = table.widths.get(col).map_or(MIN_CELL_WIDTH, |w| (w / 2.0).max(MIN_CELL_WIDTH));
        if col < table.widths.len() {
            table.widths.splice(col..=col, [width, width]);
        }
    }
    tracing::debug!(target: "tapestry::table", ?sel, "split cells horizontally");
}

/// Split every selected cell into a top and a bottom half.
pub fn split_table_cell_vertically(table: &mut ContentModelTable) {
    let Some(sel) = get_selected_cells(table) else {
        return;
    };
    let in_range = |col: usize| col >= sel.first_column && col <= sel.last_column;

    for row in (sel.first_row..=sel.last_row).rev() {
        let already_merged = (sel.first_column..=sel.last_column)
            .all(|col| table.cell(row + 1, col).is_some_and(|c| c.span_above));

        if already_merged {
            for col in sel.first_column..=sel.last_column {
                if let Some(cell) = table.cell_mut(row + 1, col) {
                    cell.span_above = false;
                    invalidate_cell(cell);
                }
                invalidate_owner(table, row, col);
            }
            continue;
        }

        let source_row = &mut table.rows[row];
        let height = (source_row.height / 2.0).max(MIN_ROW_HEIGHT);
        source_row.height = height;
        source_row.cached_element = None;

        let mut new_row = create_table_row(Some(&source_row.format), height);
        new_row.cells = source_row
            .cells
            .iter()
            .enumerate()
            .map(|(col, source)| {
                let mut cell = create_table_cell(
                    source.span_left,
                    !in_range(col),
                    source.is_header,
                    Some(&source.format),
                );
                cell.dataset = source.dataset.clone();
                if in_range(col) {
                    cell.is_selected = source.is_selected;
                    if !cell.span_left {
                        add_empty_line(&mut cell);
                    }
                }
                cell
            })
            .collect();
        table.rows.insert(row + 1, new_row);

        for col in 0..table.rows[row].cells.len() {
            invalidate_owner(table, row, col);
        }
    }
    tracing::debug!(target: "tapestry::table", ?sel, "split cells vertically");
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use super::*;

    #[test]
    fn test_split_horizontally_adds_column() {
        let mut table = grid(2, 2);
        select(&mut table, &[(0, 0)]);
        split_table_cell_horizontally(&mut table);

        assert_eq!(shape(&table), "SS.|.<.");
        assert_eq!(texts(&table)[0], vec!["00", "", "01"]);
        assert_eq!(table.widths, vec![50.0, 50.0, 100.0]);
        assert_eq!(table.rows[1].cells[0].cached_element, None);
        assert!(table.rows[1].cells[2].cached_element.is_some());
    }

    #[test]
    fn test_split_horizontally_undoes_merge() {
        let mut table = grid(2, 2);
        table.rows[0].cells[1].span_left = true;
        select(&mut table, &[(0, 0)]);
        split_table_cell_horizontally(&mut table);

        assert_eq!(shape(&table), "S.|..");
        assert_eq!(table.widths.len(), 2);
        assert_eq!(table.rows[0].cells[1].cached_element, None);
    }

    #[test]
    fn test_split_horizontally_keeps_minimum_width() {
        let mut table = grid(1, 1);
        table.widths = vec![40.0];
        select(&mut table, &[(0, 0)]);
        split_table_cell_horizontally(&mut table);

        assert_eq!(table.widths, vec![MIN_CELL_WIDTH, MIN_CELL_WIDTH]);
    }

    #[test]
    fn test_split_vertically_adds_row() {
        let mut table = grid(2, 2);
        select(&mut table, &[(0, 1)]);
        split_table_cell_vertically(&mut table);

        assert_eq!(shape(&table), ".S|^S|..");
        let heights: Vec<f64> = table.rows.iter().map(|r| r.height).collect();
        assert_eq!(heights, vec![MIN_ROW_HEIGHT, MIN_ROW_HEIGHT, 30.0]);
        assert_eq!(table.rows[0].cells[0].cached_element, None);
        assert!(table.rows[2].cells[0].cached_element.is_some());
    }

    #[test]
    fn test_split_vertically_undoes_merge() {
        let mut table = grid(2, 1);
        table.rows[1].cells[0].span_above = true;
        select(&mut table, &[(0, 0)]);
        split_table_cell_vertically(&mut table);

        assert_eq!(shape(&table), "S|.");
        assert_eq!(table.rows.len(), 2);
    }
}
