//! Inserting rows and columns next to the selection.

use tapestry_model::ContentModelTable;
use tapestry_model::creators::create_table_row;

use super::{clone_empty_cell, get_selected_cells, invalidate_owner};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOperation {
    Above,
    Below,
    Left,
    Right,
}

/// Insert as many rows as are selected, above or below the selection. New
/// cells copy the format and span flags of the boundary row.
pub fn insert_table_row(table: &mut ContentModelTable, operation: InsertOperation) {
    let Some(sel) = get_selected_cells(table) else {
        return;
    };
    let above = match operation {
        InsertOperation::Above => true,
        InsertOperation::Below => false,
        _ => return,
    };
    let source_index = if above { sel.first_row } else { sel.last_row };
    let insert_at = if above { sel.first_row } else { sel.last_row + 1 };
    let count = sel.last_row - sel.first_row + 1;

    for _ in 0..count {
        let source = &table.rows[source_index];
        let mut row = create_table_row(Some(&source.format), source.height);
        row.cells = source.cells.iter().map(clone_empty_cell).collect();
        if insert_at == 0 {
            for cell in row.cells.iter_mut() {
                cell.span_above = false;
            }
        }
        table.rows.insert(insert_at, row);
    }

    // Owners whose span grew through the new rows now render taller.
    for col in 0..table.rows[insert_at].cells.len() {
        if table.rows[insert_at].cells[col].span_above {
            invalidate_owner(table, insert_at, col);
        }
    }
    tracing::debug!(target: "tapestry::table", ?operation, count, insert_at, "inserted rows");
}

/// Insert as many columns as are selected, left or right of the selection.
/// New cells copy header flag, format and span flags of the boundary column.
pub fn insert_table_column(table: &mut ContentModelTable, operation: InsertOperation) {
    let Some(sel) = get_selected_cells(table) else {
        return;
    };
    let left = match operation {
        InsertOperation::Left => true,
        InsertOperation::Right => false,
        _ => return,
    };
    let source_index = if left { sel.first_column } else { sel.last_column };
    let insert_at = if left { sel.first_column } else { sel.last_column + 1 };
    let count = sel.last_column - sel.first_column + 1;

    for _ in 0..count {
        for row in table.rows.iter_mut() {
            let Some(source) = row.cells.get(source_index) else {
                continue;
            };
            let mut cell = clone_empty_cell(source);
            if insert_at == 0 {
                cell.span_left = false;
            }
            let at = insert_at.min(row.cells.len());
            row.cells.insert(at, cell);
        }
        let width = table.widths.get(source_index).copied().unwrap_or(0.0);
        let at = insert_at.min(table.widths.len());
        table.widths.insert(at, width);
    }

    for row in 0..table.rows.len() {
        if table.cell(row, insert_at).is_some_and(|c| c.span_left) {
            invalidate_owner(table, row, insert_at);
        }
    }
    tracing::debug!(target: "tapestry::table", ?operation, count, insert_at, "inserted columns");
}
