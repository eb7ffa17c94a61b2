//! Deleting rows, columns and whole tables.

use tapestry_model::ContentModelTable;

use super::{get_selected_cells, invalidate_cell, invalidate_owner, select_single_cell};

/// Remove the selected rows. A cell right below the removed range that was
/// spanned from inside it becomes a cell of its own.
pub fn delete_table_row(table: &mut ContentModelTable) {
    let Some(sel) = get_selected_cells(table) else {
        return;
    };
    let (first, last) = (sel.first_row, sel.last_row);

    let columns = table.rows[first].cells.len();
    for col in 0..columns {
        let spanned_from_above = table.rows[first].cells[col].span_above;
        if spanned_from_above {
            // The owner sits above the removed range and loses height.
            invalidate_owner(table, first, col);
        }
        if let Some(below) = table.rows.get_mut(last + 1)
            && let Some(cell) = below.cells.get_mut(col)
            && cell.span_above
            && !spanned_from_above
        {
            cell.span_above = false;
            invalidate_cell(cell);
        }
    }

    table.rows.drain(first..=last);
    if !table.rows.is_empty() {
        select_single_cell(table, first.min(table.rows.len() - 1), sel.first_column);
    }
    tracing::debug!(target: "tapestry::table", first, last, "deleted rows");
}

/// Remove the selected columns. A cell right of the removed range that was
/// spanned from inside it becomes a cell of its own.
pub fn delete_table_column(table: &mut ContentModelTable) {
    let Some(sel) = get_selected_cells(table) else {
        return;
    };
    let (first, last) = (sel.first_column, sel.last_column);

    for row in 0..table.rows.len() {
        let spanned_from_left = table.cell(row, first).is_some_and(|c| c.span_left);
        if spanned_from_left {
            invalidate_owner(table, row, first);
        }
        if let Some(cell) = table.cell_mut(row, last + 1)
            && cell.span_left
            && !spanned_from_left
        {
            cell.span_left = false;
            invalidate_cell(cell);
        }
    }

    for row in table.rows.iter_mut() {
        let end = (last + 1).min(row.cells.len());
        if first < end {
            row.cells.drain(first..end);
        }
    }
    let end = (last + 1).min(table.widths.len());
    if first < end {
        table.widths.drain(first..end);
    }

    if table.rows.iter().all(|row| row.cells.is_empty()) {
        delete_table(table);
    } else {
        let col = first.min(table.column_count().saturating_sub(1));
        select_single_cell(table, sel.first_row, col);
    }
    tracing::debug!(target: "tapestry::table", first, last, "deleted columns");
}

/// Empty the table. An empty table renders nothing and is dropped by
/// normalization.
pub fn delete_table(table: &mut ContentModelTable) {
    table.rows.clear();
    table.widths.clear();
    table.cached_element = None;
}
