//! Merging cells by turning neighbours into span placeholders.
//!
//! Content of a cell that becomes a placeholder moves into the owner so no
//! text is lost.

use std::ops::RangeInclusive;

use tapestry_model::{ContentModelBlock, ContentModelTable};

use super::{get_selected_cells, invalidate_at, is_cell_empty, select_single_cell};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeOperation {
    Above,
    Below,
    Left,
    Right,
}

/// Whether the rectangle (`first_row`, `first_col`)-(`last_row`, `last_col`)
/// is made of whole cells: nothing on its top edge spans from above, nothing
/// on its left edge spans from the left, and nothing just below or just to
/// the right spans into it.
pub fn can_merge_cells(
    table: &ContentModelTable,
    first_row: usize,
    first_col: usize,
    last_row: usize,
    last_col: usize,
) -> bool {
    if first_row > last_row || first_col > last_col || table.cell(last_row, last_col).is_none() {
        return false;
    }
    let spans_above = |row: usize, col: usize| table.cell(row, col).is_some_and(|c| c.span_above);
    let spans_left = |row: usize, col: usize| table.cell(row, col).is_some_and(|c| c.span_left);

    let top_clean = (first_col..=last_col).all(|col| !spans_above(first_row, col));
    let bottom_clean = (first_col..=last_col).all(|col| !spans_above(last_row + 1, col));
    let left_clean = (first_row..=last_row).all(|row| !spans_left(row, first_col));
    let right_clean = (first_row..=last_row).all(|row| !spans_left(row, last_col + 1));

    top_clean && bottom_clean && left_clean && right_clean
}

/// Move the content of the cell at (`row`, `col`) into the cell at
/// (`owner_row`, `owner_col`), dropping it if it only holds empty lines.
fn absorb_content(
    table: &mut ContentModelTable,
    owner_row: usize,
    owner_col: usize,
    row: usize,
    col: usize,
) {
    let blocks: Vec<ContentModelBlock> = match table.cell_mut(row, col) {
        Some(cell) if is_cell_empty(cell) => {
            cell.blocks.clear();
            return;
        }
        Some(cell) => std::mem::take(&mut cell.blocks),
        None => return,
    };
    if let Some(owner) = table.cell_mut(owner_row, owner_col) {
        if is_cell_empty(owner) {
            owner.blocks.clear();
        }
        owner.blocks.extend(blocks);
    }
}

fn invalidate_rect(table: &mut ContentModelTable, rows: RangeInclusive<usize>, cols: RangeInclusive<usize>) {
    for row in rows {
        for col in cols.clone() {
            invalidate_at(table, row, col);
        }
    }
}

/// Last row of the vertical span that starts at (`row`, `col`).
fn span_bottom(table: &ContentModelTable, row: usize, col: usize) -> usize {
    let mut bottom = row;
    while table.cell(bottom + 1, col).is_some_and(|c| c.span_above) {
        bottom += 1;
    }
    bottom
}

/// Last column of the horizontal span that starts at (`row`, `col`).
fn span_right(table: &ContentModelTable, row: usize, col: usize) -> usize {
    let mut right = col;
    while table.cell(row, right + 1).is_some_and(|c| c.span_left) {
        right += 1;
    }
    right
}

/// Merge the selected row with the row above, or the row below the selection
/// into the selected row.
pub fn merge_table_row(table: &mut ContentModelTable, operation: MergeOperation) {
    let Some(sel) = get_selected_cells(table) else {
        return;
    };
    let merging_row = match operation {
        MergeOperation::Above => sel.first_row,
        MergeOperation::Below => {
            (sel.first_column..=sel.last_column)
                .map(|col| span_bottom(table, sel.last_row, col))
                .max()
                .unwrap_or(sel.last_row)
                + 1
        }
        _ => return,
    };
    if merging_row == 0 || merging_row >= table.rows.len() {
        return;
    }

    let cols = sel.first_column..=sel.last_column;
    let top = cols
        .clone()
        .filter_map(|col| table.owner_of(merging_row - 1, col))
        .map(|(row, _)| row)
        .min()
        .unwrap_or(merging_row - 1);
    let bottom = cols
        .clone()
        .map(|col| span_bottom(table, merging_row, col))
        .max()
        .unwrap_or(merging_row);
    if !can_merge_cells(table, top, sel.first_column, bottom, sel.last_column) {
        tracing::debug!(target: "tapestry::table", ?operation, "cells cannot be merged");
        return;
    }

    for col in cols.clone() {
        let is_owner = table.cell(merging_row, col).is_some_and(|c| !c.is_placeholder());
        if is_owner && let Some((owner_row, owner_col)) = table.owner_of(merging_row - 1, col) {
            absorb_content(table, owner_row, owner_col, merging_row, col);
        }
        if let Some(cell) = table.cell_mut(merging_row, col) {
            cell.span_above = true;
        }
    }
    invalidate_rect(table, top..=bottom, cols);
    select_single_cell(table, merging_row, sel.first_column);
    tracing::debug!(target: "tapestry::table", ?operation, merging_row, "merged rows");
}

/// Merge the selected column with the column to its left, or the column right
/// of the selection into the selected column.
pub fn merge_table_column(table: &mut ContentModelTable, operation: MergeOperation) {
    let Some(sel) = get_selected_cells(table) else {
        return;
    };
    let merging_col = match operation {
        MergeOperation::Left => sel.first_column,
        MergeOperation::Right => {
            (sel.first_row..=sel.last_row)
                .map(|row| span_right(table, row, sel.last_column))
                .max()
                .unwrap_or(sel.last_column)
                + 1
        }
        _ => return,
    };
    if merging_col == 0 || merging_col >= table.column_count() {
        return;
    }

    let rows = sel.first_row..=sel.last_row;
    let left = rows
        .clone()
        .filter_map(|row| table.owner_of(row, merging_col - 1))
        .map(|(_, col)| col)
        .min()
        .unwrap_or(merging_col - 1);
    let right = rows
        .clone()
        .map(|row| span_right(table, row, merging_col))
        .max()
        .unwrap_or(merging_col);
    if !can_merge_cells(table, sel.first_row, left, sel.last_row, right) {
        tracing::debug!(target: "tapestry::table", ?operation, "cells cannot be merged");
        return;
    }

    for row in rows.clone() {
        let is_owner = table.cell(row, merging_col).is_some_and(|c| !c.is_placeholder());
        if is_owner && let Some((owner_row, owner_col)) = table.owner_of(row, merging_col - 1) {
            absorb_content(table, owner_row, owner_col, row, merging_col);
        }
        if let Some(cell) = table.cell_mut(row, merging_col) {
            cell.span_left = true;
        }
    }
    invalidate_rect(table, rows, left..=right);
    select_single_cell(table, sel.first_row, merging_col);
    tracing::debug!(target: "tapestry::table", ?operation, merging_col, "merged columns");
}

/// Merge every selected cell into the top-left one.
pub fn merge_table_cells(table: &mut ContentModelTable) {
    let Some(sel) = get_selected_cells(table) else {
        return;
    };
    if (sel.first_row, sel.first_column) == (sel.last_row, sel.last_column)
        || !can_merge_cells(table, sel.first_row, sel.first_column, sel.last_row, sel.last_column)
    {
        return;
    }

    for row in sel.first_row..=sel.last_row {
        for col in sel.first_column..=sel.last_column {
            if (row, col) == (sel.first_row, sel.first_column) {
                continue;
            }
            let is_owner = table.cell(row, col).is_some_and(|c| !c.is_placeholder());
            if is_owner {
                absorb_content(table, sel.first_row, sel.first_column, row, col);
            }
            if let Some(cell) = table.cell_mut(row, col) {
                cell.span_left = col > sel.first_column;
                cell.span_above = row > sel.first_row;
            }
        }
    }
    invalidate_rect(
        table,
        sel.first_row..=sel.last_row,
        sel.first_column..=sel.last_column,
    );
    select_single_cell(table, sel.first_row, sel.first_column);
    tracing::debug!(target: "tapestry::table", ?sel, "merged cells");
}
