//! Table editing on the content model.
//!
//! Every operation works on the cells flagged `is_selected` and is a no-op
//! when none are. Operations only touch the model; any cell whose rendered
//! output changes goes through [`invalidate_cell`] so the next render
//! rebuilds it.

pub mod align;
pub mod delete;
pub mod format;
pub mod insert;
pub mod merge;
pub mod normalize;
pub mod split;

pub use align::{CellAlignment, TableAlignment, align_table, align_table_cell, set_table_cell_shade};
pub use delete::{delete_table, delete_table_column, delete_table_row};
pub use format::{apply_table_format, border_transparency};
pub use insert::{InsertOperation, insert_table_column, insert_table_row};
pub use merge::{
    MergeOperation, can_merge_cells, merge_table_cells, merge_table_column, merge_table_row,
};
pub use normalize::normalize_table;
pub use split::{split_table_cell_horizontally, split_table_cell_vertically};

use tapestry_dom::TableSelectionCoordinates;
use tapestry_model::creators::{create_br, create_paragraph, create_table_cell};
use tapestry_model::{ContentModelBlock, ContentModelTable, ContentModelTableCell};

/// Narrowest column a split or normalization leaves behind, in pixels.
pub const MIN_CELL_WIDTH: f64 = 30.0;
/// Shortest row a split or normalization leaves behind, in pixels.
pub const MIN_ROW_HEIGHT: f64 = 22.0;

/// Drop the cached element of a cell whose rendered output changed.
///
/// Every table operation funnels cell changes through here.
pub fn invalidate_cell(cell: &mut ContentModelTableCell) {
    cell.cached_element = None;
}

/// Invalidate the cell at (`row`, `col`), if any.
pub(crate) fn invalidate_at(table: &mut ContentModelTable, row: usize, col: usize) {
    if let Some(cell) = table.cell_mut(row, col) {
        invalidate_cell(cell);
    }
}

/// Invalidate the cell owning the slot at (`row`, `col`).
pub(crate) fn invalidate_owner(table: &mut ContentModelTable, row: usize, col: usize) {
    if let Some((row, col)) = table.owner_of(row, col) {
        invalidate_at(table, row, col);
    }
}

/// The rectangle covered by selected cells, if any cell is selected.
pub fn get_selected_cells(table: &ContentModelTable) -> Option<TableSelectionCoordinates> {
    let mut result: Option<TableSelectionCoordinates> = None;
    for (row_index, row) in table.rows.iter().enumerate() {
        for (col, cell) in row.cells.iter().enumerate() {
            if !cell.is_selected {
                continue;
            }
            let sel = result.get_or_insert(TableSelectionCoordinates {
                first_row: row_index,
                first_column: col,
                last_row: row_index,
                last_column: col,
            });
            sel.first_row = sel.first_row.min(row_index);
            sel.first_column = sel.first_column.min(col);
            sel.last_row = sel.last_row.max(row_index);
            sel.last_column = sel.last_column.max(col);
        }
    }
    result
}

/// Unselect the cells inside `sel`.
pub fn clear_selected_cells(table: &mut ContentModelTable, sel: &TableSelectionCoordinates) {
    for row in table.rows.iter_mut().take(sel.last_row + 1).skip(sel.first_row) {
        for cell in row.cells.iter_mut().take(sel.last_column + 1).skip(sel.first_column) {
            if cell.is_selected {
                cell.is_selected = false;
                invalidate_cell(cell);
            }
        }
    }
}

/// Make the cell owning (`row`, `col`) the only selected cell.
pub(crate) fn select_single_cell(table: &mut ContentModelTable, row: usize, col: usize) {
    let Some((row, col)) = table.owner_of(row, col) else {
        return;
    };
    for (r, table_row) in table.rows.iter_mut().enumerate() {
        for (c, cell) in table_row.cells.iter_mut().enumerate() {
            let selected = r == row && c == col;
            if cell.is_selected != selected {
                cell.is_selected = selected;
                invalidate_cell(cell);
            }
        }
    }
}

/// A fresh cell shaped like `source`: same span flags, header flag, format
/// and dataset, holding an empty line.
pub(crate) fn clone_empty_cell(source: &ContentModelTableCell) -> ContentModelTableCell {
    let mut cell = create_table_cell(
        source.span_left,
        source.span_above,
        source.is_header,
        Some(&source.format),
    );
    cell.dataset = source.dataset.clone();
    add_empty_line(&mut cell);
    cell
}

/// Append a paragraph holding a single `Br`.
pub(crate) fn add_empty_line(cell: &mut ContentModelTableCell) {
    let mut paragraph = create_paragraph(false, None, None, None);
    paragraph.segments.push(create_br(None));
    cell.blocks.push(ContentModelBlock::Paragraph(paragraph));
}

/// True if the cell shows nothing but empty lines.
pub(crate) fn is_cell_empty(cell: &ContentModelTableCell) -> bool {
    cell.blocks.iter().all(|block| match block {
        ContentModelBlock::Paragraph(paragraph) => paragraph.segments.iter().all(|segment| {
            matches!(
                segment.segment_type(),
                tapestry_model::SegmentType::Br | tapestry_model::SegmentType::SelectionMarker
            )
        }),
        _ => false,
    })
}

#[cfg(test)]
pub(crate) mod test_util {
    use tapestry_model::ContentModelTable;
    use tapestry_model::creators::{add_text_paragraph, create_table, create_table_cell};

    /// A `rows` x `cols` table whose cells hold their coordinates as text and
    /// carry a fake cached element.
    pub fn grid(rows: usize, cols: usize) -> ContentModelTable {
        let mut table = create_table(rows, None);
        for (r, row) in table.rows.iter_mut().enumerate() {
            row.height = 30.0;
            for c in 0..cols {
                let mut cell = create_table_cell(false, false, false, None);
                add_text_paragraph(&mut cell, &format!("{r}{c}"));
                cell.cached_element = Some(tapestry_dom::NodeId((100 + r * 10 + c) as u32));
                row.cells.push(cell);
            }
        }
        table.widths = vec![100.0; cols];
        table
    }

    pub fn select(table: &mut ContentModelTable, cells: &[(usize, usize)]) {
        for &(r, c) in cells {
            table.rows[r].cells[c].is_selected = true;
        }
    }

    /// One char per cell: `.` owner, `^` span above, `<` span left,
    /// `+` both, uppercase for selected owners.
    pub fn shape(table: &ContentModelTable) -> String {
        table
            .rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|cell| match (cell.span_above, cell.span_left, cell.is_selected) {
                        (true, true, _) => '+',
                        (true, false, _) => '^',
                        (false, true, _) => '<',
                        (false, false, true) => 'S',
                        (false, false, false) => '.',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Text of the first segment in each cell, row by row.
    pub fn texts(table: &ContentModelTable) -> Vec<Vec<String>> {
        table
            .rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|cell| {
                        cell.blocks
                            .iter()
                            .filter_map(|b| b.as_paragraph())
                            .flat_map(|p| p.segments.iter())
                            .filter_map(|s| s.text())
                            .collect::<Vec<_>>()
                            .join("+")
                    })
                    .collect()
            })
            .collect()
    }
}
