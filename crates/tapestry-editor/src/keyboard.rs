//! Content operations bound to keys.

use tapestry_model::creators::{create_paragraph, create_selection_marker, create_table_row};
use tapestry_model::selection::{block_at, block_at_mut, get_selected_segments};
use tapestry_model::{BlockGroup, ContentModelBlock, ContentModelTable, PathStep, set_selection};

use crate::list::{IndentDirection, get_operational_blocks, set_model_indentation};
use crate::settings::EditorSettings;
use crate::table::clone_empty_cell;

/// Handle Tab (or Shift+Tab with `shift`) on the selection.
///
/// In a list item the selected items are indented or outdented. In a table
/// cell the caret moves to the next or previous cell; Tab in the last cell
/// adds a row. Returns false when the key is not consumed and the host
/// should insert a tab character.
pub fn handle_tab_key(root: &mut dyn BlockGroup, shift: bool, settings: &EditorSettings) -> bool {
    let blocks = get_operational_blocks(root);
    let in_list = blocks
        .iter()
        .any(|path| block_at(&*root, path).is_some_and(|b| b.as_list_item().is_some()));

    if in_list && settings.tab_indent_list {
        let direction = if shift {
            IndentDirection::Outdent
        } else {
            IndentDirection::Indent
        };
        return set_model_indentation(root, direction, settings);
    }

    let Some(first) = get_selected_segments(root).into_iter().next() else {
        return false;
    };
    let Some(cell_index) = first.iter().rposition(|s| matches!(s, PathStep::Cell { .. })) else {
        return false;
    };
    let PathStep::Cell { row, col } = first[cell_index] else {
        return false;
    };
    let table_path = &first[..cell_index];
    let Some(ContentModelBlock::Table(table)) = block_at_mut(root, table_path) else {
        return false;
    };

    let target = if shift {
        previous_cell(table, row, col)
    } else {
        Some(next_cell(table, row, col).unwrap_or_else(|| append_row(table)))
    };
    let Some((row, col)) = target else {
        // Shift+Tab in the first cell stays put.
        return true;
    };

    let Some(marker_path) = place_caret(table, row, col) else {
        return false;
    };
    let mut path = table_path.to_vec();
    path.push(PathStep::Cell { row, col });
    path.extend(marker_path);
    set_selection(root, Some(&path), None);
    tracing::debug!(target: "tapestry::selection", row, col, shift, "moved caret to cell");
    true
}

fn is_owner(table: &ContentModelTable, row: usize, col: usize) -> bool {
    table.cell(row, col).is_some_and(|c| !c.is_placeholder())
}

fn next_cell(table: &ContentModelTable, row: usize, col: usize) -> Option<(usize, usize)> {
    let slots = table
        .rows
        .iter()
        .enumerate()
        .flat_map(|(r, cells)| (0..cells.cells.len()).map(move |c| (r, c)));
    slots
        .skip_while(|&slot| slot != (row, col))
        .skip(1)
        .find(|&(r, c)| is_owner(table, r, c))
}

fn previous_cell(table: &ContentModelTable, row: usize, col: usize) -> Option<(usize, usize)> {
    let slots: Vec<(usize, usize)> = table
        .rows
        .iter()
        .enumerate()
        .flat_map(|(r, cells)| (0..cells.cells.len()).map(move |c| (r, c)))
        .take_while(|&slot| slot != (row, col))
        .collect();
    slots.into_iter().rev().find(|&(r, c)| is_owner(table, r, c))
}

/// Add an empty row shaped like the last one and return its first cell.
fn append_row(table: &mut ContentModelTable) -> (usize, usize) {
    let new_row = match table.rows.last() {
        Some(last) => {
            let mut row = create_table_row(Some(&last.format), last.height);
            row.cells = last
                .cells
                .iter()
                .map(|source| {
                    let mut cell = clone_empty_cell(source);
                    cell.span_above = false;
                    cell.span_left = false;
                    cell
                })
                .collect();
            row
        }
        None => create_table_row(None, 0.0),
    };
    table.rows.push(new_row);
    tracing::debug!(target: "tapestry::table", rows = table.rows.len(), "appended row");
    (table.rows.len() - 1, 0)
}

/// Put a selection marker at the start of the cell's first paragraph and
/// return its path inside the cell.
fn place_caret(table: &mut ContentModelTable, row: usize, col: usize) -> Option<Vec<PathStep>> {
    let cell = table.cell_mut(row, col)?;
    if !matches!(cell.blocks.first(), Some(ContentModelBlock::Paragraph(_))) {
        cell.blocks
            .insert(0, ContentModelBlock::Paragraph(create_paragraph(false, None, None, None)));
    }
    let paragraph = cell.blocks.first_mut()?.as_paragraph_mut()?;
    paragraph.segments.insert(0, create_selection_marker(None));
    paragraph.cached_element = None;
    cell.cached_element = None;
    Some(vec![PathStep::Block(0), PathStep::Segment(0)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapestry_model::creators::*;
    use tapestry_model::{ContentModelDocument, ListType};

    fn table_doc(rows: usize, cols: usize) -> ContentModelDocument {
        let mut table = create_table(rows, None);
        for (r, row) in table.rows.iter_mut().enumerate() {
            for c in 0..cols {
                let mut cell = create_table_cell(false, false, false, None);
                add_text_paragraph(&mut cell, &format!("{r}{c}"));
                row.cells.push(cell);
            }
        }
        let mut doc = create_content_model_document(None);
        doc.blocks.push(ContentModelBlock::Table(table));
        doc
    }

    fn caret_in(row: usize, col: usize) -> Vec<PathStep> {
        vec![
            PathStep::Block(0),
            PathStep::Cell { row, col },
            PathStep::Block(0),
            PathStep::Segment(0),
        ]
    }

    fn selected(doc: &ContentModelDocument) -> Vec<Vec<PathStep>> {
        get_selected_segments(doc)
    }

    #[test]
    fn test_tab_moves_to_next_cell() {
        let mut doc = table_doc(2, 2);
        set_selection(&mut doc, Some(&caret_in(0, 0)), None);

        assert!(handle_tab_key(&mut doc, false, &EditorSettings::default()));
        assert_eq!(selected(&doc), vec![caret_in(0, 1)]);
        let marker = tapestry_model::selection::segment_at(&doc, &caret_in(0, 1));
        assert!(marker.is_some_and(|s| s.is_selection_marker()));
    }

    #[test]
    fn test_tab_skips_placeholders() {
        let mut doc = table_doc(2, 2);
        if let ContentModelBlock::Table(table) = &mut doc.blocks[0] {
            table.rows[0].cells[1].span_left = true;
        }
        set_selection(&mut doc, Some(&caret_in(0, 0)), None);

        handle_tab_key(&mut doc, false, &EditorSettings::default());
        assert_eq!(selected(&doc), vec![caret_in(1, 0)]);
    }

    #[test]
    fn test_tab_in_last_cell_adds_row() {
        let mut doc = table_doc(1, 2);
        set_selection(&mut doc, Some(&caret_in(0, 1)), None);

        handle_tab_key(&mut doc, false, &EditorSettings::default());
        let rows = doc.blocks[0].as_table().map(|t| t.rows.len());
        assert_eq!(rows, Some(2));
        assert_eq!(selected(&doc), vec![caret_in(1, 0)]);
    }

    #[test]
    fn test_shift_tab_moves_back() {
        let mut doc = table_doc(2, 2);
        set_selection(&mut doc, Some(&caret_in(1, 0)), None);

        handle_tab_key(&mut doc, true, &EditorSettings::default());
        assert_eq!(selected(&doc), vec![caret_in(0, 1)]);

        set_selection(&mut doc, Some(&caret_in(0, 0)), None);
        assert!(handle_tab_key(&mut doc, true, &EditorSettings::default()));
        assert_eq!(doc.blocks[0].as_table().map(|t| t.rows.len()), Some(2));
    }

    #[test]
    fn test_tab_indents_list_item() {
        let level = create_list_level(ListType::Unordered, None, None);
        let mut item = create_list_item(std::slice::from_ref(&level), None);
        add_text_paragraph(&mut item, "a");
        let mut doc = create_content_model_document(None);
        doc.blocks.push(ContentModelBlock::ListItem(item));
        let caret = [PathStep::Block(0), PathStep::Block(0), PathStep::Segment(0)];
        set_selection(&mut doc, Some(&caret), None);

        assert!(handle_tab_key(&mut doc, false, &EditorSettings::default()));
        assert_eq!(doc.blocks[0].as_list_item().map(|i| i.levels.len()), Some(2));

        let settings = EditorSettings {
            tab_indent_list: false,
            ..Default::default()
        };
        assert!(!handle_tab_key(&mut doc, false, &settings));
    }

    #[test]
    fn test_plain_paragraph_is_not_consumed() {
        let mut doc = create_content_model_document(None);
        add_text_paragraph(&mut doc, "a");
        set_selection(&mut doc, Some(&[PathStep::Block(0), PathStep::Segment(0)]), None);
        assert!(!handle_tab_key(&mut doc, false, &EditorSettings::default()));
    }
}
