//! Walking the selected parts of a model.

use crate::model::{BlockGroup, ContentModelBlock, ContentModelParagraph};

use super::path::PathStep;

/// Selected content met during [`iterate_selections`].
#[derive(Debug)]
pub enum SelectedContent<'m> {
    /// Indices of the selected segments of one paragraph.
    Segments {
        paragraph: &'m ContentModelParagraph,
        indices: Vec<usize>,
    },
    /// A selected divider or entity.
    Block(&'m ContentModelBlock),
}

/// Call `callback` with the path and content of every selected paragraph
/// (its selected segments) and every selected divider or entity, in document
/// order. Everything inside a selected table cell counts as selected.
/// Iteration stops when the callback returns false.
pub fn iterate_selections<'m>(
    root: &'m dyn BlockGroup,
    callback: &mut dyn FnMut(&[PathStep], SelectedContent<'m>) -> bool,
) {
    let mut path = Vec::new();
    iterate_group(root, &mut path, false, callback);
}

fn iterate_group<'m>(
    group: &'m dyn BlockGroup,
    path: &mut Vec<PathStep>,
    treat_all_as_selected: bool,
    callback: &mut dyn FnMut(&[PathStep], SelectedContent<'m>) -> bool,
) -> bool {
    for (index, block) in group.blocks().iter().enumerate() {
        path.push(PathStep::Block(index));
        let keep_going = iterate_block(block, path, treat_all_as_selected, callback);
        path.pop();
        if !keep_going {
            return false;
        }
    }
    true
}

fn iterate_block<'m>(
    block: &'m ContentModelBlock,
    path: &mut Vec<PathStep>,
    all: bool,
    callback: &mut dyn FnMut(&[PathStep], SelectedContent<'m>) -> bool,
) -> bool {
    match block {
        ContentModelBlock::Paragraph(paragraph) => {
            let indices: Vec<usize> = paragraph
                .segments
                .iter()
                .enumerate()
                .filter(|(_, segment)| all || segment.is_selected)
                .map(|(index, _)| index)
                .collect();
            if (!indices.is_empty() || all)
                && !callback(path.as_slice(), SelectedContent::Segments { paragraph, indices })
            {
                return false;
            }
            for (index, segment) in paragraph.segments.iter().enumerate() {
                if let Some(general) = segment.as_group() {
                    path.push(PathStep::Segment(index));
                    let keep_going = iterate_group(general, path, all, callback);
                    path.pop();
                    if !keep_going {
                        return false;
                    }
                }
            }
            true
        }
        ContentModelBlock::Table(table) => {
            for (row_index, row) in table.rows.iter().enumerate() {
                for (col, cell) in row.cells.iter().enumerate() {
                    path.push(PathStep::Cell { row: row_index, col });
                    let keep_going = iterate_group(cell, path, all || cell.is_selected, callback);
                    path.pop();
                    if !keep_going {
                        return false;
                    }
                }
            }
            true
        }
        ContentModelBlock::Divider(divider) => {
            !(all || divider.is_selected) || callback(path.as_slice(), SelectedContent::Block(block))
        }
        ContentModelBlock::Entity(entity) => {
            !(all || entity.is_selected) || callback(path.as_slice(), SelectedContent::Block(block))
        }
        _ => match block.as_group() {
            Some(group) => iterate_group(group, path, all, callback),
            None => true,
        },
    }
}

/// Paths of every selected segment, in document order.
pub fn get_selected_segments(root: &dyn BlockGroup) -> Vec<Vec<PathStep>> {
    get_selected_segments_and_paragraphs(root)
        .into_iter()
        .flat_map(|(paragraph, indices)| {
            indices.into_iter().map(move |index| {
                let mut path = paragraph.clone();
                path.push(PathStep::Segment(index));
                path
            })
        })
        .collect()
}

/// Paths of every paragraph holding selected segments, each with the indices
/// of those segments.
pub fn get_selected_segments_and_paragraphs(root: &dyn BlockGroup) -> Vec<(Vec<PathStep>, Vec<usize>)> {
    let mut result = Vec::new();
    iterate_selections(root, &mut |path, content| {
        if let SelectedContent::Segments { indices, .. } = content {
            result.push((path.to_vec(), indices));
        }
        true
    });
    result
}

/// Paths of the paragraphs that contain selection.
pub fn get_selected_paragraphs(root: &dyn BlockGroup) -> Vec<Vec<PathStep>> {
    get_selected_segments_and_paragraphs(root)
        .into_iter()
        .map(|(path, _)| path)
        .collect()
}

/// True if anything under `group` is selected: a segment, a divider, an
/// entity or a table cell.
pub fn has_selection_in_block_group(group: &dyn BlockGroup) -> bool {
    group.blocks().iter().any(|block| match block {
        ContentModelBlock::Paragraph(paragraph) => paragraph.segments.iter().any(|segment| {
            segment.is_selected || segment.as_group().is_some_and(|g| has_selection_in_block_group(g))
        }),
        ContentModelBlock::Table(table) => table
            .rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .any(|cell| cell.is_selected || has_selection_in_block_group(cell)),
        ContentModelBlock::Divider(divider) => divider.is_selected,
        ContentModelBlock::Entity(entity) => entity.is_selected,
        _ => block.as_group().is_some_and(has_selection_in_block_group),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creators::*;
    use crate::model::ContentModelDocument;

    fn doc_with_selection() -> ContentModelDocument {
        let mut doc = create_content_model_document(None);
        add_text_paragraph(&mut doc, "a");
        let mut paragraph = create_paragraph(false, None, None, None);
        paragraph.segments.push(create_text("b", None, None, None));
        paragraph.segments.push(create_selection_marker(None));
        doc.blocks.push(ContentModelBlock::Paragraph(paragraph));

        let mut table = create_table(1, None);
        let mut cell = create_table_cell(false, false, false, None);
        cell.is_selected = true;
        add_text_paragraph(&mut cell, "c");
        table.rows[0].cells.push(cell);
        doc.blocks.push(ContentModelBlock::Table(table));
        doc
    }

    #[test]
    fn test_selected_paragraphs_include_selected_cells() {
        let doc = doc_with_selection();
        assert_eq!(
            get_selected_paragraphs(&doc),
            vec![
                vec![PathStep::Block(1)],
                vec![
                    PathStep::Block(2),
                    PathStep::Cell { row: 0, col: 0 },
                    PathStep::Block(0)
                ],
            ]
        );
    }

    #[test]
    fn test_selected_segments() {
        let doc = doc_with_selection();
        let segments = get_selected_segments(&doc);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], vec![PathStep::Block(1), PathStep::Segment(1)]);
    }

    #[test]
    fn test_callback_can_stop() {
        let doc = doc_with_selection();
        let mut visits = 0;
        iterate_selections(&doc, &mut |_, _| {
            visits += 1;
            false
        });
        assert_eq!(visits, 1);
    }

    #[test]
    fn test_has_selection() {
        let doc = doc_with_selection();
        assert!(has_selection_in_block_group(&doc));
        let mut clean = create_content_model_document(None);
        add_text_paragraph(&mut clean, "a");
        assert!(!has_selection_in_block_group(&clean));
    }
}
