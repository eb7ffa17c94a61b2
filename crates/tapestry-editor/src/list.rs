//! List type and indentation changes on the selected blocks.
//!
//! Both operations work on "operational blocks": for each selected paragraph,
//! the closest list item holding it, or the paragraph itself when it is not
//! in a list. The search never leaves a table cell, so a list inside a cell is
//! handled separately from a list around the table.

use serde::{Deserialize, Serialize};
use tapestry_model::creators::{create_list_item, create_list_level};
use tapestry_model::metadata::ListMetadataFormat;
use tapestry_model::selection::{block_at, get_selected_paragraphs, group_at_mut};
use tapestry_model::{
    BlockGroup, ContentModelBlock, Direction, ListType, PathStep, unwrap_block, update_metadata,
};

use crate::settings::EditorSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentDirection {
    Indent,
    Outdent,
}

/// Length of the prefix of `path` that addresses the closest list item
/// around it, without crossing a table cell.
fn closest_list_item(root: &dyn BlockGroup, path: &[PathStep]) -> Option<usize> {
    for len in (1..path.len()).rev() {
        if matches!(path[len], PathStep::Cell { .. }) {
            return None;
        }
        if let Some(ContentModelBlock::ListItem(_)) = block_at(root, &path[..len]) {
            return Some(len);
        }
    }
    None
}

/// Paths of the blocks list operations act on, in document order.
pub fn get_operational_blocks(root: &dyn BlockGroup) -> Vec<Vec<PathStep>> {
    let mut result: Vec<Vec<PathStep>> = Vec::new();
    for paragraph in get_selected_paragraphs(root) {
        let path = match closest_list_item(root, &paragraph) {
            Some(len) => paragraph[..len].to_vec(),
            None => paragraph,
        };
        if !result.contains(&path) {
            result.push(path);
        }
    }
    result
}

fn is_list_item_of(block: Option<&ContentModelBlock>, list_type: ListType) -> bool {
    block
        .and_then(ContentModelBlock::as_list_item)
        .and_then(|item| item.levels.last())
        .is_some_and(|level| level.list_type == list_type)
}

/// Turn the selected blocks into list items of `list_type`.
///
/// When every selected block already is such a list item, the innermost
/// level is removed instead; an item left with no level is unwrapped and its
/// paragraphs become explicit again. Returns false if nothing is selected.
pub fn set_list_type(root: &mut dyn BlockGroup, list_type: ListType) -> bool {
    let blocks = get_operational_blocks(root);
    if blocks.is_empty() {
        return false;
    }
    let already_in_type = blocks
        .iter()
        .all(|path| is_list_item_of(block_at(&*root, path), list_type));

    // Reverse order keeps the paths of earlier blocks valid while later
    // ones are wrapped or unwrapped.
    for (item_index, path) in blocks.iter().enumerate().rev() {
        let Some((&PathStep::Block(index), parent_path)) = path.split_last() else {
            continue;
        };
        let Some(parent) = group_at_mut(root, parent_path) else {
            continue;
        };
        if already_in_type {
            remove_list_level(parent, index);
        } else {
            apply_list_type(parent, index, list_type, item_index == 0);
        }
    }
    tracing::debug!(
        target: "tapestry::list",
        ?list_type,
        count = blocks.len(),
        removed = already_in_type,
        "set list type"
    );
    true
}

fn mark_style_from_level(dataset: &mut tapestry_model::DatasetFormat) {
    update_metadata::<ListMetadataFormat, _>(dataset, |meta| {
        let mut meta = meta.unwrap_or_default();
        meta.apply_list_style_from_level = true;
        Some(meta)
    });
}

fn apply_list_type(parent: &mut dyn BlockGroup, index: usize, list_type: ListType, is_first: bool) {
    let continues_ordered = index > 0
        && parent.blocks()[index - 1]
            .as_list_item()
            .and_then(|item| item.levels.first())
            .is_some_and(|level| level.list_type == ListType::Ordered);

    let Some(block) = parent.blocks_mut().get_mut(index) else {
        return;
    };
    if let ContentModelBlock::ListItem(item) = block {
        match item.levels.last_mut() {
            Some(level) => {
                level.list_type = list_type;
                level.cached_element = None;
            }
            None => item.levels.push(create_list_level(list_type, None, None)),
        }
        if let Some(level) = item.levels.last_mut() {
            mark_style_from_level(&mut level.dataset);
        }
        item.cached_element = None;
        return;
    }

    let mut level = create_list_level(list_type, None, None);
    if list_type == ListType::Ordered && is_first && !continues_ordered {
        level.format.start_number_override = Some(1);
    }
    mark_style_from_level(&mut level.dataset);
    let mut item = create_list_item(std::slice::from_ref(&level), None);
    item.format.direction = block.format().direction;

    let mut old = std::mem::replace(block, ContentModelBlock::ListItem(item));
    if let ContentModelBlock::Paragraph(paragraph) = &mut old {
        paragraph.is_implicit = true;
    }
    old.invalidate_cache();
    if let ContentModelBlock::ListItem(item) = block {
        item.blocks.push(old);
    }
}

/// Drop the innermost level of the list item at `index`, unwrapping it when
/// no level is left.
fn remove_list_level(parent: &mut dyn BlockGroup, index: usize) {
    let Some(ContentModelBlock::ListItem(item)) = parent.blocks_mut().get_mut(index) else {
        return;
    };
    item.levels.pop();
    item.cached_element = None;
    if !item.levels.is_empty() {
        return;
    }
    for block in item.blocks.iter_mut() {
        if let ContentModelBlock::Paragraph(paragraph) = block {
            paragraph.is_implicit = false;
        }
        block.invalidate_cache();
    }
    unwrap_block(parent, index);
}

fn parse_px(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().strip_suffix("px"))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0.0)
}

/// Indent or outdent the selected blocks.
///
/// List items gain or lose a nesting level, up to
/// [`EditorSettings::max_list_depth`]. Other blocks move by
/// [`EditorSettings::indentation_step`] pixels on their start side.
pub fn set_model_indentation(
    root: &mut dyn BlockGroup,
    direction: IndentDirection,
    settings: &EditorSettings,
) -> bool {
    let blocks = get_operational_blocks(root);
    if blocks.is_empty() {
        return false;
    }

    for path in blocks.iter().rev() {
        let Some((&PathStep::Block(index), parent_path)) = path.split_last() else {
            continue;
        };
        let Some(parent) = group_at_mut(root, parent_path) else {
            continue;
        };
        let is_list_item = parent
            .blocks()
            .get(index)
            .is_some_and(|b| b.as_list_item().is_some());

        match (is_list_item, direction) {
            (true, IndentDirection::Indent) => {
                if let Some(ContentModelBlock::ListItem(item)) = parent.blocks_mut().get_mut(index)
                    && item.levels.len() < settings.max_list_depth
                    && let Some(last) = item.levels.last()
                {
                    let mut level =
                        create_list_level(last.list_type, Some(&last.format), Some(&last.dataset));
                    level.format.start_number_override = None;
                    item.levels.push(level);
                    item.cached_element = None;
                }
            }
            (true, IndentDirection::Outdent) => remove_list_level(parent, index),
            (false, _) => {
                if let Some(block) = parent.blocks_mut().get_mut(index) {
                    shift_margin(block, direction, settings.indentation_step);
                }
            }
        }
    }
    tracing::debug!(target: "tapestry::list", ?direction, count = blocks.len(), "set indentation");
    true
}

fn shift_margin(block: &mut ContentModelBlock, direction: IndentDirection, step: f64) {
    let rtl = block.format().direction == Some(Direction::Rtl);
    let format = block.format_mut();
    let margin = if rtl {
        &mut format.margin_right
    } else {
        &mut format.margin_left
    };
    let current = parse_px(margin.as_deref());
    let next = match direction {
        IndentDirection::Indent => current + step,
        IndentDirection::Outdent => current - step,
    };
    *margin = (next > 0.0).then(|| format!("{next}px"));
    block.invalidate_cache();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapestry_model::creators::*;
    use tapestry_model::{ContentModelDocument, get_metadata, set_selection};

    fn doc(texts: &[&str]) -> ContentModelDocument {
        let mut doc = create_content_model_document(None);
        for text in texts {
            add_text_paragraph(&mut doc, text);
        }
        doc
    }

    fn select(doc: &mut ContentModelDocument, start: &[PathStep], end: &[PathStep]) {
        set_selection(doc, Some(start), Some(end));
    }

    fn list_type_of(block: &ContentModelBlock) -> Option<ListType> {
        block.as_list_item()?.levels.last().map(|l| l.list_type)
    }

    #[test]
    fn test_wraps_and_unwraps_paragraphs() {
        let mut model = doc(&["a", "b", "c"]);
        select(
            &mut model,
            &[PathStep::Block(0), PathStep::Segment(0)],
            &[PathStep::Block(1), PathStep::Segment(0)],
        );

        assert!(set_list_type(&mut model, ListType::Ordered));
        assert_eq!(model.blocks.len(), 3);
        assert_eq!(list_type_of(&model.blocks[0]), Some(ListType::Ordered));
        assert_eq!(list_type_of(&model.blocks[1]), Some(ListType::Ordered));
        assert_eq!(list_type_of(&model.blocks[2]), None);

        let first = model.blocks[0].as_list_item().map(|item| &item.levels[0]);
        assert_eq!(first.and_then(|l| l.format.start_number_override), Some(1));
        assert!(first.is_some_and(|l| {
            get_metadata::<ListMetadataFormat>(&l.dataset).is_some_and(|m| m.apply_list_style_from_level)
        }));
        let second = model.blocks[1].as_list_item().map(|item| &item.levels[0]);
        assert_eq!(second.and_then(|l| l.format.start_number_override), None);
        let inner = model.blocks[0].as_list_item().and_then(|item| item.blocks[0].as_paragraph());
        assert!(inner.is_some_and(|p| p.is_implicit));

        assert!(set_list_type(&mut model, ListType::Ordered));
        assert_eq!(model.blocks.len(), 3);
        assert!(model.blocks.iter().all(|b| b.as_paragraph().is_some_and(|p| !p.is_implicit)));
    }

    #[test]
    fn test_changes_type_of_existing_item() {
        let level = create_list_level(ListType::Unordered, None, None);
        let mut model = create_content_model_document(None);
        let mut item = create_list_item(std::slice::from_ref(&level), None);
        add_text_paragraph(&mut item, "a");
        model.blocks.push(ContentModelBlock::ListItem(item));
        let caret = [PathStep::Block(0), PathStep::Block(0), PathStep::Segment(0)];
        select(&mut model, &caret, &caret);

        assert_eq!(get_operational_blocks(&model), vec![vec![PathStep::Block(0)]]);
        set_list_type(&mut model, ListType::Ordered);
        assert_eq!(list_type_of(&model.blocks[0]), Some(ListType::Ordered));
        assert_eq!(model.blocks.len(), 1);
    }

    #[test]
    fn test_continues_previous_ordered_list() {
        let level = create_list_level(ListType::Ordered, None, None);
        let mut model = create_content_model_document(None);
        let mut item = create_list_item(std::slice::from_ref(&level), None);
        add_text_paragraph(&mut item, "a");
        model.blocks.push(ContentModelBlock::ListItem(item));
        add_text_paragraph(&mut model, "b");
        let caret = [PathStep::Block(1), PathStep::Segment(0)];
        select(&mut model, &caret, &caret);

        set_list_type(&mut model, ListType::Ordered);
        let levels = model.blocks[1].as_list_item().map(|item| item.levels.clone());
        assert_eq!(levels.map(|l| l[0].format.start_number_override), Some(None));
    }

    #[test]
    fn test_paragraph_in_cell_is_its_own_block() {
        let level = create_list_level(ListType::Ordered, None, None);
        let mut cell = create_table_cell(false, false, false, None);
        add_text_paragraph(&mut cell, "x");
        let mut table = create_table(1, None);
        table.rows[0].cells.push(cell);
        let mut item = create_list_item(std::slice::from_ref(&level), None);
        item.blocks.push(ContentModelBlock::Table(table));
        let mut model = create_content_model_document(None);
        model.blocks.push(ContentModelBlock::ListItem(item));

        let caret = [
            PathStep::Block(0),
            PathStep::Block(0),
            PathStep::Cell { row: 0, col: 0 },
            PathStep::Block(0),
            PathStep::Segment(0),
        ];
        select(&mut model, &caret, &caret);
        assert_eq!(get_operational_blocks(&model), vec![caret[..4].to_vec()]);
    }

    #[test]
    fn test_indent_list_item_respects_depth() {
        let level = create_list_level(ListType::Ordered, None, None);
        let mut model = create_content_model_document(None);
        let mut item = create_list_item(std::slice::from_ref(&level), None);
        add_text_paragraph(&mut item, "a");
        model.blocks.push(ContentModelBlock::ListItem(item));
        let caret = [PathStep::Block(0), PathStep::Block(0), PathStep::Segment(0)];
        select(&mut model, &caret, &caret);
        let settings = EditorSettings {
            max_list_depth: 2,
            ..Default::default()
        };

        set_model_indentation(&mut model, IndentDirection::Indent, &settings);
        set_model_indentation(&mut model, IndentDirection::Indent, &settings);
        let depth = model.blocks[0].as_list_item().map(|item| item.levels.len());
        assert_eq!(depth, Some(2));

        set_model_indentation(&mut model, IndentDirection::Outdent, &settings);
        set_model_indentation(&mut model, IndentDirection::Outdent, &settings);
        assert!(model.blocks[0].as_paragraph().is_some());
    }

    #[test]
    fn test_indent_paragraph_margin() {
        let mut model = doc(&["a"]);
        let caret = [PathStep::Block(0), PathStep::Segment(0)];
        select(&mut model, &caret, &caret);
        let settings = EditorSettings::default();

        set_model_indentation(&mut model, IndentDirection::Indent, &settings);
        assert_eq!(model.blocks[0].format().margin_left.as_deref(), Some("40px"));
        set_model_indentation(&mut model, IndentDirection::Outdent, &settings);
        assert_eq!(model.blocks[0].format().margin_left, None);
    }

    #[test]
    fn test_nothing_selected() {
        let mut model = doc(&["a"]);
        assert!(!set_list_type(&mut model, ListType::Unordered));
        assert!(!set_model_indentation(&mut model, IndentDirection::Indent, &EditorSettings::default()));
    }
}
