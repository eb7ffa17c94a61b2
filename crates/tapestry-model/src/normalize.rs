//! Structural cleanup of a model after parsing or editing.

use crate::creators::create_br;
use crate::model::{
    BlockGroup, BlockGroupType, ContentModelBlock, ContentModelParagraph, ContentModelSegment,
    SegmentKind,
};

/// Normalize `group` and everything below it.
///
/// - empty text segments are removed
/// - adjacent text segments that render the same are merged
/// - a non-implicit paragraph holding only selection markers gets a `Br`
/// - paragraphs without segments and empty format containers are removed
pub fn normalize_content_model(group: &mut dyn BlockGroup) {
    let blocks = group.blocks_mut();
    for block in blocks.iter_mut() {
        match block {
            ContentModelBlock::Paragraph(paragraph) => normalize_paragraph(paragraph),
            ContentModelBlock::Table(table) => {
                for cell in table.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
                    normalize_content_model(cell);
                }
            }
            ContentModelBlock::FormatContainer(container) => normalize_content_model(container),
            ContentModelBlock::ListItem(item) => normalize_content_model(item),
            ContentModelBlock::General(general) => normalize_content_model(general),
            ContentModelBlock::Divider(_) | ContentModelBlock::Entity(_) => {}
        }
    }
    blocks.retain(|block| !is_block_empty(block));
}

fn is_block_empty(block: &ContentModelBlock) -> bool {
    match block {
        ContentModelBlock::Paragraph(paragraph) => paragraph.segments.is_empty(),
        ContentModelBlock::FormatContainer(container) => container.blocks.is_empty(),
        _ => false,
    }
}

fn normalize_paragraph(paragraph: &mut ContentModelParagraph) {
    let before = paragraph.segments.len();

    for segment in paragraph.segments.iter_mut() {
        if let SegmentKind::General(general) = &mut segment.kind {
            normalize_content_model(general);
        }
    }

    paragraph.segments.retain(|s| s.text() != Some(""));

    let mut merged: Vec<ContentModelSegment> = Vec::with_capacity(paragraph.segments.len());
    for segment in paragraph.segments.drain(..) {
        if let Some(last) = merged.last_mut()
            && last.is_selected == segment.is_selected
            && last.has_same_decorations(&segment)
            && let (Some(text), Some(addition)) = (last.text_mut(), segment.text())
        {
            text.push_str(addition);
            continue;
        }
        merged.push(segment);
    }
    paragraph.segments = merged;

    if !paragraph.is_implicit
        && !paragraph.segments.is_empty()
        && paragraph.segments.iter().all(ContentModelSegment::is_selection_marker)
    {
        let format = paragraph.segments.last().map(|s| s.format.clone());
        paragraph.segments.push(create_br(format.as_ref()));
    }

    if paragraph.segments.len() != before {
        paragraph.cached_element = None;
    }
}

/// Replace the group block at `index` with its own child blocks.
///
/// Returns false when the block there is not a group.
pub fn unwrap_block(parent: &mut dyn BlockGroup, index: usize) -> bool {
    let blocks = parent.blocks_mut();
    let children = match blocks.get_mut(index) {
        Some(ContentModelBlock::FormatContainer(c)) => std::mem::take(&mut c.blocks),
        Some(ContentModelBlock::ListItem(l)) => std::mem::take(&mut l.blocks),
        Some(ContentModelBlock::General(g)) => std::mem::take(&mut g.blocks),
        _ => return false,
    };
    blocks.splice(index..=index, children);
    true
}

/// Find the innermost entry of `path` (innermost first) whose type is one of
/// `types`, giving up at the first entry whose type is in `stop_types`.
pub fn get_closest_ancestor_block_group_index(
    path: &[BlockGroupType],
    types: &[BlockGroupType],
    stop_types: &[BlockGroupType],
) -> Option<usize> {
    for (index, group_type) in path.iter().enumerate() {
        if types.contains(group_type) {
            return Some(index);
        }
        if stop_types.contains(group_type) {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creators::*;
    use crate::model::Format;

    #[test]
    fn test_merges_same_format_text() {
        let mut doc = create_content_model_document(None);
        let mut paragraph = create_paragraph(false, None, None, None);
        paragraph.segments.push(create_text("a", None, None, None));
        paragraph.segments.push(create_text("", None, None, None));
        paragraph.segments.push(create_text("b", None, None, None));
        let bold = Format {
            font_weight: Some("bold".into()),
            ..Default::default()
        };
        paragraph.segments.push(create_text("c", Some(&bold), None, None));
        doc.blocks.push(ContentModelBlock::Paragraph(paragraph));

        normalize_content_model(&mut doc);

        let texts: Vec<Option<&str>> = doc.blocks[0]
            .as_paragraph()
            .map(|p| p.segments.iter().map(|s| s.text()).collect())
            .unwrap_or_default();
        assert_eq!(texts, vec![Some("ab"), Some("c")]);
    }

    #[test]
    fn test_marker_only_paragraph_gets_br() {
        let mut doc = create_content_model_document(None);
        let mut paragraph = create_paragraph(false, None, None, None);
        paragraph.segments.push(create_selection_marker(None));
        doc.blocks.push(ContentModelBlock::Paragraph(paragraph));
        doc.blocks.push(ContentModelBlock::Paragraph(create_paragraph(true, None, None, None)));

        normalize_content_model(&mut doc);

        assert_eq!(doc.blocks.len(), 1);
        let types: Vec<_> = doc.blocks[0]
            .as_paragraph()
            .map(|p| p.segments.iter().map(|s| s.segment_type()).collect())
            .unwrap_or_default();
        assert_eq!(
            types,
            vec![
                crate::model::SegmentType::SelectionMarker,
                crate::model::SegmentType::Br
            ]
        );
    }

    #[test]
    fn test_unwrap_block_splices_children() {
        let mut doc = create_content_model_document(None);
        let mut quote = create_format_container("blockquote", None);
        add_text_paragraph(&mut quote, "one");
        add_text_paragraph(&mut quote, "two");
        add_text_paragraph(&mut doc, "zero");
        doc.blocks.push(ContentModelBlock::FormatContainer(quote));

        assert!(unwrap_block(&mut doc, 1));
        assert!(!unwrap_block(&mut doc, 0));
        assert_eq!(doc.blocks.len(), 3);
    }

    #[test]
    fn test_closest_ancestor_stops_at_stop_type() {
        use BlockGroupType::*;
        let path = [FormatContainer, TableCell, ListItem, Document];
        assert_eq!(
            get_closest_ancestor_block_group_index(&path, &[ListItem], &[]),
            Some(2)
        );
        assert_eq!(
            get_closest_ancestor_block_group_index(&path, &[ListItem], &[TableCell]),
            None
        );
    }
}
