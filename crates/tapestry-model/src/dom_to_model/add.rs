//! Appending blocks and segments to a group during parsing.

use crate::creators::{create_paragraph, create_selection_marker, create_text};
use crate::model::{BlockGroup, ContentModelBlock, ContentModelParagraph, ContentModelSegment, Format};

use super::context::DomToModelContext;

pub fn add_block(group: &mut dyn BlockGroup, block: ContentModelBlock) {
    group.blocks_mut().push(block);
}

/// The last block of `group` if it is a paragraph, otherwise a new implicit one.
pub fn ensure_paragraph<'g>(
    group: &'g mut dyn BlockGroup,
    block_format: &Format,
) -> &'g mut ContentModelParagraph {
    let blocks = group.blocks_mut();
    if !matches!(blocks.last(), Some(ContentModelBlock::Paragraph(_))) {
        blocks.push(ContentModelBlock::Paragraph(create_paragraph(
            true,
            Some(block_format),
            None,
            None,
        )));
    }
    match blocks.last_mut() {
        Some(ContentModelBlock::Paragraph(paragraph)) => paragraph,
        // The branch above guarantees a trailing paragraph.
        _ => unreachable!(),
    }
}

/// Append a segment, keeping at most one selection marker at a selection edge.
///
/// A selected marker directly before a selected segment is dropped, and a
/// selected marker directly after one is not added: the selected segments
/// already carry the selection.
pub fn add_segment(group: &mut dyn BlockGroup, segment: ContentModelSegment, block_format: &Format) {
    let paragraph = ensure_paragraph(group, block_format);
    let last_is_selected = paragraph.segments.last().is_some_and(|s| s.is_selected);
    let last_is_selected_marker = paragraph
        .segments
        .last()
        .is_some_and(|s| s.is_selection_marker() && s.is_selected);

    if segment.is_selection_marker() {
        if !(last_is_selected && segment.is_selected) {
            paragraph.segments.push(segment);
        }
    } else {
        if segment.is_selected && last_is_selected_marker {
            paragraph.segments.pop();
        }
        paragraph.segments.push(segment);
    }
}

/// Copy the active link and code decorators onto a segment.
pub fn add_decorators(segment: &mut ContentModelSegment, context: &DomToModelContext) {
    segment.link = context.link.clone();
    segment.code = context.code.clone();
}

pub fn add_selection_marker(group: &mut dyn BlockGroup, context: &DomToModelContext) {
    let mut marker = create_selection_marker(Some(&context.segment_format));
    add_decorators(&mut marker, context);
    add_segment(group, marker, &context.block_format);
}

/// Only ASCII whitespace counts; a non-breaking space is content.
pub fn has_spaces_only(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// Append text, merging into the previous text segment when it renders the
/// same. Whitespace-only text that would start a new paragraph is dropped.
pub fn add_text_segment(group: &mut dyn BlockGroup, text: &str, context: &DomToModelContext) {
    if text.is_empty() {
        return;
    }

    if let Some(ContentModelBlock::Paragraph(paragraph)) = group.blocks_mut().last_mut() {
        if let Some(last) = paragraph.segments.last_mut()
            && last.is_selected == context.is_in_selection
            && last.format == context.segment_format
            && last.link == context.link
            && last.code == context.code
            && let Some(existing) = last.text_mut()
        {
            existing.push_str(text);
            return;
        }
    }

    let has_target = match group.blocks().last() {
        Some(ContentModelBlock::Paragraph(p)) => !p.segments.is_empty() || !p.is_implicit,
        _ => false,
    };
    if has_spaces_only(text) && !has_target {
        return;
    }

    let mut segment = create_text(text, Some(&context.segment_format), None, None);
    segment.is_selected = context.is_in_selection;
    add_decorators(&mut segment, context);
    add_segment(group, segment, &context.block_format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creators::create_content_model_document;
    use crate::dom_to_model::DomToModelOption;

    fn context() -> DomToModelContext {
        DomToModelContext::new(&DomToModelOption::default(), None)
    }

    #[test]
    fn test_text_merges_with_same_format() {
        let mut doc = create_content_model_document(None);
        let context = context();
        add_text_segment(&mut doc, "a", &context);
        add_text_segment(&mut doc, "b", &context);

        let paragraph = doc.blocks[0].as_paragraph().map(|p| p.segments.clone());
        assert_eq!(paragraph.map(|s| s.len()), Some(1));
        assert_eq!(doc.blocks[0].as_paragraph().and_then(|p| p.segments[0].text()), Some("ab"));
    }

    #[test]
    fn test_leading_whitespace_is_dropped() {
        let mut doc = create_content_model_document(None);
        add_text_segment(&mut doc, "\n  ", &context());
        assert!(doc.blocks.is_empty());
    }

    #[test]
    fn test_selected_marker_before_selected_segment_is_replaced() {
        let mut doc = create_content_model_document(None);
        let mut context = context();
        context.is_in_selection = true;
        add_selection_marker(&mut doc, &context);
        add_text_segment(&mut doc, "x", &context);
        add_selection_marker(&mut doc, &context);

        let segments = &doc.blocks[0].as_paragraph().map(|p| p.segments.clone()).unwrap_or_default();
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_selected);
        assert_eq!(segments[0].text(), Some("x"));
    }
}
