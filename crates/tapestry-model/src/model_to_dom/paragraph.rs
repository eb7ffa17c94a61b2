//! Paragraph rendering.

use tapestry_dom::{Dom, NodeId};

use crate::format::FormatCategory;
use crate::model::{ContentModelParagraph, Format};
use crate::selection::PathStep;

use super::block::reuse_cached_element;
use super::context::{ModelNodeType, ModelToDomContext, SelectionPosition};

const DEFAULT_TAG: &str = "div";

/// Whether the paragraph needs its own element. Implicit paragraphs render
/// straight into the parent unless block format has to live somewhere.
fn needs_wrapper(paragraph: &ContentModelParagraph) -> bool {
    !paragraph.is_implicit
        || paragraph.decorator.is_some()
        || (!paragraph.format.is_empty() && paragraph.has_visible_content())
}

pub fn handle_paragraph(
    dom: &mut Dom,
    parent: NodeId,
    paragraph: &mut ContentModelParagraph,
    context: &mut ModelToDomContext,
    ref_node: Option<NodeId>,
) -> Option<NodeId> {
    // A cached paragraph with selected content is re-rendered so the
    // selection can be located in fresh nodes.
    if context.allow_cache_element
        && let Some(element) = paragraph.cached_element
        && !paragraph.has_selection()
    {
        let ref_node = reuse_cached_element(dom, parent, element, ref_node);
        let path = context.path.clone();
        if let Some(indexer) = context.dom_indexer.as_deref_mut() {
            indexer.on_paragraph(dom, element, &path);
        }
        return ref_node;
    }

    let wrapper = needs_wrapper(paragraph);
    let tag = paragraph
        .decorator
        .as_ref()
        .map_or(DEFAULT_TAG, |d| d.tag_name.as_str());
    let container = dom.create_element(tag);
    dom.insert_before(parent, container, ref_node);

    context.regular_selection.current = SelectionPosition {
        block: Some(if wrapper { container } else { parent }),
        segment: None,
    };

    let mut implicit = Format::default();
    if wrapper {
        implicit = implicit_format_of(paragraph);
        let appliers = &context.format_appliers;
        appliers.apply(FormatCategory::Block, &paragraph.format, dom, container, context);
        let on_wrapper = paragraph.segment_format.clone().unwrap_or_default();
        appliers.apply(FormatCategory::SegmentOnBlock, &on_wrapper, dom, container, context);
    }

    context.stack_implicit_format(Some(&implicit), |context| {
        render_segments(dom, container, paragraph, wrapper, context);
    });

    if wrapper {
        if context.allow_cache_element {
            paragraph.cached_element = Some(container);
        }
        context.node_created(ModelNodeType::Paragraph, container);
        let path = context.path.clone();
        if let Some(indexer) = context.dom_indexer.as_deref_mut() {
            indexer.on_paragraph(dom, container, &path);
        }
    } else {
        dom.unwrap_node(container);
    }
    ref_node
}

fn render_segments(
    dom: &mut Dom,
    container: NodeId,
    paragraph: &mut ContentModelParagraph,
    wrapper: bool,
    context: &mut ModelToDomContext,
) {
    let handle = context.handlers.segment;

    // Give a leading marker a text node to anchor to. Without a wrapper the
    // block position alone would point at the start of the parent.
    if paragraph
        .segments
        .first()
        .is_some_and(|s| s.is_selection_marker() || (!wrapper && s.is_selected))
    {
        let anchor = dom.create_text("");
        dom.append_child(container, anchor);
        context.regular_selection.current.segment = Some(anchor);
    }

    for (index, segment) in paragraph.segments.iter_mut().enumerate() {
        if segment.is_selected && context.regular_selection.start.is_none() {
            context.regular_selection.start = Some(context.regular_selection.current);
        }

        let mut nodes = Vec::new();
        handle(dom, container, segment, context, &mut nodes);

        if let Some(&last) = nodes.last() {
            context.regular_selection.current.segment = Some(last);
        }
        if segment.is_selected {
            context.regular_selection.end = Some(context.regular_selection.current);
        }

        if !nodes.is_empty() {
            let owner = wrapper.then_some(container);
            context.with_path(PathStep::Segment(index), |context| {
                let path = context.path.clone();
                if let Some(indexer) = context.dom_indexer.as_deref_mut() {
                    for &node in &nodes {
                        indexer.on_segment(dom, node, owner, &path);
                    }
                }
            });
        }
    }
}

/// Inline format the wrapper already shows: decorator defaults plus the
/// paragraph's own segment format.
fn implicit_format_of(paragraph: &ContentModelParagraph) -> Format {
    let mut format = paragraph
        .decorator
        .as_ref()
        .map(|d| d.format.clone())
        .unwrap_or_default();
    if let Some(segment_format) = &paragraph.segment_format {
        format.merge(segment_format);
    }
    format
}
