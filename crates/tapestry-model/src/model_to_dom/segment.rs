//! Segment rendering.
//!
//! Every visible segment is first rendered inside a `span` that receives the
//! segment format; code and link decorators then wrap the span's content.
//! A span left without attributes is unwrapped.

use tapestry_dom::{Dom, NodeId};

use crate::format::{FormatCategory, apply_dataset};
use crate::model::entity::apply_entity_info;
use crate::model::{ContentModelSegment, SegmentKind};

use super::context::{ModelNodeType, ModelToDomContext};

pub fn handle_segment(
    dom: &mut Dom,
    parent: NodeId,
    segment: &mut ContentModelSegment,
    context: &mut ModelToDomContext,
    nodes: &mut Vec<NodeId>,
) {
    let handlers = context.handlers;
    let handler = match segment.kind {
        SegmentKind::Text { .. } => handlers.text,
        SegmentKind::Br => handlers.br,
        SegmentKind::Image(_) => handlers.image,
        SegmentKind::General(_) => handlers.general_segment,
        SegmentKind::Entity(_) => handlers.entity_segment,
        // Markers only move the selection cursor.
        SegmentKind::SelectionMarker => return,
    };
    handler(dom, parent, segment, context, nodes);
}

/// Create the `span` holding `node` at the end of `parent`.
fn segment_span(dom: &mut Dom, parent: NodeId, node: NodeId) -> NodeId {
    let span = dom.create_element("span");
    dom.append_child(parent, span);
    dom.append_child(span, node);
    span
}

/// Apply segment format and decorators to a segment span.
pub fn apply_segment_format(
    dom: &mut Dom,
    span: NodeId,
    segment: &ContentModelSegment,
    context: &ModelToDomContext,
) {
    let appliers = &context.format_appliers;
    appliers.apply(FormatCategory::Segment, &segment.format, dom, span, context);

    if let Some(code) = &segment.code {
        let element = dom.wrap_all_children(span, "code");
        appliers.apply(FormatCategory::Code, &code.format, dom, element, context);
    }
    if let Some(link) = &segment.link {
        let anchor = dom.wrap_all_children(span, "a");
        appliers.apply(FormatCategory::Link, &link.format, dom, anchor, context);
        apply_dataset(&link.dataset, dom, anchor);
    }

    let is_bare = dom
        .element(span)
        .is_some_and(|e| e.attributes.is_empty() && e.style.is_empty());
    if is_bare {
        dom.unwrap_node(span);
    }
}

pub fn handle_text(
    dom: &mut Dom,
    parent: NodeId,
    segment: &mut ContentModelSegment,
    context: &mut ModelToDomContext,
    nodes: &mut Vec<NodeId>,
) {
    let text = dom.create_text(segment.text().unwrap_or_default());
    let span = segment_span(dom, parent, text);
    apply_segment_format(dom, span, segment, context);
    nodes.push(text);
    context.node_created(ModelNodeType::Segment, text);
}

pub fn handle_br(
    dom: &mut Dom,
    parent: NodeId,
    segment: &mut ContentModelSegment,
    context: &mut ModelToDomContext,
    nodes: &mut Vec<NodeId>,
) {
    let br = dom.create_element("br");
    let span = segment_span(dom, parent, br);
    apply_segment_format(dom, span, segment, context);
    nodes.push(br);
    context.node_created(ModelNodeType::Segment, br);
}

pub fn handle_image(
    dom: &mut Dom,
    parent: NodeId,
    segment: &mut ContentModelSegment,
    context: &mut ModelToDomContext,
    nodes: &mut Vec<NodeId>,
) {
    let SegmentKind::Image(image) = &segment.kind else {
        return;
    };
    let img = dom.create_element("img");
    dom.set_attribute(img, "src", image.src.as_str());
    if let Some(alt) = &image.alt {
        dom.set_attribute(img, "alt", alt.as_str());
    }
    if let Some(title) = &image.title {
        dom.set_attribute(img, "title", title.as_str());
    }
    context
        .format_appliers
        .apply(FormatCategory::Image, &segment.format, dom, img, context);
    apply_dataset(&image.dataset, dom, img);
    if image.is_selected_as_image_selection {
        context.image_selection = Some(img);
    }

    let span = segment_span(dom, parent, img);
    apply_segment_format(dom, span, segment, context);
    nodes.push(img);
    context.node_created(ModelNodeType::Segment, img);
}

/// A shallow copy of the unknown element with children from the model.
pub fn handle_general_segment(
    dom: &mut Dom,
    parent: NodeId,
    segment: &mut ContentModelSegment,
    context: &mut ModelToDomContext,
    nodes: &mut Vec<NodeId>,
) {
    let Some(source) = segment.as_group().map(|g| g.element) else {
        return;
    };
    let element = dom.clone_node(source, false);
    let span = segment_span(dom, parent, element);
    apply_segment_format(dom, span, segment, context);
    nodes.push(element);
    context.node_created(ModelNodeType::General, element);

    let children = context.handlers.block_group_children;
    if let Some(general) = segment.as_group_mut() {
        children(dom, element, general, context);
    }
}

pub fn handle_entity_segment(
    dom: &mut Dom,
    parent: NodeId,
    segment: &mut ContentModelSegment,
    context: &mut ModelToDomContext,
    nodes: &mut Vec<NodeId>,
) {
    let SegmentKind::Entity(entity) = &segment.kind else {
        return;
    };
    apply_entity_info(dom, entity.wrapper, &entity.entity_format);
    dom.append_child(parent, entity.wrapper);
    nodes.push(entity.wrapper);
    context.node_created(ModelNodeType::Entity, entity.wrapper);
}
