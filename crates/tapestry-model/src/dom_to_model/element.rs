//! Element dispatch and the block/inline processors.

use tapestry_dom::{Dom, DomSelection, NodeId, NodeKind};

use crate::creators::{
    create_br, create_divider, create_entity, create_entity_segment, create_format_container,
    create_general_block, create_general_segment, create_image, create_paragraph,
    create_paragraph_decorator,
};
use crate::format::{FormatCategory, default_format_for_tag, parse_dataset};
use crate::model::entity::{is_entity_element, parse_entity_info};
use crate::model::{
    BlockGroup, ContentModelBlock, ContentModelCode, ContentModelLink, Format, SegmentKind,
};

use super::add::{add_block, add_decorators, add_segment};
use super::context::{DomToModelContext, StackFormatOptions};
use super::list::{list_item_processor, list_processor};
use super::selection::handle_regular_selection;
use super::table::table_processor;
use super::text::text_processor;

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th",
    "thead", "tr", "ul",
];

/// Elements that carry no document content.
const SKIPPED_TAGS: &[&str] = &["script", "style", "meta", "link", "head", "title", "template"];

const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "cite", "code", "del", "em", "font", "i", "ins", "kbd", "label", "mark",
    "q", "s", "samp", "small", "span", "strike", "strong", "sub", "sup", "u", "var",
];

pub fn is_block_element(dom: &Dom, element: NodeId) -> bool {
    match dom.style(element, "display") {
        Some("block" | "flex" | "grid" | "list-item" | "table" | "table-cell" | "table-row") => {
            true
        }
        Some(display) if display.starts_with("inline") => false,
        _ => dom.tag_name(element).is_some_and(|tag| BLOCK_TAGS.contains(&tag)),
    }
}

/// Walk the children of `parent`, dropping selection markers at the
/// matching child indices.
pub fn child_processor(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    parent: NodeId,
    context: &mut DomToModelContext,
) {
    let (start, end) = context.regular_selection_offsets(parent);
    let children = dom.children(parent);
    for (index, &child) in children.iter().enumerate() {
        handle_regular_selection(index, context, group, start, end);
        process_child_node(group, dom, child, context);
    }
    handle_regular_selection(children.len(), context, group, start, end);
}

pub fn process_child_node(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    node: NodeId,
    context: &mut DomToModelContext,
) {
    match dom.kind(node) {
        NodeKind::Element(_) => element_processor(group, dom, node, context),
        NodeKind::Text(_) => text_processor(group, dom, node, context),
        NodeKind::Fragment => child_processor(group, dom, node, context),
        NodeKind::Comment(_) => {}
    }
}

/// Route an element to its processor: overrides first, then entities, then
/// the built-in tag table, falling back to a general block or segment.
pub fn element_processor(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    element: NodeId,
    context: &mut DomToModelContext,
) {
    let Some(tag) = dom.tag_name(element) else {
        return;
    };
    tracing::trace!(target: "tapestry::dom_to_model", tag, ?element, "processing element");

    if let Some(processor) = context.processor_override.get(tag).copied() {
        processor(group, dom, element, context);
        return;
    }
    if is_entity_element(dom, element) {
        entity_processor(group, dom, element, context);
        return;
    }
    if dom.style(element, "display") == Some("none") || SKIPPED_TAGS.contains(&tag) {
        return;
    }

    match tag {
        "br" => br_processor(group, dom, element, context),
        "img" => image_processor(group, dom, element, context),
        "hr" => divider_processor(group, dom, element, context),
        "table" => table_processor(group, dom, element, context),
        "ol" | "ul" => list_processor(group, dom, element, context),
        "li" => list_item_processor(group, dom, element, context),
        "blockquote" => format_container_processor(group, dom, element, context),
        "pre" => {
            if has_block_child(dom, element) {
                format_container_processor(group, dom, element, context)
            } else {
                block_processor(group, dom, element, context)
            }
        }
        "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "center" | "section"
        | "article" | "header" | "footer" | "main" | "nav" | "aside" | "address" => {
            if has_block_child(dom, element) && !own_block_format(dom, element, context).is_empty() {
                format_container_processor(group, dom, element, context)
            } else {
                block_processor(group, dom, element, context)
            }
        }
        _ if INLINE_TAGS.contains(&tag) => inline_processor(group, dom, element, context),
        _ => general_processor(group, dom, element, context),
    }
}

fn has_block_child(dom: &Dom, element: NodeId) -> bool {
    dom.children(element)
        .iter()
        .any(|&child| dom.is_element(child) && is_block_element(dom, child))
}

fn own_block_format(dom: &Dom, element: NodeId, context: &DomToModelContext) -> Format {
    let mut format = Format::default();
    context
        .format_parsers
        .parse(FormatCategory::Block, &mut format, dom, element);
    format
}

/// Paragraph-producing block: `div`, `p`, headings and friends.
pub fn block_processor(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    element: NodeId,
    context: &mut DomToModelContext,
) {
    let tag = dom.tag_name(element).unwrap_or("div").to_string();
    let decorator_tag = matches!(
        tag.as_str(),
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "pre"
    );

    context.stack_format(StackFormatOptions::default(), |context| {
        let tag_default = default_format_for_tag(&tag);
        context.segment_format.merge(&tag_default);
        context
            .format_parsers
            .parse(FormatCategory::Block, &mut context.block_format, dom, element);

        let mut segment_format = Format::default();
        context
            .format_parsers
            .parse(FormatCategory::SegmentOnBlock, &mut segment_format, dom, element);
        context.segment_format.merge(&segment_format);

        let decorator = decorator_tag.then(|| create_paragraph_decorator(&tag, Some(&tag_default)));
        add_block(
            group,
            ContentModelBlock::Paragraph(create_paragraph(
                false,
                Some(&context.block_format),
                Some(&segment_format),
                decorator,
            )),
        );
        child_processor(group, dom, element, context);
    });

    add_block(
        group,
        ContentModelBlock::Paragraph(create_paragraph(true, Some(&context.block_format), None, None)),
    );
}

/// `blockquote`, or a block whose own format must wrap its block children.
pub fn format_container_processor(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    element: NodeId,
    context: &mut DomToModelContext,
) {
    let tag = dom.tag_name(element).unwrap_or("div");
    let mut format = Format::default();
    context
        .format_parsers
        .parse(FormatCategory::Container, &mut format, dom, element);
    let mut container = create_format_container(tag, Some(&format));
    if context.allow_cache_element {
        container.cached_element = Some(element);
    }

    context.stack_format(
        StackFormatOptions {
            clear_block: true,
            ..Default::default()
        },
        |context| {
            context.format_parsers.parse(
                FormatCategory::SegmentOnBlock,
                &mut context.segment_format,
                dom,
                element,
            );
            child_processor(&mut container, dom, element, context);
        },
    );

    add_block(group, ContentModelBlock::FormatContainer(container));
}

/// Known inline formatting elements: merge their format and recurse.
pub fn inline_processor(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    element: NodeId,
    context: &mut DomToModelContext,
) {
    let tag = dom.tag_name(element).unwrap_or("span").to_string();
    context.stack_format(StackFormatOptions::default(), |context| {
        context.segment_format.merge(&default_format_for_tag(&tag));
        context
            .format_parsers
            .parse(FormatCategory::Segment, &mut context.segment_format, dom, element);

        if tag == "a" && dom.has_attribute(element, "href") {
            let mut link = ContentModelLink {
                dataset: parse_dataset(dom, element),
                ..Default::default()
            };
            context
                .format_parsers
                .parse(FormatCategory::Link, &mut link.format, dom, element);
            context.link = Some(link);
        }
        if tag == "code" {
            let mut code = ContentModelCode::default();
            context
                .format_parsers
                .parse(FormatCategory::Code, &mut code.format, dom, element);
            context.code = Some(code);
        }

        child_processor(group, dom, element, context);
    });
}

pub fn br_processor(
    group: &mut dyn BlockGroup,
    _: &Dom,
    _: NodeId,
    context: &mut DomToModelContext,
) {
    let mut br = create_br(Some(&context.segment_format));
    br.is_selected = context.is_in_selection;
    add_decorators(&mut br, context);
    add_segment(group, br, &context.block_format);
}

pub fn image_processor(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    element: NodeId,
    context: &mut DomToModelContext,
) {
    let mut format = context.segment_format.clone();
    context
        .format_parsers
        .parse(FormatCategory::Image, &mut format, dom, element);

    let mut segment = create_image(dom.attribute(element, "src").unwrap_or_default(), Some(&format));
    if let SegmentKind::Image(image) = &mut segment.kind {
        image.alt = dom.attribute(element, "alt").map(str::to_string);
        image.title = dom.attribute(element, "title").map(str::to_string);
        image.dataset = parse_dataset(dom, element);
        if matches!(context.selection, Some(DomSelection::Image { image: selected }) if selected == element)
        {
            image.is_selected_as_image_selection = true;
            segment.is_selected = true;
        }
    }
    segment.is_selected |= context.is_in_selection;
    add_decorators(&mut segment, context);
    add_segment(group, segment, &context.block_format);
}

pub fn divider_processor(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    element: NodeId,
    context: &mut DomToModelContext,
) {
    let mut format = Format::default();
    context
        .format_parsers
        .parse(FormatCategory::Divider, &mut format, dom, element);
    let mut divider = create_divider(dom.tag_name(element).unwrap_or("hr"), Some(&format));
    divider.is_selected = context.is_in_selection;
    if context.allow_cache_element {
        divider.cached_element = Some(element);
    }
    add_block(group, ContentModelBlock::Divider(divider));
}

/// Opaque content: kept as a handle to the live element, children untouched.
pub fn entity_processor(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    element: NodeId,
    context: &mut DomToModelContext,
) {
    let info = parse_entity_info(dom, element);
    let format = if is_block_element(dom, element) {
        Format::default()
    } else {
        context.segment_format.clone()
    };
    let mut entity = create_entity(
        element,
        info.is_readonly,
        Some(&format),
        info.entity_type.as_deref(),
        info.id.as_deref(),
    );
    entity.is_selected = context.is_in_selection;

    if is_block_element(dom, element) {
        add_block(group, ContentModelBlock::Entity(entity));
    } else {
        let mut segment = create_entity_segment(entity, Some(&format));
        add_decorators(&mut segment, context);
        add_segment(group, segment, &context.block_format);
    }
}

/// Unknown elements are kept as general blocks (or segments, when inline)
/// and their children are still parsed.
pub fn general_processor(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    element: NodeId,
    context: &mut DomToModelContext,
) {
    tracing::trace!(
        target: "tapestry::dom_to_model",
        tag = dom.tag_name(element),
        "keeping unknown element as general content"
    );

    if is_block_element(dom, element) {
        let mut block = create_general_block(element);
        context.stack_format(
            StackFormatOptions {
                clear_block: true,
                ..Default::default()
            },
            |context| child_processor(&mut block, dom, element, context),
        );
        add_block(group, ContentModelBlock::General(block));
    } else {
        let mut segment = create_general_segment(element, Some(&context.segment_format));
        segment.is_selected = context.is_in_selection;
        add_decorators(&mut segment, context);
        if let SegmentKind::General(general) = &mut segment.kind {
            context.stack_format(
                StackFormatOptions {
                    clear_link: true,
                    clear_code: true,
                    ..Default::default()
                },
                |context| child_processor(general, dom, element, context),
            );
        }
        add_segment(group, segment, &context.block_format);
    }
}
