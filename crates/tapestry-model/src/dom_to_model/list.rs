//! `ol`/`ul`/`li` processing.
//!
//! List items are flattened: a list nested inside an `li` produces sibling
//! list items (with one more level) placed right after that `li`'s item.

use tapestry_dom::{Dom, NodeId};

use crate::creators::{create_list_item, create_list_level};
use crate::format::{FormatCategory, parse_dataset};
use crate::model::{BlockGroup, ContentModelBlock, Format, ListType};

use super::add::add_block;
use super::context::{DomToModelContext, StackFormatOptions};
use super::element::child_processor;

/// Track numbering threads per depth and decide whether this `ol` restarts
/// numbering: a list whose start differs from where the thread left off
/// carries an explicit start number.
fn parse_thread(dom: &Dom, element: NodeId, depth: usize, context: &mut DomToModelContext) -> Option<u32> {
    let counts = &mut context.list_format.thread_item_counts;
    let start = dom
        .attribute(element, "start")
        .and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&s| s > 0);

    let previous = counts.get(depth).copied();
    let effective_start = start.unwrap_or(1);
    let expected = previous.map_or(1, |count| count + 1);
    let start_override = (effective_start != expected).then_some(effective_start);

    counts.truncate(depth);
    counts.resize(depth, 0);
    counts.push(effective_start - 1);
    start_override
}

pub fn list_processor(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    element: NodeId,
    context: &mut DomToModelContext,
) {
    let list_type = if dom.is_tag(element, "ol") {
        ListType::Ordered
    } else {
        ListType::Unordered
    };

    context.stack_format(StackFormatOptions::default(), |context| {
        let mut format = Format::default();
        context
            .format_parsers
            .parse(FormatCategory::ListLevel, &mut format, dom, element);
        let depth = context.list_format.levels.len();
        if list_type == ListType::Ordered {
            format.start_number_override = parse_thread(dom, element, depth, context);
        }

        let mut level = create_list_level(list_type, Some(&format), Some(&parse_dataset(dom, element)));
        if context.allow_cache_element {
            level.cached_element = Some(element);
        }
        tracing::trace!(target: "tapestry::dom_to_model", ?list_type, depth, "entering list");

        context.list_format.levels.push(level);
        child_processor(group, dom, element, context);
        context.list_format.levels.pop();
    });
}

pub fn list_item_processor(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    element: NodeId,
    context: &mut DomToModelContext,
) {
    if context.list_format.levels.is_empty() {
        // A stray `li` outside any list is treated as a plain block.
        super::element::block_processor(group, dom, element, context);
        return;
    }

    let depth = context.list_format.levels.len() - 1;
    let is_ordered = context
        .list_format
        .levels
        .last()
        .is_some_and(|level| level.list_type == ListType::Ordered);
    if is_ordered && let Some(count) = context.list_format.thread_item_counts.get_mut(depth) {
        *count += 1;
    }

    let mut item = context.stack_format(
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
            let mut item = create_list_item(&context.list_format.levels, Some(&context.segment_format));
            context
                .format_parsers
                .parse(FormatCategory::ListItem, &mut item.format, dom, element);
            if context.allow_cache_element {
                item.cached_element = Some(element);
                // Levels keep the elements they were parsed from.
                for (level, open) in item.levels.iter_mut().zip(&context.list_format.levels) {
                    level.cached_element = open.cached_element;
                }
            }
            child_processor(&mut item, dom, element, context);
            item
        },
    );

    // Hoist list items produced by nested lists out of this item.
    let (nested, own): (Vec<_>, Vec<_>) = std::mem::take(&mut item.blocks)
        .into_iter()
        .partition(|block| matches!(block, ContentModelBlock::ListItem(_)));
    item.blocks = own;

    add_block(group, ContentModelBlock::ListItem(item));
    for block in nested {
        add_block(group, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom_to_model::{DomToModelOption, dom_to_model};
    use tapestry_dom::{el, text};

    fn parse(html: tapestry_dom::Html) -> crate::model::ContentModelDocument {
        let mut dom = Dom::new();
        let root = dom.build(&el("div").child(html));
        dom_to_model(&dom, root, &DomToModelOption::default(), None)
    }

    #[test]
    fn test_nested_list_is_flattened() {
        let doc = parse(
            el("ol")
                .child(el("li").text("a").child(el("ul").child(el("li").text("b"))))
                .child(el("li").text("c")),
        );

        let depths: Vec<usize> = doc
            .blocks
            .iter()
            .filter_map(|b| b.as_list_item())
            .map(|item| item.levels.len())
            .collect();
        assert_eq!(depths, vec![1, 2, 1]);
        let inner = doc.blocks[1].as_list_item().map(|i| i.levels[1].list_type);
        assert_eq!(inner, Some(ListType::Unordered));
    }

    #[test]
    fn test_second_list_restarts_numbering() {
        let mut dom = Dom::new();
        let root = dom.build(
            &el("div")
                .child(el("ol").child(el("li").child(text("a"))))
                .child(el("ol").child(el("li").child(text("b")))),
        );
        let doc = dom_to_model(&dom, root, &DomToModelOption::default(), None);

        let overrides: Vec<Option<u32>> = doc
            .blocks
            .iter()
            .filter_map(|b| b.as_list_item())
            .map(|item| item.levels[0].format.start_number_override)
            .collect();
        assert_eq!(overrides, vec![None, Some(1)]);
    }

    #[test]
    fn test_explicit_start_continuing_thread_has_no_override() {
        let mut dom = Dom::new();
        let root = dom.build(
            &el("div")
                .child(el("ol").child(el("li").text("a")).child(el("li").text("b")))
                .child(el("ol").attr("start", "3").child(el("li").text("c"))),
        );
        let doc = dom_to_model(&dom, root, &DomToModelOption::default(), None);

        let last = doc.blocks.iter().filter_map(|b| b.as_list_item()).last();
        assert_eq!(last.map(|i| i.levels[0].format.start_number_override), Some(None));
    }
}
