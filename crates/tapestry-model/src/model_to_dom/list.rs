//! List rendering.
//!
//! List items are flat in the model; the nesting is rebuilt here from each
//! item's levels. Open `ol`/`ul` elements are kept on a stack shared by a
//! run of consecutive items, so neighbours with matching levels land in the
//! same list element and a mismatch (or an explicit start number) splits it.

use tapestry_dom::{Dom, NodeId};

use crate::format::{FormatCategory, apply_dataset};
use crate::metadata::{ListMetadataFormat, OrderedListStyle, UnorderedListStyle, get_metadata};
use crate::model::{ContentModelListItem, ContentModelListLevel, ListType};

use super::block::reuse_cached_element;
use super::context::{ListStackFrame, ModelNodeType, ModelToDomContext};

/// List style requested by a level's editing metadata, if any.
pub fn list_style_from_metadata(level: &ContentModelListLevel, depth: usize) -> Option<&'static str> {
    let metadata = get_metadata::<ListMetadataFormat>(&level.dataset)?;
    let from_level = metadata.apply_list_style_from_level;
    match level.list_type {
        ListType::Ordered => metadata
            .ordered_style_type
            .and_then(OrderedListStyle::from_number)
            .or_else(|| from_level.then(|| OrderedListStyle::for_depth(depth)))
            .map(OrderedListStyle::as_css),
        ListType::Unordered => metadata
            .unordered_style_type
            .and_then(UnorderedListStyle::from_number)
            .or_else(|| from_level.then(|| UnorderedListStyle::for_depth(depth)))
            .map(UnorderedListStyle::as_css),
    }
}

/// Advance the numbering thread for a list opened at `depth` and return the
/// number its first item will show.
fn open_thread(context: &mut ModelToDomContext, depth: usize, start_override: Option<u32>) -> u32 {
    let counts = &mut context.list_format.thread_item_counts;
    if counts.len() <= depth {
        counts.resize(depth + 1, 0);
    }
    if let Some(start) = start_override {
        counts[depth] = start.saturating_sub(1);
    }
    counts.truncate(depth + 1);
    counts[depth] + 1
}

/// Drop what a previous render put on a reused list element.
fn reset_list_element(dom: &mut Dom, list: NodeId) {
    dom.remove_attribute(list, "style");
    dom.remove_attribute(list, "start");
    dom.remove_attribute(list, "dir");
    for key in dom.dataset(list).into_keys() {
        dom.remove_data(list, &key);
    }
}

/// Start number, level format and dataset of a list element.
fn decorate_list(
    dom: &mut Dom,
    list: NodeId,
    level: &ContentModelListLevel,
    depth: usize,
    first_number: Option<u32>,
    context: &ModelToDomContext,
) {
    if let Some(number) = first_number.filter(|&n| n > 1) {
        dom.set_attribute(list, "start", number.to_string());
    }
    let mut format = level.format.clone();
    if let Some(style) = list_style_from_metadata(level, depth) {
        format.list_style_type = Some(style.to_string());
    }
    context
        .format_appliers
        .apply(FormatCategory::ListLevel, &format, dom, list, context);
    apply_dataset(&level.dataset, dom, list);
}

/// Make the list stack match `item.levels`, reusing frames from the top while
/// their type matches and the level does not restart numbering.
pub fn handle_list(
    dom: &mut Dom,
    parent: NodeId,
    item: &mut ContentModelListItem,
    context: &mut ModelToDomContext,
    mut ref_node: Option<NodeId>,
) -> Option<NodeId> {
    let stack = &context.list_format.node_stack;
    let reusable = item
        .levels
        .iter()
        .zip(stack.iter())
        .take_while(|(level, frame)| {
            frame.list_type == level.list_type && level.format.start_number_override.is_none()
        })
        .count();
    context.list_format.node_stack.truncate(reusable);

    for depth in reusable..item.levels.len() {
        let level = &mut item.levels[depth];
        let outer = context.list_format.node_stack.last().map(|frame| frame.node);
        let tag = level.list_type.tag_name();
        let cached = level
            .cached_element
            .filter(|&el| context.allow_cache_element && dom.is_tag(el, tag))
            .filter(|el| !context.list_format.claimed.contains(el));

        let first_number = match level.list_type {
            ListType::Ordered => Some(open_thread(context, depth, level.format.start_number_override)),
            ListType::Unordered => None,
        };

        let list = match cached {
            Some(list) => {
                match outer {
                    Some(outer) => dom.append_child(outer, list),
                    None => ref_node = reuse_cached_element(dom, parent, list, ref_node),
                }
                dom.clear_children(list);
                reset_list_element(dom, list);
                decorate_list(dom, list, level, depth, first_number, context);
                list
            }
            None => {
                let list = dom.create_element(tag);
                match outer {
                    Some(outer) => dom.append_child(outer, list),
                    None => dom.insert_before(parent, list, ref_node),
                }
                decorate_list(dom, list, level, depth, first_number, context);
                if context.allow_cache_element {
                    level.cached_element = Some(list);
                }
                context.node_created(ModelNodeType::ListLevel, list);
                list
            }
        };

        tracing::trace!(target: "tapestry::list", depth, ?list, reused = cached.is_some(), "opened list");
        context.list_format.claimed.insert(list);
        context.list_format.node_stack.push(ListStackFrame {
            node: list,
            list_type: level.list_type,
        });
    }
    ref_node
}

pub fn handle_list_item(
    dom: &mut Dom,
    parent: NodeId,
    item: &mut ContentModelListItem,
    context: &mut ModelToDomContext,
    ref_node: Option<NodeId>,
) -> Option<NodeId> {
    let open_lists = context.handlers.list;
    let ref_node = open_lists(dom, parent, item, context, ref_node);
    let list_parent = context.list_format.node_stack.last().map(|frame| frame.node);

    let cached = item
        .cached_element
        .filter(|&el| context.allow_cache_element && dom.is_tag(el, "li"))
        .filter(|el| !context.list_format.claimed.contains(el));
    let li = match cached {
        Some(li) => li,
        None => {
            let li = dom.create_element("li");
            context.format_appliers.apply(
                FormatCategory::SegmentOnBlock,
                &item.format_holder.format,
                dom,
                li,
                context,
            );
            context
                .format_appliers
                .apply(FormatCategory::ListItem, &item.format, dom, li, context);
            if context.allow_cache_element {
                item.cached_element = Some(li);
            }
            context.node_created(ModelNodeType::ListItem, li);
            li
        }
    };
    context.list_format.claimed.insert(li);
    match list_parent {
        Some(list) => dom.append_child(list, li),
        None => dom.insert_before(parent, li, ref_node),
    }

    let depth = item.levels.len().saturating_sub(1);
    if item
        .levels
        .last()
        .is_some_and(|level| level.list_type == ListType::Ordered)
    {
        let counts = &mut context.list_format.thread_item_counts;
        if counts.len() <= depth {
            counts.resize(depth + 1, 0);
        }
        counts[depth] += 1;
        counts.truncate(depth + 1);
    }

    let holder_format = item.format_holder.format.segment_part();
    let children = context.handlers.block_group_children;
    context.stack_implicit_format(Some(&holder_format), |context| {
        children(dom, li, item, context)
    });
    ref_node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creators::*;
    use crate::model::{ContentModelBlock, ContentModelDocument};
    use crate::model_to_dom::model_to_dom;

    fn item(level: &ContentModelListLevel, text: &str) -> ContentModelBlock {
        let mut item = create_list_item(std::slice::from_ref(level), None);
        let mut paragraph = create_paragraph(true, None, None, None);
        paragraph.segments.push(create_text(text, None, None, None));
        item.blocks.push(ContentModelBlock::Paragraph(paragraph));
        ContentModelBlock::ListItem(item)
    }

    fn render(doc: &mut ContentModelDocument) -> String {
        let mut dom = Dom::new();
        let root = dom.create_element("div");
        model_to_dom(&mut dom, root, doc, &mut ModelToDomContext::default());
        dom.inner_html(root)
    }

    #[test]
    fn test_same_level_items_share_list() {
        let level = create_list_level(ListType::Ordered, None, None);
        let mut doc = create_content_model_document(None);
        doc.blocks.push(item(&level, "a"));
        doc.blocks.push(item(&level, "b"));

        insta::assert_snapshot!(render(&mut doc), @"<ol><li>a</li><li>b</li></ol>");
    }

    #[test]
    fn test_start_override_splits_list() {
        let level = create_list_level(ListType::Ordered, None, None);
        let mut restart = level.clone();
        restart.format.start_number_override = Some(2);
        let mut doc = create_content_model_document(None);
        doc.blocks.push(item(&level, "a"));
        doc.blocks.push(item(&restart, "b"));

        insta::assert_snapshot!(
            render(&mut doc),
            @r#"<ol><li>a</li></ol><ol start="2"><li>b</li></ol>"#
        );
    }

    #[test]
    fn test_nested_level_opens_inner_list() {
        let outer = create_list_level(ListType::Ordered, None, None);
        let inner = create_list_level(ListType::Unordered, None, None);
        let mut nested = create_list_item(&[outer.clone(), inner], None);
        add_text_paragraph(&mut nested, "b");
        let mut doc = create_content_model_document(None);
        doc.blocks.push(item(&outer, "a"));
        doc.blocks.push(ContentModelBlock::ListItem(nested));
        doc.blocks.push(item(&outer, "c"));

        insta::assert_snapshot!(
            render(&mut doc),
            @"<ol><li>a</li><ul><li><div>b</div></li></ul><li>c</li></ol>"
        );
    }

    #[test]
    fn test_paragraph_between_items_continues_numbering() {
        let level = create_list_level(ListType::Ordered, None, None);
        let mut doc = create_content_model_document(None);
        doc.blocks.push(item(&level, "a"));
        add_text_paragraph(&mut doc, "x");
        doc.blocks.push(item(&level, "b"));

        insta::assert_snapshot!(
            render(&mut doc),
            @r#"<ol><li>a</li></ol><div>x</div><ol start="2"><li>b</li></ol>"#
        );
    }

    #[test]
    fn test_reused_list_drops_stale_start() {
        let level = create_list_level(ListType::Ordered, None, None);
        let mut doc = create_content_model_document(None);
        doc.blocks.push(item(&level, "a"));
        add_text_paragraph(&mut doc, "x");
        doc.blocks.push(item(&level, "b"));

        let mut dom = Dom::new();
        let root = dom.create_element("div");
        model_to_dom(&mut dom, root, &mut doc, &mut ModelToDomContext::default());
        let second_list = match &doc.blocks[2] {
            ContentModelBlock::ListItem(item) => item.levels[0].cached_element,
            _ => None,
        };
        assert!(second_list.is_some());

        doc.blocks.drain(..2);
        if let ContentModelBlock::ListItem(item) = &mut doc.blocks[0] {
            item.levels[0].format.margin_left = Some("10px".into());
        }
        model_to_dom(&mut dom, root, &mut doc, &mut ModelToDomContext::default());

        let list = match &doc.blocks[0] {
            ContentModelBlock::ListItem(item) => item.levels[0].cached_element,
            _ => None,
        };
        assert_eq!(list, second_list);
        insta::assert_snapshot!(
            dom.inner_html(root),
            @r#"<ol style="margin-left: 10px;"><li>b</li></ol>"#
        );
    }

    #[test]
    fn test_metadata_style_by_depth() {
        let mut dataset = crate::model::DatasetFormat::new();
        dataset.insert(
            crate::metadata::EDITING_INFO_KEY.to_string(),
            r#"{"applyListStyleFromLevel":true}"#.to_string(),
        );
        let level = create_list_level(ListType::Ordered, None, Some(&dataset));
        assert_eq!(list_style_from_metadata(&level, 1), Some("lower-alpha"));

        dataset.insert(crate::metadata::EDITING_INFO_KEY.to_string(), "{not json".to_string());
        let broken = create_list_level(ListType::Ordered, None, Some(&dataset));
        assert_eq!(list_style_from_metadata(&broken, 1), None);
    }
}
