//! Block dispatch, child reconciliation and the simple block handlers.

use tapestry_dom::{Dom, NodeId};

use crate::format::FormatCategory;
use crate::model::entity::{apply_entity_info, is_entity_element};
use crate::model::{
    BlockGroup, ContentModelBlock, ContentModelDivider, ContentModelEntity,
    ContentModelFormatContainer, ContentModelGeneralBlock,
};
use crate::selection::PathStep;

use super::context::{ModelNodeType, ModelToDomContext};

/// Put a cached `element` at the `ref_node` position of `parent`.
///
/// When the element is already a later child of `parent`, the unclaimed
/// nodes in between are removed (entities excepted). Returns the new
/// reference node.
pub fn reuse_cached_element(
    dom: &mut Dom,
    parent: NodeId,
    element: NodeId,
    mut ref_node: Option<NodeId>,
) -> Option<NodeId> {
    if dom.parent(element) == Some(parent) {
        while let Some(node) = ref_node
            && node != element
            && !is_entity_element(dom, node)
        {
            ref_node = dom.next_sibling(node);
            dom.remove_child(parent, node);
        }
        if ref_node == Some(element) {
            return dom.next_sibling(element);
        }
    }
    dom.insert_before(parent, element, ref_node);
    ref_node
}

pub fn handle_block(
    dom: &mut Dom,
    parent: NodeId,
    block: &mut ContentModelBlock,
    context: &mut ModelToDomContext,
    ref_node: Option<NodeId>,
) -> Option<NodeId> {
    let handlers = context.handlers;
    match block {
        ContentModelBlock::Paragraph(p) => (handlers.paragraph)(dom, parent, p, context, ref_node),
        ContentModelBlock::Table(t) => (handlers.table)(dom, parent, t, context, ref_node),
        ContentModelBlock::Divider(d) => (handlers.divider)(dom, parent, d, context, ref_node),
        ContentModelBlock::Entity(e) => (handlers.entity)(dom, parent, e, context, ref_node),
        ContentModelBlock::FormatContainer(c) => {
            (handlers.format_container)(dom, parent, c, context, ref_node)
        }
        ContentModelBlock::ListItem(l) => (handlers.list_item)(dom, parent, l, context, ref_node),
        ContentModelBlock::General(g) => (handlers.general_block)(dom, parent, g, context, ref_node),
    }
}

/// Render the blocks of `group` as the children of `parent`, reusing what is
/// already there, then drop any child the model no longer accounts for.
pub fn handle_block_group_children(
    dom: &mut Dom,
    parent: NodeId,
    group: &mut dyn BlockGroup,
    context: &mut ModelToDomContext,
) {
    let saved_stack = std::mem::take(&mut context.list_format.node_stack);
    let mut ref_node = dom.first_child(parent);
    let handle = context.handlers.block;

    for (index, block) in group.blocks_mut().iter_mut().enumerate() {
        // A run of list items shares list elements; anything else ends it.
        if index == 0 || !matches!(block, ContentModelBlock::ListItem(_)) {
            context.list_format.node_stack.clear();
        }
        ref_node = context.with_path(PathStep::Block(index), |context| {
            handle(dom, parent, block, context, ref_node)
        });
    }

    while let Some(node) = ref_node {
        ref_node = dom.next_sibling(node);
        dom.remove_child(parent, node);
    }
    context.list_format.node_stack = saved_stack;
}

pub fn handle_divider(
    dom: &mut Dom,
    parent: NodeId,
    divider: &mut ContentModelDivider,
    context: &mut ModelToDomContext,
    ref_node: Option<NodeId>,
) -> Option<NodeId> {
    if context.allow_cache_element
        && let Some(element) = divider.cached_element
    {
        return reuse_cached_element(dom, parent, element, ref_node);
    }

    let element = dom.create_element(&divider.tag_name);
    dom.insert_before(parent, element, ref_node);
    context
        .format_appliers
        .apply(FormatCategory::Divider, &divider.format, dom, element, context);
    if context.allow_cache_element {
        divider.cached_element = Some(element);
    }
    context.node_created(ModelNodeType::Divider, element);
    ref_node
}

/// Entities render as their own wrapper, moved into place.
pub fn handle_entity_block(
    dom: &mut Dom,
    parent: NodeId,
    entity: &mut ContentModelEntity,
    context: &mut ModelToDomContext,
    ref_node: Option<NodeId>,
) -> Option<NodeId> {
    apply_entity_info(dom, entity.wrapper, &entity.entity_format);
    let ref_node = reuse_cached_element(dom, parent, entity.wrapper, ref_node);
    context.node_created(ModelNodeType::Entity, entity.wrapper);
    ref_node
}

pub fn handle_format_container(
    dom: &mut Dom,
    parent: NodeId,
    container: &mut ContentModelFormatContainer,
    context: &mut ModelToDomContext,
    mut ref_node: Option<NodeId>,
) -> Option<NodeId> {
    if container.blocks.is_empty() {
        return ref_node;
    }

    let element = match container.cached_element.filter(|_| context.allow_cache_element) {
        Some(element) => {
            ref_node = reuse_cached_element(dom, parent, element, ref_node);
            element
        }
        None => {
            let element = dom.create_element(&container.tag_name);
            dom.insert_before(parent, element, ref_node);
            context
                .format_appliers
                .apply(FormatCategory::Container, &container.format, dom, element, context);
            context.format_appliers.apply(
                FormatCategory::SegmentOnBlock,
                &container.format,
                dom,
                element,
                context,
            );
            if context.allow_cache_element {
                container.cached_element = Some(element);
            }
            context.node_created(ModelNodeType::FormatContainer, element);
            element
        }
    };

    let segment_format = container.format.segment_part();
    let children = context.handlers.block_group_children;
    context.stack_implicit_format(Some(&segment_format), |context| {
        children(dom, element, container, context)
    });
    ref_node
}

/// Unknown elements are re-created as a shallow copy of the original with
/// children rendered from the model.
pub fn handle_general_block(
    dom: &mut Dom,
    parent: NodeId,
    general: &mut ContentModelGeneralBlock,
    context: &mut ModelToDomContext,
    mut ref_node: Option<NodeId>,
) -> Option<NodeId> {
    let element = match general.cached_element.filter(|_| context.allow_cache_element) {
        Some(element) => {
            ref_node = reuse_cached_element(dom, parent, element, ref_node);
            element
        }
        None => {
            let element = dom.clone_node(general.element, false);
            dom.insert_before(parent, element, ref_node);
            if context.allow_cache_element {
                general.cached_element = Some(element);
            }
            context.node_created(ModelNodeType::General, element);
            element
        }
    };

    let children = context.handlers.block_group_children;
    children(dom, element, general, context);
    ref_node
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapestry_dom::el;

    #[test]
    fn test_reuse_removes_unclaimed_nodes() {
        let mut dom = Dom::new();
        let root = dom.build(&el("div").child(el("i")).child(el("b")).child(el("u")));
        let stale = dom.children(root)[0];
        let kept = dom.children(root)[1];

        let next = reuse_cached_element(&mut dom, root, kept, Some(stale));
        assert_eq!(next, dom.last_child(root));
        insta::assert_snapshot!(dom.inner_html(root), @"<b></b><u></u>");
    }

    #[test]
    fn test_reuse_moves_element_before_reference() {
        let mut dom = Dom::new();
        let root = dom.build(&el("div").child(el("i")));
        let first = dom.first_child(root);
        let moved = dom.create_element("hr");

        let next = reuse_cached_element(&mut dom, root, moved, first);
        assert_eq!(next, first);
        insta::assert_snapshot!(dom.inner_html(root), @"<hr><i></i>");
    }
}
