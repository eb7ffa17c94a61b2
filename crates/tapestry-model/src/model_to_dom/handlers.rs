//! The pluggable handler table.
//!
//! Every handler is looked up through [`ModelToDomContext::handlers`], so a
//! host can replace any one of them and still have the rest of the tree
//! rendered by the built-ins.

use tapestry_dom::{Dom, NodeId};

use crate::model::{
    BlockGroup, ContentModelBlock, ContentModelDivider, ContentModelEntity,
    ContentModelFormatContainer, ContentModelGeneralBlock, ContentModelListItem,
    ContentModelParagraph, ContentModelSegment, ContentModelTable,
};

use super::ModelToDomContext;

/// Renders a block into `parent` before the reference node and returns the
/// next unclaimed sibling.
pub type BlockHandler<T> =
    fn(&mut Dom, NodeId, &mut T, &mut ModelToDomContext, Option<NodeId>) -> Option<NodeId>;

/// Renders a segment at the end of `parent`, pushing the nodes it produced.
pub type SegmentHandler =
    fn(&mut Dom, NodeId, &mut ContentModelSegment, &mut ModelToDomContext, &mut Vec<NodeId>);

pub type BlockGroupChildrenHandler = fn(&mut Dom, NodeId, &mut dyn BlockGroup, &mut ModelToDomContext);

#[derive(Clone, Copy)]
pub struct ModelToDomHandlers {
    pub block: BlockHandler<ContentModelBlock>,
    pub block_group_children: BlockGroupChildrenHandler,
    pub paragraph: BlockHandler<ContentModelParagraph>,
    pub table: BlockHandler<ContentModelTable>,
    pub divider: BlockHandler<ContentModelDivider>,
    pub entity: BlockHandler<ContentModelEntity>,
    pub format_container: BlockHandler<ContentModelFormatContainer>,
    pub list_item: BlockHandler<ContentModelListItem>,
    /// Opens (or reuses) the `ol`/`ul` elements a list item needs.
    pub list: BlockHandler<ContentModelListItem>,
    pub general_block: BlockHandler<ContentModelGeneralBlock>,
    pub segment: SegmentHandler,
    pub text: SegmentHandler,
    pub br: SegmentHandler,
    pub image: SegmentHandler,
    pub general_segment: SegmentHandler,
    pub entity_segment: SegmentHandler,
}

impl Default for ModelToDomHandlers {
    fn default() -> Self {
        Self {
            block: super::block::handle_block,
            block_group_children: super::block::handle_block_group_children,
            paragraph: super::paragraph::handle_paragraph,
            table: super::table::handle_table,
            divider: super::block::handle_divider,
            entity: super::block::handle_entity_block,
            format_container: super::block::handle_format_container,
            list_item: super::list::handle_list_item,
            list: super::list::handle_list,
            general_block: super::block::handle_general_block,
            segment: super::segment::handle_segment,
            text: super::segment::handle_text,
            br: super::segment::handle_br,
            image: super::segment::handle_image,
            general_segment: super::segment::handle_general_segment,
            entity_segment: super::segment::handle_entity_segment,
        }
    }
}

impl std::fmt::Debug for ModelToDomHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelToDomHandlers").finish_non_exhaustive()
    }
}
