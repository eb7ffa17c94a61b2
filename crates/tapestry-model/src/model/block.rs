//! Blocks and block groups.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tapestry_dom::NodeId;

use super::entity::ContentModelEntity;
use super::format::{DatasetFormat, Format};
use super::segment::{ContentModelSegment, SegmentKind};
use super::table::{ContentModelTable, ContentModelTableCell};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockType {
    Paragraph,
    Table,
    Divider,
    Entity,
    BlockGroup,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockGroupType {
    Document,
    ListItem,
    FormatContainer,
    TableCell,
    General,
}

/// Tag and implicit format for paragraphs rendered as `h1`-`h6` or `p`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelParagraphDecorator {
    pub tag_name: SmolStr,
    pub format: Format,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelParagraph {
    pub segments: Vec<ContentModelSegment>,
    /// Rendered without a wrapper element when true.
    #[serde(default)]
    pub is_implicit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decorator: Option<ContentModelParagraphDecorator>,
    pub format: Format,
    /// Inline format applied on the wrapper element itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_format: Option<Format>,
    #[serde(skip)]
    pub cached_element: Option<NodeId>,
}

impl ContentModelParagraph {
    /// True if the paragraph has segments other than selection markers.
    pub fn has_visible_content(&self) -> bool {
        self.segments.iter().any(|s| !s.is_selection_marker())
    }

    pub fn has_selection(&self) -> bool {
        self.segments.iter().any(|s| s.is_selected)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelDivider {
    pub tag_name: SmolStr,
    pub format: Format,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(skip)]
    pub cached_element: Option<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListType {
    #[serde(rename = "OL")]
    Ordered,
    #[serde(rename = "UL")]
    Unordered,
}

impl ListType {
    pub fn tag_name(self) -> &'static str {
        match self {
            ListType::Ordered => "ol",
            ListType::Unordered => "ul",
        }
    }
}

/// One nesting level of a list item, outermost first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelListLevel {
    pub list_type: ListType,
    pub format: Format,
    #[serde(default, skip_serializing_if = "DatasetFormat::is_empty")]
    pub dataset: DatasetFormat,
    #[serde(skip)]
    pub cached_element: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelListItem {
    pub blocks: Vec<ContentModelBlock>,
    pub levels: Vec<ContentModelListLevel>,
    /// Carries the inline format of the bullet/number itself.
    pub format_holder: ContentModelSegment,
    pub format: Format,
    #[serde(skip)]
    pub cached_element: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelFormatContainer {
    pub tag_name: SmolStr,
    pub blocks: Vec<ContentModelBlock>,
    pub format: Format,
    #[serde(skip)]
    pub cached_element: Option<NodeId>,
}

/// Wrapper around an element the model does not understand. The element
/// is shallow-cloned on render and its children come from `blocks`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelGeneralBlock {
    pub element: NodeId,
    pub blocks: Vec<ContentModelBlock>,
    pub format: Format,
    #[serde(skip)]
    pub cached_element: Option<NodeId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelDocument {
    pub blocks: Vec<ContentModelBlock>,
    /// Default inline format of the document.
    pub format: Format,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "blockType")]
pub enum ContentModelBlock {
    Paragraph(ContentModelParagraph),
    Table(ContentModelTable),
    Divider(ContentModelDivider),
    Entity(ContentModelEntity),
    FormatContainer(ContentModelFormatContainer),
    ListItem(ContentModelListItem),
    General(ContentModelGeneralBlock),
}

impl ContentModelBlock {
    pub fn block_type(&self) -> BlockType {
        match self {
            ContentModelBlock::Paragraph(_) => BlockType::Paragraph,
            ContentModelBlock::Table(_) => BlockType::Table,
            ContentModelBlock::Divider(_) => BlockType::Divider,
            ContentModelBlock::Entity(_) => BlockType::Entity,
            ContentModelBlock::FormatContainer(_)
            | ContentModelBlock::ListItem(_)
            | ContentModelBlock::General(_) => BlockType::BlockGroup,
        }
    }

    pub fn format(&self) -> &Format {
        match self {
            ContentModelBlock::Paragraph(p) => &p.format,
            ContentModelBlock::Table(t) => &t.format,
            ContentModelBlock::Divider(d) => &d.format,
            ContentModelBlock::Entity(e) => &e.format,
            ContentModelBlock::FormatContainer(c) => &c.format,
            ContentModelBlock::ListItem(l) => &l.format,
            ContentModelBlock::General(g) => &g.format,
        }
    }

    pub fn format_mut(&mut self) -> &mut Format {
        match self {
            ContentModelBlock::Paragraph(p) => &mut p.format,
            ContentModelBlock::Table(t) => &mut t.format,
            ContentModelBlock::Divider(d) => &mut d.format,
            ContentModelBlock::Entity(e) => &mut e.format,
            ContentModelBlock::FormatContainer(c) => &mut c.format,
            ContentModelBlock::ListItem(l) => &mut l.format,
            ContentModelBlock::General(g) => &mut g.format,
        }
    }

    /// The block as a group, if it owns child blocks.
    pub fn as_group(&self) -> Option<&dyn BlockGroup> {
        match self {
            ContentModelBlock::FormatContainer(c) => Some(c),
            ContentModelBlock::ListItem(l) => Some(l),
            ContentModelBlock::General(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut dyn BlockGroup> {
        match self {
            ContentModelBlock::FormatContainer(c) => Some(c),
            ContentModelBlock::ListItem(l) => Some(l),
            ContentModelBlock::General(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_paragraph(&self) -> Option<&ContentModelParagraph> {
        match self {
            ContentModelBlock::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_paragraph_mut(&mut self) -> Option<&mut ContentModelParagraph> {
        match self {
            ContentModelBlock::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list_item(&self) -> Option<&ContentModelListItem> {
        match self {
            ContentModelBlock::ListItem(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&ContentModelTable> {
        match self {
            ContentModelBlock::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut ContentModelTable> {
        match self {
            ContentModelBlock::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Drop the cached element of this block only.
    pub fn invalidate_cache(&mut self) {
        match self {
            ContentModelBlock::Paragraph(p) => p.cached_element = None,
            ContentModelBlock::Table(t) => t.cached_element = None,
            ContentModelBlock::Divider(d) => d.cached_element = None,
            ContentModelBlock::FormatContainer(c) => c.cached_element = None,
            ContentModelBlock::ListItem(l) => l.cached_element = None,
            ContentModelBlock::General(g) => g.cached_element = None,
            ContentModelBlock::Entity(_) => {}
        }
    }
}

/// A node that owns an ordered sequence of child blocks.
pub trait BlockGroup {
    fn block_group_type(&self) -> BlockGroupType;
    fn blocks(&self) -> &[ContentModelBlock];
    fn blocks_mut(&mut self) -> &mut Vec<ContentModelBlock>;
}

macro_rules! impl_block_group {
    ($ty:ty, $group_type:expr) => {
        impl BlockGroup for $ty {
            fn block_group_type(&self) -> BlockGroupType {
                $group_type
            }

            fn blocks(&self) -> &[ContentModelBlock] {
                &self.blocks
            }

            fn blocks_mut(&mut self) -> &mut Vec<ContentModelBlock> {
                &mut self.blocks
            }
        }
    };
}

impl_block_group!(ContentModelDocument, BlockGroupType::Document);
impl_block_group!(ContentModelListItem, BlockGroupType::ListItem);
impl_block_group!(ContentModelFormatContainer, BlockGroupType::FormatContainer);
impl_block_group!(ContentModelGeneralBlock, BlockGroupType::General);
impl_block_group!(ContentModelTableCell, BlockGroupType::TableCell);

impl ContentModelSegment {
    /// The nested block group of a general segment.
    pub fn as_group_mut(&mut self) -> Option<&mut ContentModelGeneralBlock> {
        match &mut self.kind {
            SegmentKind::General(general) => Some(general),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&ContentModelGeneralBlock> {
        match &self.kind {
            SegmentKind::General(general) => Some(general),
            _ => None,
        }
    }
}
