//! The Content Model: a typed, serializable document tree.

pub mod block;
pub mod entity;
pub mod format;
pub mod segment;
pub mod table;

pub use block::{
    BlockGroup, BlockGroupType, BlockType, ContentModelBlock, ContentModelDivider,
    ContentModelDocument, ContentModelFormatContainer, ContentModelGeneralBlock,
    ContentModelListItem, ContentModelListLevel, ContentModelParagraph,
    ContentModelParagraphDecorator, ListType,
};
pub use entity::{ContentModelEntity, EntityInfo};
pub use format::{DatasetFormat, Direction, Format, TextAlign, VerticalAlign};
pub use segment::{
    ContentModelCode, ContentModelImage, ContentModelLink, ContentModelSegment, SegmentKind,
    SegmentType,
};
pub use table::{ContentModelTable, ContentModelTableCell, ContentModelTableRow};
