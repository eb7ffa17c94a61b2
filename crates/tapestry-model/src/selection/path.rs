//! Addressing model nodes by position.
//!
//! A path is a sequence of steps from a root block group, outermost first:
//! [`PathStep::Block`] picks a child block, [`PathStep::Cell`] a cell of the
//! table block reached so far, and [`PathStep::Segment`] a segment of the
//! paragraph reached so far. Steps after a segment enter the block group of
//! a general segment.

use serde::{Deserialize, Serialize};

use crate::model::{
    BlockGroup, BlockGroupType, ContentModelBlock, ContentModelParagraph, ContentModelSegment,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathStep {
    Block(usize),
    Cell { row: usize, col: usize },
    Segment(usize),
}

enum NodeRef<'a> {
    Group(&'a dyn BlockGroup),
    Block(&'a ContentModelBlock),
    Segment(&'a ContentModelSegment),
}

enum NodeMut<'a> {
    Group(&'a mut dyn BlockGroup),
    Block(&'a mut ContentModelBlock),
    Segment(&'a mut ContentModelSegment),
}

fn step_ref(node: NodeRef<'_>, step: PathStep) -> Option<NodeRef<'_>> {
    match (node, step) {
        (NodeRef::Group(group), PathStep::Block(i)) => group.blocks().get(i).map(NodeRef::Block),
        (NodeRef::Block(ContentModelBlock::Table(table)), PathStep::Cell { row, col }) => {
            let cell: &dyn BlockGroup = table.cell(row, col)?;
            Some(NodeRef::Group(cell))
        }
        (NodeRef::Block(ContentModelBlock::Paragraph(paragraph)), PathStep::Segment(i)) => {
            paragraph.segments.get(i).map(NodeRef::Segment)
        }
        (NodeRef::Block(block), PathStep::Block(i)) => {
            block.as_group()?.blocks().get(i).map(NodeRef::Block)
        }
        (NodeRef::Segment(segment), PathStep::Block(i)) => {
            segment.as_group()?.blocks.get(i).map(NodeRef::Block)
        }
        _ => None,
    }
}

fn step_mut(node: NodeMut<'_>, step: PathStep) -> Option<NodeMut<'_>> {
    match (node, step) {
        (NodeMut::Group(group), PathStep::Block(i)) => {
            group.blocks_mut().get_mut(i).map(NodeMut::Block)
        }
        (NodeMut::Block(ContentModelBlock::Table(table)), PathStep::Cell { row, col }) => {
            let cell: &mut dyn BlockGroup = table.cell_mut(row, col)?;
            Some(NodeMut::Group(cell))
        }
        (NodeMut::Block(ContentModelBlock::Paragraph(paragraph)), PathStep::Segment(i)) => {
            paragraph.segments.get_mut(i).map(NodeMut::Segment)
        }
        (NodeMut::Block(block), PathStep::Block(i)) => {
            block.as_group_mut()?.blocks_mut().get_mut(i).map(NodeMut::Block)
        }
        (NodeMut::Segment(segment), PathStep::Block(i)) => {
            segment.as_group_mut()?.blocks.get_mut(i).map(NodeMut::Block)
        }
        _ => None,
    }
}

fn resolve<'a>(root: &'a dyn BlockGroup, path: &[PathStep]) -> Option<NodeRef<'a>> {
    path.iter()
        .try_fold(NodeRef::Group(root), |node, &step| step_ref(node, step))
}

fn resolve_mut<'a>(root: &'a mut dyn BlockGroup, path: &[PathStep]) -> Option<NodeMut<'a>> {
    path.iter()
        .try_fold(NodeMut::Group(root), |node, &step| step_mut(node, step))
}

pub fn block_at<'a>(root: &'a dyn BlockGroup, path: &[PathStep]) -> Option<&'a ContentModelBlock> {
    match resolve(root, path)? {
        NodeRef::Block(block) => Some(block),
        _ => None,
    }
}

pub fn block_at_mut<'a>(
    root: &'a mut dyn BlockGroup,
    path: &[PathStep],
) -> Option<&'a mut ContentModelBlock> {
    match resolve_mut(root, path)? {
        NodeMut::Block(block) => Some(block),
        _ => None,
    }
}

pub fn paragraph_at<'a>(root: &'a dyn BlockGroup, path: &[PathStep]) -> Option<&'a ContentModelParagraph> {
    block_at(root, path)?.as_paragraph()
}

pub fn paragraph_at_mut<'a>(
    root: &'a mut dyn BlockGroup,
    path: &[PathStep],
) -> Option<&'a mut ContentModelParagraph> {
    block_at_mut(root, path)?.as_paragraph_mut()
}

pub fn segment_at<'a>(root: &'a dyn BlockGroup, path: &[PathStep]) -> Option<&'a ContentModelSegment> {
    match resolve(root, path)? {
        NodeRef::Segment(segment) => Some(segment),
        _ => None,
    }
}

/// The block group at `path`: the root itself, a group block, a table cell
/// or the content of a general segment.
pub fn group_at_mut<'a>(
    root: &'a mut dyn BlockGroup,
    path: &[PathStep],
) -> Option<&'a mut dyn BlockGroup> {
    match resolve_mut(root, path)? {
        NodeMut::Group(group) => Some(group),
        NodeMut::Block(block) => block.as_group_mut(),
        NodeMut::Segment(segment) => {
            let group: &mut dyn BlockGroup = segment.as_group_mut()?;
            Some(group)
        }
    }
}

/// Types of the block groups enclosing the node at `path`, innermost first.
pub fn group_types_along(root: &dyn BlockGroup, path: &[PathStep]) -> Vec<BlockGroupType> {
    let mut types = vec![root.block_group_type()];
    let mut node = NodeRef::Group(root);
    for &step in path {
        let Some(next) = step_ref(node, step) else {
            break;
        };
        match &next {
            NodeRef::Group(group) => types.push(group.block_group_type()),
            NodeRef::Block(block) => {
                if let Some(group) = block.as_group() {
                    types.push(group.block_group_type());
                }
            }
            NodeRef::Segment(segment) => {
                if segment.as_group().is_some() {
                    types.push(BlockGroupType::General);
                }
            }
        }
        node = next;
    }
    types.reverse();
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creators::*;

    fn sample() -> crate::model::ContentModelDocument {
        let mut doc = create_content_model_document(None);
        let mut table = create_table(1, None);
        let mut cell = create_table_cell(false, false, false, None);
        add_text_paragraph(&mut cell, "in cell");
        table.rows[0].cells.push(cell);
        add_text_paragraph(&mut doc, "first");
        doc.blocks.push(ContentModelBlock::Table(table));
        doc
    }

    #[test]
    fn test_resolve_segment_inside_cell() {
        let doc = sample();
        let path = [
            PathStep::Block(1),
            PathStep::Cell { row: 0, col: 0 },
            PathStep::Block(0),
            PathStep::Segment(0),
        ];
        assert_eq!(segment_at(&doc, &path).and_then(|s| s.text()), Some("in cell"));
        assert!(segment_at(&doc, &[PathStep::Block(0), PathStep::Segment(3)]).is_none());
    }

    #[test]
    fn test_group_types_innermost_first() {
        let doc = sample();
        let path = [PathStep::Block(1), PathStep::Cell { row: 0, col: 0 }, PathStep::Block(0)];
        assert_eq!(
            group_types_along(&doc, &path),
            vec![BlockGroupType::TableCell, BlockGroupType::Document]
        );
    }

    #[test]
    fn test_group_at_mut_reaches_cell() {
        let mut doc = sample();
        let cell_path = [PathStep::Block(1), PathStep::Cell { row: 0, col: 0 }];
        let cell = group_at_mut(&mut doc, &cell_path);
        assert_eq!(cell.map(|g| g.block_group_type()), Some(BlockGroupType::TableCell));
    }
}
