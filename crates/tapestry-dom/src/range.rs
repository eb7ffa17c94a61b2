//! Ranges and selections over a [`Dom`].
//!
//! Offsets follow DOM conventions: for text nodes they count characters, for
//! other nodes they count children.

use crate::dom::{Dom, NodeId};

/// A boundary point: a container node plus an offset within it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomPosition {
    pub node: NodeId,
    pub offset: usize,
}

impl DomPosition {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    /// Position directly after `node` within its parent.
    pub fn after(dom: &Dom, node: NodeId) -> Option<Self> {
        let parent = dom.parent(node)?;
        let index = dom.child_index(node)?;
        Some(Self::new(parent, index + 1))
    }

    /// Position directly before `node` within its parent.
    pub fn before(dom: &Dom, node: NodeId) -> Option<Self> {
        let parent = dom.parent(node)?;
        let index = dom.child_index(node)?;
        Some(Self::new(parent, index))
    }
}

/// A start/end pair of boundary points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomRange {
    pub start: DomPosition,
    pub end: DomPosition,
}

impl DomRange {
    pub fn new(start: DomPosition, end: DomPosition) -> Self {
        Self { start, end }
    }

    pub fn collapsed(position: DomPosition) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Table selection by grid coordinates (inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSelectionCoordinates {
    pub first_row: usize,
    pub first_column: usize,
    pub last_row: usize,
    pub last_column: usize,
}

/// The three shapes of selection an editor can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomSelection {
    Range {
        range: DomRange,
        is_reverted: bool,
    },
    Table {
        table: NodeId,
        coordinates: TableSelectionCoordinates,
    },
    Image {
        image: NodeId,
    },
}

impl DomSelection {
    pub fn range(range: DomRange) -> Self {
        DomSelection::Range {
            range,
            is_reverted: false,
        }
    }

    pub fn as_range(&self) -> Option<&DomRange> {
        match self {
            DomSelection::Range { range, .. } => Some(range),
            _ => None,
        }
    }

    /// True if the selection touches any node under `root`.
    pub fn touches(&self, dom: &Dom, root: NodeId) -> bool {
        match self {
            DomSelection::Range { range, .. } => {
                dom.contains(root, range.start.node) || dom.contains(root, range.end.node)
            }
            DomSelection::Table { table, .. } => dom.contains(root, *table),
            DomSelection::Image { image } => dom.contains(root, *image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_after_node() {
        let mut dom = Dom::new();
        let root = dom.create_element("div");
        let a = dom.create_element("br");
        let b = dom.create_text("x");
        dom.append_child(root, a);
        dom.append_child(root, b);

        assert_eq!(DomPosition::after(&dom, a), Some(DomPosition::new(root, 1)));
        assert_eq!(DomPosition::before(&dom, b), Some(DomPosition::new(root, 1)));
    }

    #[test]
    fn test_touches() {
        let mut dom = Dom::new();
        let root = dom.create_element("div");
        let inner = dom.create_text("x");
        let outside = dom.create_text("y");
        dom.append_child(root, inner);

        let inside = DomSelection::range(DomRange::collapsed(DomPosition::new(inner, 0)));
        let elsewhere = DomSelection::range(DomRange::collapsed(DomPosition::new(outside, 0)));
        assert!(inside.touches(&dom, root));
        assert!(!elsewhere.touches(&dom, root));
    }
}
