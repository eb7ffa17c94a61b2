//! Projecting a selection onto the model.

use crate::model::{
    BlockGroup, ContentModelBlock, ContentModelParagraph, ContentModelTable, SegmentKind,
};

use super::path::PathStep;

/// Select everything from `start` to `end` (inclusive, document order) under
/// `root` and clear selection everywhere else.
///
/// Both ends are paths relative to `root`. `end == None` selects only
/// `start`. When both ends are cells of the same table, the rectangle they
/// span is selected as a table selection. Selection markers that are not
/// exactly at `start` or `end` are removed. Every node whose selection state
/// changes loses its cached element.
///
/// Returns true if anything changed.
pub fn set_selection(
    root: &mut dyn BlockGroup,
    start: Option<&[PathStep]>,
    end: Option<&[PathStep]>,
) -> bool {
    let mut walker = SelectionWalker::new(start, end);
    walker.group(root, false);
    tracing::debug!(
        target: "tapestry::selection",
        ?start,
        ?end,
        changed = walker.changed,
        "set selection"
    );
    walker.changed
}

struct SelectionWalker<'p> {
    start: Option<&'p [PathStep]>,
    end: Option<&'p [PathStep]>,
    path: Vec<PathStep>,
    changed: bool,
}

impl<'p> SelectionWalker<'p> {
    fn new(start: Option<&'p [PathStep]>, end: Option<&'p [PathStep]>) -> Self {
        Self {
            start,
            end,
            path: Vec::new(),
            changed: false,
        }
    }

    fn is_start(&self) -> bool {
        self.start == Some(self.path.as_slice())
    }

    fn is_end(&self) -> bool {
        self.end == Some(self.path.as_slice())
    }

    /// Whether the node at the current path is selected, and whether the
    /// selection continues past it.
    fn visit(&self, is_in_selection: bool) -> (bool, bool) {
        let selected = is_in_selection || self.is_start();
        (selected, selected && self.end.is_some() && !self.is_end())
    }

    fn group(&mut self, group: &mut dyn BlockGroup, mut is_in_selection: bool) -> bool {
        for (index, block) in group.blocks_mut().iter_mut().enumerate() {
            self.path.push(PathStep::Block(index));
            is_in_selection = self.block(block, is_in_selection);
            self.path.pop();
        }
        is_in_selection
    }

    fn block(&mut self, block: &mut ContentModelBlock, is_in_selection: bool) -> bool {
        match block {
            ContentModelBlock::Paragraph(paragraph) => self.paragraph(paragraph, is_in_selection),
            ContentModelBlock::Table(table) => self.table(table, is_in_selection),
            ContentModelBlock::Divider(divider) => {
                let (selected, next) = self.visit(is_in_selection);
                if divider.is_selected != selected {
                    divider.is_selected = selected;
                    divider.cached_element = None;
                    self.changed = true;
                }
                next
            }
            ContentModelBlock::Entity(entity) => {
                let (selected, next) = self.visit(is_in_selection);
                if entity.is_selected != selected {
                    entity.is_selected = selected;
                    self.changed = true;
                }
                next
            }
            _ => match block.as_group_mut() {
                Some(group) => self.group(group, is_in_selection),
                None => is_in_selection,
            },
        }
    }

    fn paragraph(&mut self, paragraph: &mut ContentModelParagraph, mut is_in_selection: bool) -> bool {
        let mut stale_markers = Vec::new();
        let mut changed = false;

        for (index, segment) in paragraph.segments.iter_mut().enumerate() {
            self.path.push(PathStep::Segment(index));
            let at_boundary = self.is_start() || self.is_end();
            let (selected, next) = self.visit(is_in_selection);

            if segment.is_selection_marker() {
                if !(selected && at_boundary) {
                    stale_markers.push(index);
                }
            } else if segment.is_selected != selected {
                segment.is_selected = selected;
                changed = true;
            }

            if let SegmentKind::Image(image) = &mut segment.kind {
                let as_image = selected && self.is_start() && (self.end.is_none() || self.is_end());
                if image.is_selected_as_image_selection != as_image {
                    image.is_selected_as_image_selection = as_image;
                    changed = true;
                }
            }

            is_in_selection = next;
            if let Some(general) = segment.as_group_mut() {
                is_in_selection = self.group(general, is_in_selection);
            }
            self.path.pop();
        }

        for index in stale_markers.iter().rev() {
            paragraph.segments.remove(*index);
        }
        if changed || !stale_markers.is_empty() {
            paragraph.cached_element = None;
            self.changed = true;
        }
        is_in_selection
    }

    /// Grid coordinates of `path` if it names a cell of the table at the
    /// current path.
    fn cell_of(&self, path: Option<&[PathStep]>) -> Option<(usize, usize)> {
        let path = path?;
        let (last, prefix) = path.split_last()?;
        match last {
            PathStep::Cell { row, col } if prefix == self.path.as_slice() => Some((*row, *col)),
            _ => None,
        }
    }

    fn table(&mut self, table: &mut ContentModelTable, mut is_in_selection: bool) -> bool {
        let first = self.cell_of(self.start);
        let last = match self.end {
            None => first,
            end => self.cell_of(end),
        };
        let rect = match (first, last) {
            (Some(first), Some(last)) => Some(table.selection_rect(first, last)),
            _ => None,
        };

        for (row_index, row) in table.rows.iter_mut().enumerate() {
            for (col, cell) in row.cells.iter_mut().enumerate() {
                self.path.push(PathStep::Cell { row: row_index, col });
                let selected = rect.is_some_and(|(top, left, bottom, right)| {
                    (top..=bottom).contains(&row_index) && (left..=right).contains(&col)
                });
                if cell.is_selected != selected {
                    cell.is_selected = selected;
                    cell.cached_element = None;
                    self.changed = true;
                }
                if selected {
                    let mut clear = SelectionWalker::new(None, None);
                    clear.group(cell, false);
                    self.changed |= clear.changed;
                } else {
                    is_in_selection = self.group(cell, is_in_selection);
                }
                self.path.pop();
            }
        }
        is_in_selection
    }
}
