//! Mapping rendered DOM nodes back to the model.
//!
//! [`DomIndexerPlugin`] is handed to the renderer as its
//! [`DomIndexer`](tapestry_model::DomIndexer). It records which model path
//! produced each text node, paragraph and table, so a selection change made
//! in the DOM can be written straight into the model without re-parsing.
//!
//! The index is rebuilt by every render. A cached paragraph that is moved
//! into place keeps the entries of its segment nodes, rewritten to its new
//! path; everything else the render did not produce is dropped.

use std::collections::HashMap;

use tapestry_dom::{Dom, DomPosition, DomSelection, NodeId};
use tapestry_model::creators::create_selection_marker;
use tapestry_model::selection::{block_at, paragraph_at_mut, segment_at};
use tapestry_model::{BlockGroup, ContentModelBlock, DomIndexer, PathStep, SegmentKind, set_selection};

use crate::word::split_text_segment;

/// Where a rendered segment node came from.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedSegment {
    /// Paragraph element the node was rendered into, if it had one.
    pub paragraph: Option<NodeId>,
    pub path: Vec<PathStep>,
}

#[derive(Debug, Default)]
struct NodeIndex {
    paragraphs: HashMap<NodeId, Vec<PathStep>>,
    segments: HashMap<NodeId, IndexedSegment>,
    tables: HashMap<NodeId, Vec<PathStep>>,
}

impl NodeIndex {
    fn clear(&mut self) {
        self.paragraphs.clear();
        self.segments.clear();
        self.tables.clear();
    }

    fn len(&self) -> usize {
        self.paragraphs.len() + self.segments.len() + self.tables.len()
    }
}

#[derive(Debug, Default)]
pub struct DomIndexerPlugin {
    current: NodeIndex,
    /// What the previous render produced, while the next one is running.
    previous: NodeIndex,
}

/// A caret position inside an indexed text segment.
struct TextPoint {
    path: Vec<PathStep>,
    /// Offset in chars.
    offset: usize,
}

/// `path` with its leading `from` replaced by `to`, if it lies strictly
/// below `from`.
fn rebase(path: &[PathStep], from: &[PathStep], to: &[PathStep]) -> Option<Vec<PathStep>> {
    if path.len() <= from.len() || !path.starts_with(from) {
        return None;
    }
    let mut moved = to.to_vec();
    moved.extend_from_slice(&path[from.len()..]);
    Some(moved)
}

impl DomIndexer for DomIndexerPlugin {
    fn on_render_start(&mut self, _dom: &Dom) {
        self.previous = std::mem::take(&mut self.current);
    }

    fn on_paragraph(&mut self, _dom: &Dom, element: NodeId, path: &[PathStep]) {
        self.current.paragraphs.insert(element, path.to_vec());
        let Some(old) = self.previous.paragraphs.remove(&element) else {
            return;
        };
        // A reused paragraph keeps its nodes; carry their entries over.
        let moved: Vec<NodeId> = self
            .previous
            .segments
            .iter()
            .filter(|(_, entry)| entry.path.starts_with(&old))
            .map(|(&node, _)| node)
            .collect();
        for node in moved {
            if let Some(mut entry) = self.previous.segments.remove(&node)
                && let Some(path) = rebase(&entry.path, &old, path)
            {
                entry.path = path;
                self.current.segments.insert(node, entry);
            }
        }
        let nested: Vec<NodeId> = self
            .previous
            .paragraphs
            .iter()
            .filter(|(_, p)| p.starts_with(&old))
            .map(|(&node, _)| node)
            .collect();
        for node in nested {
            if let Some(inner) = self.previous.paragraphs.remove(&node)
                && let Some(inner) = rebase(&inner, &old, path)
            {
                self.current.paragraphs.insert(node, inner);
            }
        }
    }

    fn on_segment(&mut self, _dom: &Dom, node: NodeId, paragraph: Option<NodeId>, path: &[PathStep]) {
        self.current.segments.insert(
            node,
            IndexedSegment {
                paragraph,
                path: path.to_vec(),
            },
        );
    }

    fn on_table(&mut self, _dom: &Dom, element: NodeId, path: &[PathStep]) {
        self.current.tables.insert(element, path.to_vec());
    }
}

impl DomIndexerPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything, e.g. after the model was rebuilt from the DOM.
    pub fn clear(&mut self) {
        self.current.clear();
        self.previous.clear();
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn segment(&self, node: NodeId) -> Option<&IndexedSegment> {
        self.current.segments.get(&node)
    }

    pub fn paragraph_path(&self, element: NodeId) -> Option<&[PathStep]> {
        self.current.paragraphs.get(&element).map(Vec::as_slice)
    }

    pub fn table_path(&self, element: NodeId) -> Option<&[PathStep]> {
        self.current.tables.get(&element).map(Vec::as_slice)
    }

    /// Write the DOM selection `new` into `model` using the index alone.
    ///
    /// Returns false when any node of the selection is not indexed or its
    /// text no longer matches the model; the model is then left untouched
    /// and the caller should rebuild it from the DOM.
    pub fn reconcile_selection(
        &mut self,
        dom: &Dom,
        model: &mut dyn BlockGroup,
        new: &DomSelection,
        old: Option<&DomSelection>,
    ) -> bool {
        if old == Some(new) {
            return true;
        }
        let reconciled = match new {
            DomSelection::Range { range, .. } if range.is_collapsed() => {
                self.reconcile_caret(dom, model, range.start)
            }
            DomSelection::Range { range, .. } => self.reconcile_range(dom, model, range.start, range.end),
            DomSelection::Table { table, coordinates } => {
                match self.current.tables.get(table).cloned() {
                    Some(path) if block_at(&*model, &path).is_some_and(|b| b.as_table().is_some()) => {
                        let mut start = path.clone();
                        start.push(PathStep::Cell {
                            row: coordinates.first_row,
                            col: coordinates.first_column,
                        });
                        let mut end = path;
                        end.push(PathStep::Cell {
                            row: coordinates.last_row,
                            col: coordinates.last_column,
                        });
                        self.select(model, &start, Some(&end));
                        true
                    }
                    _ => false,
                }
            }
            DomSelection::Image { image } => {
                let path = self
                    .current
                    .segments
                    .get(image)
                    .map(|entry| entry.path.clone())
                    .filter(|path| {
                        segment_at(&*model, path).is_some_and(|s| matches!(s.kind, SegmentKind::Image(_)))
                    });
                match path {
                    Some(path) => {
                        self.select(model, &path, Some(&path));
                        true
                    }
                    None => false,
                }
            }
        };
        if !reconciled {
            tracing::warn!(target: "tapestry::cache", ?new, "selection not reconciled from index");
        }
        reconciled
    }

    fn reconcile_caret(&mut self, dom: &Dom, model: &mut dyn BlockGroup, position: DomPosition) -> bool {
        let Some(point) = self.locate(dom, &*model, position) else {
            return false;
        };
        let Some((marker, _)) = insert_marker(model, &point) else {
            return false;
        };
        self.forget_paragraph(&marker);
        self.select(model, &marker, None);
        true
    }

    fn reconcile_range(
        &mut self,
        dom: &Dom,
        model: &mut dyn BlockGroup,
        start: DomPosition,
        end: DomPosition,
    ) -> bool {
        let (Some(mut start), Some(end)) = (
            self.locate(dom, &*model, start),
            self.locate(dom, &*model, end),
        ) else {
            return false;
        };

        let Some((mut end_marker, end_shift)) = insert_marker(model, &end) else {
            return false;
        };
        shift_after(&mut start.path, &end_marker, end_shift);
        let Some((start_marker, start_shift)) = insert_marker(model, &start) else {
            return false;
        };
        shift_after(&mut end_marker, &start_marker, start_shift);

        self.forget_paragraph(&start_marker);
        self.forget_paragraph(&end_marker);
        self.select(model, &start_marker, Some(&end_marker));
        true
    }

    /// [`set_selection`], keeping indexed segment paths in step with the
    /// stale markers it removes.
    fn select(&mut self, model: &mut dyn BlockGroup, start: &[PathStep], end: Option<&[PathStep]>) {
        let mut markers = Vec::new();
        collect_markers(&*model, &mut Vec::new(), &mut markers);
        set_selection(model, Some(start), end);

        // Later markers first, so earlier indices stay valid.
        for removed in markers
            .iter()
            .rev()
            .filter(|path| path.as_slice() != start && Some(path.as_slice()) != end)
        {
            let Some((&PathStep::Segment(at), paragraph)) = removed.split_last() else {
                continue;
            };
            for entry in self.current.segments.values_mut() {
                if entry.path.len() > paragraph.len()
                    && entry.path.starts_with(paragraph)
                    && let PathStep::Segment(index) = &mut entry.path[paragraph.len()]
                    && *index > at
                {
                    *index -= 1;
                }
            }
        }
    }

    /// Resolve a DOM position to an indexed text segment whose text still
    /// matches the node.
    fn locate(&self, dom: &Dom, model: &dyn BlockGroup, position: DomPosition) -> Option<TextPoint> {
        let entry = self.current.segments.get(&position.node)?;
        let text = dom.text(position.node)?;
        let segment = segment_at(model, &entry.path)?;
        if segment.text()? != text || position.offset > dom.node_length(position.node) {
            return None;
        }
        Some(TextPoint {
            path: entry.path.clone(),
            offset: position.offset,
        })
    }

    /// Drop segment entries of the paragraph holding `segment_path`; its
    /// segments were split and will be rendered fresh.
    fn forget_paragraph(&mut self, segment_path: &[PathStep]) {
        let Some((_, paragraph)) = segment_path.split_last() else {
            return;
        };
        self.current
            .segments
            .retain(|_, entry| !(entry.path.len() > paragraph.len() && entry.path.starts_with(paragraph)));
    }
}

/// Paths of every selection marker under `group`, in document order.
fn collect_markers(group: &dyn BlockGroup, path: &mut Vec<PathStep>, out: &mut Vec<Vec<PathStep>>) {
    for (index, block) in group.blocks().iter().enumerate() {
        path.push(PathStep::Block(index));
        match block {
            ContentModelBlock::Paragraph(paragraph) => {
                for (segment_index, segment) in paragraph.segments.iter().enumerate() {
                    path.push(PathStep::Segment(segment_index));
                    if segment.is_selection_marker() {
                        out.push(path.clone());
                    }
                    if let Some(general) = segment.as_group() {
                        collect_markers(general, path, out);
                    }
                    path.pop();
                }
            }
            ContentModelBlock::Table(table) => {
                for (row, cells) in table.rows.iter().enumerate() {
                    for (col, cell) in cells.cells.iter().enumerate() {
                        path.push(PathStep::Cell { row, col });
                        collect_markers(cell, path, out);
                        path.pop();
                    }
                }
            }
            other => {
                if let Some(inner) = other.as_group() {
                    collect_markers(inner, path, out);
                }
            }
        }
        path.pop();
    }
}

/// Insert a selection marker at `point`, splitting the text segment when the
/// point is inside it. Returns the marker path and how many segments were
/// added to the paragraph.
fn insert_marker(model: &mut dyn BlockGroup, point: &TextPoint) -> Option<(Vec<PathStep>, usize)> {
    let (&PathStep::Segment(index), paragraph_path) = point.path.split_last()? else {
        return None;
    };
    let paragraph = paragraph_at_mut(model, paragraph_path)?;
    let segment = paragraph.segments.get(index)?;
    let text = segment.text()?;
    let length = text.chars().count();
    let format = segment.format.clone();

    let (at, added) = if point.offset == 0 {
        (index, 1)
    } else if point.offset >= length {
        (index + 1, 1)
    } else {
        let byte = text.char_indices().nth(point.offset).map_or(text.len(), |(i, _)| i);
        split_text_segment(&mut paragraph.segments, index, byte);
        (index + 1, 2)
    };
    paragraph.segments.insert(at, create_selection_marker(Some(&format)));
    paragraph.cached_element = None;

    let mut path = paragraph_path.to_vec();
    path.push(PathStep::Segment(at));
    Some((path, added))
}

/// Move `path` along after `added` segments were inserted at `inserted`.
fn shift_after(path: &mut [PathStep], inserted: &[PathStep], added: usize) {
    let Some((&PathStep::Segment(at), paragraph)) = inserted.split_last() else {
        return;
    };
    if path.len() <= paragraph.len() || !path.starts_with(paragraph) {
        return;
    }
    if let PathStep::Segment(index) = &mut path[paragraph.len()]
        && *index >= at
    {
        *index += added;
    }
}
