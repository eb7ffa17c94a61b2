//! Render-time state for model to DOM conversion.

use std::collections::HashSet;

use tapestry_dom::{Dom, DomPosition, DomRange, DomSelection, NodeId, TableSelectionCoordinates};

use crate::format::FormatAppliers;
use crate::model::{Format, ListType};
use crate::selection::PathStep;

use super::handlers::ModelToDomHandlers;

/// Which kind of model node an element was rendered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelNodeType {
    Paragraph,
    Segment,
    Table,
    TableRow,
    TableCell,
    ListLevel,
    ListItem,
    FormatContainer,
    Divider,
    Entity,
    General,
}

/// Receives rendered nodes together with the model path that produced them.
///
/// Paths are outermost first. A segment path ends with
/// [`PathStep::Segment`]. `on_paragraph` is also called when a cached
/// paragraph element is moved into place without re-rendering its segments;
/// `paragraph` on `on_segment` names that element (`None` for paragraphs
/// rendered without a wrapper, which are never cached).
///
/// `on_render_start` runs once before each render, so an indexer can drop
/// what it learned about nodes the render does not touch again.
pub trait DomIndexer {
    fn on_render_start(&mut self, _dom: &Dom) {}
    fn on_paragraph(&mut self, dom: &Dom, element: NodeId, path: &[PathStep]);
    fn on_segment(&mut self, dom: &Dom, node: NodeId, paragraph: Option<NodeId>, path: &[PathStep]);
    fn on_table(&mut self, dom: &Dom, element: NodeId, path: &[PathStep]);
}

/// Caller-supplied rendering options.
pub struct ModelToDomOption<'a> {
    pub handlers: ModelToDomHandlers,
    pub format_appliers: FormatAppliers,
    /// Reuse (and record) cached elements on model nodes.
    pub allow_cache_element: bool,
    pub on_node_created: Option<Box<dyn FnMut(ModelNodeType, NodeId) + 'a>>,
    pub dom_indexer: Option<&'a mut dyn DomIndexer>,
}

impl Default for ModelToDomOption<'_> {
    fn default() -> Self {
        Self {
            handlers: ModelToDomHandlers::default(),
            format_appliers: FormatAppliers::default(),
            allow_cache_element: true,
            on_node_created: None,
            dom_indexer: None,
        }
    }
}

/// One open `ol`/`ul` during list rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListStackFrame {
    pub node: NodeId,
    pub list_type: ListType,
}

#[derive(Clone, Debug, Default)]
pub struct ModelToDomListContext {
    /// Open lists, outermost first. Reset whenever a run of list items ends.
    pub node_stack: Vec<ListStackFrame>,
    /// Items rendered so far per depth of the current numbering thread.
    pub thread_item_counts: Vec<u32>,
    /// List and item elements already placed by this render; a cached
    /// element is only reused once.
    pub claimed: HashSet<NodeId>,
}

/// A point in the output expressed as "after `segment` inside `block`".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionPosition {
    pub block: Option<NodeId>,
    pub segment: Option<NodeId>,
}

impl SelectionPosition {
    /// Resolve to a concrete DOM position.
    pub fn to_dom_position(self, dom: &Dom) -> Option<DomPosition> {
        match self.segment {
            None => self.block.map(|block| DomPosition::new(block, 0)),
            Some(segment) if dom.is_text(segment) => {
                Some(DomPosition::new(segment, dom.node_length(segment)))
            }
            Some(segment) => DomPosition::after(dom, segment),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RegularSelection {
    pub current: SelectionPosition,
    pub start: Option<SelectionPosition>,
    pub end: Option<SelectionPosition>,
}

pub struct ModelToDomContext<'a> {
    /// Format already in effect from ancestors; appliers skip matching values.
    pub implicit_format: Format,
    pub allow_cache_element: bool,
    pub list_format: ModelToDomListContext,
    pub regular_selection: RegularSelection,
    pub table_selection: Option<(NodeId, TableSelectionCoordinates)>,
    pub image_selection: Option<NodeId>,
    pub format_appliers: FormatAppliers,
    pub handlers: ModelToDomHandlers,
    /// Model path of the node being rendered, outermost first.
    pub path: Vec<PathStep>,
    pub on_node_created: Option<Box<dyn FnMut(ModelNodeType, NodeId) + 'a>>,
    pub dom_indexer: Option<&'a mut dyn DomIndexer>,
}

impl Default for ModelToDomContext<'_> {
    fn default() -> Self {
        Self::new(ModelToDomOption::default())
    }
}

impl<'a> ModelToDomContext<'a> {
    pub fn new(option: ModelToDomOption<'a>) -> Self {
        Self {
            implicit_format: Format::default(),
            allow_cache_element: option.allow_cache_element,
            list_format: ModelToDomListContext::default(),
            regular_selection: RegularSelection::default(),
            table_selection: None,
            image_selection: None,
            format_appliers: option.format_appliers,
            handlers: option.handlers,
            path: Vec::new(),
            on_node_created: option.on_node_created,
            dom_indexer: option.dom_indexer,
        }
    }

    pub fn node_created(&mut self, node_type: ModelNodeType, node: NodeId) {
        if let Some(callback) = self.on_node_created.as_mut() {
            callback(node_type, node);
        }
    }

    /// Run `body` with `format` layered over the implicit format.
    pub fn stack_implicit_format<R>(
        &mut self,
        format: Option<&Format>,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = self.implicit_format.clone();
        if let Some(format) = format {
            self.implicit_format.merge(format);
        }
        let result = body(self);
        self.implicit_format = saved;
        result
    }

    /// Run `body` with one more step on the model path.
    pub fn with_path<R>(&mut self, step: PathStep, body: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(step);
        let result = body(self);
        self.path.pop();
        result
    }

    /// The selection produced by the last render: image, then table, then range.
    pub fn selection(&self, dom: &Dom) -> Option<DomSelection> {
        if let Some(image) = self.image_selection {
            return Some(DomSelection::Image { image });
        }
        if let Some((table, coordinates)) = self.table_selection {
            return Some(DomSelection::Table { table, coordinates });
        }
        let start = self.regular_selection.start?.to_dom_position(dom)?;
        let end = self
            .regular_selection
            .end
            .and_then(|end| end.to_dom_position(dom))
            .unwrap_or(start);
        Some(DomSelection::range(DomRange::new(start, end)))
    }
}
