//! Per-call state threaded through the DOM to model processors.

use std::collections::HashMap;

use smol_str::SmolStr;
use tapestry_dom::{Dom, DomSelection, NodeId};

use crate::format::FormatParsers;
use crate::model::{
    BlockGroup, ContentModelCode, ContentModelLink, ContentModelListLevel,
    ContentModelParagraphDecorator, Format,
};

/// Converts one element (and usually its subtree) into model content.
pub type ElementProcessor = fn(&mut dyn BlockGroup, &Dom, NodeId, &mut DomToModelContext);

#[derive(Clone, Debug)]
pub struct DomToModelOption {
    /// Processors that replace the built-in handling of a tag.
    pub processor_override: HashMap<SmolStr, ElementProcessor>,
    pub format_parsers: FormatParsers,
    /// Process the root element itself rather than only its children.
    pub include_root: bool,
    /// Keep tables without editing metadata as opaque entities.
    pub preserve_unknown_tables: bool,
    /// Remember parsed elements on the model for reuse when rendering back.
    pub allow_cache_element: bool,
}

impl Default for DomToModelOption {
    fn default() -> Self {
        Self {
            processor_override: HashMap::new(),
            format_parsers: FormatParsers::default(),
            include_root: false,
            preserve_unknown_tables: true,
            allow_cache_element: false,
        }
    }
}

/// List bookkeeping used to detect whether a list continues a prior thread.
#[derive(Clone, Debug, Default)]
pub struct ListFormatContext {
    /// Currently open list levels, outermost first.
    pub levels: Vec<ContentModelListLevel>,
    /// Items seen so far per depth for the current numbering thread.
    pub thread_item_counts: Vec<u32>,
}

/// What [`DomToModelContext::stack_format`] does to each piece of state
/// before running its body. State is always restored afterwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct StackFormatOptions {
    pub clear_segment: bool,
    pub clear_block: bool,
    pub clear_link: bool,
    pub clear_code: bool,
    pub clear_decorator: bool,
}

#[derive(Clone, Debug)]
pub struct DomToModelContext {
    pub segment_format: Format,
    pub block_format: Format,
    pub link: Option<ContentModelLink>,
    pub code: Option<ContentModelCode>,
    pub block_decorator: Option<ContentModelParagraphDecorator>,
    pub list_format: ListFormatContext,
    /// True while the traversal is between the selection start and end.
    pub is_in_selection: bool,
    pub selection: Option<DomSelection>,
    pub allow_cache_element: bool,
    pub preserve_unknown_tables: bool,
    pub processor_override: HashMap<SmolStr, ElementProcessor>,
    pub format_parsers: FormatParsers,
}

impl DomToModelContext {
    pub fn new(option: &DomToModelOption, selection: Option<DomSelection>) -> Self {
        Self {
            segment_format: Format::default(),
            block_format: Format::default(),
            link: None,
            code: None,
            block_decorator: None,
            list_format: ListFormatContext::default(),
            is_in_selection: false,
            selection,
            allow_cache_element: option.allow_cache_element,
            preserve_unknown_tables: option.preserve_unknown_tables,
            processor_override: option.processor_override.clone(),
            format_parsers: option.format_parsers.clone(),
        }
    }

    /// Run `body` with a scoped copy of the format state.
    pub fn stack_format<R>(
        &mut self,
        options: StackFormatOptions,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let segment_format = self.segment_format.clone();
        let block_format = self.block_format.clone();
        let link = self.link.clone();
        let code = self.code.clone();
        let decorator = self.block_decorator.clone();

        if options.clear_segment {
            self.segment_format = Format::default();
        }
        if options.clear_block {
            self.block_format = Format::default();
        }
        if options.clear_link {
            self.link = None;
        }
        if options.clear_code {
            self.code = None;
        }
        if options.clear_decorator {
            self.block_decorator = None;
        }

        let result = body(self);

        self.segment_format = segment_format;
        self.block_format = block_format;
        self.link = link;
        self.code = code;
        self.block_decorator = decorator;
        result
    }

    /// Selection offsets (start, end) inside `node` for a range selection.
    pub fn regular_selection_offsets(&self, node: NodeId) -> (Option<usize>, Option<usize>) {
        match &self.selection {
            Some(DomSelection::Range { range, .. }) => (
                (range.start.node == node).then_some(range.start.offset),
                (range.end.node == node).then_some(range.end.offset),
            ),
            _ => (None, None),
        }
    }

    pub fn is_collapsed_range(&self) -> bool {
        matches!(&self.selection, Some(DomSelection::Range { range, .. }) if range.is_collapsed())
    }

    pub fn is_range_selection(&self) -> bool {
        matches!(self.selection, Some(DomSelection::Range { .. }))
    }
}
