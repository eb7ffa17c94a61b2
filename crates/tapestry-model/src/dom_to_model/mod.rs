//! DOM to Content Model conversion.
//!
//! Traversal is depth-first over the DOM. Each element is routed by tag to a
//! processor ([`ElementProcessor`]); processors append blocks and segments to
//! the current [`BlockGroup`](crate::model::BlockGroup) under a scoped format
//! state held in [`DomToModelContext`]. The active selection is projected
//! onto the model as selection markers and `is_selected` flags.

pub mod add;
pub mod context;
pub mod element;
pub mod list;
pub mod selection;
pub mod table;
pub mod text;

pub use context::{
    DomToModelContext, DomToModelOption, ElementProcessor, ListFormatContext, StackFormatOptions,
};
pub use element::{child_processor, element_processor, is_block_element, process_child_node};

use tapestry_dom::{Dom, DomSelection, NodeId};

use crate::creators::create_content_model_document;
use crate::model::ContentModelDocument;
use crate::normalize::normalize_content_model;

/// Build a model from the subtree under `root`.
///
/// A selection outside `root` is ignored. Selection offsets that never match
/// a traversal position simply produce no marker.
pub fn dom_to_model(
    dom: &Dom,
    root: NodeId,
    option: &DomToModelOption,
    selection: Option<&DomSelection>,
) -> ContentModelDocument {
    let selection = selection.copied().filter(|s| s.touches(dom, root));
    let mut context = DomToModelContext::new(option, selection);
    let mut model = create_content_model_document(None);

    if option.include_root {
        element_processor(&mut model, dom, root, &mut context);
    } else {
        child_processor(&mut model, dom, root, &mut context);
    }
    normalize_content_model(&mut model);

    tracing::debug!(
        target: "tapestry::dom_to_model",
        blocks = model.blocks.len(),
        has_selection = selection.is_some(),
        "built content model"
    );
    model
}
