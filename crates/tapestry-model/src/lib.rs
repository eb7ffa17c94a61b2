//! tapestry-model: the Content Model and its conversion to and from the DOM.
//!
//! This crate provides:
//! - `model` - typed document tree of blocks, block groups and segments
//! - `dom_to_model` - parse a DOM subtree (and its selection) into a model
//! - `model_to_dom` - render a model, reusing cached elements, and report
//!   the selection it carries
//! - `format` - per-property parsers and appliers between styles and `Format`
//! - `metadata` - schema-checked JSON editing info kept in the dataset
//! - `selection` - model paths, `set_selection` and selection iteration

pub mod creators;
pub mod dom_to_model;
pub mod format;
pub mod metadata;
pub mod model;
pub mod model_to_dom;
pub mod normalize;
pub mod selection;

pub use dom_to_model::{DomToModelContext, DomToModelOption, dom_to_model};
pub use format::{FormatAppliers, FormatCategory, FormatKey, FormatParsers};
pub use metadata::{Metadata, MetadataError, get_metadata, update_metadata};
pub use model::*;
pub use model_to_dom::{DomIndexer, ModelNodeType, ModelToDomContext, ModelToDomOption, model_to_dom};
pub use normalize::{get_closest_ancestor_block_group_index, normalize_content_model, unwrap_block};
pub use selection::{PathStep, set_selection};
