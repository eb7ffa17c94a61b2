//! tapestry-dom: the DOM surface the content model converts to and from.
//!
//! This crate provides:
//! - `Dom` - an arena of element, text and comment nodes addressed by `NodeId`
//! - `DomPosition`, `DomRange`, `DomSelection` - selection state over the arena
//! - HTML serialization and the `Html` fixture builder

pub mod dom;
pub mod html;
pub mod range;
pub mod style;

pub use dom::{Dom, ElementData, NodeId, NodeKind};
pub use html::{Html, el, is_void_element, text};
pub use range::{DomPosition, DomRange, DomSelection, TableSelectionCoordinates};
pub use style::{expand_box_shorthand, parse_px, parse_style, serialize_style, split_css_values};
