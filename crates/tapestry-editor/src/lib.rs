//! tapestry-editor: editing operations on the tapestry content model.
//!
//! This crate provides:
//! - `table` - insert, delete, merge, split, align, format and normalize tables
//! - `list` - toggle list types and indent or outdent the selection
//! - `word` - expand a collapsed caret to the word around it
//! - `segment` - inline formatting of the selected segments
//! - `keyboard` - Tab and Shift+Tab handling
//! - `indexer` - map rendered nodes back to model paths and reconcile DOM
//!   selection changes without re-parsing
//! - `settings` - `EditorSettings`, the knobs for all of the above

pub mod indexer;
pub mod keyboard;
pub mod list;
pub mod segment;
pub mod settings;
pub mod table;
pub mod word;

pub use indexer::{DomIndexerPlugin, IndexedSegment};
pub use keyboard::handle_tab_key;
pub use list::{IndentDirection, get_operational_blocks, set_list_type, set_model_indentation};
pub use segment::{
    format_selected_segments, set_text_color, toggle_bold, toggle_italic, toggle_strikethrough,
    toggle_underline,
};
pub use settings::EditorSettings;
pub use word::{adjust_word_selection, collapsed_marker_path};
