//! Model-side selection: addressing nodes by path, projecting a selection
//! onto the model and walking what is selected.

pub mod iterate;
pub mod path;
pub mod set;

pub use iterate::{
    SelectedContent, get_selected_paragraphs, get_selected_segments,
    get_selected_segments_and_paragraphs, has_selection_in_block_group, iterate_selections,
};
pub use path::{
    PathStep, block_at, block_at_mut, group_at_mut, group_types_along, paragraph_at,
    paragraph_at_mut, segment_at,
};
pub use set::set_selection;
