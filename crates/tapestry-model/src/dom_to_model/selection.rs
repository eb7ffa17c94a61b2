//! Range selection boundaries met while walking children.

use crate::model::BlockGroup;

use super::add::add_selection_marker;
use super::context::DomToModelContext;

/// Called before each child index (and once past the last child) of a node
/// whose selection offsets are `start`/`end`.
pub fn handle_regular_selection(
    index: usize,
    context: &mut DomToModelContext,
    group: &mut dyn BlockGroup,
    start: Option<usize>,
    end: Option<usize>,
) {
    if start == Some(index) {
        context.is_in_selection = true;
        add_selection_marker(group, context);
    }
    if end == Some(index) && context.is_range_selection() {
        if !context.is_collapsed_range() {
            add_selection_marker(group, context);
        }
        context.is_in_selection = false;
    }
}
