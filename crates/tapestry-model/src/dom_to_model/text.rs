//! Text node processing, split at selection offsets.

use tapestry_dom::{Dom, NodeId};

use crate::model::BlockGroup;

use super::add::{add_selection_marker, add_text_segment};
use super::context::DomToModelContext;

fn split_chars(text: &str, at: usize) -> (&str, &str) {
    match text.char_indices().nth(at) {
        Some((byte, _)) => text.split_at(byte),
        None => (text, ""),
    }
}

pub fn text_processor(group: &mut dyn BlockGroup, dom: &Dom, node: NodeId, context: &mut DomToModelContext) {
    let Some(mut text) = dom.text(node) else {
        return;
    };
    let (start, mut end) = context.regular_selection_offsets(node);

    if let Some(start) = start {
        let (before, after) = split_chars(text, start);
        add_text_segment(group, before, context);
        context.is_in_selection = true;
        add_selection_marker(group, context);
        text = after;
        end = end.map(|end| end.saturating_sub(start));
    }

    if let Some(end) = end {
        let (before, after) = split_chars(text, end);
        add_text_segment(group, before, context);
        if context.is_range_selection() && !context.is_collapsed_range() {
            add_selection_marker(group, context);
        }
        context.is_in_selection = false;
        text = after;
    }

    add_text_segment(group, text, context);
}
