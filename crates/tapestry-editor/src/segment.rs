//! Inline formatting of the selected segments.
//!
//! A collapsed caret inside a word formats the whole word. A caret touching
//! no word formats only the marker, so the format applies to what is typed
//! next.

use tapestry_model::selection::{get_selected_segments, paragraph_at_mut, segment_at};
use tapestry_model::{BlockGroup, ContentModelSegment, Format, PathStep};

use crate::word::{adjust_word_selection, collapsed_marker_path};

/// Segments an inline format change applies to.
fn format_targets(root: &mut dyn BlockGroup) -> Vec<Vec<PathStep>> {
    match collapsed_marker_path(root) {
        Some(marker) => adjust_word_selection(root, &marker),
        None => get_selected_segments(root),
    }
}

/// Call `callback` on every segment the current selection formats.
///
/// `callback` also receives whether the change is turning the format on:
/// `is_on` is computed once from the segments before any change, using
/// `is_set`. Returns false when nothing is selected.
pub fn format_selected_segments(
    root: &mut dyn BlockGroup,
    is_set: impl Fn(&Format) -> bool,
    mut callback: impl FnMut(&mut ContentModelSegment, bool),
) -> bool {
    let targets = format_targets(root);
    if targets.is_empty() {
        return false;
    }
    // Markers do not count when the range holds real content.
    let content: Vec<&ContentModelSegment> = targets
        .iter()
        .filter_map(|path| segment_at(&*root, path))
        .collect();
    let considered = content.iter().filter(|s| !s.is_selection_marker()).collect::<Vec<_>>();
    let turn_on = if considered.is_empty() {
        !content.iter().all(|s| is_set(&s.format))
    } else {
        !considered.iter().all(|s| is_set(&s.format))
    };

    for path in &targets {
        let Some((&PathStep::Segment(index), paragraph_path)) = path.split_last() else {
            continue;
        };
        if let Some(paragraph) = paragraph_at_mut(root, paragraph_path)
            && let Some(segment) = paragraph.segments.get_mut(index)
        {
            callback(segment, turn_on);
            paragraph.cached_element = None;
        }
    }
    tracing::debug!(target: "tapestry::selection", count = targets.len(), turn_on, "formatted segments");
    true
}

pub fn toggle_bold(root: &mut dyn BlockGroup) -> bool {
    format_selected_segments(root, Format::is_bold, |segment, on| {
        segment.format.font_weight = Some(if on { "bold" } else { "normal" }.to_string());
    })
}

pub fn toggle_italic(root: &mut dyn BlockGroup) -> bool {
    format_selected_segments(
        root,
        |format| format.italic == Some(true),
        |segment, on| segment.format.italic = Some(on),
    )
}

pub fn toggle_underline(root: &mut dyn BlockGroup) -> bool {
    format_selected_segments(
        root,
        |format| format.underline == Some(true),
        |segment, on| segment.format.underline = Some(on),
    )
}

pub fn toggle_strikethrough(root: &mut dyn BlockGroup) -> bool {
    format_selected_segments(
        root,
        |format| format.strikethrough == Some(true),
        |segment, on| segment.format.strikethrough = Some(on),
    )
}

/// Set (or with `None` clear) the text color of the selection.
pub fn set_text_color(root: &mut dyn BlockGroup, color: Option<&str>) -> bool {
    format_selected_segments(
        root,
        |_| false,
        |segment, _| segment.format.text_color = color.map(str::to_string),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapestry_model::creators::*;
    use tapestry_model::{ContentModelBlock, ContentModelDocument, set_selection};

    fn paragraph_doc(parts: &[Option<&str>]) -> ContentModelDocument {
        let mut paragraph = create_paragraph(false, None, None, None);
        for part in parts {
            paragraph.segments.push(match part {
                Some(text) => create_text(*text, None, None, None),
                None => create_selection_marker(None),
            });
        }
        let mut doc = create_content_model_document(None);
        doc.blocks.push(ContentModelBlock::Paragraph(paragraph));
        doc
    }

    fn weights(doc: &ContentModelDocument) -> Vec<(String, bool)> {
        doc.blocks[0]
            .as_paragraph()
            .map(|p| {
                p.segments
                    .iter()
                    .map(|s| (s.text().unwrap_or("|").to_string(), s.format.is_bold()))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_caret_in_word_bolds_word() {
        let mut doc = paragraph_doc(&[Some("one tw"), None, Some("o three")]);
        assert!(toggle_bold(&mut doc));
        assert_eq!(
            weights(&doc),
            vec![
                ("one ".to_string(), false),
                ("tw".to_string(), true),
                ("|".to_string(), true),
                ("o".to_string(), true),
                (" three".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_toggle_off_when_all_bold() {
        let mut doc = paragraph_doc(&[Some("a"), Some("b")]);
        set_selection(
            &mut doc,
            Some(&[PathStep::Block(0), PathStep::Segment(0)]),
            Some(&[PathStep::Block(0), PathStep::Segment(1)]),
        );
        toggle_bold(&mut doc);
        assert!(weights(&doc).iter().all(|(_, bold)| *bold));
        toggle_bold(&mut doc);
        assert!(weights(&doc).iter().all(|(_, bold)| !*bold));
    }

    #[test]
    fn test_text_color_on_selection() {
        let mut doc = paragraph_doc(&[Some("a"), Some("b")]);
        set_selection(&mut doc, Some(&[PathStep::Block(0), PathStep::Segment(1)]), None);
        set_text_color(&mut doc, Some("red"));

        let colors: Vec<Option<String>> = doc.blocks[0]
            .as_paragraph()
            .map(|p| p.segments.iter().map(|s| s.format.text_color.clone()).collect())
            .unwrap_or_default();
        assert_eq!(colors, vec![None, Some("red".to_string())]);
    }

    #[test]
    fn test_no_selection() {
        let mut doc = paragraph_doc(&[Some("a")]);
        assert!(!toggle_italic(&mut doc));
    }
}
