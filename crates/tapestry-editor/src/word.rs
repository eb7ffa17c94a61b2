//! Expanding a collapsed caret to the word around it.

use tapestry_model::selection::{get_selected_segments, paragraph_at_mut, segment_at};
use tapestry_model::{BlockGroup, ContentModelSegment, PathStep};

/// Characters that end a word as whitespace.
const SPACES: &[char] = &[
    '\u{0020}', '\u{00A0}', '\u{0009}', '\u{000A}', '\u{000D}', '\u{2000}', '\u{2009}',
    '\u{200A}', '\u{200B}', '\u{202F}', '\u{205F}', '\u{3000}',
];

/// Characters that end a word as punctuation.
const PUNCTUATION: &[char] = &['.', ',', '?', '!', ':', '"', '(', ')', '[', ']', '\\', '/'];

pub fn is_space(c: char) -> bool {
    SPACES.contains(&c)
}

pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

fn is_delimiter(c: char) -> bool {
    is_space(c) || is_punctuation(c)
}

/// Byte offset just past the last delimiter of `text`.
fn last_delimiter_end(text: &str) -> Option<usize> {
    text.char_indices()
        .rev()
        .find(|&(_, c)| is_delimiter(c))
        .map(|(i, c)| i + c.len_utf8())
}

/// Byte offset of the first delimiter of `text`.
fn first_delimiter(text: &str) -> Option<usize> {
    text.char_indices().find(|&(_, c)| is_delimiter(c)).map(|(i, _)| i)
}

/// Split the text segment at `index` at byte `offset`; the tail becomes a new
/// segment right after it with the same format and decorations.
pub(crate) fn split_text_segment(segments: &mut Vec<ContentModelSegment>, index: usize, offset: usize) {
    let Some(segment) = segments.get_mut(index) else {
        return;
    };
    let Some(text) = segment.text_mut() else {
        return;
    };
    let tail_text = text.split_off(offset);
    let mut tail = segment.clone();
    if let Some(text) = tail.text_mut() {
        *text = tail_text;
    }
    segments.insert(index + 1, tail);
}

/// Path of the selection marker when the selection is a single collapsed
/// caret.
pub fn collapsed_marker_path(root: &dyn BlockGroup) -> Option<Vec<PathStep>> {
    let mut selected = get_selected_segments(root).into_iter();
    let path = selected.next()?;
    if selected.next().is_some() {
        return None;
    }
    segment_at(root, &path)?
        .is_selection_marker()
        .then_some(path)
}

/// Extend from the marker at `marker_path` through the text segments on both
/// sides of it, up to the nearest whitespace or punctuation, and return the
/// paths of the segments making up the word, marker included.
///
/// Text segments straddling a word boundary are split so the word is made
/// of whole segments. When the marker does not touch a word only the marker
/// itself is returned.
pub fn adjust_word_selection(root: &mut dyn BlockGroup, marker_path: &[PathStep]) -> Vec<Vec<PathStep>> {
    let Some((&PathStep::Segment(mut marker), paragraph_path)) = marker_path.split_last() else {
        return Vec::new();
    };
    let Some(paragraph) = paragraph_at_mut(root, paragraph_path) else {
        return Vec::new();
    };
    if !paragraph
        .segments
        .get(marker)
        .is_some_and(ContentModelSegment::is_selection_marker)
    {
        return vec![marker_path.to_vec()];
    }

    let mut split = false;

    let mut start = marker;
    while start > 0 {
        let Some(text) = paragraph.segments[start - 1].text() else {
            break;
        };
        match last_delimiter_end(text) {
            Some(offset) if offset < text.len() => {
                split_text_segment(&mut paragraph.segments, start - 1, offset);
                split = true;
                marker += 1;
                break;
            }
            Some(_) => break,
            None => start -= 1,
        }
    }
    // After a split the word begins at the tail, which now sits at `start`.

    let mut end = marker;
    while end + 1 < paragraph.segments.len() {
        let Some(text) = paragraph.segments[end + 1].text() else {
            break;
        };
        match first_delimiter(text) {
            Some(0) => break,
            Some(offset) => {
                split_text_segment(&mut paragraph.segments, end + 1, offset);
                split = true;
                end += 1;
                break;
            }
            None => end += 1,
        }
    }

    if split {
        paragraph.cached_element = None;
    }
    if (start, end) == (marker, marker) {
        return vec![paragraph_path_with(paragraph_path, marker)];
    }
    tracing::debug!(target: "tapestry::selection", start, end, split, "expanded caret to word");
    (start..=end)
        .map(|index| paragraph_path_with(paragraph_path, index))
        .collect()
}

fn paragraph_path_with(paragraph_path: &[PathStep], index: usize) -> Vec<PathStep> {
    let mut path = paragraph_path.to_vec();
    path.push(PathStep::Segment(index));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapestry_model::creators::*;
    use tapestry_model::{ContentModelBlock, ContentModelDocument};

    fn doc_with(parts: &[Option<&str>]) -> ContentModelDocument {
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

    fn texts_of(doc: &ContentModelDocument, paths: &[Vec<PathStep>]) -> Vec<String> {
        paths
            .iter()
            .filter_map(|path| segment_at(doc, path))
            .map(|s| s.text().unwrap_or("|").to_string())
            .collect()
    }

    #[test]
    fn test_word_around_caret() {
        let mut doc = doc_with(&[Some("Subject Ve"), None, Some("rb Object")]);
        let marker = collapsed_marker_path(&doc);
        assert_eq!(marker, Some(vec![PathStep::Block(0), PathStep::Segment(1)]));

        let word = adjust_word_selection(&mut doc, &marker.unwrap_or_default());
        assert_eq!(texts_of(&doc, &word), vec!["Ve", "|", "rb"]);

        let all: Vec<String> = doc.blocks[0]
            .as_paragraph()
            .map(|p| p.segments.iter().map(|s| s.text().unwrap_or("|").to_string()).collect())
            .unwrap_or_default();
        assert_eq!(all, vec!["Subject ", "Ve", "|", "rb", " Object"]);
    }

    #[test]
    fn test_word_across_segments() {
        let mut doc = doc_with(&[Some("(fo"), Some("o"), None, Some("bar"), Some("!")]);
        let path = [PathStep::Block(0), PathStep::Segment(2)];
        let word = adjust_word_selection(&mut doc, &path);
        assert_eq!(texts_of(&doc, &word), vec!["fo", "o", "|", "bar"]);
    }

    #[test]
    fn test_caret_between_spaces() {
        let mut doc = doc_with(&[Some("a "), None, Some("\u{3000}b")]);
        let path = [PathStep::Block(0), PathStep::Segment(1)];
        let word = adjust_word_selection(&mut doc, &path);
        assert_eq!(word, vec![path.to_vec()]);
        assert_eq!(doc.blocks[0].as_paragraph().map(|p| p.segments.len()), Some(3));
    }

    #[test]
    fn test_whitespace_set_is_literal() {
        assert!(is_space('\u{200B}'));
        assert!(!is_space('\u{2003}'));
        assert!(is_punctuation('/'));
        assert!(!is_punctuation('-'));
    }
}
