//! Constructors for model nodes.
//!
//! Formats passed in are copied; created nodes never have a cached element.

use smol_str::SmolStr;
use tapestry_dom::NodeId;

use crate::model::*;

pub fn create_content_model_document(default_format: Option<&Format>) -> ContentModelDocument {
    ContentModelDocument {
        blocks: Vec::new(),
        format: default_format.cloned().unwrap_or_default(),
    }
}

pub fn create_paragraph(
    is_implicit: bool,
    format: Option<&Format>,
    segment_format: Option<&Format>,
    decorator: Option<ContentModelParagraphDecorator>,
) -> ContentModelParagraph {
    ContentModelParagraph {
        segments: Vec::new(),
        is_implicit,
        decorator,
        format: format.cloned().unwrap_or_default(),
        segment_format: segment_format.filter(|f| !f.is_empty()).cloned(),
        cached_element: None,
    }
}

pub fn create_paragraph_decorator(tag_name: &str, format: Option<&Format>) -> ContentModelParagraphDecorator {
    ContentModelParagraphDecorator {
        tag_name: SmolStr::new(tag_name.to_ascii_lowercase()),
        format: format.cloned().unwrap_or_default(),
    }
}

fn segment(kind: SegmentKind, format: Option<&Format>) -> ContentModelSegment {
    ContentModelSegment {
        kind,
        format: format.cloned().unwrap_or_default(),
        is_selected: false,
        link: None,
        code: None,
    }
}

pub fn create_text(
    text: impl Into<String>,
    format: Option<&Format>,
    link: Option<&ContentModelLink>,
    code: Option<&ContentModelCode>,
) -> ContentModelSegment {
    let mut result = segment(SegmentKind::Text { text: text.into() }, format);
    result.link = link.cloned();
    result.code = code.cloned();
    result
}

pub fn create_br(format: Option<&Format>) -> ContentModelSegment {
    segment(SegmentKind::Br, format)
}

pub fn create_image(src: impl Into<String>, format: Option<&Format>) -> ContentModelSegment {
    segment(
        SegmentKind::Image(ContentModelImage {
            src: src.into(),
            ..Default::default()
        }),
        format,
    )
}

/// A collapsed cursor. Markers are always selected.
pub fn create_selection_marker(format: Option<&Format>) -> ContentModelSegment {
    let mut marker = segment(SegmentKind::SelectionMarker, format);
    marker.is_selected = true;
    marker
}

pub fn create_general_block(element: NodeId) -> ContentModelGeneralBlock {
    ContentModelGeneralBlock {
        element,
        blocks: Vec::new(),
        format: Format::default(),
        cached_element: None,
    }
}

pub fn create_general_segment(element: NodeId, format: Option<&Format>) -> ContentModelSegment {
    segment(SegmentKind::General(create_general_block(element)), format)
}

pub fn create_entity(
    wrapper: NodeId,
    is_readonly: bool,
    format: Option<&Format>,
    entity_type: Option<&str>,
    id: Option<&str>,
) -> ContentModelEntity {
    ContentModelEntity {
        wrapper,
        entity_format: EntityInfo {
            id: id.map(str::to_string),
            entity_type: entity_type.map(str::to_string),
            is_readonly,
            is_fake_entity: false,
        },
        format: format.cloned().unwrap_or_default(),
        is_selected: false,
    }
}

/// An inline entity. Its selection state mirrors the entity's.
pub fn create_entity_segment(entity: ContentModelEntity, format: Option<&Format>) -> ContentModelSegment {
    let is_selected = entity.is_selected;
    let mut result = segment(SegmentKind::Entity(entity), format);
    result.is_selected = is_selected;
    result
}

pub fn create_divider(tag_name: &str, format: Option<&Format>) -> ContentModelDivider {
    ContentModelDivider {
        tag_name: SmolStr::new(tag_name.to_ascii_lowercase()),
        format: format.cloned().unwrap_or_default(),
        is_selected: false,
        cached_element: None,
    }
}

pub fn create_format_container(tag_name: &str, format: Option<&Format>) -> ContentModelFormatContainer {
    ContentModelFormatContainer {
        tag_name: SmolStr::new(tag_name.to_ascii_lowercase()),
        blocks: Vec::new(),
        format: format.cloned().unwrap_or_default(),
        cached_element: None,
    }
}

pub fn create_list_level(
    list_type: ListType,
    format: Option<&Format>,
    dataset: Option<&DatasetFormat>,
) -> ContentModelListLevel {
    ContentModelListLevel {
        list_type,
        format: format.cloned().unwrap_or_default(),
        dataset: dataset.cloned().unwrap_or_default(),
        cached_element: None,
    }
}

/// A list item whose levels are copies of `levels` without cached elements.
pub fn create_list_item(
    levels: &[ContentModelListLevel],
    format_holder_format: Option<&Format>,
) -> ContentModelListItem {
    let mut holder = create_selection_marker(format_holder_format);
    holder.is_selected = false;
    ContentModelListItem {
        blocks: Vec::new(),
        levels: levels
            .iter()
            .map(|level| ContentModelListLevel {
                cached_element: None,
                ..level.clone()
            })
            .collect(),
        format_holder: holder,
        format: Format::default(),
        cached_element: None,
    }
}

pub fn create_table(row_count: usize, format: Option<&Format>) -> ContentModelTable {
    ContentModelTable {
        rows: (0..row_count).map(|_| create_table_row(None, 0.0)).collect(),
        widths: Vec::new(),
        format: format.cloned().unwrap_or_default(),
        dataset: DatasetFormat::new(),
        cached_element: None,
    }
}

pub fn create_table_row(format: Option<&Format>, height: f64) -> ContentModelTableRow {
    ContentModelTableRow {
        cells: Vec::new(),
        height,
        format: format.cloned().unwrap_or_default(),
        cached_element: None,
    }
}

pub fn create_table_cell(
    span_left: bool,
    span_above: bool,
    is_header: bool,
    format: Option<&Format>,
) -> ContentModelTableCell {
    ContentModelTableCell {
        blocks: Vec::new(),
        format: format.cloned().unwrap_or_default(),
        span_left,
        span_above,
        is_header,
        is_selected: false,
        dataset: DatasetFormat::new(),
        cached_element: None,
    }
}

/// Append a paragraph holding one text segment to `group`.
pub fn add_text_paragraph(group: &mut dyn BlockGroup, text: &str) {
    let mut paragraph = create_paragraph(false, None, None, None);
    paragraph.segments.push(create_text(text, None, None, None));
    group.blocks_mut().push(ContentModelBlock::Paragraph(paragraph));
}
