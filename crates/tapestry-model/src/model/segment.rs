//! Inline content: text runs, breaks, images, selection markers and wrappers.

use serde::{Deserialize, Serialize};

use super::block::ContentModelGeneralBlock;
use super::entity::ContentModelEntity;
use super::format::{DatasetFormat, Format};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentType {
    Text,
    Br,
    Image,
    SelectionMarker,
    General,
    Entity,
}

/// Link decorator carried by a segment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelLink {
    pub format: Format,
    #[serde(default, skip_serializing_if = "DatasetFormat::is_empty")]
    pub dataset: DatasetFormat,
}

/// Inline code decorator carried by a segment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelCode {
    pub format: Format,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelImage {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "DatasetFormat::is_empty")]
    pub dataset: DatasetFormat,
    /// Selected as a whole image rather than as part of a text range.
    #[serde(default)]
    pub is_selected_as_image_selection: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "segmentType")]
pub enum SegmentKind {
    Text { text: String },
    Br,
    Image(ContentModelImage),
    SelectionMarker,
    General(ContentModelGeneralBlock),
    Entity(ContentModelEntity),
}

/// A single inline unit inside a paragraph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelSegment {
    #[serde(flatten)]
    pub kind: SegmentKind,
    pub format: Format,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<ContentModelLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ContentModelCode>,
}

impl ContentModelSegment {
    pub fn segment_type(&self) -> SegmentType {
        match &self.kind {
            SegmentKind::Text { .. } => SegmentType::Text,
            SegmentKind::Br => SegmentType::Br,
            SegmentKind::Image(_) => SegmentType::Image,
            SegmentKind::SelectionMarker => SegmentType::SelectionMarker,
            SegmentKind::General(_) => SegmentType::General,
            SegmentKind::Entity(_) => SegmentType::Entity,
        }
    }

    pub fn is_selection_marker(&self) -> bool {
        matches!(self.kind, SegmentKind::SelectionMarker)
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut String> {
        match &mut self.kind {
            SegmentKind::Text { text } => Some(text),
            _ => None,
        }
    }

    /// True if both segments would render with the same inline decoration.
    pub fn has_same_decorations(&self, other: &ContentModelSegment) -> bool {
        self.format == other.format && self.link == other.link && self.code == other.code
    }
}
