//! The flat format record shared by every model node.
//!
//! Each node type only uses a subset of the fields; which subset is decided by
//! the format categories in [`crate::format`]. Inheritance is a plain merge:
//! fields set on the overriding format win.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// String-keyed metadata mirrored to `data-*` attributes.
pub type DatasetFormat = BTreeMap<String, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

/// Logical horizontal alignment; `Start`/`End` flip under RTL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Start,
    Center,
    End,
    Justify,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Middle => "middle",
            VerticalAlign::Bottom => "bottom",
        }
    }

    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" => Some(VerticalAlign::Top),
            "middle" | "center" => Some(VerticalAlign::Middle),
            "bottom" => Some(VerticalAlign::Bottom),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Format {
    // Segment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    /// Space separated `super`/`sub` tokens, outermost first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_or_sub_script_sequence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,

    // Block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_indent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_space: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<String>,

    // Table and cell
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_collapse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_border_box: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_layout: Option<String>,

    // List
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_style_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_number_override: Option<u32>,

    // Link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,

    // Misc
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_break: Option<String>,
}

macro_rules! merge_fields {
    ($target:ident, $source:ident, $($field:ident),* $(,)?) => {
        $(
            if $source.$field.is_some() {
                $target.$field = $source.$field.clone();
            }
        )*
    };
}

macro_rules! segment_fields {
    ($mac:ident, $a:ident, $b:ident) => {
        $mac!(
            $a, $b, font_family, font_size, font_weight, italic, underline, strikethrough,
            super_or_sub_script_sequence, text_color, background_color, letter_spacing,
            line_height,
        )
    };
}

macro_rules! copy_fields {
    ($target:ident, $source:ident, $($field:ident),* $(,)?) => {
        $( $target.$field = $source.$field.clone(); )*
    };
}

impl Format {
    pub fn is_empty(&self) -> bool {
        *self == Format::default()
    }

    /// Overlay every field set on `other`.
    pub fn merge(&mut self, other: &Format) {
        merge_fields!(
            self, other, font_family, font_size, font_weight, italic, underline, strikethrough,
            super_or_sub_script_sequence, text_color, background_color, letter_spacing,
            line_height, direction, text_align, margin_top, margin_right, margin_bottom,
            margin_left, padding_top, padding_right, padding_bottom, padding_left, text_indent,
            white_space, border_top, border_right, border_bottom, border_left, width, height,
            max_width, vertical_align, border_collapse, use_border_box, table_layout,
            list_style_type, start_number_override, href, target, anchor_title, rel, id,
            display, float, word_break,
        );
    }

    /// `self` overlaid with `other`.
    pub fn merged(&self, other: &Format) -> Format {
        let mut result = self.clone();
        result.merge(other);
        result
    }

    /// Only the inline (segment) properties of this format.
    pub fn segment_part(&self) -> Format {
        let mut result = Format::default();
        segment_fields!(copy_fields, result, self);
        result
    }

    pub fn is_bold(&self) -> bool {
        is_bold(self.font_weight.as_deref())
    }

    /// True if the two formats agree on every inline property.
    pub fn same_segment_format(&self, other: &Format) -> bool {
        self.segment_part() == other.segment_part()
    }
}

/// `bold`, `bolder` and numeric weights of 600 or more count as bold.
pub fn is_bold(weight: Option<&str>) -> bool {
    match weight.map(str::trim) {
        Some("bold") | Some("bolder") => true,
        Some(w) => w.parse::<u32>().is_ok_and(|n| n >= 600),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_only_set_fields() {
        let mut base = Format {
            font_size: Some("12px".into()),
            text_color: Some("red".into()),
            ..Default::default()
        };
        let overlay = Format {
            text_color: Some("blue".into()),
            italic: Some(true),
            ..Default::default()
        };
        base.merge(&overlay);

        assert_eq!(base.font_size.as_deref(), Some("12px"));
        assert_eq!(base.text_color.as_deref(), Some("blue"));
        assert_eq!(base.italic, Some(true));
    }

    #[test]
    fn test_segment_part_drops_block_fields() {
        let format = Format {
            font_family: Some("Arial".into()),
            margin_left: Some("40px".into()),
            ..Default::default()
        };
        let segment = format.segment_part();
        assert_eq!(segment.font_family.as_deref(), Some("Arial"));
        assert_eq!(segment.margin_left, None);
    }

    #[test]
    fn test_is_bold() {
        assert!(is_bold(Some("bold")));
        assert!(is_bold(Some("700")));
        assert!(!is_bold(Some("400")));
        assert!(!is_bold(None));
    }
}
