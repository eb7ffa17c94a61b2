//! Editing info metadata stored as JSON in a node's dataset.
//!
//! Each metadata record declares a [`Definition`] describing its shape. A
//! stored value that fails to parse or to validate is treated as absent.

use miette::Diagnostic;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::model::DatasetFormat;

/// Dataset key holding the JSON encoded metadata.
pub const EDITING_INFO_KEY: &str = "editingInfo";

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum MetadataError {
    #[error("metadata is not valid JSON: {0}")]
    #[diagnostic(code(tapestry::metadata::json))]
    Json(#[from] serde_json::Error),

    #[error("metadata does not match its definition")]
    #[diagnostic(code(tapestry::metadata::schema))]
    Schema,
}

/// Declared shape of a JSON value.
#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    Boolean {
        optional: bool,
    },
    Number {
        optional: bool,
        min: Option<f64>,
        max: Option<f64>,
    },
    String {
        optional: bool,
        allow_null: bool,
    },
    Object {
        optional: bool,
        fields: Vec<(&'static str, Definition)>,
    },
}

impl Definition {
    pub fn boolean(optional: bool) -> Self {
        Definition::Boolean { optional }
    }

    pub fn number(optional: bool, min: Option<f64>, max: Option<f64>) -> Self {
        Definition::Number { optional, min, max }
    }

    pub fn string(optional: bool, allow_null: bool) -> Self {
        Definition::String {
            optional,
            allow_null,
        }
    }

    pub fn object(optional: bool, fields: Vec<(&'static str, Definition)>) -> Self {
        Definition::Object { optional, fields }
    }

    fn is_optional(&self) -> bool {
        match self {
            Definition::Boolean { optional }
            | Definition::Number { optional, .. }
            | Definition::String { optional, .. }
            | Definition::Object { optional, .. } => *optional,
        }
    }

    /// Check a value against this definition. `None` is a missing value.
    pub fn validate(&self, value: Option<&Value>) -> bool {
        let value = match value {
            None => return self.is_optional(),
            Some(Value::Null) => {
                return self.is_optional()
                    || matches!(self, Definition::String { allow_null: true, .. });
            }
            Some(v) => v,
        };

        match self {
            Definition::Boolean { .. } => value.is_boolean(),
            Definition::Number { min, max, .. } => match value.as_f64() {
                Some(n) => min.is_none_or(|min| n >= min) && max.is_none_or(|max| n <= max),
                None => false,
            },
            Definition::String { .. } => value.is_string(),
            Definition::Object { fields, .. } => match value.as_object() {
                Some(map) => fields
                    .iter()
                    .all(|(name, definition)| definition.validate(map.get(*name))),
                None => false,
            },
        }
    }
}

/// A metadata record with a declared shape.
pub trait Metadata: Serialize + DeserializeOwned {
    fn definition() -> Definition;
}

/// Parse and validate a raw metadata string.
pub fn parse_metadata<T: Metadata>(raw: &str) -> Result<T, MetadataError> {
    let value: Value = serde_json::from_str(raw)?;
    if !T::definition().validate(Some(&value)) {
        return Err(MetadataError::Schema);
    }
    Ok(serde_json::from_value(value)?)
}

/// Read the metadata stored in `dataset`, or `None` if missing or invalid.
pub fn get_metadata<T: Metadata>(dataset: &DatasetFormat) -> Option<T> {
    let raw = dataset.get(EDITING_INFO_KEY)?;
    match parse_metadata(raw) {
        Ok(metadata) => Some(metadata),
        Err(error) => {
            tracing::debug!(target: "tapestry::metadata", %error, "ignoring stored metadata");
            None
        }
    }
}

/// Read, transform and write back metadata.
///
/// `callback` receives the current metadata (`None` if missing or invalid).
/// Returning `None` removes the stored value. Returns what was stored, or
/// `None` if nothing valid was stored.
pub fn update_metadata<T, F>(dataset: &mut DatasetFormat, callback: F) -> Option<T>
where
    T: Metadata,
    F: FnOnce(Option<T>) -> Option<T>,
{
    let current = get_metadata::<T>(dataset);
    let Some(updated) = callback(current) else {
        dataset.remove(EDITING_INFO_KEY);
        return None;
    };

    let value = match serde_json::to_value(&updated) {
        Ok(value) => value,
        Err(error) => {
            tracing::debug!(target: "tapestry::metadata", %error, "failed to encode metadata");
            return None;
        }
    };
    if !T::definition().validate(Some(&value)) {
        tracing::debug!(target: "tapestry::metadata", "refusing to store invalid metadata");
        return None;
    }
    dataset.insert(EDITING_INFO_KEY.to_string(), value.to_string());
    Some(updated)
}

// === List ===

/// Ordered list marker styles, numbered as stored in metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderedListStyle {
    Decimal = 1,
    LowerAlpha = 2,
    LowerRoman = 3,
    UpperAlpha = 4,
    UpperRoman = 5,
    DecimalLeadingZero = 6,
}

impl OrderedListStyle {
    pub fn from_number(n: u8) -> Option<Self> {
        Some(match n {
            1 => OrderedListStyle::Decimal,
            2 => OrderedListStyle::LowerAlpha,
            3 => OrderedListStyle::LowerRoman,
            4 => OrderedListStyle::UpperAlpha,
            5 => OrderedListStyle::UpperRoman,
            6 => OrderedListStyle::DecimalLeadingZero,
            _ => return None,
        })
    }

    /// Automatic style for a zero-based nesting depth.
    pub fn for_depth(depth: usize) -> Self {
        match depth % 3 {
            0 => OrderedListStyle::Decimal,
            1 => OrderedListStyle::LowerAlpha,
            _ => OrderedListStyle::LowerRoman,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            OrderedListStyle::Decimal => "decimal",
            OrderedListStyle::LowerAlpha => "lower-alpha",
            OrderedListStyle::LowerRoman => "lower-roman",
            OrderedListStyle::UpperAlpha => "upper-alpha",
            OrderedListStyle::UpperRoman => "upper-roman",
            OrderedListStyle::DecimalLeadingZero => "decimal-leading-zero",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnorderedListStyle {
    Disc = 1,
    Circle = 2,
    Square = 3,
}

impl UnorderedListStyle {
    pub fn from_number(n: u8) -> Option<Self> {
        Some(match n {
            1 => UnorderedListStyle::Disc,
            2 => UnorderedListStyle::Circle,
            3 => UnorderedListStyle::Square,
            _ => return None,
        })
    }

    pub fn for_depth(depth: usize) -> Self {
        match depth % 3 {
            0 => UnorderedListStyle::Disc,
            1 => UnorderedListStyle::Circle,
            _ => UnorderedListStyle::Square,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            UnorderedListStyle::Disc => "disc",
            UnorderedListStyle::Circle => "circle",
            UnorderedListStyle::Square => "square",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMetadataFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered_style_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unordered_style_type: Option<u8>,
    /// Pick the marker style from the nesting depth.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub apply_list_style_from_level: bool,
}

impl Metadata for ListMetadataFormat {
    fn definition() -> Definition {
        Definition::object(
            false,
            vec![
                ("orderedStyleType", Definition::number(true, Some(1.0), Some(6.0))),
                ("unorderedStyleType", Definition::number(true, Some(1.0), Some(3.0))),
                ("applyListStyleFromLevel", Definition::boolean(true)),
            ],
        )
    }
}

// === Table ===

/// Named border presets for [`TableMetadataFormat::table_border_format`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TableBorderFormat {
    #[default]
    Default = 0,
    ListWithSideBorders = 1,
    NoHeaderBorders = 2,
    NoSideBorders = 3,
    FirstColumnHeaderExternal = 4,
    EspecialType1 = 5,
    EspecialType2 = 6,
    EspecialType3 = 7,
    Clear = 8,
}

impl TryFrom<u8> for TableBorderFormat {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => TableBorderFormat::Default,
            1 => TableBorderFormat::ListWithSideBorders,
            2 => TableBorderFormat::NoHeaderBorders,
            3 => TableBorderFormat::NoSideBorders,
            4 => TableBorderFormat::FirstColumnHeaderExternal,
            5 => TableBorderFormat::EspecialType1,
            6 => TableBorderFormat::EspecialType2,
            7 => TableBorderFormat::EspecialType3,
            8 => TableBorderFormat::Clear,
            other => return Err(format!("unknown table border format {other}")),
        })
    }
}

impl From<TableBorderFormat> for u8 {
    fn from(value: TableBorderFormat) -> Self {
        value as u8
    }
}

const DEFAULT_BORDER_COLOR: &str = "#ABABAB";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadataFormat {
    pub top_border_color: Option<String>,
    pub bottom_border_color: Option<String>,
    pub vertical_border_color: Option<String>,
    pub has_header_row: bool,
    pub header_row_color: Option<String>,
    pub has_first_column: bool,
    pub has_banded_columns: bool,
    pub has_banded_rows: bool,
    pub bg_color_even: Option<String>,
    pub bg_color_odd: Option<String>,
    pub table_border_format: TableBorderFormat,
}

impl Default for TableMetadataFormat {
    fn default() -> Self {
        Self {
            top_border_color: Some(DEFAULT_BORDER_COLOR.into()),
            bottom_border_color: Some(DEFAULT_BORDER_COLOR.into()),
            vertical_border_color: Some(DEFAULT_BORDER_COLOR.into()),
            has_header_row: false,
            header_row_color: Some(DEFAULT_BORDER_COLOR.into()),
            has_first_column: false,
            has_banded_columns: false,
            has_banded_rows: false,
            bg_color_even: None,
            bg_color_odd: Some("#ABABAB20".into()),
            table_border_format: TableBorderFormat::Default,
        }
    }
}

impl Metadata for TableMetadataFormat {
    fn definition() -> Definition {
        Definition::object(
            false,
            vec![
                ("topBorderColor", Definition::string(true, true)),
                ("bottomBorderColor", Definition::string(true, true)),
                ("verticalBorderColor", Definition::string(true, true)),
                ("hasHeaderRow", Definition::boolean(false)),
                ("headerRowColor", Definition::string(true, true)),
                ("hasFirstColumn", Definition::boolean(false)),
                ("hasBandedColumns", Definition::boolean(false)),
                ("hasBandedRows", Definition::boolean(false)),
                ("bgColorEven", Definition::string(true, true)),
                ("bgColorOdd", Definition::string(true, true)),
                ("tableBorderFormat", Definition::number(false, Some(0.0), Some(8.0))),
            ],
        )
    }
}

/// Per-cell flags recording manual formatting that table-wide formatting keeps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellMetadataFormat {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bg_color_override: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub v_align_override: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub border_override: bool,
}

impl Metadata for TableCellMetadataFormat {
    fn definition() -> Definition {
        Definition::object(
            false,
            vec![
                ("bgColorOverride", Definition::boolean(true)),
                ("vAlignOverride", Definition::boolean(true)),
                ("borderOverride", Definition::boolean(true)),
            ],
        )
    }
}
