//! Format handlers: parse DOM styles into [`Format`] and apply them back.
//!
//! A [`FormatKey`] names one logical property group (e.g. margins). Each key
//! has a default parser and applier. A [`FormatCategory`] lists the keys a
//! model node type uses, in application order. Both directions can be
//! customized per key (replace or disable) and per category (append).

pub mod block;
pub mod segment;

use std::collections::HashMap;

use tapestry_dom::{Dom, NodeId};

use crate::model::{DatasetFormat, Format};
use crate::model_to_dom::ModelToDomContext;

/// Reads one property group from an element into a format.
pub type FormatParser = fn(&mut Format, &Dom, NodeId);

/// Writes one property group of a format onto an element.
pub type FormatApplier = fn(&Format, &mut Dom, NodeId, &ModelToDomContext);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatKey {
    Direction,
    TextAlign,
    Margin,
    Padding,
    Border,
    BorderBox,
    BackgroundColor,
    TextColor,
    FontFamily,
    FontSize,
    Bold,
    Italic,
    Underline,
    Strike,
    SuperOrSubScript,
    LineHeight,
    LetterSpacing,
    WhiteSpace,
    Display,
    Float,
    Size,
    VerticalAlign,
    TableLayout,
    Link,
    ListStyleType,
    Id,
    WordBreak,
    TextIndent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatCategory {
    Segment,
    /// Inline format carried by a block element (paragraph wrapper, `li`).
    SegmentOnBlock,
    Block,
    Container,
    Table,
    TableRow,
    TableCell,
    Image,
    Link,
    Code,
    ListLevel,
    ListItem,
    Divider,
}

use FormatKey::*;

impl FormatCategory {
    /// Keys handled for this category, in application order.
    pub fn keys(self) -> &'static [FormatKey] {
        match self {
            FormatCategory::Segment => &[
                SuperOrSubScript,
                Strike,
                FontFamily,
                FontSize,
                Underline,
                Italic,
                Bold,
                TextColor,
                BackgroundColor,
                LetterSpacing,
                LineHeight,
            ],
            FormatCategory::SegmentOnBlock => &[
                FontFamily,
                FontSize,
                Underline,
                Italic,
                Bold,
                TextColor,
            ],
            FormatCategory::Block => &[
                BackgroundColor,
                Direction,
                TextAlign,
                Margin,
                Padding,
                LineHeight,
                WhiteSpace,
                TextIndent,
                Border,
            ],
            FormatCategory::Container => &[
                BackgroundColor,
                Direction,
                TextAlign,
                Margin,
                Padding,
                LineHeight,
                WhiteSpace,
                TextIndent,
                Border,
                BorderBox,
                Size,
                Id,
                Display,
            ],
            FormatCategory::Table => &[
                Id,
                Border,
                BorderBox,
                Display,
                Margin,
                BackgroundColor,
                Size,
                TableLayout,
                Direction,
            ],
            FormatCategory::TableRow => &[BackgroundColor],
            FormatCategory::TableCell => &[
                Border,
                BorderBox,
                BackgroundColor,
                Padding,
                Direction,
                TextAlign,
                VerticalAlign,
                WordBreak,
            ],
            FormatCategory::Image => &[
                Id,
                Size,
                Margin,
                Padding,
                Border,
                BorderBox,
                Display,
                Float,
            ],
            FormatCategory::Link => &[Link, TextColor, BackgroundColor],
            FormatCategory::Code => &[FontFamily],
            FormatCategory::ListLevel => &[Direction, TextAlign, Margin, Padding, ListStyleType],
            FormatCategory::ListItem => &[Direction, TextAlign, LineHeight, Margin],
            FormatCategory::Divider => &[Display, Size, Margin, Padding, Border, BorderBox],
        }
    }
}

pub fn default_parser(key: FormatKey) -> FormatParser {
    match key {
        Direction => block::parse_direction,
        TextAlign => block::parse_text_align,
        Margin => block::parse_margin,
        Padding => block::parse_padding,
        Border => block::parse_border,
        BorderBox => block::parse_border_box,
        BackgroundColor => segment::parse_background_color,
        TextColor => segment::parse_text_color,
        FontFamily => segment::parse_font_family,
        FontSize => segment::parse_font_size,
        Bold => segment::parse_bold,
        Italic => segment::parse_italic,
        Underline => segment::parse_underline,
        Strike => segment::parse_strike,
        SuperOrSubScript => segment::parse_super_or_sub_script,
        LineHeight => segment::parse_line_height,
        LetterSpacing => segment::parse_letter_spacing,
        WhiteSpace => block::parse_white_space,
        Display => block::parse_display,
        Float => block::parse_float,
        Size => block::parse_size,
        VerticalAlign => block::parse_vertical_align,
        TableLayout => block::parse_table_layout,
        Link => segment::parse_link,
        ListStyleType => block::parse_list_style_type,
        Id => block::parse_id,
        WordBreak => block::parse_word_break,
        TextIndent => block::parse_text_indent,
    }
}

pub fn default_applier(key: FormatKey) -> FormatApplier {
    match key {
        Direction => block::apply_direction,
        TextAlign => block::apply_text_align,
        Margin => block::apply_margin,
        Padding => block::apply_padding,
        Border => block::apply_border,
        BorderBox => block::apply_border_box,
        BackgroundColor => segment::apply_background_color,
        TextColor => segment::apply_text_color,
        FontFamily => segment::apply_font_family,
        FontSize => segment::apply_font_size,
        Bold => segment::apply_bold,
        Italic => segment::apply_italic,
        Underline => segment::apply_underline,
        Strike => segment::apply_strike,
        SuperOrSubScript => segment::apply_super_or_sub_script,
        LineHeight => segment::apply_line_height,
        LetterSpacing => segment::apply_letter_spacing,
        WhiteSpace => block::apply_white_space,
        Display => block::apply_display,
        Float => block::apply_float,
        Size => block::apply_size,
        VerticalAlign => block::apply_vertical_align,
        TableLayout => block::apply_table_layout,
        Link => segment::apply_link,
        ListStyleType => block::apply_list_style_type,
        Id => block::apply_id,
        WordBreak => block::apply_word_break,
        TextIndent => block::apply_text_indent,
    }
}

/// Parser registry used by DOM to model conversion.
#[derive(Clone, Debug, Default)]
pub struct FormatParsers {
    /// Replacement parser per key; `None` disables the key.
    pub overrides: HashMap<FormatKey, Option<FormatParser>>,
    /// Extra parsers run after the built-in keys of a category.
    pub additional: HashMap<FormatCategory, Vec<FormatParser>>,
}

impl FormatParsers {
    pub fn parse(&self, category: FormatCategory, format: &mut Format, dom: &Dom, element: NodeId) {
        for key in category.keys() {
            let parser = match self.overrides.get(key) {
                Some(Some(parser)) => *parser,
                Some(None) => continue,
                None => default_parser(*key),
            };
            parser(format, dom, element);
        }
        for parser in self.additional.get(&category).into_iter().flatten() {
            parser(format, dom, element);
        }
    }
}

/// Applier registry used by model to DOM rendering.
#[derive(Clone, Debug, Default)]
pub struct FormatAppliers {
    /// Replacement applier per key; `None` disables the key.
    pub overrides: HashMap<FormatKey, Option<FormatApplier>>,
    /// Extra appliers run after the built-in keys of a category.
    pub additional: HashMap<FormatCategory, Vec<FormatApplier>>,
}

impl FormatAppliers {
    pub fn apply(
        &self,
        category: FormatCategory,
        format: &Format,
        dom: &mut Dom,
        element: NodeId,
        context: &ModelToDomContext,
    ) {
        for key in category.keys() {
            let applier = match self.overrides.get(key) {
                Some(Some(applier)) => *applier,
                Some(None) => continue,
                None => default_applier(*key),
            };
            applier(format, dom, element, context);
        }
        for applier in self.additional.get(&category).into_iter().flatten() {
            applier(format, dom, element, context);
        }
    }
}

/// Mirror a dataset onto `data-*` attributes.
pub fn apply_dataset(dataset: &DatasetFormat, dom: &mut Dom, element: NodeId) {
    for (key, value) in dataset {
        dom.set_data(element, key, value.as_str());
    }
}

pub fn parse_dataset(dom: &Dom, element: NodeId) -> DatasetFormat {
    dom.dataset(element)
}

/// Inline format implied by a tag before its own styles are read.
pub fn default_format_for_tag(tag: &str) -> Format {
    let mut format = Format::default();
    match tag {
        "b" | "strong" => format.font_weight = Some("bold".into()),
        "i" | "em" => format.italic = Some(true),
        "u" => format.underline = Some(true),
        "s" | "strike" | "del" => format.strikethrough = Some(true),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            format.font_weight = Some("bold".into());
            format.font_size = heading_font_size(tag).map(str::to_string);
        }
        _ => {}
    }
    format
}

fn heading_font_size(tag: &str) -> Option<&'static str> {
    Some(match tag {
        "h1" => "2em",
        "h2" => "1.5em",
        "h3" => "1.17em",
        "h4" => "1em",
        "h5" => "0.83em",
        "h6" => "0.67em",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_red(format: &mut Format, _: &Dom, _: NodeId) {
        format.text_color = Some("red".into());
    }

    #[test]
    fn test_disabled_key_is_not_parsed() {
        let mut dom = Dom::new();
        let span = dom.create_element("span");
        dom.set_style(span, "font-size", "12px");

        let mut parsers = FormatParsers::default();
        parsers.overrides.insert(FontSize, None);
        let mut format = Format::default();
        parsers.parse(FormatCategory::Segment, &mut format, &dom, span);

        assert_eq!(format.font_size, None);
    }

    #[test]
    fn test_additional_parser_runs() {
        let mut dom = Dom::new();
        let span = dom.create_element("span");

        let mut parsers = FormatParsers::default();
        parsers
            .additional
            .insert(FormatCategory::Segment, vec![parse_red as FormatParser]);
        let mut format = Format::default();
        parsers.parse(FormatCategory::Segment, &mut format, &dom, span);

        assert_eq!(format.text_color.as_deref(), Some("red"));
    }

    #[test]
    fn test_heading_defaults() {
        let format = default_format_for_tag("h2");
        assert_eq!(format.font_size.as_deref(), Some("1.5em"));
        assert!(format.is_bold());
    }
}
