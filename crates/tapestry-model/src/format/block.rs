//! Block, container and table format handlers.

use tapestry_dom::{Dom, NodeId, expand_box_shorthand};

use crate::model::{Direction, Format, TextAlign, VerticalAlign};
use crate::model_to_dom::ModelToDomContext;

/// Parser/applier pair for a format field mirrored 1:1 to a CSS property.
macro_rules! style_handler {
    ($parse:ident, $apply:ident, $field:ident, $css:literal) => {
        pub fn $parse(format: &mut Format, dom: &Dom, element: NodeId) {
            if let Some(value) = dom.style(element, $css) {
                format.$field = Some(value.trim().to_string());
            }
        }

        pub fn $apply(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
            if let Some(value) = &format.$field {
                dom.set_style(element, $css, value);
            }
        }
    };
}

style_handler!(parse_white_space, apply_white_space, white_space, "white-space");
style_handler!(parse_display, apply_display, display, "display");
style_handler!(parse_float, apply_float, float, "float");
style_handler!(parse_word_break, apply_word_break, word_break, "word-break");
style_handler!(parse_text_indent, apply_text_indent, text_indent, "text-indent");
style_handler!(parse_list_style_type, apply_list_style_type, list_style_type, "list-style-type");

pub fn parse_direction(format: &mut Format, dom: &Dom, element: NodeId) {
    let value = dom
        .style(element, "direction")
        .or_else(|| dom.attribute(element, "dir"));
    match value.map(str::trim) {
        Some("rtl") => format.direction = Some(Direction::Rtl),
        Some("ltr") => format.direction = Some(Direction::Ltr),
        _ => {}
    }
}

pub fn apply_direction(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    match format.direction {
        Some(Direction::Rtl) => dom.set_style(element, "direction", "rtl"),
        Some(Direction::Ltr) => dom.set_style(element, "direction", "ltr"),
        None => {}
    }
}

/// Physical `left`/`right` become logical `start`/`end` under the element's direction.
pub fn parse_text_align(format: &mut Format, dom: &Dom, element: NodeId) {
    let value = dom
        .style(element, "text-align")
        .or_else(|| dom.attribute(element, "align"));
    let is_rtl = format.direction == Some(Direction::Rtl);
    let align = match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("left") if is_rtl => TextAlign::End,
        Some("left") => TextAlign::Start,
        Some("right") if is_rtl => TextAlign::Start,
        Some("right") => TextAlign::End,
        Some("start") => TextAlign::Start,
        Some("end") => TextAlign::End,
        Some("center") => TextAlign::Center,
        Some("justify") => TextAlign::Justify,
        _ => return,
    };
    format.text_align = Some(align);
}

pub fn apply_text_align(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    let Some(align) = format.text_align else {
        return;
    };
    let is_rtl = format.direction == Some(Direction::Rtl);
    let value = match align {
        TextAlign::Start if is_rtl => "right",
        TextAlign::Start => "left",
        TextAlign::End if is_rtl => "left",
        TextAlign::End => "right",
        TextAlign::Center => "center",
        TextAlign::Justify => "justify",
    };
    dom.set_style(element, "text-align", value);
}

fn box_fields<'a>(format: &'a mut Format, property: &str) -> [&'a mut Option<String>; 4] {
    if property == "margin" {
        [
            &mut format.margin_top,
            &mut format.margin_right,
            &mut format.margin_bottom,
            &mut format.margin_left,
        ]
    } else {
        [
            &mut format.padding_top,
            &mut format.padding_right,
            &mut format.padding_bottom,
            &mut format.padding_left,
        ]
    }
}

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

fn parse_box(format: &mut Format, dom: &Dom, element: NodeId, property: &str) {
    let shorthand = dom.style(element, property).and_then(expand_box_shorthand);
    let longhands = SIDES.map(|side| dom.style(element, &format!("{property}-{side}")));
    let fields = box_fields(format, property);
    for (index, field) in fields.into_iter().enumerate() {
        if let Some(value) = longhands[index] {
            *field = Some(value.trim().to_string());
        } else if let Some(values) = &shorthand {
            *field = Some(values[index].clone());
        }
    }
}

fn apply_box(format: &Format, dom: &mut Dom, element: NodeId, property: &str) {
    let values = if property == "margin" {
        [&format.margin_top, &format.margin_right, &format.margin_bottom, &format.margin_left]
    } else {
        [&format.padding_top, &format.padding_right, &format.padding_bottom, &format.padding_left]
    };
    for (side, value) in SIDES.iter().zip(values) {
        if let Some(value) = value {
            dom.set_style(element, &format!("{property}-{side}"), value);
        }
    }
}

pub fn parse_margin(format: &mut Format, dom: &Dom, element: NodeId) {
    parse_box(format, dom, element, "margin");
}

pub fn apply_margin(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    apply_box(format, dom, element, "margin");
}

pub fn parse_padding(format: &mut Format, dom: &Dom, element: NodeId) {
    parse_box(format, dom, element, "padding");
}

pub fn apply_padding(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    apply_box(format, dom, element, "padding");
}

/// `border` sets all four sides; `border-<side>` overrides one.
pub fn parse_border(format: &mut Format, dom: &Dom, element: NodeId) {
    let all = dom.style(element, "border").map(|v| v.trim().to_string());
    let sides = SIDES.map(|side| dom.style(element, &format!("border-{side}")).map(|v| v.trim().to_string()));
    let [top, right, bottom, left] = sides;
    for (field, side) in [
        (&mut format.border_top, top),
        (&mut format.border_right, right),
        (&mut format.border_bottom, bottom),
        (&mut format.border_left, left),
    ] {
        if let Some(value) = side.or_else(|| all.clone()) {
            *field = Some(value);
        }
    }
}

pub fn apply_border(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    let values = [
        &format.border_top,
        &format.border_right,
        &format.border_bottom,
        &format.border_left,
    ];
    for (side, value) in SIDES.iter().zip(values) {
        if let Some(value) = value {
            dom.set_style(element, &format!("border-{side}"), value);
        }
    }
}

pub fn parse_border_box(format: &mut Format, dom: &Dom, element: NodeId) {
    if dom.style(element, "box-sizing") == Some("border-box") {
        format.use_border_box = Some(true);
    }
}

pub fn apply_border_box(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    if format.use_border_box == Some(true) {
        dom.set_style(element, "box-sizing", "border-box");
    }
}

/// A bare number in a `width`/`height` attribute is in pixels.
fn size_attribute(dom: &Dom, element: NodeId, name: &str) -> Option<String> {
    let value = dom.attribute(element, name)?.trim();
    if value.is_empty() {
        return None;
    }
    Some(if value.parse::<f64>().is_ok() {
        format!("{value}px")
    } else {
        value.to_string()
    })
}

pub fn parse_size(format: &mut Format, dom: &Dom, element: NodeId) {
    if let Some(width) = dom
        .style(element, "width")
        .map(|v| v.trim().to_string())
        .or_else(|| size_attribute(dom, element, "width"))
    {
        format.width = Some(width);
    }
    if let Some(height) = dom
        .style(element, "height")
        .map(|v| v.trim().to_string())
        .or_else(|| size_attribute(dom, element, "height"))
    {
        format.height = Some(height);
    }
    if let Some(max_width) = dom.style(element, "max-width") {
        format.max_width = Some(max_width.trim().to_string());
    }
}

pub fn apply_size(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    if let Some(width) = &format.width {
        dom.set_style(element, "width", width);
    }
    if let Some(height) = &format.height {
        dom.set_style(element, "height", height);
    }
    if let Some(max_width) = &format.max_width {
        dom.set_style(element, "max-width", max_width);
    }
}

pub fn parse_vertical_align(format: &mut Format, dom: &Dom, element: NodeId) {
    let value = dom
        .style(element, "vertical-align")
        .or_else(|| dom.attribute(element, "valign"));
    if let Some(align) = value.and_then(VerticalAlign::from_css) {
        format.vertical_align = Some(align);
    }
}

pub fn apply_vertical_align(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    if let Some(align) = format.vertical_align {
        dom.set_style(element, "vertical-align", align.as_css());
    }
}

pub fn parse_table_layout(format: &mut Format, dom: &Dom, element: NodeId) {
    match dom.style(element, "border-collapse") {
        Some("collapse") => format.border_collapse = Some(true),
        Some("separate") => format.border_collapse = Some(false),
        _ => {}
    }
    if let Some(layout) = dom.style(element, "table-layout") {
        format.table_layout = Some(layout.trim().to_string());
    }
}

pub fn apply_table_layout(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    match format.border_collapse {
        Some(true) => dom.set_style(element, "border-collapse", "collapse"),
        Some(false) => dom.set_style(element, "border-collapse", "separate"),
        None => {}
    }
    if let Some(layout) = &format.table_layout {
        dom.set_style(element, "table-layout", layout);
    }
}

pub fn parse_id(format: &mut Format, dom: &Dom, element: NodeId) {
    if let Some(id) = dom.attribute(element, "id").filter(|id| !id.is_empty()) {
        format.id = Some(id.to_string());
    }
}

pub fn apply_id(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    if let Some(id) = &format.id {
        dom.set_attribute(element, "id", id.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_longhand_overrides_shorthand() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.set_attribute(div, "style", "margin: 1px 2px; margin-left: 40px");

        let mut format = Format::default();
        parse_margin(&mut format, &dom, div);

        assert_eq!(format.margin_top.as_deref(), Some("1px"));
        assert_eq!(format.margin_right.as_deref(), Some("2px"));
        assert_eq!(format.margin_bottom.as_deref(), Some("1px"));
        assert_eq!(format.margin_left.as_deref(), Some("40px"));
    }

    #[test]
    fn test_padding_leaves_margin_alone() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.set_attribute(div, "style", "padding: 1px 2px 3px 4px");

        let mut format = Format::default();
        parse_padding(&mut format, &dom, div);

        let padding = [
            format.padding_top.as_deref(),
            format.padding_right.as_deref(),
            format.padding_bottom.as_deref(),
            format.padding_left.as_deref(),
        ];
        assert_eq!(padding, [Some("1px"), Some("2px"), Some("3px"), Some("4px")]);
        assert_eq!(format.margin_top, None);
    }

    #[test]
    fn test_rtl_text_align_is_logical() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.set_attribute(div, "dir", "rtl");
        dom.set_style(div, "text-align", "right");

        let mut format = Format::default();
        parse_direction(&mut format, &dom, div);
        parse_text_align(&mut format, &dom, div);

        assert_eq!(format.text_align, Some(TextAlign::Start));
    }

    #[test]
    fn test_apply_border_sides() {
        let mut dom = Dom::new();
        let td = dom.create_element("td");
        let format = Format {
            border_top: Some("1px solid red".into()),
            border_left: Some("none".into()),
            ..Default::default()
        };
        apply_border(&format, &mut dom, td, &ModelToDomContext::default());

        insta::assert_snapshot!(
            dom.outer_html(td),
            @r#"<td style="border-top: 1px solid red; border-left: none;"></td>"#
        );
    }

    #[test]
    fn test_numeric_size_attribute_is_pixels() {
        let mut dom = Dom::new();
        let img = dom.create_element("img");
        dom.set_attribute(img, "width", "120");

        let mut format = Format::default();
        parse_size(&mut format, &dom, img);

        assert_eq!(format.width.as_deref(), Some("120px"));
    }
}
