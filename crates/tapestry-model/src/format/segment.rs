//! Inline format handlers.
//!
//! On a segment `span`, bold/italic/underline/strike/script are rendered as
//! wrapper tags around the span's children; on any other element they become
//! inline styles. Values equal to the context's implicit format are skipped.

use tapestry_dom::{Dom, NodeId};

use crate::model::Format;
use crate::model_to_dom::ModelToDomContext;

fn set_if_present(target: &mut Option<String>, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        *target = Some(value.to_string());
    }
}

fn is_segment_span(dom: &Dom, element: NodeId) -> bool {
    dom.is_tag(element, "span")
}

pub fn parse_font_family(format: &mut Format, dom: &Dom, element: NodeId) {
    let value = dom
        .style(element, "font-family")
        .or_else(|| dom.is_tag(element, "font").then(|| dom.attribute(element, "face")).flatten());
    set_if_present(&mut format.font_family, value);
}

pub fn apply_font_family(format: &Format, dom: &mut Dom, element: NodeId, context: &ModelToDomContext) {
    if let Some(value) = &format.font_family
        && context.implicit_format.font_family.as_ref() != Some(value)
    {
        dom.set_style(element, "font-family", value);
    }
}

pub fn parse_font_size(format: &mut Format, dom: &Dom, element: NodeId) {
    set_if_present(&mut format.font_size, dom.style(element, "font-size"));
}

pub fn apply_font_size(format: &Format, dom: &mut Dom, element: NodeId, context: &ModelToDomContext) {
    if let Some(value) = &format.font_size
        && context.implicit_format.font_size.as_ref() != Some(value)
    {
        dom.set_style(element, "font-size", value);
    }
}

pub fn parse_text_color(format: &mut Format, dom: &Dom, element: NodeId) {
    let value = dom
        .style(element, "color")
        .or_else(|| dom.is_tag(element, "font").then(|| dom.attribute(element, "color")).flatten());
    set_if_present(&mut format.text_color, value);
}

pub fn apply_text_color(format: &Format, dom: &mut Dom, element: NodeId, context: &ModelToDomContext) {
    if let Some(value) = &format.text_color
        && context.implicit_format.text_color.as_ref() != Some(value)
    {
        dom.set_style(element, "color", value);
    }
}

pub fn parse_background_color(format: &mut Format, dom: &Dom, element: NodeId) {
    let value = dom
        .style(element, "background-color")
        .or_else(|| dom.attribute(element, "bgcolor"));
    set_if_present(&mut format.background_color, value);
}

pub fn apply_background_color(format: &Format, dom: &mut Dom, element: NodeId, context: &ModelToDomContext) {
    if let Some(value) = &format.background_color
        && context.implicit_format.background_color.as_ref() != Some(value)
    {
        dom.set_style(element, "background-color", value);
    }
}

pub fn parse_line_height(format: &mut Format, dom: &Dom, element: NodeId) {
    set_if_present(&mut format.line_height, dom.style(element, "line-height"));
}

pub fn apply_line_height(format: &Format, dom: &mut Dom, element: NodeId, context: &ModelToDomContext) {
    if let Some(value) = &format.line_height
        && context.implicit_format.line_height.as_ref() != Some(value)
    {
        dom.set_style(element, "line-height", value);
    }
}

pub fn parse_letter_spacing(format: &mut Format, dom: &Dom, element: NodeId) {
    set_if_present(&mut format.letter_spacing, dom.style(element, "letter-spacing"));
}

pub fn apply_letter_spacing(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    if let Some(value) = &format.letter_spacing {
        dom.set_style(element, "letter-spacing", value);
    }
}

pub fn parse_bold(format: &mut Format, dom: &Dom, element: NodeId) {
    set_if_present(&mut format.font_weight, dom.style(element, "font-weight"));
}

pub fn apply_bold(format: &Format, dom: &mut Dom, element: NodeId, context: &ModelToDomContext) {
    let Some(weight) = &format.font_weight else {
        return;
    };
    let implicit = context.implicit_format.font_weight.as_deref();
    if implicit == Some(weight.as_str()) {
        return;
    }
    if implicit.is_none() && weight == "normal" {
        return;
    }
    if format.is_bold() && is_segment_span(dom, element) {
        dom.wrap_all_children(element, "b");
    } else {
        dom.set_style(element, "font-weight", weight);
    }
}

pub fn parse_italic(format: &mut Format, dom: &Dom, element: NodeId) {
    match dom.style(element, "font-style") {
        Some("italic") | Some("oblique") => format.italic = Some(true),
        Some("normal") => format.italic = Some(false),
        _ => {}
    }
}

pub fn apply_italic(format: &Format, dom: &mut Dom, element: NodeId, context: &ModelToDomContext) {
    let implicit = context.implicit_format.italic.unwrap_or(false);
    match format.italic {
        Some(true) if !implicit => {
            if is_segment_span(dom, element) {
                dom.wrap_all_children(element, "i");
            } else {
                dom.set_style(element, "font-style", "italic");
            }
        }
        Some(false) if implicit => dom.set_style(element, "font-style", "normal"),
        _ => {}
    }
}

fn text_decoration_has(dom: &Dom, element: NodeId, value: &str) -> Option<bool> {
    let decoration = dom
        .style(element, "text-decoration-line")
        .or_else(|| dom.style(element, "text-decoration"))?;
    if decoration == "none" {
        return Some(false);
    }
    decoration.split_ascii_whitespace().any(|d| d == value).then_some(true)
}

fn apply_decoration(
    value: Option<bool>,
    implicit: Option<bool>,
    dom: &mut Dom,
    element: NodeId,
    tag: &str,
    css: &str,
) {
    let implicit = implicit.unwrap_or(false);
    match value {
        Some(true) if !implicit => {
            if is_segment_span(dom, element) {
                dom.wrap_all_children(element, tag);
            } else {
                let combined = match dom.style(element, "text-decoration") {
                    Some(existing) if existing != "none" => format!("{existing} {css}"),
                    _ => css.to_string(),
                };
                dom.set_style(element, "text-decoration", &combined);
            }
        }
        Some(false) if implicit => dom.set_style(element, "text-decoration", "none"),
        _ => {}
    }
}

pub fn parse_underline(format: &mut Format, dom: &Dom, element: NodeId) {
    if let Some(value) = text_decoration_has(dom, element, "underline") {
        format.underline = Some(value);
    }
}

pub fn apply_underline(format: &Format, dom: &mut Dom, element: NodeId, context: &ModelToDomContext) {
    apply_decoration(
        format.underline,
        context.implicit_format.underline,
        dom,
        element,
        "u",
        "underline",
    );
}

pub fn parse_strike(format: &mut Format, dom: &Dom, element: NodeId) {
    if let Some(value) = text_decoration_has(dom, element, "line-through") {
        format.strikethrough = Some(value);
    }
}

pub fn apply_strike(format: &Format, dom: &mut Dom, element: NodeId, context: &ModelToDomContext) {
    apply_decoration(
        format.strikethrough,
        context.implicit_format.strikethrough,
        dom,
        element,
        "s",
        "line-through",
    );
}

/// `sup`/`sub` tags and `vertical-align: super|sub` append to the sequence.
pub fn parse_super_or_sub_script(format: &mut Format, dom: &Dom, element: NodeId) {
    let value = match dom.style(element, "vertical-align") {
        Some(v @ ("super" | "sub")) => v,
        _ if dom.is_tag(element, "sup") => "super",
        _ if dom.is_tag(element, "sub") => "sub",
        _ => return,
    };
    let mut sequence: Vec<&str> = format
        .super_or_sub_script_sequence
        .as_deref()
        .map(|s| s.split_ascii_whitespace().collect())
        .unwrap_or_default();
    sequence.push(value);
    format.super_or_sub_script_sequence = Some(sequence.join(" "));
}

pub fn apply_super_or_sub_script(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    let Some(sequence) = &format.super_or_sub_script_sequence else {
        return;
    };
    if !is_segment_span(dom, element) {
        return;
    }
    // Innermost first, so the first token ends up outermost.
    for token in sequence.split_ascii_whitespace().rev() {
        match token {
            "super" => {
                dom.wrap_all_children(element, "sup");
            }
            "sub" => {
                dom.wrap_all_children(element, "sub");
            }
            _ => {}
        }
    }
}

pub fn parse_link(format: &mut Format, dom: &Dom, element: NodeId) {
    if !dom.is_tag(element, "a") {
        return;
    }
    set_if_present(&mut format.href, dom.attribute(element, "href"));
    set_if_present(&mut format.target, dom.attribute(element, "target"));
    set_if_present(&mut format.anchor_title, dom.attribute(element, "title"));
    set_if_present(&mut format.rel, dom.attribute(element, "rel"));
}

pub fn apply_link(format: &Format, dom: &mut Dom, element: NodeId, _: &ModelToDomContext) {
    if !dom.is_tag(element, "a") {
        return;
    }
    let attributes = [
        ("href", &format.href),
        ("target", &format.target),
        ("title", &format.anchor_title),
        ("rel", &format.rel),
    ];
    for (name, value) in attributes {
        if let Some(value) = value {
            dom.set_attribute(element, name, value.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormatAppliers, FormatCategory, FormatParsers};

    #[test]
    fn test_parse_text_decorations() {
        let mut dom = Dom::new();
        let span = dom.create_element("span");
        dom.set_style(span, "text-decoration", "underline line-through");

        let mut format = Format::default();
        FormatParsers::default().parse(FormatCategory::Segment, &mut format, &dom, span);

        assert_eq!(format.underline, Some(true));
        assert_eq!(format.strikethrough, Some(true));
    }

    #[test]
    fn test_nested_script_sequence() {
        let mut dom = Dom::new();
        let sup = dom.create_element("sup");
        let sub = dom.create_element("sub");

        let mut format = Format::default();
        parse_super_or_sub_script(&mut format, &dom, sup);
        parse_super_or_sub_script(&mut format, &dom, sub);

        assert_eq!(format.super_or_sub_script_sequence.as_deref(), Some("super sub"));
    }

    #[test]
    fn test_apply_wraps_span_children() {
        let mut dom = Dom::new();
        let span = dom.create_element("span");
        let text = dom.create_text("x");
        dom.append_child(span, text);

        let format = Format {
            font_weight: Some("bold".into()),
            italic: Some(true),
            super_or_sub_script_sequence: Some("super".into()),
            text_color: Some("red".into()),
            ..Default::default()
        };
        let context = ModelToDomContext::default();
        FormatAppliers::default().apply(FormatCategory::Segment, &format, &mut dom, span, &context);

        insta::assert_snapshot!(
            dom.outer_html(span),
            @r#"<span style="color: red;"><b><i><sup>x</sup></i></b></span>"#
        );
    }

    #[test]
    fn test_implicit_bold_is_not_repeated() {
        let mut dom = Dom::new();
        let span = dom.create_element("span");
        let format = Format {
            font_weight: Some("bold".into()),
            ..Default::default()
        };
        let mut context = ModelToDomContext::default();
        context.implicit_format.font_weight = Some("bold".into());
        apply_bold(&format, &mut dom, span, &context);

        assert_eq!(dom.outer_html(span), "<span></span>");
    }
}
