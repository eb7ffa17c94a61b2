//! Inline `style` attribute parsing and serialization.

use smol_str::SmolStr;

/// Parse `a: b; c: d` into ordered declarations. Malformed entries are skipped.
pub fn parse_style(value: &str) -> Vec<(SmolStr, String)> {
    value
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((SmolStr::new(name.to_ascii_lowercase()), value.to_string()))
        })
        .collect()
}

pub fn serialize_style(declarations: &[(SmolStr, String)]) -> String {
    declarations
        .iter()
        .map(|(k, v)| format!("{k}: {v};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Expand a 1-4 value box shorthand (`margin: 1px 2px`) into top/right/bottom/left.
pub fn expand_box_shorthand(value: &str) -> Option<[String; 4]> {
    let parts = split_css_values(value);
    let [top, right, bottom, left] = match parts.as_slice() {
        [all] => [all, all, all, all],
        [v, h] => [v, h, v, h],
        [t, h, b] => [t, h, b, h],
        [t, r, b, l] => [t, r, b, l],
        _ => return None,
    };
    Some([top.clone(), right.clone(), bottom.clone(), left.clone()])
}

/// Split a CSS value on whitespace, keeping parenthesized groups such as
/// `rgb(1, 2, 3)` intact.
pub fn split_css_values(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in value.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Parse a `px` length (a bare number is accepted as pixels).
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style_skips_malformed() {
        let decls = parse_style("color: red; bogus; ; Font-Size : 12px");
        assert_eq!(
            decls,
            vec![
                (SmolStr::new("color"), "red".to_string()),
                (SmolStr::new("font-size"), "12px".to_string()),
            ]
        );
    }

    #[test]
    fn test_expand_box_shorthand() {
        assert_eq!(
            expand_box_shorthand("1px 2px 3px").map(|v| v.to_vec()),
            Some(vec!["1px".into(), "2px".into(), "3px".into(), "2px".into()])
        );
        assert_eq!(expand_box_shorthand(""), None);
    }

    #[test]
    fn test_split_keeps_functions() {
        assert_eq!(
            split_css_values("1px solid rgb(1, 2, 3)"),
            vec!["1px", "solid", "rgb(1, 2, 3)"]
        );
    }

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("120px"), Some(120.0));
        assert_eq!(parse_px("12.5"), Some(12.5));
        assert_eq!(parse_px("auto"), None);
    }
}
