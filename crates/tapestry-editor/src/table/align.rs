//! Table placement, cell alignment and cell shading.

use serde::{Deserialize, Serialize};
use tapestry_model::metadata::TableCellMetadataFormat;
use tapestry_model::{
    ContentModelBlock, ContentModelTable, ContentModelTableCell, TextAlign, VerticalAlign,
    update_metadata,
};

use super::{get_selected_cells, invalidate_cell};

/// Where the table sits in its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableAlignment {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Background lightness (HSL, 0-100) below which text turns white.
const DARK_LIGHTNESS: f64 = 20.0;
/// Background lightness (HSL, 0-100) above which text turns black.
const BRIGHT_LIGHTNESS: f64 = 80.0;

pub fn align_table(table: &mut ContentModelTable, alignment: TableAlignment) {
    let auto = || Some("auto".to_string());
    let (left, right) = match alignment {
        TableAlignment::Left => (None, auto()),
        TableAlignment::Center => (auto(), auto()),
        TableAlignment::Right => (auto(), None),
    };
    table.format.margin_left = left;
    table.format.margin_right = right;
    table.cached_element = None;
}

/// Align the content of every selected cell.
///
/// Horizontal alignment replaces any alignment set on paragraphs inside the
/// cell. Vertical alignment is recorded as a manual override so table
/// formatting keeps it.
pub fn align_table_cell(table: &mut ContentModelTable, alignment: CellAlignment) {
    let Some(sel) = get_selected_cells(table) else {
        return;
    };
    for row in &mut table.rows[sel.first_row..=sel.last_row] {
        for cell in row.cells.iter_mut().take(sel.last_column + 1).skip(sel.first_column) {
            if cell.is_placeholder() {
                continue;
            }
            match alignment {
                CellAlignment::Left | CellAlignment::Center | CellAlignment::Right => {
                    cell.format.text_align = Some(match alignment {
                        CellAlignment::Left => TextAlign::Start,
                        CellAlignment::Center => TextAlign::Center,
                        _ => TextAlign::End,
                    });
                    for block in &mut cell.blocks {
                        if let ContentModelBlock::Paragraph(paragraph) = block
                            && paragraph.format.text_align.take().is_some()
                        {
                            paragraph.cached_element = None;
                        }
                    }
                }
                CellAlignment::Top | CellAlignment::Middle | CellAlignment::Bottom => {
                    cell.format.vertical_align = Some(match alignment {
                        CellAlignment::Top => VerticalAlign::Top,
                        CellAlignment::Middle => VerticalAlign::Middle,
                        _ => VerticalAlign::Bottom,
                    });
                    update_metadata::<TableCellMetadataFormat, _>(&mut cell.dataset, |meta| {
                        let mut meta = meta.unwrap_or_default();
                        meta.v_align_override = true;
                        Some(meta)
                    });
                }
            }
            invalidate_cell(cell);
        }
    }
    tracing::debug!(target: "tapestry::table", ?alignment, "aligned cells");
}

/// Set or clear the background of a cell.
///
/// A background picks a readable text color: white on dark colors, black on
/// bright ones, inherited otherwise. `is_override` marks the color as manual
/// so table formatting does not repaint it.
pub fn set_table_cell_shade(cell: &mut ContentModelTableCell, color: Option<&str>, is_override: bool) {
    match color {
        Some(color) => {
            cell.format.background_color = Some(color.to_string());
            if is_override {
                update_metadata::<TableCellMetadataFormat, _>(&mut cell.dataset, |meta| {
                    let mut meta = meta.unwrap_or_default();
                    meta.bg_color_override = true;
                    Some(meta)
                });
            }
            cell.format.text_color = match color_lightness(color) {
                Some(l) if l < DARK_LIGHTNESS => Some("#ffffff".to_string()),
                Some(l) if l > BRIGHT_LIGHTNESS => Some("#000000".to_string()),
                _ => None,
            };
        }
        None => {
            cell.format.background_color = None;
            cell.format.text_color = None;
        }
    }
    invalidate_cell(cell);
}

/// HSL lightness of a `#rgb`, `#rrggbb`, `#rrggbbaa` or `rgb()`/`rgba()`
/// color, in percent.
fn color_lightness(color: &str) -> Option<f64> {
    let [r, g, b] = parse_rgb(color.trim())?;
    let max = r.max(g).max(b) as f64;
    let min = r.min(g).min(b) as f64;
    Some((max + min) / 2.0 / 255.0 * 100.0)
}

fn parse_rgb(color: &str) -> Option<[u8; 3]> {
    if let Some(hex) = color.strip_prefix('#') {
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        return match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 17;
                }
                Some(out)
            }
            6 | 8 => Some([
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            ]),
            _ => None,
        };
    }
    let lower = color.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<f64>().ok());
    let mut channel = || parts.next().flatten().map(|v| v.clamp(0.0, 255.0) as u8);
    Some([channel()?, channel()?, channel()?])
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use super::*;
    use tapestry_model::get_metadata;

    #[test]
    fn test_align_table_margins() {
        let mut table = grid(1, 1);
        table.cached_element = Some(tapestry_dom::NodeId(1));
        align_table(&mut table, TableAlignment::Center);
        assert_eq!(table.format.margin_left.as_deref(), Some("auto"));
        assert_eq!(table.format.margin_right.as_deref(), Some("auto"));
        assert_eq!(table.cached_element, None);

        align_table(&mut table, TableAlignment::Right);
        assert_eq!(table.format.margin_left.as_deref(), Some("auto"));
        assert_eq!(table.format.margin_right, None);
    }

    #[test]
    fn test_horizontal_alignment_clears_paragraph_alignment() {
        let mut table = grid(2, 2);
        if let Some(ContentModelBlock::Paragraph(p)) = table.rows[0].cells[0].blocks.first_mut() {
            p.format.text_align = Some(TextAlign::Justify);
        }
        select(&mut table, &[(0, 0)]);
        align_table_cell(&mut table, CellAlignment::Center);

        let cell = &table.rows[0].cells[0];
        assert_eq!(cell.format.text_align, Some(TextAlign::Center));
        assert_eq!(cell.blocks[0].format().text_align, None);
        assert_eq!(cell.cached_element, None);
        assert_eq!(table.rows[1].cells[1].format.text_align, None);
    }

    #[test]
    fn test_vertical_alignment_records_override() {
        let mut table = grid(1, 1);
        select(&mut table, &[(0, 0)]);
        align_table_cell(&mut table, CellAlignment::Bottom);

        let cell = &table.rows[0].cells[0];
        assert_eq!(cell.format.vertical_align, Some(VerticalAlign::Bottom));
        let meta = get_metadata::<TableCellMetadataFormat>(&cell.dataset);
        assert!(meta.is_some_and(|m| m.v_align_override));
    }

    #[test]
    fn test_shade_picks_text_color() {
        let mut table = grid(1, 1);
        let cell = &mut table.rows[0].cells[0];

        set_table_cell_shade(cell, Some("#000040"), true);
        assert_eq!(cell.format.text_color.as_deref(), Some("#ffffff"));
        assert!(get_metadata::<TableCellMetadataFormat>(&cell.dataset).is_some_and(|m| m.bg_color_override));

        set_table_cell_shade(cell, Some("rgb(250, 250, 240)"), false);
        assert_eq!(cell.format.text_color.as_deref(), Some("#000000"));

        set_table_cell_shade(cell, Some("#f00"), false);
        assert_eq!(cell.format.text_color, None);

        set_table_cell_shade(cell, None, false);
        assert_eq!(cell.format.background_color, None);
        assert_eq!(cell.cached_element, None);
    }
}
