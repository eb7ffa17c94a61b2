//! Table-wide formatting from [`TableMetadataFormat`].
//!
//! The format is stored in the table's dataset and reapplied to every cell:
//! borders from the preset, banded backgrounds, header row and first column.
//! Cells carrying manual overrides in their own metadata keep them.

use tapestry_model::metadata::{TableBorderFormat, TableCellMetadataFormat, TableMetadataFormat};
use tapestry_model::{ContentModelTable, get_metadata, update_metadata};

use super::align::set_table_cell_shade;
use super::invalidate_cell;

/// Which sides of a cell are drawn transparent under `preset`, in the order
/// top, right, bottom, left.
///
/// The flags say whether the cell sits in the first row, the first column or
/// the last column.
pub fn border_transparency(
    preset: TableBorderFormat,
    first_row: bool,
    first_col: bool,
    last_col: bool,
) -> [bool; 4] {
    const NONE: [bool; 4] = [false; 4];
    const ALL: [bool; 4] = [true; 4];
    const HEADER: [bool; 4] = [true, true, false, true];
    const FIRST_COLUMN: [bool; 4] = [true, false, true, true];

    match preset {
        TableBorderFormat::Default => NONE,
        TableBorderFormat::ListWithSideBorders => [false, !last_col, false, !first_col],
        TableBorderFormat::NoHeaderBorders if first_row => HEADER,
        TableBorderFormat::NoHeaderBorders => NONE,
        TableBorderFormat::NoSideBorders => [false, last_col, false, first_col],
        TableBorderFormat::FirstColumnHeaderExternal
        | TableBorderFormat::EspecialType1
        | TableBorderFormat::EspecialType2 => {
            if first_row {
                HEADER
            } else if first_col {
                FIRST_COLUMN
            } else if preset == TableBorderFormat::EspecialType2 {
                ALL
            } else {
                NONE
            }
        }
        TableBorderFormat::EspecialType3 if first_row => HEADER,
        TableBorderFormat::EspecialType3 => ALL,
        TableBorderFormat::Clear => ALL,
    }
}

fn border(color: Option<&str>, transparent: bool) -> String {
    match color {
        Some(color) if !transparent => format!("1px solid {color}"),
        _ => "1px solid transparent".to_string(),
    }
}

/// Store `format` on the table and restyle every cell from it.
///
/// With no `format` the stored one (or the default) is reapplied. Unless
/// `keep_cell_shade` is set, manually shaded cells lose their shading.
pub fn apply_table_format(
    table: &mut ContentModelTable,
    format: Option<&TableMetadataFormat>,
    keep_cell_shade: bool,
) {
    let applied = update_metadata::<TableMetadataFormat, _>(&mut table.dataset, |current| {
        Some(format.cloned().or(current).unwrap_or_default())
    })
    .unwrap_or_default();

    let column_count = table.column_count();
    for (row_index, row) in table.rows.iter_mut().enumerate() {
        let cell_count = row.cells.len();
        for col in 0..cell_count {
            if row.cells[col].is_placeholder() {
                continue;
            }
            let mut last_col = col;
            while row.cells.get(last_col + 1).is_some_and(|c| c.span_left) {
                last_col += 1;
            }
            let cell = &mut row.cells[col];

            if !keep_cell_shade {
                update_metadata::<TableCellMetadataFormat, _>(&mut cell.dataset, |meta| {
                    meta.map(|mut meta| {
                        meta.bg_color_override = false;
                        meta
                    })
                });
            }
            let overrides = get_metadata::<TableCellMetadataFormat>(&cell.dataset).unwrap_or_default();

            if !overrides.border_override {
                let transparent = border_transparency(
                    applied.table_border_format,
                    row_index == 0,
                    col == 0,
                    last_col + 1 >= column_count,
                );
                let colors = [
                    applied.top_border_color.as_deref(),
                    applied.vertical_border_color.as_deref(),
                    applied.bottom_border_color.as_deref(),
                    applied.vertical_border_color.as_deref(),
                ];
                let [top, right, bottom, left] =
                    std::array::from_fn(|side| border(colors[side], transparent[side]));
                cell.format.border_top = Some(top);
                cell.format.border_right = Some(right);
                cell.format.border_bottom = Some(bottom);
                cell.format.border_left = Some(left);
            }

            let is_header_row = applied.has_header_row && row_index == 0;
            let is_first_column = applied.has_first_column && col == 0;
            cell.is_header = is_header_row || is_first_column;

            if !overrides.bg_color_override {
                let color = if is_header_row {
                    applied.header_row_color.as_deref()
                } else if is_first_column {
                    None
                } else if (applied.has_banded_rows && row_index % 2 == 1)
                    || (applied.has_banded_columns && col % 2 == 1)
                {
                    applied.bg_color_odd.as_deref()
                } else {
                    applied.bg_color_even.as_deref()
                };
                set_table_cell_shade(cell, color, false);
            }
            invalidate_cell(cell);
        }
    }
    table.cached_element = None;
    tracing::debug!(
        target: "tapestry::table",
        preset = ?applied.table_border_format,
        keep_cell_shade,
        "applied table format"
    );
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use super::*;

    #[test]
    fn test_presets() {
        use TableBorderFormat::*;
        assert_eq!(border_transparency(Default, true, true, true), [false; 4]);
        assert_eq!(border_transparency(Clear, false, false, false), [true; 4]);
        assert_eq!(
            border_transparency(ListWithSideBorders, false, false, false),
            [false, true, false, true]
        );
        assert_eq!(
            border_transparency(NoSideBorders, false, true, false),
            [false, false, false, true]
        );
        assert_eq!(
            border_transparency(EspecialType1, false, true, false),
            [true, false, true, true]
        );
        assert_eq!(border_transparency(EspecialType2, false, false, true), [true; 4]);
        assert_eq!(
            border_transparency(EspecialType3, true, false, false),
            [true, true, false, true]
        );
    }

    #[test]
    fn test_header_and_bands() {
        let mut table = grid(3, 2);
        let format = TableMetadataFormat {
            has_header_row: true,
            header_row_color: Some("#000000".into()),
            has_banded_rows: true,
            bg_color_odd: Some("#eeeeee".into()),
            bg_color_even: None,
            ..Default::default()
        };
        apply_table_format(&mut table, Some(&format), false);

        let header = &table.rows[0].cells[1];
        assert!(header.is_header);
        assert_eq!(header.format.background_color.as_deref(), Some("#000000"));
        assert_eq!(header.format.text_color.as_deref(), Some("#ffffff"));
        assert_eq!(header.format.border_top.as_deref(), Some("1px solid #ABABAB"));

        assert!(!table.rows[1].cells[0].is_header);
        assert_eq!(table.rows[1].cells[0].format.background_color.as_deref(), Some("#eeeeee"));
        assert_eq!(table.rows[2].cells[0].format.background_color, None);
        assert!(table.rows.iter().flat_map(|r| &r.cells).all(|c| c.cached_element.is_none()));

        assert_eq!(get_metadata::<TableMetadataFormat>(&table.dataset), Some(format));
    }

    #[test]
    fn test_manual_shade_survives_only_when_kept() {
        let mut table = grid(2, 1);
        set_table_cell_shade(&mut table.rows[1].cells[0], Some("#123456"), true);
        let banded = TableMetadataFormat {
            has_banded_rows: true,
            ..Default::default()
        };

        apply_table_format(&mut table, Some(&banded), true);
        assert_eq!(table.rows[1].cells[0].format.background_color.as_deref(), Some("#123456"));

        apply_table_format(&mut table, None, false);
        assert_eq!(table.rows[1].cells[0].format.background_color.as_deref(), Some("#ABABAB20"));
    }

    #[test]
    fn test_wide_cell_counts_as_last_column() {
        let mut table = grid(1, 2);
        table.rows[0].cells[1].span_left = true;
        let format = TableMetadataFormat {
            table_border_format: TableBorderFormat::NoSideBorders,
            ..Default::default()
        };
        apply_table_format(&mut table, Some(&format), false);

        let cell = &table.rows[0].cells[0];
        assert_eq!(cell.format.border_left.as_deref(), Some("1px solid transparent"));
        assert_eq!(cell.format.border_right.as_deref(), Some("1px solid transparent"));
        assert_eq!(table.rows[0].cells[1].format.border_left, None);
    }
}
