//! `table` processing into a dense cell grid.

use tapestry_dom::{Dom, DomSelection, NodeId, parse_px};

use crate::creators::{create_entity, create_table, create_table_cell, create_table_row};
use crate::format::{FormatCategory, parse_dataset};
use crate::metadata::{TableMetadataFormat, get_metadata};
use crate::model::{BlockGroup, ContentModelBlock, ContentModelTableCell, Format};

use super::add::add_block;
use super::context::{DomToModelContext, StackFormatOptions};
use super::element::child_processor;

fn table_rows(dom: &Dom, table: NodeId) -> Vec<NodeId> {
    let mut rows = Vec::new();
    for &child in dom.children(table) {
        match dom.tag_name(child) {
            Some("tr") => rows.push(child),
            Some("thead" | "tbody" | "tfoot") => rows.extend(
                dom.children(child)
                    .iter()
                    .copied()
                    .filter(|&row| dom.is_tag(row, "tr")),
            ),
            _ => {}
        }
    }
    rows
}

/// Browsers clamp spans to these.
const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

fn span_attribute(dom: &Dom, cell: NodeId, name: &str, max: usize) -> usize {
    dom.attribute(cell, name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(max))
}

fn size_of(dom: &Dom, element: NodeId, property: &str) -> Option<f64> {
    dom.style(element, property)
        .or_else(|| dom.attribute(element, property))
        .and_then(parse_px)
}

/// Tables without editing metadata are kept as opaque entities unless the
/// selection reaches into them; those are parsed so they can be edited.
pub fn table_processor(
    group: &mut dyn BlockGroup,
    dom: &Dom,
    element: NodeId,
    context: &mut DomToModelContext,
) {
    let dataset = parse_dataset(dom, element);
    let has_metadata = get_metadata::<TableMetadataFormat>(&dataset).is_some();
    let touched = context.selection.is_some_and(|s| s.touches(dom, element));

    if context.preserve_unknown_tables && !has_metadata && !touched {
        tracing::trace!(target: "tapestry::dom_to_model", ?element, "keeping unknown table as entity");
        let mut entity = create_entity(element, false, None, None, None);
        entity.entity_format.is_fake_entity = true;
        entity.is_selected = context.is_in_selection;
        add_block(group, ContentModelBlock::Entity(entity));
        return;
    }

    let mut format = Format::default();
    context
        .format_parsers
        .parse(FormatCategory::Table, &mut format, dom, element);
    let mut table = create_table(0, Some(&format));
    table.dataset = dataset;
    if context.allow_cache_element {
        table.cached_element = Some(element);
    }

    let selected_rect = match context.selection {
        Some(DomSelection::Table { table, coordinates }) if table == element => Some(coordinates),
        _ => None,
    };

    let mut grid: Vec<Vec<Option<ContentModelTableCell>>> = Vec::new();
    let mut widths: Vec<f64> = Vec::new();

    let rows = table_rows(dom, element);
    let row_count = rows.len();
    for (row_index, tr) in rows.into_iter().enumerate() {
        while grid.len() <= row_index {
            grid.push(Vec::new());
            table.rows.push(create_table_row(None, 0.0));
        }
        let row = &mut table.rows[row_index];
        context
            .format_parsers
            .parse(FormatCategory::TableRow, &mut row.format, dom, tr);
        row.height = row.height.max(size_of(dom, tr, "height").unwrap_or(0.0));
        if context.allow_cache_element {
            row.cached_element = Some(tr);
        }

        let mut col = 0;
        for &td in dom.children(tr) {
            let is_header = dom.is_tag(td, "th");
            if !is_header && !dom.is_tag(td, "td") {
                continue;
            }
            while grid[row_index].get(col).is_some_and(Option::is_some) {
                col += 1;
            }
            let col_span = span_attribute(dom, td, "colspan", MAX_COLSPAN);
            // A row span never reaches past the last row.
            let row_span = span_attribute(dom, td, "rowspan", MAX_ROWSPAN).min(row_count - row_index);

            let mut cell_format = Format::default();
            context
                .format_parsers
                .parse(FormatCategory::TableCell, &mut cell_format, dom, td);
            let mut cell = create_table_cell(false, false, is_header, Some(&cell_format));
            cell.dataset = parse_dataset(dom, td);
            if context.allow_cache_element {
                cell.cached_element = Some(td);
            }
            context.stack_format(
                StackFormatOptions {
                    clear_block: true,
                    clear_decorator: true,
                    ..Default::default()
                },
                |context| child_processor(&mut cell, dom, td, context),
            );

            if col_span == 1
                && let Some(width) = size_of(dom, td, "width")
            {
                if widths.len() <= col {
                    widths.resize(col + 1, 0.0);
                }
                widths[col] = widths[col].max(width);
            }
            if row_span == 1 {
                let height = size_of(dom, td, "height").unwrap_or(0.0);
                let row = &mut table.rows[row_index];
                row.height = row.height.max(height);
            }

            let mut owner = Some(cell);
            for r in row_index..row_index + row_span {
                while grid.len() <= r {
                    grid.push(Vec::new());
                    table.rows.push(create_table_row(None, 0.0));
                }
                for c in col..col + col_span {
                    if grid[r].len() <= c {
                        grid[r].resize_with(c + 1, || None);
                    }
                    grid[r][c] = Some(owner.take().unwrap_or_else(|| {
                        create_table_cell(c > col, r > row_index, is_header, None)
                    }));
                }
            }
            col += col_span;
        }
    }

    let column_count = grid.iter().map(Vec::len).max().unwrap_or(0);
    for (r, (cells, row)) in grid.into_iter().zip(table.rows.iter_mut()).enumerate() {
        row.cells = cells
            .into_iter()
            .chain(std::iter::repeat_with(|| None))
            .take(column_count)
            .enumerate()
            .map(|(c, cell)| {
                let mut cell = cell.unwrap_or_else(|| create_table_cell(false, false, false, None));
                if let Some(rect) = selected_rect {
                    cell.is_selected = (rect.first_row..=rect.last_row).contains(&r)
                        && (rect.first_column..=rect.last_column).contains(&c);
                }
                cell
            })
            .collect();
    }
    widths.resize(column_count, 0.0);
    table.widths = widths;

    add_block(group, ContentModelBlock::Table(table));
}
