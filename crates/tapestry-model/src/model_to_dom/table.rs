//! Table rendering.
//!
//! Placeholder cells produce no element; the owning cell gets `rowspan`/
//! `colspan` from the run of placeholders below/right of it and a size equal
//! to the sum of the spanned rows and columns.

use tapestry_dom::{Dom, NodeId, TableSelectionCoordinates};

use crate::format::{FormatCategory, apply_dataset};
use crate::model::ContentModelTable;
use crate::selection::PathStep;

use super::block::reuse_cached_element;
use super::context::{ModelNodeType, ModelToDomContext};

fn format_px(value: f64) -> String {
    format!("{value}px")
}

/// Grow `rect` to include (`row`, `col`).
fn extend_rect(rect: &mut Option<TableSelectionCoordinates>, row: usize, col: usize) {
    let rect = rect.get_or_insert(TableSelectionCoordinates {
        first_row: row,
        first_column: col,
        last_row: row,
        last_column: col,
    });
    rect.first_row = rect.first_row.min(row);
    rect.first_column = rect.first_column.min(col);
    rect.last_row = rect.last_row.max(row);
    rect.last_column = rect.last_column.max(col);
}

pub fn handle_table(
    dom: &mut Dom,
    parent: NodeId,
    table: &mut ContentModelTable,
    context: &mut ModelToDomContext,
    mut ref_node: Option<NodeId>,
) -> Option<NodeId> {
    if table.is_empty() {
        return ref_node;
    }

    let table_element = match table.cached_element.filter(|_| context.allow_cache_element) {
        Some(element) => {
            ref_node = reuse_cached_element(dom, parent, element, ref_node);
            element
        }
        None => {
            let element = dom.create_element("table");
            dom.insert_before(parent, element, ref_node);
            context
                .format_appliers
                .apply(FormatCategory::Table, &table.format, dom, element, context);
            apply_dataset(&table.dataset, dom, element);
            if context.allow_cache_element {
                table.cached_element = Some(element);
            }
            context.node_created(ModelNodeType::Table, element);
            element
        }
    };

    let tbody = match dom.first_child(table_element).filter(|&n| dom.is_tag(n, "tbody")) {
        Some(tbody) => tbody,
        None => dom.create_element("tbody"),
    };
    dom.clear_children(table_element);
    dom.append_child(table_element, tbody);
    dom.clear_children(tbody);

    let path = context.path.clone();
    if let Some(indexer) = context.dom_indexer.as_deref_mut() {
        indexer.on_table(dom, table_element, &path);
    }

    let mut selected: Option<TableSelectionCoordinates> = None;
    let children = context.handlers.block_group_children;

    for row_index in 0..table.rows.len() {
        let tr = match table.rows[row_index]
            .cached_element
            .filter(|_| context.allow_cache_element)
        {
            Some(tr) => tr,
            None => {
                let tr = dom.create_element("tr");
                let row = &mut table.rows[row_index];
                context
                    .format_appliers
                    .apply(FormatCategory::TableRow, &row.format, dom, tr, context);
                if context.allow_cache_element {
                    row.cached_element = Some(tr);
                }
                context.node_created(ModelNodeType::TableRow, tr);
                tr
            }
        };
        dom.append_child(tbody, tr);
        dom.clear_children(tr);

        for col in 0..table.rows[row_index].cells.len() {
            let cell = &table.rows[row_index].cells[col];
            if cell.is_selected {
                extend_rect(&mut selected, row_index, col);
            }
            if cell.is_placeholder() {
                continue;
            }

            let mut row_span = 1;
            let mut height = table.rows[row_index].height;
            while let Some(below) = table.rows.get(row_index + row_span)
                && below.cells.get(col).is_some_and(|c| c.span_above)
            {
                height += below.height;
                row_span += 1;
            }
            let mut col_span = 1;
            let mut width = table.widths.get(col).copied().unwrap_or(0.0);
            while table.rows[row_index]
                .cells
                .get(col + col_span)
                .is_some_and(|c| c.span_left)
            {
                width += table.widths.get(col + col_span).copied().unwrap_or(0.0);
                col_span += 1;
            }

            let cell = &mut table.rows[row_index].cells[col];
            let td = match cell.cached_element.filter(|_| context.allow_cache_element) {
                Some(td) => td,
                None => {
                    let td = dom.create_element(if cell.is_header { "th" } else { "td" });
                    context
                        .format_appliers
                        .apply(FormatCategory::TableCell, &cell.format, dom, td, context);
                    apply_dataset(&cell.dataset, dom, td);
                    if width > 0.0 && dom.style(td, "width").is_none() {
                        dom.set_style(td, "width", &format_px(width));
                    }
                    if height > 0.0 && dom.style(td, "height").is_none() {
                        dom.set_style(td, "height", &format_px(height));
                    }
                    if context.allow_cache_element {
                        cell.cached_element = Some(td);
                    }
                    context.node_created(ModelNodeType::TableCell, td);
                    td
                }
            };
            dom.append_child(tr, td);
            if row_span > 1 {
                dom.set_attribute(td, "rowspan", row_span.to_string());
            } else {
                dom.remove_attribute(td, "rowspan");
            }
            if col_span > 1 {
                dom.set_attribute(td, "colspan", col_span.to_string());
            } else {
                dom.remove_attribute(td, "colspan");
            }

            context.with_path(PathStep::Cell { row: row_index, col }, |context| {
                children(dom, td, cell, context)
            });
        }
    }

    if let Some(coordinates) = selected {
        context.table_selection = Some((table_element, coordinates));
    }
    ref_node
}
