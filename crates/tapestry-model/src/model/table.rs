//! Table grid model.
//!
//! `rows[r].cells[c]` is a dense grid. A cell with `span_above`/`span_left`
//! set is a placeholder absorbed into the nearest unspanned cell up/left.

use serde::{Deserialize, Serialize};
use tapestry_dom::NodeId;

use super::block::ContentModelBlock;
use super::format::{DatasetFormat, Format};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelTableCell {
    pub blocks: Vec<ContentModelBlock>,
    pub format: Format,
    #[serde(default)]
    pub span_left: bool,
    #[serde(default)]
    pub span_above: bool,
    #[serde(default)]
    pub is_header: bool,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default, skip_serializing_if = "DatasetFormat::is_empty")]
    pub dataset: DatasetFormat,
    #[serde(skip)]
    pub cached_element: Option<NodeId>,
}

impl ContentModelTableCell {
    pub fn is_placeholder(&self) -> bool {
        self.span_left || self.span_above
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelTableRow {
    pub cells: Vec<ContentModelTableCell>,
    pub height: f64,
    pub format: Format,
    #[serde(skip)]
    pub cached_element: Option<NodeId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelTable {
    pub rows: Vec<ContentModelTableRow>,
    /// Declared column widths in pixels.
    pub widths: Vec<f64>,
    pub format: Format,
    #[serde(default, skip_serializing_if = "DatasetFormat::is_empty")]
    pub dataset: DatasetFormat,
    #[serde(skip)]
    pub cached_element: Option<NodeId>,
}

impl ContentModelTable {
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.cells.is_empty())
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&ContentModelTableCell> {
        self.rows.get(row)?.cells.get(col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut ContentModelTableCell> {
        self.rows.get_mut(row)?.cells.get_mut(col)
    }

    /// Smallest `(top, left, bottom, right)` rectangle covering `first` and
    /// `last` that cuts through no merged cell: every owner of a slot inside
    /// it, and every slot owned from inside it, is inside it too.
    pub fn selection_rect(
        &self,
        first: (usize, usize),
        last: (usize, usize),
    ) -> (usize, usize, usize, usize) {
        let mut rect = (
            first.0.min(last.0),
            first.1.min(last.1),
            first.0.max(last.0),
            first.1.max(last.1),
        );
        loop {
            let (top, left, bottom, right) = rect;
            let inside = |r: usize, c: usize| (top..=bottom).contains(&r) && (left..=right).contains(&c);
            let mut grown = rect;
            for (r, row) in self.rows.iter().enumerate() {
                for c in 0..row.cells.len() {
                    let Some((owner_row, owner_col)) = self.owner_of(r, c) else {
                        continue;
                    };
                    if inside(r, c) || inside(owner_row, owner_col) {
                        grown.0 = grown.0.min(owner_row);
                        grown.1 = grown.1.min(owner_col);
                        grown.2 = grown.2.max(r);
                        grown.3 = grown.3.max(c);
                    }
                }
            }
            if grown == rect {
                return rect;
            }
            rect = grown;
        }
    }

    /// Coordinates of the cell owning the grid slot at (`row`, `col`).
    pub fn owner_of(&self, mut row: usize, mut col: usize) -> Option<(usize, usize)> {
        loop {
            let cell = self.cell(row, col)?;
            if cell.span_above && row > 0 {
                row -= 1;
            } else if cell.span_left && col > 0 {
                col -= 1;
            } else {
                return Some((row, col));
            }
        }
    }
}
