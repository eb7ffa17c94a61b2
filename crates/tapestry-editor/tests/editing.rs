use tapestry_dom::{Dom, DomPosition, DomRange, DomSelection, NodeId};
use tapestry_editor::table::merge_table_cells;
use tapestry_editor::{DomIndexerPlugin, EditorSettings, handle_tab_key, set_list_type, toggle_bold};
use tapestry_model::creators::*;
use tapestry_model::selection::{get_selected_segments, segment_at};
use tapestry_model::{
    ContentModelBlock, ContentModelDocument, ListType, ModelToDomContext, ModelToDomOption, PathStep,
    model_to_dom, set_selection,
};

fn table_doc(rows: usize, cols: usize) -> ContentModelDocument {
    let mut table = create_table(rows, None);
    for (r, row) in table.rows.iter_mut().enumerate() {
        for c in 0..cols {
            let mut cell = create_table_cell(false, false, false, None);
            add_text_paragraph(&mut cell, &format!("{r}{c}"));
            row.cells.push(cell);
        }
    }
    let mut doc = create_content_model_document(None);
    doc.blocks.push(ContentModelBlock::Table(table));
    doc
}

fn render(
    dom: &mut Dom,
    root: NodeId,
    doc: &mut ContentModelDocument,
    plugin: &mut DomIndexerPlugin,
) -> Option<DomSelection> {
    let option = ModelToDomOption {
        dom_indexer: Some(plugin),
        ..Default::default()
    };
    model_to_dom(dom, root, doc, &mut ModelToDomContext::new(option))
}

fn descendants(dom: &Dom, node: NodeId, tag: &str, out: &mut Vec<NodeId>) {
    for &child in dom.children(node) {
        if dom.is_tag(child, tag) {
            out.push(child);
        }
        descendants(dom, child, tag, out);
    }
}

fn find_all(dom: &Dom, root: NodeId, tag: &str) -> Vec<NodeId> {
    let mut out = Vec::new();
    descendants(dom, root, tag, &mut out);
    out
}

#[test]
fn merged_cells_render_with_colspan() {
    let mut doc = table_doc(2, 2);
    set_selection(
        &mut doc,
        Some(&[PathStep::Block(0), PathStep::Cell { row: 0, col: 0 }]),
        Some(&[PathStep::Block(0), PathStep::Cell { row: 0, col: 1 }]),
    );
    if let Some(table) = doc.blocks[0].as_table_mut() {
        merge_table_cells(table);
    }

    let mut dom = Dom::new();
    let root = dom.create_element("div");
    render(&mut dom, root, &mut doc, &mut DomIndexerPlugin::new());

    let cells: Vec<String> = find_all(&dom, root, "td")
        .into_iter()
        .map(|td| match dom.attribute(td, "colspan") {
            Some(span) => format!("colspan={span} {}", dom.text_content(td)),
            None => dom.text_content(td),
        })
        .collect();
    insta::assert_debug_snapshot!(cells, @r###"
    [
        "colspan=2 0001",
        "10",
        "11",
    ]
    "###);
}

#[test]
fn caret_from_dom_then_tab_moves_to_next_cell() {
    let mut doc = table_doc(1, 2);
    let mut dom = Dom::new();
    let root = dom.create_element("div");
    let mut plugin = DomIndexerPlugin::new();
    render(&mut dom, root, &mut doc, &mut plugin);

    let text = find_all(&dom, root, "td")
        .first()
        .and_then(|&td| {
            let mut stack = vec![td];
            while let Some(node) = stack.pop() {
                if dom.text(node) == Some("00") {
                    return Some(node);
                }
                stack.extend(dom.children(node).iter().copied());
            }
            None
        });
    let Some(text) = text else {
        panic!("first cell text not rendered");
    };
    let caret = DomSelection::range(DomRange::collapsed(DomPosition::new(text, 2)));
    assert!(plugin.reconcile_selection(&dom, &mut doc, &caret, None));

    assert!(handle_tab_key(&mut doc, false, &EditorSettings::default()));
    let caret_in_second = vec![
        PathStep::Block(0),
        PathStep::Cell { row: 0, col: 1 },
        PathStep::Block(0),
        PathStep::Segment(0),
    ];
    assert_eq!(get_selected_segments(&doc), vec![caret_in_second]);

    let restored = render(&mut dom, root, &mut doc, &mut plugin);
    assert!(restored.and_then(|s| s.as_range().copied()).is_some_and(|r| r.is_collapsed()));
}

#[test]
fn bold_range_from_dom() {
    let mut doc = create_content_model_document(None);
    add_text_paragraph(&mut doc, "plain bold plain");
    let mut dom = Dom::new();
    let root = dom.create_element("div");
    let mut plugin = DomIndexerPlugin::new();
    render(&mut dom, root, &mut doc, &mut plugin);

    let Some(div) = dom.first_child(root) else {
        panic!("paragraph not rendered");
    };
    let Some(text) = dom.first_child(div) else {
        panic!("text not rendered");
    };
    let selection = DomSelection::range(DomRange::new(DomPosition::new(text, 6), DomPosition::new(text, 10)));
    assert!(plugin.reconcile_selection(&dom, &mut doc, &selection, None));
    assert!(toggle_bold(&mut doc));

    let bold: Vec<String> = get_selected_segments(&doc)
        .iter()
        .filter_map(|path| segment_at(&doc, path))
        .filter(|s| s.format.is_bold())
        .filter_map(|s| s.text().map(str::to_string))
        .collect();
    assert_eq!(bold, vec!["bold".to_string()]);
}

#[test]
fn paragraph_becomes_ordered_list() {
    let mut doc = create_content_model_document(None);
    add_text_paragraph(&mut doc, "item");
    set_selection(&mut doc, Some(&[PathStep::Block(0), PathStep::Segment(0)]), None);

    assert!(set_list_type(&mut doc, ListType::Ordered));

    let mut dom = Dom::new();
    let root = dom.create_element("div");
    render(&mut dom, root, &mut doc, &mut DomIndexerPlugin::new());
    assert_eq!(find_all(&dom, root, "ol").len(), 1);
    assert_eq!(find_all(&dom, root, "li").len(), 1);
    assert_eq!(dom.text_content(root), "item");
}
