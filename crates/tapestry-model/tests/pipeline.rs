use tapestry_dom::{Dom, DomPosition, DomRange, DomSelection, NodeId, el};
use tapestry_model::creators::*;
use tapestry_model::{
    ContentModelBlock, ContentModelDocument, DomToModelOption, ListType, ModelToDomContext,
    PathStep, dom_to_model, model_to_dom, set_selection,
};

fn render(doc: &mut ContentModelDocument) -> (Dom, NodeId, Option<DomSelection>) {
    let mut dom = Dom::new();
    let root = dom.create_element("div");
    let selection = model_to_dom(&mut dom, root, doc, &mut ModelToDomContext::default());
    (dom, root, selection)
}

#[test]
fn round_trip_keeps_structure() {
    let mut source = Dom::new();
    let root = source.build(
        &el("div")
            .child(el("div").text("hello").child(el("b").text("world")))
            .child(
                el("ol")
                    .child(el("li").text("one"))
                    .child(el("li").text("two")),
            ),
    );
    let expected = source.inner_html(root);

    let mut doc = dom_to_model(&source, root, &DomToModelOption::default(), None);
    let (dom, out, _) = render(&mut doc);

    assert_eq!(dom.inner_html(out), expected);
}

#[test]
fn collapsed_selection_survives_round_trip() {
    let mut source = Dom::new();
    let root = source.build(&el("div").child(el("div").text("hello")));
    let text = source
        .first_child(root)
        .and_then(|div| source.first_child(div))
        .unwrap_or(root);
    let selection = DomSelection::range(DomRange::collapsed(DomPosition::new(text, 2)));

    let mut doc = dom_to_model(&source, root, &DomToModelOption::default(), Some(&selection));
    let (dom, out, restored) = render(&mut doc);

    let first_text = dom
        .first_child(out)
        .and_then(|div| dom.first_child(div))
        .unwrap_or(out);
    assert_eq!(dom.text(first_text), Some("he"));
    let range = restored.and_then(|s| s.as_range().copied());
    assert_eq!(range, Some(DomRange::collapsed(DomPosition::new(first_text, 2))));
}

#[test]
fn unchanged_model_rerenders_without_new_nodes() {
    let level = create_list_level(ListType::Ordered, None, None);
    let mut doc = create_content_model_document(None);
    for text in ["a", "b"] {
        let mut item = create_list_item(std::slice::from_ref(&level), None);
        add_text_paragraph(&mut item, text);
        doc.blocks.push(ContentModelBlock::ListItem(item));
    }
    let mut table = create_table(1, None);
    for text in ["x", "y"] {
        let mut cell = create_table_cell(false, false, false, None);
        add_text_paragraph(&mut cell, text);
        table.rows[0].cells.push(cell);
    }
    doc.blocks.push(ContentModelBlock::Table(table));

    let mut dom = Dom::new();
    let root = dom.create_element("div");
    model_to_dom(&mut dom, root, &mut doc, &mut ModelToDomContext::default());
    let html = dom.inner_html(root);
    let created = dom.created_count();

    model_to_dom(&mut dom, root, &mut doc, &mut ModelToDomContext::default());
    assert_eq!(dom.created_count(), created);
    assert_eq!(dom.inner_html(root), html);
    insta::assert_snapshot!(
        html,
        @"<ol><li><div>a</div></li><li><div>b</div></li></ol><table><tbody><tr><td><div>x</div></td><td><div>y</div></td></tr></tbody></table>"
    );
}

#[test]
fn projected_selection_renders_as_range() {
    let mut doc = create_content_model_document(None);
    add_text_paragraph(&mut doc, "first");
    add_text_paragraph(&mut doc, "second");
    let start = [PathStep::Block(0), PathStep::Segment(0)];
    let end = [PathStep::Block(1), PathStep::Segment(0)];
    assert!(set_selection(&mut doc, Some(&start), Some(&end)));

    let (dom, out, selection) = render(&mut doc);
    let texts: Vec<NodeId> = dom
        .children(out)
        .iter()
        .filter_map(|&div| dom.first_child(div))
        .collect();
    assert_eq!(texts.len(), 2);

    let range = selection.and_then(|s| s.as_range().copied());
    assert_eq!(
        range.map(|r| r.end),
        Some(DomPosition::new(texts[1], "second".len()))
    );
    assert!(range.is_some_and(|r| !r.is_collapsed()));
}
