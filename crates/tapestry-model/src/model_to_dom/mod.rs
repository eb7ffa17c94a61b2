//! Content Model to DOM rendering.
//!
//! Rendering reconciles the children of a root element against a model:
//! nodes with a cached element are moved into place and reused, everything
//! else is created, and leftovers are removed. Handlers are dispatched
//! through [`ModelToDomHandlers`] so any of them can be replaced.

pub mod block;
pub mod context;
pub mod handlers;
pub mod list;
pub mod paragraph;
pub mod segment;
pub mod table;

pub use block::reuse_cached_element;
pub use context::{
    DomIndexer, ListStackFrame, ModelNodeType, ModelToDomContext, ModelToDomListContext,
    ModelToDomOption, RegularSelection, SelectionPosition,
};
pub use handlers::{BlockHandler, ModelToDomHandlers, SegmentHandler};

use tapestry_dom::{Dom, DomSelection, NodeId};

use crate::model::ContentModelDocument;

/// Render `model` as the children of `root` and return the selection the
/// model carries, expressed in the rendered DOM.
pub fn model_to_dom(
    dom: &mut Dom,
    root: NodeId,
    model: &mut ContentModelDocument,
    context: &mut ModelToDomContext,
) -> Option<DomSelection> {
    let created_before = dom.created_count();
    context.regular_selection = RegularSelection::default();
    context.table_selection = None;
    context.image_selection = None;
    if let Some(indexer) = context.dom_indexer.as_deref_mut() {
        indexer.on_render_start(dom);
    }

    let children = context.handlers.block_group_children;
    children(dom, root, model, context);

    let selection = context.selection(dom);
    tracing::debug!(
        target: "tapestry::model_to_dom",
        created = dom.created_count() - created_before,
        has_selection = selection.is_some(),
        "rendered content model"
    );
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creators::*;
    use crate::model::{ContentModelBlock, Format};
    use tapestry_dom::DomPosition;

    fn render(doc: &mut ContentModelDocument) -> (Dom, NodeId, Option<DomSelection>) {
        let mut dom = Dom::new();
        let root = dom.create_element("div");
        let selection = model_to_dom(&mut dom, root, doc, &mut ModelToDomContext::default());
        (dom, root, selection)
    }

    #[test]
    fn test_formatted_text_and_link() {
        let mut doc = create_content_model_document(None);
        let mut paragraph = create_paragraph(false, None, None, None);
        let bold = Format {
            font_weight: Some("bold".into()),
            ..Default::default()
        };
        paragraph.segments.push(create_text("a", Some(&bold), None, None));
        let mut link = crate::model::ContentModelLink::default();
        link.format.href = Some("https://example.com".into());
        paragraph.segments.push(create_text("b", None, Some(&link), None));
        doc.blocks.push(ContentModelBlock::Paragraph(paragraph));

        let (dom, root, _) = render(&mut doc);
        insta::assert_snapshot!(
            dom.inner_html(root),
            @r#"<div><b>a</b><a href="https://example.com">b</a></div>"#
        );
    }

    #[test]
    fn test_heading_skips_implicit_bold() {
        let mut doc = create_content_model_document(None);
        let heading = crate::format::default_format_for_tag("h1");
        let decorator = create_paragraph_decorator("h1", Some(&heading));
        let mut paragraph = create_paragraph(false, None, None, Some(decorator));
        paragraph.segments.push(create_text("Title", Some(&heading), None, None));
        doc.blocks.push(ContentModelBlock::Paragraph(paragraph));

        let (dom, root, _) = render(&mut doc);
        insta::assert_snapshot!(dom.inner_html(root), @"<h1>Title</h1>");
    }

    #[test]
    fn test_collapsed_marker_restores_position() {
        let mut doc = create_content_model_document(None);
        let mut paragraph = create_paragraph(false, None, None, None);
        paragraph.segments.push(create_text("ab", None, None, None));
        paragraph.segments.push(create_selection_marker(None));
        paragraph.segments.push(create_text("cd", None, None, None));
        doc.blocks.push(ContentModelBlock::Paragraph(paragraph));

        let (dom, root, selection) = render(&mut doc);
        let div = dom.first_child(root).unwrap_or(root);
        let first_text = dom.first_child(div).unwrap_or(div);
        let range = selection.and_then(|s| s.as_range().copied());
        assert_eq!(range.map(|r| r.start), Some(DomPosition::new(first_text, 2)));
        assert!(range.is_some_and(|r| r.is_collapsed()));
    }

    #[test]
    fn test_rerender_reuses_cached_elements() {
        let mut doc = create_content_model_document(None);
        add_text_paragraph(&mut doc, "one");
        doc.blocks.push(ContentModelBlock::Divider(create_divider("hr", None)));
        add_text_paragraph(&mut doc, "two");

        let mut dom = Dom::new();
        let root = dom.create_element("div");
        model_to_dom(&mut dom, root, &mut doc, &mut ModelToDomContext::default());
        let html = dom.inner_html(root);
        let children = dom.children(root).to_vec();
        let created = dom.created_count();

        model_to_dom(&mut dom, root, &mut doc, &mut ModelToDomContext::default());
        assert_eq!(dom.created_count(), created);
        assert_eq!(dom.children(root), children.as_slice());
        assert_eq!(dom.inner_html(root), html);
    }

    #[test]
    fn test_removed_block_is_dropped_from_dom() {
        let mut doc = create_content_model_document(None);
        add_text_paragraph(&mut doc, "one");
        add_text_paragraph(&mut doc, "two");

        let mut dom = Dom::new();
        let root = dom.create_element("div");
        model_to_dom(&mut dom, root, &mut doc, &mut ModelToDomContext::default());
        doc.blocks.remove(0);
        model_to_dom(&mut dom, root, &mut doc, &mut ModelToDomContext::default());

        insta::assert_snapshot!(dom.inner_html(root), @"<div>two</div>");
    }

    #[test]
    fn test_node_created_observer() {
        let mut doc = create_content_model_document(None);
        add_text_paragraph(&mut doc, "x");
        let mut seen = Vec::new();
        {
            let option = ModelToDomOption {
                on_node_created: Some(Box::new(|node_type: ModelNodeType, _: NodeId| {
                    seen.push(node_type)
                })),
                ..Default::default()
            };
            let mut dom = Dom::new();
            let root = dom.create_element("div");
            model_to_dom(&mut dom, root, &mut doc, &mut ModelToDomContext::new(option));
        }
        assert_eq!(seen, vec![ModelNodeType::Segment, ModelNodeType::Paragraph]);
    }
}
