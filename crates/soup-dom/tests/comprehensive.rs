//! Comprehensive tests for soup-dom
//!
//! Tree construction, traversal order and the document-order ranking.

use soup_dom::{DomTree, NodeId, NodeKind, StringInterner};

#[test]
fn test_string_interner_deduplication() {
    let mut interner = StringInterner::new();

    let id1 = interner.intern("hello");
    let id2 = interner.intern("hello");
    assert_eq!(id1, id2, "Same string should return same ID");

    let id3 = interner.intern("world");
    assert_ne!(id1, id3, "Different strings should have different IDs");
}

#[test]
fn test_string_interner_repeated_names() {
    let mut interner = StringInterner::new();
    let before = interner.len();
    for _ in 0..1000 {
        interner.intern("div");
        interner.intern("span");
        interner.intern("class");
    }
    assert_eq!(interner.len(), before, "Pre-interned names should not grow the table");
}

#[test]
fn test_dom_tree_creation() {
    let mut tree = DomTree::new();

    // div > span > text
    let div = tree.create_element("div");
    let span = tree.create_element("span");
    let text = tree.create_text("Hello, World!");

    tree.append_child(tree.root(), div);
    tree.append_child(div, span);
    tree.append_child(span, text);

    assert_eq!(tree.len(), 4);
    assert_eq!(tree.parent(text), Some(span));
    assert_eq!(tree.parent(span), Some(div));
    assert_eq!(tree.parent(div), Some(NodeId::ROOT));
    assert_eq!(tree.parent(NodeId::ROOT), None);
}

#[test]
fn test_root_is_document() {
    let tree = DomTree::new();
    let root = tree.get(tree.root()).expect("root exists");
    assert_eq!(root.kind(), NodeKind::Document);
    assert_eq!(tree.children(tree.root()).count(), 0);
    assert_eq!(tree.text_content(tree.root()), "");
}

#[test]
fn test_descendants_depth_first() {
    // <ul><li>1</li><li>2<!--c--></li></ul>
    let mut tree = DomTree::new();
    let ul = tree.create_element("ul");
    let li1 = tree.create_element("li");
    let t1 = tree.create_text("1");
    let li2 = tree.create_element("li");
    let t2 = tree.create_text("2");
    let c = tree.create_comment("c");
    tree.append_child(tree.root(), ul);
    tree.append_child(ul, li1);
    tree.append_child(li1, t1);
    tree.append_child(ul, li2);
    tree.append_child(li2, t2);
    tree.append_child(li2, c);

    let order: Vec<NodeId> = tree.descendants(tree.root()).map(|(id, _)| id).collect();
    assert_eq!(order, vec![ul, li1, t1, li2, t2, c]);

    for pair in order.windows(2) {
        assert!(tree.document_position(pair[0]) < tree.document_position(pair[1]));
    }

    // Comments do not contribute to text content
    assert_eq!(tree.text_content(ul), "12");
    assert_eq!(tree.text_content(c), "c");
}

#[test]
fn test_doctype_and_processing_instruction() {
    let mut tree = DomTree::new();
    let doctype = tree.create_doctype("html", "", "");
    let pi = tree.create_processing_instruction("xml-stylesheet", "href=\"a.css\"");
    tree.append_child(tree.root(), doctype);
    tree.append_child(tree.root(), pi);

    assert_eq!(tree.get(doctype).map(|n| n.kind()), Some(NodeKind::Doctype));
    assert_eq!(tree.get(pi).map(|n| n.kind()), Some(NodeKind::ProcessingInstruction));
    assert_eq!(tree.text_content(doctype), "");
}

#[test]
fn test_attributes_keep_source_order() {
    let mut tree = DomTree::new();
    let a = tree.create_element("a");
    tree.set_attribute(a, "href", "/");
    tree.set_attribute(a, "id", "x");
    tree.set_attribute(a, "href", "/home");

    let names: Vec<&str> = tree
        .attributes(a)
        .iter()
        .map(|attr| tree.resolve(attr.name))
        .collect();
    assert_eq!(names, vec!["href", "id"]);
    assert_eq!(tree.attribute(a, "href"), Some("/home"));

    let text = tree.create_text("t");
    assert!(tree.attributes(text).is_empty());
}
