//! Parsing and serialization of real markup

use soup_dom::NodeKind;
use soup_html::{parse, serialize, serialize_document, HtmlParser, ParseOptions};

#[test]
fn test_document_serialization() {
    let tree = parse("<!DOCTYPE html>\n<p>Foo</p>");
    assert_eq!(
        serialize_document(&tree),
        "<!DOCTYPE html>\n<html><head></head><body><p>Foo</p></body></html>\n"
    );
}

#[test]
fn test_attributes_and_escaping() {
    let tree = parse(r#"<a href="/?a=1&amp;b=2" title='say "hi"'>x &lt; y</a>"#);
    let a = tree
        .descendants(tree.root())
        .find(|(id, _)| tree.tag_name(*id) == Some("a"))
        .map(|(id, _)| id)
        .expect("a element");

    assert_eq!(tree.attribute(a, "href"), Some("/?a=1&b=2"));
    assert_eq!(tree.attribute(a, "title"), Some(r#"say "hi""#));
    assert_eq!(tree.text_content(a), "x < y");
    assert_eq!(
        serialize(&tree, a),
        r#"<a href="/?a=1&amp;b=2" title="say &quot;hi&quot;">x &lt; y</a>"#
    );
}

#[test]
fn test_unquoted_and_empty_attributes() {
    let tree = parse("<input id=1 disabled>");
    let input = tree
        .descendants(tree.root())
        .find(|(id, _)| tree.tag_name(*id) == Some("input"))
        .map(|(id, _)| id)
        .expect("input element");
    assert_eq!(tree.attribute(input, "id"), Some("1"));
    assert_eq!(tree.attribute(input, "disabled"), Some(""));
    assert_eq!(serialize(&tree, input), r#"<input id="1" disabled="">"#);
}

#[test]
fn test_comments_and_unicode() {
    let tree = parse("<h1>寿司🍣<!-- note --></h1>");
    let kinds: Vec<NodeKind> = tree.descendants(tree.root()).map(|(_, n)| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Element,
            NodeKind::Element,
            NodeKind::Element,
            NodeKind::Element,
            NodeKind::Text,
            NodeKind::Comment,
        ]
    );
    assert_eq!(tree.text_content(tree.root()), "寿司🍣");
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 5_000;
    let markup = format!("{}x{}", "<span>".repeat(depth), "</span>".repeat(depth));
    let tree = HtmlParser::with_options(ParseOptions::default()).parse(&markup);
    assert_eq!(tree.text_content(tree.root()), "x");

    let html = serialize_document(&tree);
    assert_eq!(
        html,
        format!("<html><head></head><body>{markup}</body></html>\n")
    );
    let body = tree
        .descendants(tree.root())
        .find(|(id, _)| tree.tag_name(*id) == Some("body"))
        .map(|(id, _)| id)
        .expect("body element");
    assert_eq!(serialize(&tree, body), format!("<body>{markup}</body>"));
}
