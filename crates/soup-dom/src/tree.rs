//! DOM Tree (arena-based allocation)

use std::sync::OnceLock;

use crate::{Attribute, ElementData, InternedString, Node, NodeData, NodeId, StringInterner};

/// Arena-based DOM tree
///
/// Node 0 is always the document node. Document order (depth-first,
/// left-to-right from the document node) is computed on first use and cached
/// until the next mutation.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    interner: StringInterner,
    order: OnceLock<Vec<u32>>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            interner: StringInterner::new(),
            order: OnceLock::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes in the tree, document node included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Name interner shared by all nodes of this tree
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.get(id)
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        self.order.take();
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.push(NodeData::Element(ElementData::new(name)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Text(content.to_string()))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Comment(content.to_string()))
    }

    /// Create a detached DOCTYPE node
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.push(NodeData::Doctype {
            name,
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })
    }

    /// Create a detached processing instruction
    pub fn create_processing_instruction(&mut self, target: &str, data: &str) -> NodeId {
        let target = self.interner.intern(target);
        self.push(NodeData::ProcessingInstruction {
            target,
            data: data.to_string(),
        })
    }

    /// Set an attribute on an element; ignored for other node kinds
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        let name = self.interner.intern(name);
        if let Some(NodeData::Element(elem)) = self.nodes.get_mut(element.index()).map(|n| &mut n.data) {
            elem.set_attr(name, value.to_string());
        }
    }

    /// Append a detached node as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        debug_assert!(
            !self.nodes[child.index()].parent.is_valid(),
            "append_child expects a detached node"
        );

        let prev = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = NodeId::NONE;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        self.order.take();
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Parent of a node, `None` for the document node and detached nodes
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Iterate direct children in document order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Iterate all descendants (not the node itself) in document order
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Rank of a node in document order
    ///
    /// Nodes attached under the document come first, in depth-first order;
    /// detached nodes follow in arena order.
    pub fn document_position(&self, id: NodeId) -> usize {
        self.order()
            .get(id.index())
            .map_or(usize::MAX, |&rank| rank as usize)
    }

    fn order(&self) -> &[u32] {
        self.order.get_or_init(|| {
            let mut ranks = vec![u32::MAX; self.nodes.len()];
            ranks[NodeId::ROOT.index()] = 0;
            let mut next = 1u32;
            for (id, _) in self.descendants(NodeId::ROOT) {
                ranks[id.index()] = next;
                next += 1;
            }
            for rank in ranks.iter_mut().filter(|r| **r == u32::MAX) {
                *rank = next;
                next += 1;
            }
            tracing::trace!("computed document order for {} nodes", ranks.len());
            ranks
        })
    }

    // ------------------------------------------------------------------
    // Node projections
    // ------------------------------------------------------------------

    /// Tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)
            .and_then(Node::as_element)
            .map(|e| self.resolve(e.name))
    }

    /// Attributes of an element in source order (empty for other nodes)
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        self.get(id)
            .and_then(Node::as_element)
            .map(|e| e.attrs.as_slice())
            .unwrap_or(&[])
    }

    /// Value of a named attribute
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let name = self.interner.lookup(name)?;
        self.get(id)?.as_element()?.get_attr(name)
    }

    /// Text content: the node's own text for text and comment nodes, the
    /// concatenated descendant text for elements and the document
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        match &node.data {
            NodeData::Text(text) | NodeData::Comment(text) => text.clone(),
            NodeData::ProcessingInstruction { data, .. } => data.clone(),
            NodeData::Doctype { .. } => String::new(),
            NodeData::Element(_) | NodeData::Document => self
                .descendants(id)
                .filter_map(|(_, n)| n.as_text())
                .collect(),
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Depth-first iterator over the descendants of a node
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Descendants<'_> {
    fn advance(&self, from: &Node) -> NodeId {
        if from.first_child.is_valid() {
            return from.first_child;
        }
        let mut current = from;
        loop {
            if current.next_sibling.is_valid() {
                return current.next_sibling;
            }
            if current.parent == self.root {
                return NodeId::NONE;
            }
            match self.tree.get(current.parent) {
                Some(parent) => current = parent,
                None => return NodeId::NONE,
            }
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = self.advance(node);
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        // <div><span>Hello</span>World</div>
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let span = tree.create_element("span");
        let hello = tree.create_text("Hello");
        let world = tree.create_text("World");
        tree.append_child(tree.root(), div);
        tree.append_child(div, span);
        tree.append_child(span, hello);
        tree.append_child(div, world);
        (tree, div, span, world)
    }

    #[test]
    fn test_children_in_order() {
        let (tree, div, span, world) = sample();
        let ids: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![span, world]);
    }

    #[test]
    fn test_descendants_stop_at_subtree() {
        let (tree, _, span, _) = sample();
        let ids: Vec<_> = tree.descendants(span).map(|(id, _)| id).collect();
        assert_eq!(ids.len(), 1);
        assert_eq!(tree.text_content(span), "Hello");
    }

    #[test]
    fn test_text_content_concatenates() {
        let (tree, div, _, _) = sample();
        assert_eq!(tree.text_content(div), "HelloWorld");
        assert_eq!(tree.text_content(tree.root()), "HelloWorld");
    }

    #[test]
    fn test_document_position_follows_tree_not_arena() {
        let mut tree = DomTree::new();
        let late = tree.create_element("late");
        let early = tree.create_element("early");
        tree.append_child(tree.root(), early);
        tree.append_child(tree.root(), late);
        assert!(tree.document_position(early) < tree.document_position(late));

        // Mutation invalidates the cached order
        let last = tree.create_element("last");
        tree.append_child(early, last);
        assert!(tree.document_position(last) < tree.document_position(late));
    }

    #[test]
    fn test_attribute_lookup() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        tree.set_attribute(a, "href", "/x");
        assert_eq!(tree.attribute(a, "href"), Some("/x"));
        assert_eq!(tree.attribute(a, "missing-attribute"), None);
        assert_eq!(tree.tag_name(a), Some("a"));
        assert_eq!(tree.parent(a), None);
    }
}
