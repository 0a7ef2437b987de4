//! Expression evaluation over a [`DomTree`]

use soup_dom::{DomTree, NodeData, NodeId};

use crate::ast::{Axis, BinaryOp, Expr, NodeTest, Step};
use crate::error::{Result, XPathError};
use crate::value::{
    format_number, normalize_space, parse_number, sort_document_order, string_value, XNode,
    XPathValue,
};

/// Evaluation context: node, proximity position and size
#[derive(Debug, Clone, Copy)]
struct Context {
    node: XNode,
    position: usize,
    size: usize,
}

pub(crate) struct Evaluator<'t> {
    tree: &'t DomTree,
}

impl<'t> Evaluator<'t> {
    pub(crate) fn new(tree: &'t DomTree) -> Self {
        Self { tree }
    }

    /// Evaluate with `node` as the single context node
    pub(crate) fn evaluate(&self, expr: &Expr, node: NodeId) -> Result<XPathValue> {
        let ctx = Context {
            node: XNode::Tree(node),
            position: 1,
            size: 1,
        };
        self.eval(expr, &ctx)
    }

    fn eval(&self, expr: &Expr, ctx: &Context) -> Result<XPathValue> {
        match expr {
            Expr::Number(n) => Ok(XPathValue::Number(*n)),
            Expr::String(s) => Ok(XPathValue::String(s.clone())),
            Expr::Negate(inner) => {
                let value = self.eval(inner, ctx)?;
                Ok(XPathValue::Number(-self.to_number(&value)))
            }
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right, ctx),
            Expr::Function { name, args } => self.call(name, args, ctx),
            Expr::Path { absolute, steps } => {
                let start = if *absolute {
                    XNode::Tree(self.tree.root())
                } else {
                    ctx.node
                };
                Ok(XPathValue::NodeSet(self.walk(vec![start], steps)?))
            }
            Expr::Filter {
                primary,
                predicates,
                steps,
            } => {
                let nodes = self
                    .eval(primary, ctx)?
                    .into_node_set()
                    .ok_or(XPathError::NotANodeSet)?;
                let nodes = self.filter(nodes, predicates)?;
                Ok(XPathValue::NodeSet(self.walk(nodes, steps)?))
            }
            Expr::Union(left, right) => {
                let mut nodes = self.node_set(left, ctx)?;
                nodes.extend(self.node_set(right, ctx)?);
                sort_document_order(self.tree, &mut nodes);
                Ok(XPathValue::NodeSet(nodes))
            }
        }
    }

    fn node_set(&self, expr: &Expr, ctx: &Context) -> Result<Vec<XNode>> {
        self.eval(expr, ctx)?
            .into_node_set()
            .ok_or(XPathError::NotANodeSet)
    }

    // ------------------------------------------------------------------
    // Location paths
    // ------------------------------------------------------------------

    fn walk(&self, start: Vec<XNode>, steps: &[Step]) -> Result<Vec<XNode>> {
        let mut current = start;
        for step in steps {
            let mut next = Vec::new();
            for &node in &current {
                let candidates: Vec<XNode> = self
                    .axis(node, step.axis)
                    .into_iter()
                    .filter(|&n| self.matches(n, step))
                    .collect();
                next.extend(self.filter(candidates, &step.predicates)?);
            }
            sort_document_order(self.tree, &mut next);
            current = next;
        }
        Ok(current)
    }

    /// Apply predicates in turn; positions follow the order of `nodes`
    fn filter(&self, mut nodes: Vec<XNode>, predicates: &[Expr]) -> Result<Vec<XNode>> {
        for predicate in predicates {
            let size = nodes.len();
            let mut kept = Vec::with_capacity(size);
            for (i, node) in nodes.into_iter().enumerate() {
                let ctx = Context {
                    node,
                    position: i + 1,
                    size,
                };
                let keep = match self.eval(predicate, &ctx)? {
                    XPathValue::Number(n) => n == (i + 1) as f64,
                    other => other.to_boolean(),
                };
                if keep {
                    kept.push(node);
                }
            }
            nodes = kept;
        }
        Ok(nodes)
    }

    /// Nodes along an axis, in axis order (reverse axes nearest first)
    fn axis(&self, node: XNode, axis: Axis) -> Vec<XNode> {
        let tree = self.tree;
        match (axis, node) {
            (Axis::SelfAxis, _) => vec![node],
            (Axis::Child, XNode::Tree(id)) => {
                tree.children(id).map(|(c, _)| XNode::Tree(c)).collect()
            }
            (Axis::Descendant, XNode::Tree(id)) => {
                tree.descendants(id).map(|(d, _)| XNode::Tree(d)).collect()
            }
            (Axis::DescendantOrSelf, XNode::Tree(id)) => std::iter::once(node)
                .chain(tree.descendants(id).map(|(d, _)| XNode::Tree(d)))
                .collect(),
            (Axis::DescendantOrSelf, XNode::Attribute { .. }) => vec![node],
            (Axis::Parent, _) => self.parent(node).into_iter().collect(),
            (Axis::Ancestor, _) => self.ancestors(node),
            (Axis::AncestorOrSelf, _) => {
                let mut nodes = vec![node];
                nodes.extend(self.ancestors(node));
                nodes
            }
            (Axis::FollowingSibling, XNode::Tree(id)) => {
                let mut nodes = Vec::new();
                let mut next = tree.get(id).map_or(NodeId::NONE, |n| n.next_sibling);
                while let Some(sibling) = tree.get(next) {
                    nodes.push(XNode::Tree(next));
                    next = sibling.next_sibling;
                }
                nodes
            }
            (Axis::PrecedingSibling, XNode::Tree(id)) => {
                let mut nodes = Vec::new();
                let mut prev = tree.get(id).map_or(NodeId::NONE, |n| n.prev_sibling);
                while let Some(sibling) = tree.get(prev) {
                    nodes.push(XNode::Tree(prev));
                    prev = sibling.prev_sibling;
                }
                nodes
            }
            (Axis::Following, _) => self.following(node),
            (Axis::Preceding, _) => self.preceding(node.node_id()),
            (Axis::Attribute, XNode::Tree(id)) => (0..tree.attributes(id).len())
                .map(|index| XNode::Attribute { owner: id, index })
                .collect(),
            // Attributes are leaves without siblings
            (
                Axis::Child
                | Axis::Descendant
                | Axis::FollowingSibling
                | Axis::PrecedingSibling
                | Axis::Attribute,
                XNode::Attribute { .. },
            ) => Vec::new(),
        }
    }

    fn parent(&self, node: XNode) -> Option<XNode> {
        match node {
            XNode::Tree(id) => self.tree.parent(id).map(XNode::Tree),
            XNode::Attribute { owner, .. } => Some(XNode::Tree(owner)),
        }
    }

    fn ancestors(&self, node: XNode) -> Vec<XNode> {
        let mut nodes = Vec::new();
        let mut current = self.parent(node);
        while let Some(ancestor) = current {
            nodes.push(ancestor);
            current = self.parent(ancestor);
        }
        nodes
    }

    fn following(&self, node: XNode) -> Vec<XNode> {
        let tree = self.tree;
        let mut nodes = Vec::new();
        let mut current = match node {
            XNode::Tree(id) => id,
            XNode::Attribute { owner, .. } => {
                nodes.extend(tree.descendants(owner).map(|(d, _)| XNode::Tree(d)));
                owner
            }
        };
        loop {
            let mut next = tree.get(current).map_or(NodeId::NONE, |n| n.next_sibling);
            while let Some(sibling) = tree.get(next) {
                nodes.push(XNode::Tree(next));
                nodes.extend(tree.descendants(next).map(|(d, _)| XNode::Tree(d)));
                next = sibling.next_sibling;
            }
            match tree.parent(current) {
                Some(parent) => current = parent,
                None => return nodes,
            }
        }
    }

    fn preceding(&self, id: NodeId) -> Vec<XNode> {
        let tree = self.tree;
        let ancestors: Vec<NodeId> = self
            .ancestors(XNode::Tree(id))
            .into_iter()
            .map(XNode::node_id)
            .collect();
        let mut nodes: Vec<XNode> = tree
            .descendants(tree.root())
            .map(|(d, _)| d)
            .take_while(|&d| d != id)
            .filter(|d| !ancestors.contains(d))
            .map(XNode::Tree)
            .collect();
        nodes.reverse();
        nodes
    }

    fn matches(&self, node: XNode, step: &Step) -> bool {
        match node {
            XNode::Attribute { owner, index } => {
                if step.axis != Axis::Attribute && !matches!(step.test, NodeTest::Node) {
                    return false;
                }
                let Some(attr) = self.tree.attributes(owner).get(index) else {
                    return false;
                };
                match &step.test {
                    NodeTest::Name(name) => self.tree.resolve(attr.name) == name.as_str(),
                    NodeTest::Wildcard | NodeTest::Node => true,
                    _ => false,
                }
            }
            XNode::Tree(id) => {
                let Some(data) = self.tree.get(id).map(|n| &n.data) else {
                    return false;
                };
                match (&step.test, data) {
                    (NodeTest::Node, _) => step.axis != Axis::Attribute,
                    (_, _) if step.axis == Axis::Attribute => false,
                    (NodeTest::Wildcard, NodeData::Element(_)) => true,
                    (NodeTest::Name(name), NodeData::Element(elem)) => {
                        self.tree.resolve(elem.name) == name.as_str()
                    }
                    (NodeTest::Text, NodeData::Text(_)) => true,
                    (NodeTest::Comment, NodeData::Comment(_)) => true,
                    (
                        NodeTest::ProcessingInstruction(expected),
                        NodeData::ProcessingInstruction { target, .. },
                    ) => expected
                        .as_deref()
                        .is_none_or(|e| self.tree.resolve(*target) == e),
                    _ => false,
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Operators
    // ------------------------------------------------------------------

    fn eval_binary(&self, op: BinaryOp, left: &Expr, right: &Expr, ctx: &Context) -> Result<XPathValue> {
        match op {
            BinaryOp::Or => {
                let value = self.eval(left, ctx)?.to_boolean() || self.eval(right, ctx)?.to_boolean();
                Ok(XPathValue::Boolean(value))
            }
            BinaryOp::And => {
                let value = self.eval(left, ctx)?.to_boolean() && self.eval(right, ctx)?.to_boolean();
                Ok(XPathValue::Boolean(value))
            }
            op if op.is_comparison() => {
                let l = self.eval(left, ctx)?;
                let r = self.eval(right, ctx)?;
                Ok(XPathValue::Boolean(self.compare(op, &l, &r)))
            }
            _ => {
                let l = self.to_number(&self.eval(left, ctx)?);
                let r = self.to_number(&self.eval(right, ctx)?);
                let n = match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Subtract => l - r,
                    BinaryOp::Multiply => l * r,
                    BinaryOp::Div => l / r,
                    // Truncating remainder, sign follows the dividend
                    _ => l % r,
                };
                Ok(XPathValue::Number(n))
            }
        }
    }

    /// XPath 1.0 comparison: node-sets compare existentially through the
    /// string values of their members
    fn compare(&self, op: BinaryOp, left: &XPathValue, right: &XPathValue) -> bool {
        match (left, right) {
            (XPathValue::NodeSet(_), XPathValue::Boolean(b)) => {
                compare_atoms(op, &XPathValue::Boolean(left.to_boolean()), &XPathValue::Boolean(*b))
            }
            (XPathValue::Boolean(b), XPathValue::NodeSet(_)) => {
                compare_atoms(op, &XPathValue::Boolean(*b), &XPathValue::Boolean(right.to_boolean()))
            }
            (XPathValue::NodeSet(l), XPathValue::NodeSet(r)) => {
                let right_values: Vec<XPathValue> = r
                    .iter()
                    .map(|&n| XPathValue::String(string_value(self.tree, n)))
                    .collect();
                l.iter().any(|&n| {
                    let lv = XPathValue::String(string_value(self.tree, n));
                    right_values.iter().any(|rv| compare_atoms(op, &lv, rv))
                })
            }
            (XPathValue::NodeSet(l), atom) => l.iter().any(|&n| {
                compare_atoms(op, &XPathValue::String(string_value(self.tree, n)), atom)
            }),
            (atom, XPathValue::NodeSet(r)) => r.iter().any(|&n| {
                compare_atoms(op, atom, &XPathValue::String(string_value(self.tree, n)))
            }),
            (l, r) => compare_atoms(op, l, r),
        }
    }

    // ------------------------------------------------------------------
    // Conversions
    // ------------------------------------------------------------------

    fn to_string(&self, value: &XPathValue) -> String {
        match value {
            XPathValue::NodeSet(nodes) => nodes
                .first()
                .map(|&n| string_value(self.tree, n))
                .unwrap_or_default(),
            other => atom_to_string(other),
        }
    }

    fn to_number(&self, value: &XPathValue) -> f64 {
        match value {
            XPathValue::NodeSet(_) => parse_number(&self.to_string(value)),
            other => atom_to_number(other),
        }
    }

    // ------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------

    fn call(&self, name: &str, args: &[Expr], ctx: &Context) -> Result<XPathValue> {
        let values = args
            .iter()
            .map(|arg| self.eval(arg, ctx))
            .collect::<Result<Vec<_>>>()?;

        // Optional string argument defaults to the context node's string value
        let string_arg = |index: usize| -> String {
            values
                .get(index)
                .map_or_else(|| string_value(self.tree, ctx.node), |v| self.to_string(v))
        };

        let value = match name {
            "last" => XPathValue::Number(ctx.size as f64),
            "position" => XPathValue::Number(ctx.position as f64),
            "count" => match values.first() {
                Some(XPathValue::NodeSet(nodes)) => XPathValue::Number(nodes.len() as f64),
                _ => return Err(XPathError::NotANodeSet),
            },
            "name" | "local-name" => {
                let node = match values.first() {
                    None => Some(ctx.node),
                    Some(XPathValue::NodeSet(nodes)) => nodes.first().copied(),
                    Some(_) => return Err(XPathError::NotANodeSet),
                };
                XPathValue::String(node.map(|n| self.node_name(n)).unwrap_or_default())
            }
            "string" => XPathValue::String(string_arg(0)),
            "concat" => XPathValue::String(values.iter().map(|v| self.to_string(v)).collect()),
            "contains" => XPathValue::Boolean(string_arg(0).contains(string_arg(1).as_str())),
            "starts-with" => XPathValue::Boolean(string_arg(0).starts_with(string_arg(1).as_str())),
            "normalize-space" => XPathValue::String(normalize_space(&string_arg(0))),
            "string-length" => XPathValue::Number(string_arg(0).chars().count() as f64),
            "boolean" => XPathValue::Boolean(values.first().is_some_and(XPathValue::to_boolean)),
            "not" => XPathValue::Boolean(!values.first().is_some_and(XPathValue::to_boolean)),
            "true" => XPathValue::Boolean(true),
            "false" => XPathValue::Boolean(false),
            "number" => XPathValue::Number(match values.first() {
                Some(v) => self.to_number(v),
                None => parse_number(&string_value(self.tree, ctx.node)),
            }),
            other => return Err(XPathError::UnknownFunction(other.to_string())),
        };
        Ok(value)
    }

    fn node_name(&self, node: XNode) -> String {
        match node {
            XNode::Attribute { owner, index } => self
                .tree
                .attributes(owner)
                .get(index)
                .map(|a| self.tree.resolve(a.name).to_string())
                .unwrap_or_default(),
            XNode::Tree(id) => match self.tree.get(id).map(|n| &n.data) {
                Some(NodeData::Element(elem)) => self.tree.resolve(elem.name).to_string(),
                Some(NodeData::ProcessingInstruction { target, .. }) => {
                    self.tree.resolve(*target).to_string()
                }
                _ => String::new(),
            },
        }
    }
}

fn atom_to_string(value: &XPathValue) -> String {
    match value {
        XPathValue::String(s) => s.clone(),
        XPathValue::Number(n) => format_number(*n),
        XPathValue::Boolean(b) => b.to_string(),
        XPathValue::NodeSet(_) => String::new(),
    }
}

fn atom_to_number(value: &XPathValue) -> f64 {
    match value {
        XPathValue::Number(n) => *n,
        XPathValue::Boolean(b) => f64::from(u8::from(*b)),
        XPathValue::String(s) => parse_number(s),
        XPathValue::NodeSet(_) => f64::NAN,
    }
}

/// Compare two non-node-set values
fn compare_atoms(op: BinaryOp, left: &XPathValue, right: &XPathValue) -> bool {
    match op {
        BinaryOp::Equal | BinaryOp::NotEqual => {
            let equal = match (left, right) {
                (XPathValue::Boolean(_), _) | (_, XPathValue::Boolean(_)) => {
                    left.to_boolean() == right.to_boolean()
                }
                (XPathValue::Number(_), _) | (_, XPathValue::Number(_)) => {
                    atom_to_number(left) == atom_to_number(right)
                }
                _ => atom_to_string(left) == atom_to_string(right),
            };
            equal == (op == BinaryOp::Equal)
        }
        _ => {
            let (l, r) = (atom_to_number(left), atom_to_number(right));
            match op {
                BinaryOp::Less => l < r,
                BinaryOp::LessEqual => l <= r,
                BinaryOp::Greater => l > r,
                _ => l >= r,
            }
        }
    }
}
