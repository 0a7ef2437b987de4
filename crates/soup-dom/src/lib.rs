//! soup DOM - Document Object Model
//!
//! Arena-allocated tree that the HTML parser fills and the query engine reads.
//! Nodes refer to each other through [`NodeId`] indices, never pointers, so
//! any number of read-only views can share one tree.

mod interner;
mod node;
mod tree;

pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Node, NodeData, NodeKind};
pub use tree::{Children, Descendants, DomTree};

/// Node identifier (index into the arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The document node every tree starts with
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for a missing link (no parent, no sibling, ...)
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this id points at a node rather than the sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Position of the node in the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
