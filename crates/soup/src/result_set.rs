//! Search results
//!
//! A snapshot of one query's matches. Slots can be replaced or cleared;
//! clearing leaves a hole so later indices keep their meaning, and
//! [`ResultSet::count`] always reports the number of matches the query
//! produced.

use crate::node::Node;

#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet<'d> {
    matched: usize,
    slots: Vec<Option<Node<'d>>>,
}

impl<'d> ResultSet<'d> {
    pub(crate) fn new(nodes: Vec<Node<'d>>) -> Self {
        Self {
            matched: nodes.len(),
            slots: nodes.into_iter().map(Some).collect(),
        }
    }

    /// Number of nodes the query matched
    pub fn count(&self) -> usize {
        self.matched
    }

    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }

    pub fn get(&self, index: usize) -> Option<Node<'d>> {
        self.slots.get(index).copied().flatten()
    }

    /// Replace a slot, growing the slot list with empty slots if needed
    pub fn set(&mut self, index: usize, node: Node<'d>) {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(node);
    }

    /// Clear a slot and return what it held
    pub fn remove(&mut self, index: usize) -> Option<Node<'d>> {
        self.slots.get_mut(index)?.take()
    }

    /// Whether the slot at `index` holds a node
    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Occupied slots in order
    pub fn iter(&self) -> impl Iterator<Item = Node<'d>> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn first(&self) -> Option<Node<'d>> {
        self.iter().next()
    }

    pub fn to_vec(&self) -> Vec<Node<'d>> {
        self.iter().collect()
    }

    /// String value of every node: its single string child when it has
    /// one, its trimmed text otherwise
    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(|node| node.string_value()).collect()
    }
}

impl<'d> IntoIterator for ResultSet<'d> {
    type Item = Node<'d>;
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<Option<Node<'d>>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter().flatten()
    }
}

impl<'a, 'd> IntoIterator for &'a ResultSet<'d> {
    type Item = Node<'d>;
    type IntoIter = std::iter::Copied<std::iter::Flatten<std::slice::Iter<'a, Option<Node<'d>>>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Filter, Soup};

    #[test]
    fn test_slots() {
        let soup = Soup::new("<a>1</a><a>2</a><a>3</a>");
        let mut results = soup.find_all(&Filter::tag("a")).expect("find_all");
        assert_eq!(results.count(), 3);
        assert_eq!(results.to_strings(), vec!["1", "2", "3"]);

        let first = results.remove(0).expect("first slot");
        assert!(!results.contains(0));
        assert_eq!(results.get(1).map(|n| n.string_value()), Some("2".to_string()));
        assert_eq!(results.count(), 3);
        assert_eq!(results.to_strings(), vec!["2", "3"]);
        assert_eq!(results.remove(0), None);

        results.set(5, first);
        assert!(results.contains(5));
        assert!(!results.contains(4));
        assert_eq!(results.count(), 3);
        assert_eq!(results.to_strings(), vec!["2", "3", "1"]);
        assert_eq!(results.first().map(|n| n.string_value()), Some("2".to_string()));
    }

    #[test]
    fn test_iteration() {
        let soup = Soup::new("<b>x</b><b>y</b>");
        let results = soup.find_all(&Filter::tag("b")).expect("find_all");
        let by_ref: Vec<String> = (&results).into_iter().map(|n| n.own_text()).collect();
        let owned: Vec<String> = results.into_iter().map(|n| n.own_text()).collect();
        assert_eq!(by_ref, owned);
        assert_eq!(owned, vec!["x", "y"]);
    }
}
