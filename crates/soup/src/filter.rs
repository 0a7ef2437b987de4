//! Search filters
//!
//! [`Filter`] collects the loosely typed arguments of a search (a tag name
//! or a list of them, attribute constraints, text constraints, scope and
//! limit). [`Filter::normalize`] turns them into a [`FilterSpec`], the closed
//! form the query compiler works from. Normalization accepts every input.

use indexmap::{IndexMap, IndexSet};

/// Tag name argument
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NameArg {
    #[default]
    Omitted,
    Bool(bool),
    Name(String),
    Names(Vec<String>),
}

/// Positional attribute argument
#[derive(Debug, Clone, PartialEq)]
pub enum AttrsArg {
    /// Attribute name to constraint
    Map(IndexMap<String, AttrValue>),
    /// Value matched against any attribute
    Value(String),
    /// Values matched against any attribute, any of them
    Values(Vec<String>),
}

impl Default for AttrsArg {
    fn default() -> Self {
        AttrsArg::Map(IndexMap::new())
    }
}

/// Text argument
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TextArg {
    #[default]
    Omitted,
    Bool(bool),
    Value(String),
    Values(Vec<String>),
}

/// Constraint on a single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// The attribute must not be present
    Absent,
    Bool(bool),
    Str(String),
    Int(i64),
    List(Vec<AttrValue>),
}

/// Raw search arguments
///
/// ```ignore
/// let filter = Filter::tag("a").attr("class", "external").limit(10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    name: NameArg,
    attrs: AttrsArg,
    named: IndexMap<String, AttrValue>,
    text: TextArg,
    recursive: bool,
    limit: usize,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            name: NameArg::Omitted,
            attrs: AttrsArg::default(),
            named: IndexMap::new(),
            text: TextArg::Omitted,
            recursive: true,
            limit: 0,
        }
    }
}

impl Filter {
    /// Match every element
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on tag name
    pub fn tag(name: impl Into<NameArg>) -> Self {
        Self::new().name(name)
    }

    pub fn name(mut self, name: impl Into<NameArg>) -> Self {
        self.name = name.into();
        self
    }

    /// Positional attribute argument: a map, or one or more values matched
    /// against any attribute
    pub fn attrs(mut self, attrs: impl Into<AttrsArg>) -> Self {
        self.attrs = attrs.into();
        self
    }

    /// Named attribute constraint; overrides the same key in [`Filter::attrs`]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<TextArg>) -> Self {
        self.text = text.into();
        self
    }

    /// Search all descendants (default) or direct children only
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Maximum number of results, 0 for no limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Canonicalize into a [`FilterSpec`]
    pub fn normalize(&self) -> FilterSpec {
        let text = match &self.text {
            TextArg::Omitted | TextArg::Bool(false) => TextFilter::None,
            TextArg::Bool(true) => TextFilter::Any,
            TextArg::Value(s) => TextFilter::OneOf(IndexSet::from([s.clone()])),
            TextArg::Values(values) => TextFilter::OneOf(values.iter().cloned().collect()),
        };

        let name = match &self.name {
            NameArg::Omitted | NameArg::Bool(false) if text != TextFilter::None => NameFilter::None,
            NameArg::Omitted | NameArg::Bool(_) => NameFilter::Any,
            NameArg::Name(n) => NameFilter::OneOf(IndexSet::from([n.clone()])),
            NameArg::Names(names) => NameFilter::OneOf(names.iter().cloned().collect()),
        };

        let mut named: IndexMap<String, AttributeFilter> = IndexMap::new();
        let mut wildcard = IndexSet::new();
        match &self.attrs {
            AttrsArg::Map(map) => {
                for (key, value) in map {
                    named.insert(key.clone(), AttributeFilter::from_value(value));
                }
            }
            AttrsArg::Value(value) => {
                wildcard.insert(value.clone());
            }
            AttrsArg::Values(values) => wildcard.extend(values.iter().cloned()),
        }
        for (key, value) in &self.named {
            named.insert(key.clone(), AttributeFilter::from_value(value));
        }

        let attrs = if wildcard.is_empty() {
            AttrSpec::Named(named)
        } else {
            AttrSpec::Wildcard {
                values: wildcard,
                named,
            }
        };

        FilterSpec {
            name,
            attrs,
            text,
            recursive: self.recursive,
            limit: self.limit,
        }
    }
}

/// Canonical search filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub name: NameFilter,
    pub attrs: AttrSpec,
    pub text: TextFilter,
    pub recursive: bool,
    /// 0 means unbounded
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFilter {
    /// Not searching for elements
    None,
    Any,
    OneOf(IndexSet<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextFilter {
    None,
    Any,
    OneOf(IndexSet<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeFilter {
    Absent,
    Present,
    Exact(String),
    OneOf(IndexSet<String>),
}

impl AttributeFilter {
    fn from_value(value: &AttrValue) -> Self {
        match value {
            AttrValue::Absent | AttrValue::Bool(false) => AttributeFilter::Absent,
            AttrValue::Bool(true) => AttributeFilter::Present,
            AttrValue::Str(s) => AttributeFilter::Exact(s.clone()),
            AttrValue::Int(i) => AttributeFilter::Exact(i.to_string()),
            AttrValue::List(items) => {
                let mut values = IndexSet::new();
                if collect_list(items, &mut values) {
                    AttributeFilter::Present
                } else {
                    AttributeFilter::OneOf(values)
                }
            }
        }
    }
}

/// Gather the textual members of a value list; true when the list holds `true`
fn collect_list(items: &[AttrValue], values: &mut IndexSet<String>) -> bool {
    let mut present = false;
    for item in items {
        match item {
            AttrValue::Bool(true) => present = true,
            AttrValue::Absent | AttrValue::Bool(false) => {}
            AttrValue::Str(s) => {
                values.insert(s.clone());
            }
            AttrValue::Int(i) => {
                values.insert(i.to_string());
            }
            AttrValue::List(nested) => present |= collect_list(nested, values),
        }
    }
    present
}

/// Attribute part of a [`FilterSpec`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrSpec {
    /// Per-attribute constraints, all of which must hold
    Named(IndexMap<String, AttributeFilter>),
    /// Values matched against any attribute, plus named constraints
    Wildcard {
        values: IndexSet<String>,
        named: IndexMap<String, AttributeFilter>,
    },
}

impl AttrSpec {
    pub fn is_empty(&self) -> bool {
        match self {
            AttrSpec::Named(named) => named.is_empty(),
            AttrSpec::Wildcard { values, named } => values.is_empty() && named.is_empty(),
        }
    }
}

impl Default for AttrSpec {
    fn default() -> Self {
        AttrSpec::Named(IndexMap::new())
    }
}

// ----------------------------------------------------------------------
// Conversions
// ----------------------------------------------------------------------

impl From<bool> for NameArg {
    fn from(b: bool) -> Self {
        NameArg::Bool(b)
    }
}

impl From<&str> for NameArg {
    fn from(s: &str) -> Self {
        NameArg::Name(s.to_string())
    }
}

impl From<String> for NameArg {
    fn from(s: String) -> Self {
        NameArg::Name(s)
    }
}

impl From<Vec<String>> for NameArg {
    fn from(names: Vec<String>) -> Self {
        NameArg::Names(names)
    }
}

impl From<Vec<&str>> for NameArg {
    fn from(names: Vec<&str>) -> Self {
        NameArg::Names(names.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for NameArg {
    fn from(names: [&str; N]) -> Self {
        NameArg::Names(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&str> for AttrsArg {
    fn from(s: &str) -> Self {
        AttrsArg::Value(s.to_string())
    }
}

impl From<String> for AttrsArg {
    fn from(s: String) -> Self {
        AttrsArg::Value(s)
    }
}

impl From<Vec<String>> for AttrsArg {
    fn from(values: Vec<String>) -> Self {
        AttrsArg::Values(values)
    }
}

impl From<Vec<&str>> for AttrsArg {
    fn from(values: Vec<&str>) -> Self {
        AttrsArg::Values(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for AttrsArg {
    fn from(values: [&str; N]) -> Self {
        AttrsArg::Values(values.iter().map(|s| s.to_string()).collect())
    }
}

impl From<IndexMap<String, AttrValue>> for AttrsArg {
    fn from(map: IndexMap<String, AttrValue>) -> Self {
        AttrsArg::Map(map)
    }
}

impl<V: Into<AttrValue>, const N: usize> From<[(&str, V); N]> for AttrsArg {
    fn from(pairs: [(&str, V); N]) -> Self {
        AttrsArg::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.into()))
                .collect(),
        )
    }
}

impl From<bool> for TextArg {
    fn from(b: bool) -> Self {
        TextArg::Bool(b)
    }
}

impl From<&str> for TextArg {
    fn from(s: &str) -> Self {
        TextArg::Value(s.to_string())
    }
}

impl From<String> for TextArg {
    fn from(s: String) -> Self {
        TextArg::Value(s)
    }
}

impl From<Vec<String>> for TextArg {
    fn from(values: Vec<String>) -> Self {
        TextArg::Values(values)
    }
}

impl From<Vec<&str>> for TextArg {
    fn from(values: Vec<&str>) -> Self {
        TextArg::Values(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TextArg {
    fn from(values: [&str; N]) -> Self {
        TextArg::Values(values.iter().map(|s| s.to_string()).collect())
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

impl From<i32> for AttrValue {
    fn from(i: i32) -> Self {
        AttrValue::Int(i64::from(i))
    }
}

impl From<u32> for AttrValue {
    fn from(i: u32) -> Self {
        AttrValue::Int(i64::from(i))
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Absent, Into::into)
    }
}

impl<T: Into<AttrValue>> From<Vec<T>> for AttrValue {
    fn from(values: Vec<T>) -> Self {
        AttrValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<AttrValue>, const N: usize> From<[T; N]> for AttrValue {
    fn from(values: [T; N]) -> Self {
        AttrValue::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> IndexSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_matches_any_element() {
        let spec = Filter::new().normalize();
        assert_eq!(spec.name, NameFilter::Any);
        assert_eq!(spec.text, TextFilter::None);
        assert!(spec.attrs.is_empty());
        assert!(spec.recursive);
        assert_eq!(spec.limit, 0);
    }

    #[test]
    fn test_name_forms() {
        assert_eq!(Filter::tag(true).normalize().name, NameFilter::Any);
        assert_eq!(Filter::tag("a").normalize().name, NameFilter::OneOf(set(&["a"])));
        assert_eq!(
            Filter::tag(["a", "b", "a"]).normalize().name,
            NameFilter::OneOf(set(&["a", "b"]))
        );
        assert_eq!(
            Filter::tag(Vec::<String>::new()).normalize().name,
            NameFilter::OneOf(IndexSet::new())
        );
    }

    #[test]
    fn test_name_false_depends_on_text() {
        assert_eq!(Filter::tag(false).normalize().name, NameFilter::Any);
        let spec = Filter::tag(false).text(true).normalize();
        assert_eq!(spec.name, NameFilter::None);
        assert_eq!(spec.text, TextFilter::Any);
        assert_eq!(Filter::new().text("x").normalize().name, NameFilter::None);
    }

    #[test]
    fn test_text_forms() {
        assert_eq!(Filter::new().text(false).normalize().text, TextFilter::None);
        assert_eq!(
            Filter::new().text(["Foo", "bar"]).normalize().text,
            TextFilter::OneOf(set(&["Foo", "bar"]))
        );
    }

    #[test]
    fn test_attribute_values() {
        let spec = Filter::new()
            .attr("a", AttrValue::Absent)
            .attr("b", false)
            .attr("c", true)
            .attr("d", "x")
            .attr("e", 1)
            .attr("f", ["1", "3"])
            .attr("g", vec![AttrValue::Str("x".into()), AttrValue::Bool(true)])
            .attr("h", vec![AttrValue::Absent, AttrValue::Str("y".into())])
            .normalize();
        let AttrSpec::Named(named) = spec.attrs else {
            panic!("expected named attributes");
        };
        assert_eq!(named["a"], AttributeFilter::Absent);
        assert_eq!(named["b"], AttributeFilter::Absent);
        assert_eq!(named["c"], AttributeFilter::Present);
        assert_eq!(named["d"], AttributeFilter::Exact("x".into()));
        assert_eq!(named["e"], AttributeFilter::Exact("1".into()));
        assert_eq!(named["f"], AttributeFilter::OneOf(set(&["1", "3"])));
        assert_eq!(named["g"], AttributeFilter::Present);
        assert_eq!(named["h"], AttributeFilter::OneOf(set(&["y"])));
    }

    #[test]
    fn test_named_attributes_override_map() {
        let spec = Filter::new()
            .attrs([("id", "map"), ("class", "c")])
            .attr("id", "kw")
            .normalize();
        let AttrSpec::Named(named) = spec.attrs else {
            panic!("expected named attributes");
        };
        assert_eq!(named.len(), 2);
        assert_eq!(named["id"], AttributeFilter::Exact("kw".into()));
    }

    #[test]
    fn test_wildcard_values() {
        let spec = Filter::tag("div").attrs("a d").attr("id", true).normalize();
        assert_eq!(
            spec.attrs,
            AttrSpec::Wildcard {
                values: set(&["a d"]),
                named: IndexMap::from([("id".to_string(), AttributeFilter::Present)]),
            }
        );

        // An empty positional list is the same as no positional attributes
        let spec = Filter::new().attrs(Vec::<String>::new()).normalize();
        assert_eq!(spec.attrs, AttrSpec::Named(IndexMap::new()));
    }

    #[test]
    fn test_normalize_leaves_filter_untouched() {
        let filter = Filter::tag("a").attr("id", 1).limit(3);
        let before = filter.clone();
        let _ = filter.normalize();
        assert_eq!(filter, before);
        assert_eq!(filter.normalize().limit, 3);
    }
}
