//! Query compilation
//!
//! Turns a [`FilterSpec`] into one XPath 1.0 expression. Every name test,
//! attribute constraint and text constraint becomes a predicate on a single
//! location step; alternative names become a union of such steps.

use soup_dom::NodeId;
use soup_xpath::normalize_space;

use crate::config::SoupConfig;
use crate::error::{Result, SoupError};
use crate::filter::{AttrSpec, AttributeFilter, FilterSpec, NameFilter, TextFilter};

/// Query that selects nothing: the parent of the document node
pub const MATCH_NOTHING: &str = "/..";

/// Node a search starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Document,
    Node(NodeId),
}

impl Scope {
    /// Context node for the query engine, `None` for the document
    pub fn node(self) -> Option<NodeId> {
        match self {
            Scope::Document => None,
            Scope::Node(id) => Some(id),
        }
    }
}

/// Compiles filters into XPath
#[derive(Debug, Clone, Copy)]
pub struct QueryCompiler<'c> {
    config: &'c SoupConfig,
}

impl<'c> QueryCompiler<'c> {
    pub fn new(config: &'c SoupConfig) -> Self {
        Self { config }
    }

    pub fn compile(&self, spec: &FilterSpec, scope: Scope) -> Result<String> {
        let prefix = match (spec.recursive, scope) {
            (false, _) => "",
            (true, Scope::Document) => "//",
            (true, Scope::Node(_)) => ".//",
        };

        let query = if spec.name == NameFilter::None && spec.attrs.is_empty() {
            self.text_query(prefix, &spec.text)?
        } else {
            self.element_query(prefix, spec)
        };

        Ok(if spec.limit > 0 {
            format!("({query})[position() <= {}]", spec.limit)
        } else {
            query
        })
    }

    /// Search for text and comment nodes only
    fn text_query(&self, prefix: &str, text: &TextFilter) -> Result<String> {
        match text {
            TextFilter::None => Err(SoupError::InvalidFilterCombination(
                "no tag name, attribute or text constraint".to_string(),
            )),
            TextFilter::Any => Ok(format!("{prefix}text() | {prefix}comment()")),
            TextFilter::OneOf(values) if values.is_empty() => Ok(MATCH_NOTHING.to_string()),
            TextFilter::OneOf(values) => Ok(values
                .iter()
                .map(|value| {
                    let value = literal(value);
                    format!("{prefix}text()[.={value}] | {prefix}comment()[.={value}]")
                })
                .collect::<Vec<_>>()
                .join(" | ")),
        }
    }

    fn element_query(&self, prefix: &str, spec: &FilterSpec) -> String {
        let tests: Vec<String> = match &spec.name {
            NameFilter::None | NameFilter::Any => vec!["*".to_string()],
            NameFilter::OneOf(names) if names.is_empty() => return MATCH_NOTHING.to_string(),
            NameFilter::OneOf(names) => names.iter().map(|n| name_test(n)).collect(),
        };

        let mut predicates = self.attribute_predicates(&spec.attrs);
        predicates.push_str(&text_predicate(&spec.text));

        tests
            .iter()
            .map(|test| format!("{prefix}{test}{predicates}"))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn attribute_predicates(&self, attrs: &AttrSpec) -> String {
        let mut out = String::new();
        let named = match attrs {
            AttrSpec::Named(named) => named,
            AttrSpec::Wildcard { values, named } => {
                if !values.is_empty() {
                    let any = values
                        .iter()
                        .map(|v| format!("@*={}", literal(v)))
                        .collect::<Vec<_>>()
                        .join(" or ");
                    out.push_str(&format!("[{any}]"));
                }
                named
            }
        };
        for (name, filter) in named {
            out.push('[');
            out.push_str(&self.attribute_condition(name, filter));
            out.push(']');
        }
        out
    }

    fn attribute_condition(&self, name: &str, filter: &AttributeFilter) -> String {
        let attr = attribute_ref(name);
        match filter {
            AttributeFilter::Absent => format!("not({attr})"),
            AttributeFilter::Present => attr,
            AttributeFilter::Exact(value) => self.value_test(name, &attr, value),
            AttributeFilter::OneOf(values) if values.is_empty() => "false()".to_string(),
            AttributeFilter::OneOf(values) => values
                .iter()
                .map(|value| self.value_test(name, &attr, value))
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }

    /// Equality, or token-sequence containment for list attributes
    ///
    /// Containment also requires the attribute itself: an empty value would
    /// otherwise match elements that lack it.
    fn value_test(&self, name: &str, attr: &str, value: &str) -> String {
        if self.config.is_list_attribute(name) {
            let tokens = format!(" {} ", normalize_space(value));
            format!(
                "{attr} and contains(concat(\" \", normalize-space({attr}), \" \"), {})",
                literal(&tokens)
            )
        } else {
            format!("{attr}={}", literal(value))
        }
    }
}

fn text_predicate(text: &TextFilter) -> String {
    match text {
        TextFilter::None => String::new(),
        TextFilter::Any => "[text() or comment()]".to_string(),
        TextFilter::OneOf(values) if values.is_empty() => "[false()]".to_string(),
        TextFilter::OneOf(values) => {
            let any = values
                .iter()
                .map(|v| {
                    let v = literal(v);
                    format!(".//text()={v} or .//comment()={v}")
                })
                .collect::<Vec<_>>()
                .join(" or ");
            format!("[{any}]")
        }
    }
}

fn name_test(name: &str) -> String {
    if is_ncname(name) {
        name.to_string()
    } else {
        format!("*[name()={}]", literal(name))
    }
}

fn attribute_ref(name: &str) -> String {
    if is_ncname(name) {
        format!("@{name}")
    } else {
        format!("@*[name()={}]", literal(name))
    }
}

/// Names usable verbatim in a query
fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_alphabetic())
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_'))
}

/// Quote a string as an XPath literal
pub fn literal(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{value}\"")
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        let parts: Vec<String> = value.split('"').map(|part| format!("\"{part}\"")).collect();
        format!("concat({})", parts.join(", '\"', "))
    }
}
