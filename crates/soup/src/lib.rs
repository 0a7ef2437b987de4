//! soup
//!
//! Declarative search over parsed HTML. Describe the elements you want
//! (tag names, attribute constraints, text) with a [`Filter`]; the filter is
//! normalized, compiled into one XPath query, evaluated against the tree and
//! returned as typed facades in document order.
//!
//! ```ignore
//! use soup::{Filter, Soup};
//!
//! let soup = Soup::new(r#"<div class="a b">1</div><div class="a c">2</div>"#);
//! let found = soup.find_all(&Filter::tag("div").attr("class", "a b"))?;
//! assert_eq!(found.to_strings(), vec!["1"]);
//! ```

mod classify;
mod compile;
mod config;
mod document;
mod error;
mod filter;
mod node;
mod result_set;
mod search;

pub use compile::{literal, QueryCompiler, Scope, MATCH_NOTHING};
pub use config::{SoupConfig, DEFAULT_LIST_ATTRIBUTES};
pub use document::Soup;
pub use error::{Result, SoupError};
pub use filter::{
    AttrSpec, AttrValue, AttributeFilter, AttrsArg, Filter, FilterSpec, NameArg, NameFilter,
    TextArg, TextFilter,
};
pub use node::{CommentNode, Element, Node, Parent, Property, TextNode};
pub use result_set::ResultSet;

pub use soup_dom::{NodeId, NodeKind};
pub use soup_xpath::XPathError;
