//! Search entry points shared by the document and element facades

use crate::classify::execute;
use crate::compile::{QueryCompiler, Scope};
use crate::document::Soup;
use crate::error::Result;
use crate::filter::Filter;
use crate::node::Node;
use crate::result_set::ResultSet;

pub(crate) fn find<'d>(soup: &'d Soup, scope: Scope, filter: &Filter) -> Result<Option<Node<'d>>> {
    let mut spec = filter.normalize();
    spec.limit = 1;
    let query = QueryCompiler::new(soup.config()).compile(&spec, scope)?;
    tracing::debug!("Compiled {:?} into `{}`", spec, query);
    Ok(execute(soup, &query, scope)?.first())
}

pub(crate) fn find_all<'d>(soup: &'d Soup, scope: Scope, filter: &Filter) -> Result<ResultSet<'d>> {
    let spec = filter.normalize();
    let query = QueryCompiler::new(soup.config()).compile(&spec, scope)?;
    tracing::debug!("Compiled {:?} into `{}`", spec, query);
    execute(soup, &query, scope)
}

pub(crate) fn query<'d>(soup: &'d Soup, scope: Scope, xpath: &str) -> Result<ResultSet<'d>> {
    execute(soup, xpath, scope)
}
