use tracing::trace;

use crate::ast::Argument;
use crate::compiler::filter::{compile_equality, compile_filter, FilterExpression};
use crate::compiler::order_by::{compile_order_by, page_size};
use crate::compiler::query_string::QueryOptionList;
use crate::compiler::CompileContext;
use crate::error::CompileError;

/// Query options derived from the arguments of a queried field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryArguments {
    filters: Vec<FilterExpression>,
    pub order_by: Option<String>,
    pub top: Option<u64>,
}

impl QueryArguments {
    pub fn filter(&self) -> Option<FilterExpression> {
        FilterExpression::conjunction(self.filters.clone())
    }

    /// Appends `$filter`, `$top` and `$orderby`, in that order.
    pub fn write_to(&self, options: &mut QueryOptionList) {
        if let Some(filter) = self.filter() {
            options.push("$filter", filter.as_str());
        }
        if let Some(top) = self.top {
            options.push("$top", top.to_string());
        }
        if let Some(order_by) = &self.order_by {
            options.push("$orderby", order_by.as_str());
        }
    }
}

/// Routes field arguments to the filter, ordering and paging compilers.
///
/// `filter`/`where`, `orderBy`/`order_by`, `first` and `last` are reserved; any other
/// scalar argument becomes an equality filter on the property of the same name.
pub fn compile_query_arguments(
    ctx: &CompileContext<'_>,
    arguments: &[Argument],
) -> Result<QueryArguments, CompileError> {
    let mut compiled = QueryArguments::default();
    let mut ordered_from_end = false;

    for argument in arguments {
        match argument.name.to_ascii_lowercase().as_str() {
            "filter" | "where" => {
                compiled
                    .filters
                    .extend(compile_filter(ctx, &argument.name, &argument.value)?);
            }
            "orderby" | "order_by" => {
                compiled.order_by = compile_order_by(ctx, &argument.name, &argument.value)?;
            }
            "first" => {
                compiled.top = Some(page_size(ctx, &argument.name, &argument.value)?);
            }
            "last" => {
                compiled.top = Some(page_size(ctx, &argument.name, &argument.value)?);
                ordered_from_end = true;
            }
            _ => {
                compiled
                    .filters
                    .push(compile_equality(ctx, &argument.name, &argument.value)?);
            }
        }
    }

    if ordered_from_end && compiled.order_by.is_none() {
        compiled.order_by = Some(format!("{} desc", ctx.options.last_order_field));
    }

    trace!(?compiled, "compiled query arguments");
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use crate::ast::{Document, Selection, Value};
    use crate::compiler::Variables;
    use crate::options::CompilerOptions;
    use crate::tests::testkit::{test_context, test_model};

    use super::*;

    fn compile_with(source: &str, options: &CompilerOptions) -> Result<String, CompileError> {
        let document = Document::parse(source).unwrap();
        let Selection::Field(root) = &document.operations[0].selections[0] else {
            panic!("expected a field");
        };
        let model = test_model();
        let ctx = test_context(&model, options, Variables::new());

        let compiled = compile_query_arguments(&ctx, &root.arguments)?;
        let mut query = QueryOptionList::default();
        compiled.write_to(&mut query);
        Ok(query.to_nested())
    }

    fn compile(source: &str) -> Result<String, CompileError> {
        compile_with(source, &CompilerOptions::default())
    }

    #[test]
    fn paging_keywords() {
        assert_eq!(compile("{ books(first: 5) { id } }").unwrap(), "$top=5");
        assert_eq!(
            compile("{ books(last: 5) { id } }").unwrap(),
            "$top=5;$orderby=id desc"
        );
    }

    #[test]
    fn last_uses_the_configured_order_field() {
        let options = CompilerOptions {
            last_order_field: "isbn".to_string(),
            ..Default::default()
        };
        assert_eq!(
            compile_with("{ books(last: 2) { id } }", &options).unwrap(),
            "$top=2;$orderby=isbn desc"
        );
    }

    #[test]
    fn explicit_ordering_wins_over_last() {
        assert_eq!(
            compile(r#"{ books(last: 2, orderBy: ["title_desc"]) { id } }"#).unwrap(),
            "$top=2;$orderby=title desc"
        );
    }

    #[test]
    fn unreserved_arguments_become_equality_filters() {
        assert_eq!(
            compile(r#"{ books(author: "Herbert", where: { price_gt: 5 }) { id } }"#).unwrap(),
            "$filter=author eq 'Herbert' and price gt 5"
        );
    }

    #[test]
    fn keyword_names_are_case_insensitive() {
        assert_eq!(compile("{ books(First: 3) { id } }").unwrap(), "$top=3");
    }

    #[test]
    fn grouped_filters_are_parenthesized_when_combined() {
        assert_eq!(
            compile(r#"{ books(author: "A", where: { OR: [{ price_gt: 5 }, { price_lt: 1 }] }) { id } }"#)
                .unwrap(),
            "$filter=author eq 'A' and (price gt 5 or price lt 1)"
        );
    }

    #[test]
    fn object_values_outside_filters_are_rejected() {
        let result = compile(r#"{ books(author: { name: "x" }) { id } }"#);
        assert!(matches!(
            result,
            Err(CompileError::InvalidArgument { argument, .. }) if argument == "author"
        ));
    }

    #[test]
    fn variables_feed_paging() {
        let document = Document::parse("query ($n: Int = 3) { books(first: $n) { id } }").unwrap();
        let Selection::Field(root) = &document.operations[0].selections[0] else {
            panic!("expected a field");
        };
        let model = test_model();
        let options = CompilerOptions::default();
        let ctx = test_context(&model, &options, Variables::from([("n".to_string(), Value::int(9))]));

        let compiled = compile_query_arguments(&ctx, &root.arguments).unwrap();
        assert_eq!(compiled.top, Some(9));
    }
}
