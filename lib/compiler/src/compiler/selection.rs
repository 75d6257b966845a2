use tracing::trace;

use crate::ast::SelectionNode;
use crate::compiler::arguments::compile_query_arguments;
use crate::compiler::query_string::QueryOptionList;
use crate::compiler::CompileContext;
use crate::error::CompileError;
use crate::schema::StructuredType;

/// Projection produced by walking a selection set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionParts {
    pub select: Vec<String>,
    pub expand: Vec<String>,
    /// `$compute` items mapping a property onto a field alias.
    pub compute: Vec<String>,
}

impl SelectionParts {
    pub fn is_empty(&self) -> bool {
        self.select.is_empty() && self.expand.is_empty() && self.compute.is_empty()
    }

    fn merge(&mut self, other: SelectionParts) {
        self.select.extend(other.select);
        self.expand.extend(other.expand);
        self.compute.extend(other.compute);
    }

    /// Appends `$select`, `$expand` and `$compute`, in that order.
    pub fn write_to(&self, options: &mut QueryOptionList) {
        options.push_joined("$select", &self.select);
        self.write_expand_to(options);
    }

    /// Like [`SelectionParts::write_to`], but a root request always leads with `$select`.
    pub fn write_root_to(&self, options: &mut QueryOptionList) {
        options.push_required("$select", self.select.join(","));
        self.write_expand_to(options);
    }

    fn write_expand_to(&self, options: &mut QueryOptionList) {
        options.push_joined("$expand", &self.expand);
        options.push_joined("$compute", &self.compute);
    }
}

/// Compiles the sub-selections of `field` against its owning type.
///
/// `owner` is `None` for results of operations without a known structured return type,
/// whose fields are selected as-is.
pub fn compile_selection(
    ctx: &CompileContext<'_>,
    owner: Option<&StructuredType>,
    field: &SelectionNode,
) -> Result<SelectionParts, CompileError> {
    compile_fields(ctx, owner, "", field)
}

fn compile_fields(
    ctx: &CompileContext<'_>,
    owner: Option<&StructuredType>,
    path: &str,
    field: &SelectionNode,
) -> Result<SelectionParts, CompileError> {
    let mut parts = SelectionParts::default();
    let owner_is_complex = owner.map(StructuredType::is_complex).unwrap_or(false);

    for child in ctx.inline_fields(field)? {
        let child_path = format!("{}{}", path, child.name);

        if child.has_sub_selections() {
            if let Some(owner) = owner {
                if let Some(navigation) = ctx.schema.navigation_property(owner, &child.name) {
                    let target = ctx
                        .schema
                        .structured_type(&navigation.target_type)
                        .ok_or_else(|| CompileError::structured_type(&navigation.target_type))?;
                    let expand_options = compile_expand_options(ctx, target, child)?;
                    let expand_item = if expand_options.is_empty() {
                        child_path.clone()
                    } else {
                        format!("{}({})", child_path, expand_options)
                    };

                    // Navigations reached through a complex property must be selected by path
                    if owner_is_complex {
                        parts.select.push(child_path);
                    }
                    parts.expand.push(expand_item);
                    continue;
                }

                if let Some(property) = ctx.schema.structural_property(owner, &child.name) {
                    if !property.is_primitive() {
                        if let Some(complex) = ctx.schema.structured_type(&property.type_name) {
                            let nested =
                                compile_fields(ctx, Some(complex), &format!("{}/", child_path), child)?;
                            parts.merge(nested);
                            continue;
                        }
                    }
                }
            }

            trace!(field = child.name.as_str(), "selecting unresolved field by name");
        }

        match &child.alias {
            Some(alias) if alias != &child.name && owner.is_some() && !owner_is_complex => {
                parts.compute.push(format!("{} as {}", child_path, alias));
                parts.select.push(alias.clone());
            }
            _ => parts.select.push(child_path),
        }
    }

    Ok(parts)
}

/// Renders the parenthesized options of an `$expand` item, `;`-separated.
fn compile_expand_options(
    ctx: &CompileContext<'_>,
    target: &StructuredType,
    field: &SelectionNode,
) -> Result<String, CompileError> {
    let nested = compile_fields(ctx, Some(target), "", field)?;
    let arguments = compile_query_arguments(ctx, &field.arguments)?;

    let mut options = QueryOptionList::default();
    nested.write_to(&mut options);
    arguments.write_to(&mut options);
    Ok(options.to_nested())
}
