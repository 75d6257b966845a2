use std::collections::HashMap;

use tracing::trace;

use crate::ast::document::{FragmentDefinition, Selection, SelectionNode};
use crate::error::CompileError;

/// Fragment definitions of a single document, addressable by name.
#[derive(Debug, Default)]
pub struct FragmentTable<'doc> {
    fragments: HashMap<&'doc str, &'doc FragmentDefinition>,
}

impl<'doc> FragmentTable<'doc> {
    pub fn new(definitions: &'doc [FragmentDefinition]) -> Self {
        Self {
            fragments: definitions
                .iter()
                .map(|fragment| (fragment.name.as_str(), fragment))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&'doc FragmentDefinition> {
        self.fragments.get(name).copied()
    }

    /// Resolves a selection set into its fields, substituting each fragment spread
    /// with the fields of the referenced fragment.
    ///
    /// Only one level is inlined: spreads found at the top of a fragment are skipped.
    pub fn inline_fields<'sel>(
        &self,
        selections: &'sel [Selection],
    ) -> Result<Vec<&'sel SelectionNode>, CompileError>
    where
        'doc: 'sel,
    {
        let mut fields = Vec::with_capacity(selections.len());

        for selection in selections {
            match selection {
                Selection::Field(field) => fields.push(field),
                Selection::FragmentSpread(name) => {
                    let fragment = self
                        .get(name)
                        .ok_or_else(|| CompileError::UnknownFragment(name.clone()))?;

                    for fragment_selection in &fragment.selections {
                        match fragment_selection {
                            Selection::Field(field) => fields.push(field),
                            Selection::FragmentSpread(nested) => {
                                trace!(
                                    fragment = name.as_str(),
                                    nested = nested.as_str(),
                                    "skipping nested fragment spread"
                                );
                            }
                        }
                    }
                }
            }
        }

        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Document;

    use super::*;

    fn field_names(fields: &[&SelectionNode]) -> Vec<String> {
        fields.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn spreads_are_replaced_by_fragment_fields() {
        let document = Document::parse(
            r#"
            { books { id ...BookParts price } }
            fragment BookParts on Book { title author }
            "#,
        )
        .unwrap();
        let table = FragmentTable::new(&document.fragments);
        let Selection::Field(books) = &document.operations[0].selections[0] else {
            panic!("expected a field");
        };

        let fields = table.inline_fields(&books.selections).unwrap();
        assert_eq!(field_names(&fields), vec!["id", "title", "author", "price"]);
    }

    #[test]
    fn nested_spreads_are_not_expanded() {
        let document = Document::parse(
            r#"
            { books { ...Outer } }
            fragment Outer on Book { id ...Inner }
            fragment Inner on Book { title }
            "#,
        )
        .unwrap();
        let table = FragmentTable::new(&document.fragments);
        let Selection::Field(books) = &document.operations[0].selections[0] else {
            panic!("expected a field");
        };

        let fields = table.inline_fields(&books.selections).unwrap();
        assert_eq!(field_names(&fields), vec!["id"]);
    }

    #[test]
    fn unknown_fragments_are_reported() {
        let document = Document::parse("{ books { ...Missing } }").unwrap();
        let table = FragmentTable::new(&document.fragments);
        let Selection::Field(books) = &document.operations[0].selections[0] else {
            panic!("expected a field");
        };

        let result = table.inline_fields(&books.selections);
        assert!(matches!(result, Err(CompileError::UnknownFragment(name)) if name == "Missing"));
    }
}
