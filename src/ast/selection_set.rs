use graphql_parser::query::{
    Selection as ParserSelection, SelectionSet as ParserSelectionSet,
};
use serde::{Deserialize, Serialize};

use super::directive::Directive;
use super::value::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionSet {
    pub items: Vec<SelectionItem>,
}

impl SelectionSet {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SelectionItem {
    Field(FieldSelection),
}

impl SelectionItem {
    pub fn field(&self) -> &FieldSelection {
        match self {
            SelectionItem::Field(field) => field,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSelection {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<(String, Value)>,
    pub directives: Vec<Directive>,
    pub selections: SelectionSet,
}

impl From<&ParserSelectionSet<'_, String>> for SelectionSet {
    fn from(parser_selection_set: &ParserSelectionSet<'_, String>) -> Self {
        SelectionSet {
            items: parser_selection_set
                .items
                .iter()
                .map(|parser_selection_item| parser_selection_item.into())
                .collect(),
        }
    }
}

impl From<&ParserSelection<'_, String>> for SelectionItem {
    fn from(parser_selection: &ParserSelection<'_, String>) -> Self {
        match parser_selection {
            ParserSelection::Field(field) => SelectionItem::Field(FieldSelection {
                alias: field.alias.as_ref().map(|alias| alias.to_string()),
                name: field.name.to_string(),
                arguments: field
                    .arguments
                    .iter()
                    .map(|(name, value)| (name.clone(), Value::from(value)))
                    .collect(),
                directives: field.directives.iter().map(Directive::from).collect(),
                selections: (&field.selection_set).into(),
            }),
            ParserSelection::InlineFragment(_) => {
                unimplemented!("inline fragments must be flattened before planning")
            }
            ParserSelection::FragmentSpread(_) => {
                unimplemented!("fragment spreads must be inlined before planning")
            }
        }
    }
}
