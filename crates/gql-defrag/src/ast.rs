//! Owned aliases over the `graphql_parser` executable-document AST.
//!
//! Every tree the defragmenter reads or builds uses these aliases, so the
//! `'static, String` parameters only need to be spelled out once.

pub use graphql_parser::Pos;
pub use graphql_parser::query::ParseError;

pub type Definition = graphql_parser::query::Definition<'static, String>;
pub type Directive = graphql_parser::query::Directive<'static, String>;
pub type Document = graphql_parser::query::Document<'static, String>;
pub type Field = graphql_parser::query::Field<'static, String>;
pub type FragmentDefinition = graphql_parser::query::FragmentDefinition<'static, String>;
pub type FragmentSpread = graphql_parser::query::FragmentSpread<'static, String>;
pub type InlineFragment = graphql_parser::query::InlineFragment<'static, String>;
pub type Mutation = graphql_parser::query::Mutation<'static, String>;
pub type OperationDefinition = graphql_parser::query::OperationDefinition<'static, String>;
pub type Query = graphql_parser::query::Query<'static, String>;
pub type Selection = graphql_parser::query::Selection<'static, String>;
pub type SelectionSet = graphql_parser::query::SelectionSet<'static, String>;
pub type Subscription = graphql_parser::query::Subscription<'static, String>;
pub type TypeCondition = graphql_parser::query::TypeCondition<'static, String>;
pub type Value = graphql_parser::query::Value<'static, String>;

/// Parses an executable document into an owned tree.
pub fn parse(content: &str) -> Result<Document, ParseError> {
    Ok(graphql_parser::query::parse_query::<String>(content)?.into_static())
}

/// The name under which a field's value appears in a response: its alias
/// when present, otherwise its field name.
pub fn response_key(field: &Field) -> &str {
    field.alias.as_deref().unwrap_or(field.name.as_str())
}

pub fn operation_name(op: &OperationDefinition) -> Option<&str> {
    match op {
        OperationDefinition::Query(query) => query.name.as_deref(),
        OperationDefinition::Mutation(mutation) => mutation.name.as_deref(),
        OperationDefinition::Subscription(sub) => sub.name.as_deref(),
        OperationDefinition::SelectionSet(_) => None,
    }
}

pub fn operation_selection_set(op: &OperationDefinition) -> &SelectionSet {
    match op {
        OperationDefinition::Query(query) => &query.selection_set,
        OperationDefinition::Mutation(mutation) => &mutation.selection_set,
        OperationDefinition::Subscription(sub) => &sub.selection_set,
        OperationDefinition::SelectionSet(sel_set) => sel_set,
    }
}

pub fn operation_position(op: &OperationDefinition) -> Pos {
    match op {
        OperationDefinition::Query(query) => query.position,
        OperationDefinition::Mutation(mutation) => mutation.position,
        OperationDefinition::Subscription(sub) => sub.position,
        OperationDefinition::SelectionSet(sel_set) => sel_set.span.0,
    }
}
