use crate::ast;
use crate::provenance;
use crate::Defragmenter;

pub(super) fn defragmenter(documents: &[&str]) -> Defragmenter {
    Defragmenter::from_documents(documents).unwrap()
}

/// Compares through the printer so that positions and whitespace in the
/// expected text don't matter.
pub(super) fn assert_prints_as(actual: &ast::Document, expected: &str) {
    let expected = ast::parse(expected).unwrap();
    assert_eq!(actual.to_string(), expected.to_string());
}

pub(super) fn operation_selections(doc: &ast::Document) -> &[ast::Selection] {
    match doc.definitions.as_slice() {
        [ast::Definition::Operation(op)] =>
            &ast::operation_selection_set(op).items,
        other => panic!("Expected exactly one operation, found: {other:#?}"),
    }
}

pub(super) fn field_keys(selections: &[ast::Selection]) -> Vec<&str> {
    selections.iter()
        .filter_map(|selection| match selection {
            ast::Selection::Field(field) => Some(ast::response_key(field)),
            _ => None,
        })
        .collect()
}

pub(super) fn find_field<'a>(
    selections: &'a [ast::Selection],
    response_key: &str,
) -> &'a ast::Field {
    selections.iter()
        .find_map(|selection| match selection {
            ast::Selection::Field(field)
                if ast::response_key(field) == response_key => Some(field),
            _ => None,
        })
        .unwrap_or_else(|| panic!("No field with response key `{response_key}`"))
}

pub(super) fn inline_fragments(
    selections: &[ast::Selection],
) -> Vec<&ast::InlineFragment> {
    selections.iter()
        .filter_map(|selection| match selection {
            ast::Selection::InlineFragment(inline) => Some(inline),
            _ => None,
        })
        .collect()
}

pub(super) fn provenance_of(directives: &[ast::Directive]) -> Vec<&str> {
    provenance::provenance_names(directives)
}
