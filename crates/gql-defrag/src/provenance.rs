//! Provenance paths and the `@gql_defrag_source` directive.
//!
//! A provenance path records how a selection was reached while flattening:
//! the operation name, then one segment per fragment spread, nested field,
//! or inline fragment that was entered, joined by [`PATH_SEPARATOR`]. For
//! example a field nested under `user`, which itself came from the
//! `UserFields` fragment of `GetUser`, is tagged with:
//!
//! ```graphql
//! id @gql_defrag_source(name: "GetUser -> UserFields -> field user")
//! ```

use crate::ast;

pub const PATH_SEPARATOR: &str = " -> ";
pub const PROVENANCE_ARGUMENT_NAME: &str = "name";
pub const PROVENANCE_DIRECTIVE_NAME: &str = "gql_defrag_source";

const INLINE_FRAGMENT_SEGMENT: &str = "(inline fragment)";

/// One step taken while descending from an operation into its selections.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathSegment<'a> {
    /// A nested field, identified by its response key.
    Field(&'a str),
    Fragment(&'a str),
    InlineFragment,
}
impl std::fmt::Display for PathSegment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(response_key) => write!(f, "field {response_key}"),
            Self::Fragment(fragment_name) => f.write_str(fragment_name),
            Self::InlineFragment => f.write_str(INLINE_FRAGMENT_SEGMENT),
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ProvenancePath(String);
impl ProvenancePath {
    pub fn new(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn extend(&self, segment: PathSegment<'_>) -> Self {
        Self(format!("{}{PATH_SEPARATOR}{segment}", self.0))
    }

    /// Like [`ProvenancePath::extend`], but starts a new path when there is
    /// nothing to extend yet.
    pub fn extend_opt(path: Option<&Self>, segment: PathSegment<'_>) -> Self {
        match path {
            Some(path) => path.extend(segment),
            None => Self(segment.to_string()),
        }
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
impl std::fmt::Display for ProvenancePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_provenance_directive(directive: &ast::Directive) -> bool {
    directive.name == PROVENANCE_DIRECTIVE_NAME
}

/// Builds `@gql_defrag_source(name: "<path>")`.
pub fn provenance_directive(
    path: impl Into<String>,
    position: ast::Pos,
) -> ast::Directive {
    ast::Directive {
        position,
        name: PROVENANCE_DIRECTIVE_NAME.to_string(),
        arguments: vec![(
            PROVENANCE_ARGUMENT_NAME.to_string(),
            ast::Value::String(path.into()),
        )],
    }
}

/// Reads the path argument back out of a provenance directive.
pub fn provenance_name(directive: &ast::Directive) -> Option<&str> {
    if !is_provenance_directive(directive) {
        return None;
    }
    directive.arguments.iter().find_map(|(arg_name, value)| match value {
        ast::Value::String(path) if arg_name == PROVENANCE_ARGUMENT_NAME =>
            Some(path.as_str()),
        _ => None,
    })
}

/// Every provenance path recorded on a node, in directive order.
pub fn provenance_names(directives: &[ast::Directive]) -> Vec<&str> {
    directives.iter().filter_map(provenance_name).collect()
}

/// Tags a node that is being (re)entered at `path`.
///
/// Nodes with no provenance directive get a new one appended. A node that
/// already carries one has its lineage compounded: the existing path is
/// prefixed with `path`. Unrelated directives keep their order.
pub fn attach(
    directives: &[ast::Directive],
    path: &ProvenancePath,
    position: ast::Pos,
) -> Vec<ast::Directive> {
    let mut found_existing = false;
    let mut attached: Vec<ast::Directive> = directives.iter()
        .map(|directive| {
            if !is_provenance_directive(directive) {
                return directive.clone();
            }
            found_existing = true;
            let compounded = match provenance_name(directive) {
                Some(existing) => format!("{path}{PATH_SEPARATOR}{existing}"),
                None => path.to_string(),
            };
            provenance_directive(compounded, directive.position)
        })
        .collect();

    if !found_existing {
        attached.push(provenance_directive(path.as_str(), position));
    }
    attached
}
