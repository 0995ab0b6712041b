//! Flattens GraphQL operations.
//!
//! A [`Defragmenter`] ingests GraphQL documents containing operations and
//! fragments. Flattening an operation inlines every fragment spread, merges
//! every field that is selected more than once in the same scope into one
//! field, and sorts fields by response key. Optionally each field is tagged
//! with a `@gql_defrag_source(name: "...")` directive recording the path
//! of operation, fragment and field names it was reached through.

pub mod ast;
mod defrag_error;
mod defragmenter;
mod definition_registry;
pub mod file_reader;
pub mod provenance;
mod selection_resolver;
pub mod source_finder;

pub use defrag_error::DefragError;
pub use defragmenter::DEFAULT_MAX_DEPTH;
pub use defragmenter::Defragmenter;
pub use defragmenter::DefragmenterOptions;
pub use definition_registry::DefinitionRegistry;
pub use selection_resolver::SelectionResolver;

#[cfg(test)]
mod tests;
