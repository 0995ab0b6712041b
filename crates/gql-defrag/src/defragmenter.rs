use crate::ast;
use crate::provenance::ProvenancePath;
use crate::DefinitionRegistry;
use crate::DefragError;
use crate::SelectionResolver;
use std::path::Path;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, DefragError>;

/// Maximum number of fragment spreads, nested fields and inline fragments
/// that may be entered along a single path before resolution gives up.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DefragmenterOptions {
    pub max_depth: usize,
}
impl DefragmenterOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
impl Default for DefragmenterOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Flattens registered GraphQL operations.
///
/// Operations and fragments are ingested from GraphQL documents; each
/// operation can then be flattened into a standalone document where every
/// fragment spread has been inlined and every duplicated field merged.
///
/// ```
/// use gql_defrag::Defragmenter;
///
/// # fn example() -> Result<(), gql_defrag::DefragError> {
/// let defragmenter = Defragmenter::from_documents([
///     "query GetUser { user { id ...UserFields } }",
///     "fragment UserFields on User { id name }",
/// ])?;
///
/// let flattened = defragmenter.defragment("GetUser", false)?;
/// assert!(flattened.contains("name"));
/// assert!(!flattened.contains("UserFields"));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Clone, Debug, Default)]
pub struct Defragmenter {
    options: DefragmenterOptions,
    registry: DefinitionRegistry,
}
impl Defragmenter {
    /// Prints the flattened form of `operation_name` as GraphQL text.
    pub fn defragment(
        &self,
        operation_name: &str,
        track_provenance: bool,
    ) -> Result<String> {
        Ok(self.flatten(operation_name, track_provenance)?.to_string())
    }

    /// Flattens `operation_name` into a single-operation document.
    ///
    /// The operation keeps its kind, name, variable definitions and
    /// directives; only its selection set is rebuilt. With
    /// `track_provenance`, provenance paths are rooted at the operation
    /// name.
    pub fn flatten(
        &self,
        operation_name: &str,
        track_provenance: bool,
    ) -> Result<ast::Document> {
        let op_def = self.registry.lookup_operation(operation_name)?;
        log::debug!("Flattening operation `{operation_name}`.");

        let provenance =
            if track_provenance {
                Some(ProvenancePath::new(operation_name))
            } else {
                None
            };
        let selection_set = self.resolver().resolve(
            ast::operation_selection_set(op_def),
            provenance.as_ref(),
        )?;

        Ok(ast::Document {
            definitions: vec![ast::Definition::Operation(
                rebuild_operation(op_def, selection_set),
            )],
        })
    }

    /// Lazily flattens every registered operation in registration order.
    pub fn flatten_all(
        &self,
        track_provenance: bool,
    ) -> impl Iterator<Item = Result<(&str, ast::Document)>> + '_ {
        self.registry.operation_names().map(move |operation_name| {
            self.flatten(operation_name, track_provenance)
                .map(|document| (operation_name, document))
        })
    }

    pub fn from_documents<S: AsRef<str>>(
        documents: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let mut defragmenter = Self::new();
        for document in documents {
            defragmenter.ingest(document.as_ref())?;
        }
        Ok(defragmenter)
    }

    pub fn ingest(&mut self, content: &str) -> Result<()> {
        self.registry.ingest(content)
    }

    pub fn ingest_files<P: AsRef<Path>>(
        &mut self,
        file_paths: impl IntoIterator<Item = P>,
    ) -> Result<()> {
        self.registry.ingest_files(file_paths)
    }

    pub fn ingest_str(
        &mut self,
        source_path: Option<PathBuf>,
        content: &str,
    ) -> Result<()> {
        self.registry.ingest_str(source_path, content)
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &DefragmenterOptions {
        &self.options
    }

    /// Flattens every registered operation on the rayon thread pool.
    ///
    /// Results are returned in registration order.
    #[cfg(feature = "parallel")]
    pub fn par_flatten_all(
        &self,
        track_provenance: bool,
    ) -> Vec<Result<(&str, ast::Document)>> {
        use rayon::prelude::*;

        let operation_names: Vec<&str> = self.registry.operation_names().collect();
        operation_names
            .into_par_iter()
            .map(|operation_name| {
                self.flatten(operation_name, track_provenance)
                    .map(|document| (operation_name, document))
            })
            .collect()
    }

    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    pub fn with_options(options: DefragmenterOptions) -> Self {
        Self {
            options,
            registry: DefinitionRegistry::new(),
        }
    }

    fn resolver(&self) -> SelectionResolver<'_> {
        SelectionResolver::new(&self.registry, self.options.max_depth)
    }
}

fn rebuild_operation(
    op_def: &ast::OperationDefinition,
    selection_set: ast::SelectionSet,
) -> ast::OperationDefinition {
    use ast::OperationDefinition as OpDef;
    match op_def {
        OpDef::Query(query) => OpDef::Query(ast::Query {
            position: query.position,
            name: query.name.clone(),
            variable_definitions: query.variable_definitions.clone(),
            directives: query.directives.clone(),
            selection_set,
        }),

        OpDef::Mutation(mutation) => OpDef::Mutation(ast::Mutation {
            position: mutation.position,
            name: mutation.name.clone(),
            variable_definitions: mutation.variable_definitions.clone(),
            directives: mutation.directives.clone(),
            selection_set,
        }),

        OpDef::Subscription(sub) => OpDef::Subscription(ast::Subscription {
            position: sub.position,
            name: sub.name.clone(),
            variable_definitions: sub.variable_definitions.clone(),
            directives: sub.directives.clone(),
            selection_set,
        }),

        OpDef::SelectionSet(_) => OpDef::SelectionSet(selection_set),
    }
}
