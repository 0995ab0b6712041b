use crate::ast;
use crate::file_reader;
use crate::DefragError;
use indexmap::IndexMap;
use std::path::Path;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, DefragError>;

/// Name-keyed store of every operation and fragment definition ingested so
/// far.
///
/// Both maps keep insertion order. Ingesting a definition whose name is
/// already registered replaces the stored definition but keeps the name's
/// original position.
#[derive(Clone, Debug, Default)]
pub struct DefinitionRegistry {
    fragments: IndexMap<String, ast::FragmentDefinition>,
    loaded_str_id_counter: u32,
    operations: IndexMap<String, ast::OperationDefinition>,
}
impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fragment_names(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }

    pub fn ingest(&mut self, content: &str) -> Result<()> {
        self.ingest_str(None, content)
    }

    pub fn ingest_ast(
        &mut self,
        source_path: &Path,
        document: ast::Document,
    ) -> Result<()> {
        for def in document.definitions {
            self.visit_ast_def(source_path, def)?;
        }
        Ok(())
    }

    pub fn ingest_files<P: AsRef<Path>>(
        &mut self,
        file_paths: impl IntoIterator<Item = P>,
    ) -> Result<()> {
        for file_path in file_paths {
            let file_path = file_path.as_ref();
            let file_content = file_reader::read_content(file_path)?;
            self.ingest_str(Some(file_path.to_path_buf()), file_content.as_str())?;
        }
        Ok(())
    }

    /// Parses `content` and registers every definition in it.
    ///
    /// Documents without a path are identified in errors as `str://<n>`.
    pub fn ingest_str(
        &mut self,
        source_path: Option<PathBuf>,
        content: &str,
    ) -> Result<()> {
        let source_path = source_path.unwrap_or_else(|| {
            let str_id = self.loaded_str_id_counter;
            self.loaded_str_id_counter += 1;
            PathBuf::from(format!("str://{str_id}"))
        });

        let document = ast::parse(content)
            .map_err(|err| DefragError::Parse {
                source_path: source_path.to_owned(),
                err: err.to_string(),
            })?;

        log::debug!(
            "Ingesting {} definitions from {source_path:?}.",
            document.definitions.len(),
        );
        self.ingest_ast(source_path.as_path(), document)
    }

    pub fn lookup_fragment(
        &self,
        fragment_name: &str,
    ) -> Result<&ast::FragmentDefinition> {
        self.fragments.get(fragment_name).ok_or_else(|| {
            DefragError::UnknownFragment {
                fragment_name: fragment_name.to_string(),
            }
        })
    }

    pub fn lookup_operation(
        &self,
        operation_name: &str,
    ) -> Result<&ast::OperationDefinition> {
        self.operations.get(operation_name).ok_or_else(|| {
            DefragError::UnknownOperation {
                operation_name: operation_name.to_string(),
            }
        })
    }

    pub fn num_fragments(&self) -> usize {
        self.fragments.len()
    }

    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }

    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    fn visit_ast_def(
        &mut self,
        source_path: &Path,
        def: ast::Definition,
    ) -> Result<()> {
        match def {
            ast::Definition::Fragment(frag_def) => {
                log::trace!("Registering fragment `{}`.", frag_def.name);
                self.fragments.insert(frag_def.name.to_string(), frag_def);
            },

            ast::Definition::Operation(op_def) => {
                let Some(op_name) = ast::operation_name(&op_def) else {
                    let pos = ast::operation_position(&op_def);
                    return Err(DefragError::UnsupportedDefinition {
                        source_path: source_path.to_path_buf(),
                        description: format!(
                            "anonymous operation at {}:{}; every operation \
                            must be named",
                            pos.line,
                            pos.column,
                        ),
                    });
                };
                let op_name = op_name.to_string();
                log::trace!("Registering operation `{op_name}`.");
                self.operations.insert(op_name, op_def);
            },
        }
        Ok(())
    }
}
