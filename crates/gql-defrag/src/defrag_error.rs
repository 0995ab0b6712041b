use crate::file_reader::ReadContentError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DefragError {
    #[error("Failure while trying to read a GraphQL file from disk: {0}")]
    FileRead(Box<ReadContentError>),

    #[error("Error parsing GraphQL document at {source_path:?}: {err}")]
    Parse {
        source_path: PathBuf,
        err: String,
    },

    #[error(
        "Exceeded the maximum selection depth of {limit} while resolving \
        `{}`. Is there a fragment cycle?",
        .provenance.as_deref().unwrap_or("<untracked>"),
    )]
    RecursionLimitExceeded {
        limit: usize,
        provenance: Option<String>,
    },

    #[error("No fragment named `{fragment_name}` has been registered")]
    UnknownFragment {
        fragment_name: String,
    },

    #[error("No operation named `{operation_name}` has been registered")]
    UnknownOperation {
        operation_name: String,
    },

    #[error("Unsupported definition in {source_path:?}: {description}")]
    UnsupportedDefinition {
        source_path: PathBuf,
        description: String,
    },
}
impl std::convert::From<ReadContentError> for DefragError {
    fn from(err: ReadContentError) -> DefragError {
        DefragError::FileRead(Box::new(err))
    }
}
