use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use gql_defrag::source_finder;
use gql_defrag::source_finder::ExtractedDocument;
use gql_defrag::source_finder::SourceFinderError;
use gql_defrag::Defragmenter;
use gql_defrag::DefragmenterOptions;
use gql_defrag::DEFAULT_MAX_DEPTH;
use std::path::Path;
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub(crate) struct DefragCmd {
    #[arg(
        help="Directory with JavaScript/TypeScript files containing GraphQL \
             fragments and queries in `graphql`/`gql` tagged templates.",
        long,
    )]
    js_dir: Option<PathBuf>,

    #[arg(
        help="Directory with standalone GraphQL files.",
        long,
    )]
    graphql_dir: Option<PathBuf>,

    #[arg(
        default_value=source_finder::STANDALONE_FILE_EXTENSION,
        help="File extension of the standalone GraphQL files in \
             --graphql-dir.",
        long,
    )]
    graphql_file_ext: String,

    #[arg(
        help="Directory with Relay artifacts (`*.graphql.ts` files).",
        long,
    )]
    relay_dir: Option<PathBuf>,

    #[arg(
        help="Directory to write one `<operationName>.graphql` file per \
             flattened operation to. Flattened operations are printed to \
             stdout when omitted.",
        long,
    )]
    output_dir: Option<PathBuf>,

    #[arg(
        help="Annotate every field with a `@gql_defrag_source` directive \
             recording the fragments and fields it was reached through.",
        long,
    )]
    include_source: bool,

    #[arg(
        default_value_t=DEFAULT_MAX_DEPTH,
        help="Maximum nesting of fragments and fields to resolve before \
             giving up (guards against fragment cycles).",
        long,
    )]
    max_depth: usize,
}
impl DefragCmd {
    fn extract_documents(&self) -> Result<Vec<ExtractedDocument>, SourceFinderError> {
        let mut documents = vec![];
        if let Some(js_dir) = &self.js_dir {
            log::debug!("Scanning {js_dir:?} for tagged templates...");
            documents.extend(source_finder::extract_from_js(js_dir)?);
        }
        if let Some(graphql_dir) = &self.graphql_dir {
            log::debug!("Scanning {graphql_dir:?} for GraphQL files...");
            documents.extend(source_finder::extract_from_standalone_files(
                graphql_dir,
                self.graphql_file_ext.as_str(),
            )?);
        }
        if let Some(relay_dir) = &self.relay_dir {
            log::debug!("Scanning {relay_dir:?} for Relay artifacts...");
            documents.extend(source_finder::extract_from_relay_files(relay_dir)?);
        }
        Ok(documents)
    }
}

#[inherent::inherent]
impl RunnableCommand for DefragCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let documents = match self.extract_documents() {
            Ok(documents) => documents,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} Error collecting GraphQL sources: {e}",
                output_utils::RED_X,
            )),
        };
        log::debug!("Found {} GraphQL documents.", documents.len());

        let mut defragmenter = Defragmenter::with_options(
            DefragmenterOptions::default().with_max_depth(self.max_depth),
        );
        for document in documents {
            if let Err(e) = defragmenter.ingest_str(Some(document.path), &document.text) {
                return CommandResult::stderr(format_args!(
                    "{} Error ingesting GraphQL: {e}",
                    output_utils::RED_X,
                ));
            }
        }
        log::info!(
            "Registered {} operations and {} fragments.",
            defragmenter.registry().num_operations(),
            defragmenter.registry().num_fragments(),
        );

        let mut flattened = vec![];
        for result in defragmenter.par_flatten_all(self.include_source) {
            match result {
                Ok((operation_name, document)) =>
                    flattened.push((operation_name, document.to_string())),
                Err(e) => return CommandResult::stderr(format_args!(
                    "{} Error flattening operations: {e}",
                    output_utils::RED_X,
                )),
            }
        }

        let Some(output_dir) = &self.output_dir else {
            let printed: Vec<String> =
                flattened.into_iter().map(|(_, text)| text).collect();
            return CommandResult::stdout(format_args!("{}", printed.join("\n")));
        };

        if let Err(e) = write_outputs(output_dir, &flattened).await {
            return CommandResult::stderr(format_args!(
                "{} Error writing to {output_dir:?}: {e}",
                output_utils::RED_X,
            ));
        }

        CommandResult::stdout(format_args!(
            "{} Wrote {} flattened operations to {output_dir:?}.",
            output_utils::GREEN_CHECK,
            flattened.len(),
        ))
    }
}

async fn write_outputs(
    output_dir: &Path,
    flattened: &[(&str, String)],
) -> std::io::Result<()> {
    tokio::fs::create_dir_all(output_dir).await?;
    for (operation_name, text) in flattened {
        let file_path = output_dir.join(format!("{operation_name}.graphql"));
        log::trace!("Writing {file_path:?}.");
        tokio::fs::write(&file_path, text).await?;
    }
    Ok(())
}
