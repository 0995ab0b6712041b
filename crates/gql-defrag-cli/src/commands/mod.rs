mod defrag;

use crate::Cli;
use crate::CommandResult;
use defrag::DefragCmd;

#[derive(Debug, clap::Parser)]
#[command(name = "gql-defrag")]
pub(crate) enum CommandEnum {
    /// Flatten every operation found in the given sources.
    Defrag(Box<DefragCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Defrag(cmd) => cmd.run(cli).await
        }
    }
}
