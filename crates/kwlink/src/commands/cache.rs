//! `kwlink cache` subcommand group.

use clap::Subcommand;

use super::context::{CommonArgs, Context};
use crate::error::CliError;
use crate::output::Output;

/// Dictionary cache commands.
#[derive(Subcommand)]
pub(crate) enum CacheCommand {
    /// Drop the cached keyword dictionary.
    Clear,
}

impl CacheCommand {
    pub(crate) fn execute(self, common: &CommonArgs) -> Result<(), CliError> {
        match self {
            Self::Clear => {
                let ctx = Context::load(common)?;
                ctx.invalidating_provider().invalidate();
                Output::new().success(&format!(
                    "Keyword dictionary cache cleared ({})",
                    ctx.config.cache_resolved.dir.display()
                ));
                Ok(())
            }
        }
    }
}
