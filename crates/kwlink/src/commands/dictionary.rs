//! `kwlink dictionary` command implementation.

use clap::Args;
use kwlink_engine::{Dictionary, KeywordEntry};

use super::context::{CommonArgs, Context};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the dictionary command.
#[derive(Args)]
pub(crate) struct DictionaryArgs {
    /// Print the dictionary as JSON.
    #[arg(long)]
    json: bool,

    /// Rebuild from the store, ignoring the cache.
    #[arg(long)]
    rebuild: bool,
}

impl DictionaryArgs {
    pub(crate) fn execute(self, common: &CommonArgs) -> Result<(), CliError> {
        let output = Output::new();
        let ctx = Context::load(common)?;
        let provider = ctx.provider();

        let dictionary = if self.rebuild {
            provider.rebuild().unwrap_or_default()
        } else {
            provider.dictionary()
        };

        if self.json {
            output.result_line(&serde_json::to_string_pretty(&dictionary)?)?;
        } else if dictionary.is_empty() {
            output.warning("Keyword dictionary is empty");
        } else {
            print_table(&output, &dictionary)?;
        }
        Ok(())
    }
}

fn print_table(output: &Output, dictionary: &Dictionary) -> Result<(), CliError> {
    let width = dictionary
        .entries()
        .iter()
        .map(|e| e.keyword.chars().count())
        .max()
        .unwrap_or(0);
    for entry in dictionary.entries() {
        output.result_line(&format_entry(entry, width))?;
    }
    Ok(())
}

fn format_entry(entry: &KeywordEntry, width: usize) -> String {
    format!(
        "{:<width$}  -> {} ({})",
        entry.keyword, entry.target_id, entry.target_url
    )
}
