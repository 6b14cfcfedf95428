//! `kwlink render` command implementation.

use std::path::PathBuf;

use clap::Args;
use kwlink_engine::{CurrentDocument, LinkReport, Linker};
use kwlink_store::{DocumentId, DocumentStore, StoreError};

use super::context::{CommonArgs, Context};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// ID of the document being rendered.
    #[arg(short, long)]
    doc: DocumentId,

    /// Render this file instead of the document's stored content.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Report inserted links on stderr.
    #[arg(long)]
    stats: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self, common: &CommonArgs) -> Result<(), CliError> {
        let output = Output::new();
        let ctx = Context::load(common)?;

        let document = ctx
            .store
            .document(self.doc)?
            .ok_or(StoreError::DocumentNotFound(self.doc))?;
        let content = match &self.input {
            Some(path) => std::fs::read_to_string(path)?,
            None => document.content.clone(),
        };
        let current = CurrentDocument::from(&document);
        if !current.kind.is_linkable() {
            output.warning(&format!(
                "Document {} is not a post or page, content is left unchanged",
                current.id
            ));
        }

        let dictionary = ctx.provider().dictionary();
        let titles = ctx.titles();
        let linker = Linker::new(ctx.config.link_settings(), &titles);
        let report = linker.link_with_report(&content, &dictionary, &current);

        output.result(&report.content)?;
        if self.stats {
            print_stats(&output, &report, dictionary.len());
        }
        Ok(())
    }
}

fn print_stats(output: &Output, report: &LinkReport, dictionary_len: usize) {
    output.heading(&format!(
        "\n{} link(s) inserted ({dictionary_len} keyword(s) in dictionary)",
        report.total()
    ));
    for (target, count) in &report.links {
        output.info(&format!("  -> document {target}: {count}"));
    }
}
