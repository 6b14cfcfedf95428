//! `kwlink keywords` subcommand group.

use clap::{Args, Subcommand};
use kwlink_store::{
    DocumentId, DocumentStore, StoreError, encode_keywords, normalize_keywords, parse_keywords,
};

use super::context::{CommonArgs, Context};
use crate::error::CliError;
use crate::output::Output;

/// Keyword list commands.
#[derive(Subcommand)]
pub(crate) enum KeywordsCommand {
    /// Print a document's keywords, one per line.
    Get(GetArgs),
    /// Replace a document's keywords.
    Set(SetArgs),
}

impl KeywordsCommand {
    pub(crate) fn execute(self, common: &CommonArgs) -> Result<(), CliError> {
        match self {
            Self::Get(args) => args.execute(common),
            Self::Set(args) => args.execute(common),
        }
    }
}

/// Arguments for `keywords get`.
#[derive(Args)]
pub(crate) struct GetArgs {
    /// Document ID.
    #[arg(short, long)]
    doc: DocumentId,
}

impl GetArgs {
    fn execute(self, common: &CommonArgs) -> Result<(), CliError> {
        let output = Output::new();
        let ctx = Context::load(common)?;
        let document = ctx
            .store
            .document(self.doc)?
            .ok_or(StoreError::DocumentNotFound(self.doc))?;

        for keyword in parse_keywords(document.keywords.as_deref().unwrap_or_default()) {
            output.result_line(&keyword)?;
        }
        Ok(())
    }
}

/// Arguments for `keywords set`.
#[derive(Args)]
pub(crate) struct SetArgs {
    /// Document ID.
    #[arg(short, long)]
    doc: DocumentId,

    /// New keyword list. Markup is stripped and whitespace collapsed.
    #[arg(required = true)]
    keywords: Vec<String>,
}

impl SetArgs {
    fn execute(self, common: &CommonArgs) -> Result<(), CliError> {
        let output = Output::new();
        let ctx = Context::load(common)?;

        let keywords = normalize_keywords(&self.keywords);
        if keywords.len() < self.keywords.len() {
            output.warning(&format!(
                "Dropped {} empty or duplicate keyword(s)",
                self.keywords.len() - keywords.len()
            ));
        }
        ctx.store.set_keywords(self.doc, &encode_keywords(&keywords))?;
        ctx.invalidating_provider().invalidate();

        output.success(&format!(
            "Stored {} keyword(s) for document {}",
            keywords.len(),
            self.doc
        ));
        Ok(())
    }
}
