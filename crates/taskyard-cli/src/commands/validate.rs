//! `tyd validate` — Load the document and check every reference.

use clap::Args;
use taskyard_config::Document;

use crate::output;

/// Arguments for the `validate` command.
#[derive(Args, Debug)]
pub struct ValidateArgs {}

/// Executes the `validate` command.
///
/// Loading already validated the document; this reports the result.
///
/// # Errors
///
/// Never fails once the document has loaded.
pub fn execute(document: &Document, _args: &ValidateArgs) -> anyhow::Result<()> {
    println!("{}", summary(document));
    Ok(())
}

fn summary(document: &Document) -> String {
    let resources = output::count(document.registry().len(), "resource");
    match &document.meta().project {
        Some(project) => format!("{project}: {resources} validated"),
        None => format!("{resources} validated"),
    }
}
