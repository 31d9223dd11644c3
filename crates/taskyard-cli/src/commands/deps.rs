//! `tyd deps` — Print the dependencies of one resource.

use clap::Args;
use taskyard_config::Document;

/// Arguments for the `deps` command.
#[derive(Args, Debug)]
pub struct DepsArgs {
    /// Resource name. Defaults to `meta.default`.
    pub name: Option<String>,
}

/// Executes the `deps` command.
///
/// # Errors
///
/// Returns an error if no name is given and the document has no default,
/// or if the resource does not exist.
pub fn execute(document: &Document, args: &DepsArgs) -> anyhow::Result<()> {
    for dependency in dependencies(document, args)? {
        println!("{dependency}");
    }
    Ok(())
}

fn dependencies(document: &Document, args: &DepsArgs) -> anyhow::Result<Vec<String>> {
    let name = args
        .name
        .as_deref()
        .or(document.meta().default.as_deref())
        .ok_or_else(|| anyhow::anyhow!("no resource given and meta.default is not set"))?;
    Ok(document.dependencies(name)?)
}
