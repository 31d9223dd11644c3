//! `tyd list` — Describe every resource after resolving variables.

use clap::Args;
use taskyard_config::{Document, Environment};

use crate::output;

/// Arguments for the `list` command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print resources as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `list` command.
///
/// # Errors
///
/// Returns an error if a variable cannot be resolved or JSON output fails.
pub fn execute<E: Environment + ?Sized>(
    document: Document,
    env: &E,
    args: &ListArgs,
) -> anyhow::Result<()> {
    let document = document.resolve(env)?;
    if args.json {
        println!("{}", render_json(&document)?);
    } else {
        print!("{}", render_table(&document));
    }
    Ok(())
}

fn render_table(document: &Document) -> String {
    let rows: Vec<(String, String)> = document
        .registry()
        .iter()
        .map(|(name, resource)| (format!("{}={name}", resource.kind()), resource.to_string()))
        .collect();
    output::format_columns(&rows)
}

fn render_json(document: &Document) -> taskyard_common::error::Result<String> {
    let entries = document
        .registry()
        .iter()
        .map(|(name, resource)| {
            let mut value = serde_json::to_value(resource)?;
            if let Some(fields) = value.as_object_mut() {
                let _ = fields.insert("name".into(), name.into());
            }
            Ok(value)
        })
        .collect::<taskyard_common::error::Result<Vec<_>>>()?;
    Ok(serde_json::to_string_pretty(&entries)?)
}
