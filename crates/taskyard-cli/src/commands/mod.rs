//! CLI command definitions and dispatch.

pub mod deps;
pub mod list;
pub mod validate;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use taskyard_common::constants::DEFAULT_CONFIG_FILE;
use taskyard_common::error::{Result, TaskyardError};
use taskyard_config::{Document, VarEnv};

/// taskyard — declarative container jobs.
#[derive(Parser, Debug)]
#[command(name = "tyd", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to the configuration document.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub file: PathBuf,

    /// Set a variable used for resolution, as KEY=VALUE. Overrides the
    /// process environment.
    #[arg(long = "var", global = true, value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the document and check every reference.
    Validate(validate::ValidateArgs),
    /// Describe every resource after resolving variables.
    List(list::ListArgs),
    /// Print the dependencies of one resource, in order.
    Deps(deps::DepsArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let document = load(&cli.file)?;
    match cli.command {
        Command::Validate(args) => validate::execute(&document, &args),
        Command::List(args) => list::execute(document, &environment(&cli.vars), &args),
        Command::Deps(args) => deps::execute(&document, &args),
    }
}

/// Reads and loads the document at `path`.
pub(crate) fn load(path: &Path) -> Result<Document> {
    tracing::info!(path = %path.display(), "reading document");
    let content = std::fs::read_to_string(path).map_err(|e| TaskyardError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Document::load(&content)
}

/// Builds the resolution environment: process variables, then overrides.
fn environment(vars: &[(String, String)]) -> VarEnv {
    vars.iter()
        .fold(VarEnv::from_process(), |env, (key, value)| {
            env.with_var(key.as_str(), value.as_str())
        })
}

fn parse_var(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got \"{raw}\"")),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parse_var_splits_on_first_equals() {
        assert_eq!(
            parse_var("OPTS=a=b").expect("parse"),
            ("OPTS".to_owned(), "a=b".to_owned())
        );
        assert_eq!(
            parse_var("EMPTY=").expect("parse"),
            ("EMPTY".to_owned(), String::new())
        );
        assert!(parse_var("novalue").is_err());
        assert!(parse_var("=x").is_err());
    }

    #[test]
    fn overrides_win_over_process_environment() {
        let env = environment(&[("PATH".to_owned(), "/override".to_owned())]);
        assert_eq!(env.get("PATH"), Some("/override"));
    }

    #[test]
    fn load_reads_document_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(b"image=b:\n    image: alpine\n")
            .expect("write");
        let document = load(file.path()).expect("load");
        assert_eq!(document.registry().len(), 1);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, TaskyardError::Io { .. }), "got: {err}");
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tyd", "deps", "compile", "--file", "other.yaml", "--var", "A=1",
        ])
        .expect("parse");
        assert_eq!(cli.file, PathBuf::from("other.yaml"));
        assert_eq!(cli.vars, vec![("A".to_owned(), "1".to_owned())]);
        assert!(matches!(cli.command, Command::Deps(_)));
    }
}
