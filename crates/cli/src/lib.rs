//! Command line front-end for `oasfix`.
//!
//! Reads a document from a file or stdin, runs the normalization pipeline
//! from `oasfix-core`, and writes the result to a file or stdout.

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use oasfix_core::{OverrideTable, TransformConfig, normalize_text};
use tracing::{info, warn};

mod check;
mod error;
mod location;
mod logging;

pub use check::render_diff;
pub use error::CliError;
pub use location::{Location, STREAM_PLACEHOLDER, read_source, write_sink};
pub use logging::{LOG_ENV, init_tracing};

/// Normalize an OpenAPI document for client code generators.
#[derive(Parser, Debug, Clone)]
#[command(name = "oasfix", version)]
pub struct Cli {
    /// Source document. Defaults to stdin; '-' also means stdin
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Destination. Defaults to stdout; '-' also means stdout
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// YAML/JSON file of extra operation id overrides
    #[arg(long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Start from an empty override table instead of the built-in one
    #[arg(long)]
    pub no_builtin_overrides: bool,

    /// Fail when a parameter reference cannot be resolved
    #[arg(long)]
    pub strict: bool,

    /// Write nothing; exit non-zero and print a diff if INPUT is not normalized
    #[arg(long, conflicts_with = "output")]
    pub check: bool,
}

impl Cli {
    /// Build the pipeline configuration from the override flags.
    pub fn transform_config(&self) -> Result<TransformConfig, CliError> {
        let mut overrides = if self.no_builtin_overrides {
            OverrideTable::new()
        } else {
            OverrideTable::builtin()
        };

        if let Some(path) = &self.overrides {
            let text = fs::read_to_string(path).map_err(|source| CliError::OverridesRead {
                path: path.clone(),
                source,
            })?;
            let extra = OverrideTable::from_yaml_str(&text)?;
            info!(path = %path.display(), entries = extra.len(), "Loaded operation id overrides");
            overrides.merge(extra);
        }

        Ok(TransformConfig {
            overrides,
            ..TransformConfig::default()
        })
    }
}

/// Run one invocation. Nothing is written unless every step succeeds.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let config = cli.transform_config()?;

    let input = Location::from_arg(cli.input.as_deref());
    let source = read_source(&input)?;
    let normalized = normalize_text(&source, &config)?;

    if cli.strict && normalized.report.has_unresolved() {
        let references = normalized
            .report
            .inline
            .unresolved
            .iter()
            .map(|unresolved| {
                format!(
                    "{} {} -> {}",
                    unresolved.method, unresolved.path, unresolved.reference
                )
            })
            .collect();
        return Err(CliError::UnresolvedReferences { references });
    }

    if cli.check {
        return match render_diff(&input.to_string(), &source, &normalized.text) {
            Some(diff) => {
                eprint!("{diff}");
                Err(CliError::NotNormalized { location: input })
            }
            None => {
                info!(%input, "Already normalized");
                Ok(())
            }
        };
    }

    if normalized.report.has_unresolved() {
        warn!(
            count = normalized.report.inline.unresolved.len(),
            "Some parameter references were left unresolved"
        );
    }

    let output = Location::from_arg(cli.output.as_deref());
    write_sink(&output, &normalized.text)
}

/// Parse `args` (program name first), run, and return the process exit code.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            return code;
        }
    };

    init_tracing();

    match run(&cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {err}");
            1
        }
    }
}
