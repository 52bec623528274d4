//! The generator boundary and the built-in manifest generator.
//!
//! A [`Generator`] runs after registration has finished and the registry is
//! sealed. It receives the process arguments untouched and returns the
//! process exit code.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use serde::Serialize;
use thiserror::Error;

use meshbind_core::{FunctionDescriptor, RegistrationError, TypeDescriptor};
use meshbind_registry::Registry;

/// Consumer of a populated registry.
pub trait Generator {
    /// Emit bindings from `registry`. `args` are the process arguments,
    /// program name included.
    fn run(&mut self, registry: &Registry, args: &[String]) -> i32;
}

/// Exit code for a registry that fails validation or a bad command line.
pub const EXIT_INVALID: i32 = 2;
/// Exit code for output failures.
pub const EXIT_OUTPUT: i32 = 1;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("registry failed validation with {} error(s)", .0.len())]
    Invalid(Vec<RegistrationError>),

    #[error("failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write manifest: {0}")]
    Io(#[from] io::Error),
}

impl GeneratorError {
    pub fn exit_code(&self) -> i32 {
        match self {
            GeneratorError::Invalid(_) => EXIT_INVALID,
            GeneratorError::Json(_) | GeneratorError::Io(_) => EXIT_OUTPUT,
        }
    }
}

/// Emit a JSON manifest of every registered type and function
#[derive(Parser, Debug)]
#[command(name = "meshbind", version)]
struct ManifestArgs {
    /// Write the manifest here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Manifest<'a> {
    library: &'static str,
    types: Vec<&'a TypeDescriptor>,
    functions: Vec<&'a FunctionDescriptor>,
}

/// Writes the registry as a JSON document.
#[derive(Debug, Default)]
pub struct ManifestGenerator;

impl ManifestGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Validate `registry` and render it as JSON.
    pub fn render(registry: &Registry, pretty: bool) -> Result<String, GeneratorError> {
        registry.validate().map_err(GeneratorError::Invalid)?;

        let manifest = Manifest {
            library: "pmp",
            types: registry.types().collect(),
            functions: registry.functions().collect(),
        };
        let json = if pretty {
            serde_json::to_string_pretty(&manifest)?
        } else {
            serde_json::to_string(&manifest)?
        };
        Ok(json)
    }

    fn emit(&self, registry: &Registry, args: &ManifestArgs) -> Result<(), GeneratorError> {
        let json = Self::render(registry, args.pretty)?;
        match &args.output {
            Some(path) => {
                let mut file = File::create(path)?;
                writeln!(file, "{json}")?;
                info!("manifest written to {}", path.display());
            }
            None => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{json}")?;
            }
        }
        Ok(())
    }
}

impl Generator for ManifestGenerator {
    #[cfg_attr(feature = "profiling", profiling::function)]
    fn run(&mut self, registry: &Registry, args: &[String]) -> i32 {
        let args = match ManifestArgs::try_parse_from(args) {
            Ok(args) => args,
            Err(err) => {
                // help and version land here too, with exit code 0
                let _ = err.print();
                return err.exit_code();
            }
        };

        match self.emit(registry, &args) {
            Ok(()) => 0,
            Err(err) => {
                if let GeneratorError::Invalid(errors) = &err {
                    for e in errors {
                        error!("{e}");
                    }
                }
                error!("{err}");
                err.exit_code()
            }
        }
    }
}
