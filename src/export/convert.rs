//! SVG to EMF conversion through an external program

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

/// Environment variable overriding the Inkscape executable
pub const INKSCAPE_ENV: &str = "FIGURE_TEMPLATE_INKSCAPE";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("converter '{program}' not found")]
    NotFound { program: String },

    #[error("'{program}' failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("failed to run '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Converts an SVG file into a vector format the encoders cannot write
pub trait VectorConverter {
    fn convert(&self, svg: &Path, output: &Path) -> Result<(), ConvertError>;
}

/// Conversion with `inkscape <svg> --export-filename=<output>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inkscape {
    program: String,
}

impl Default for Inkscape {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Inkscape {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `$FIGURE_TEMPLATE_INKSCAPE` if set, else `inkscape`
    pub fn from_env() -> Self {
        match std::env::var(INKSCAPE_ENV) {
            Ok(program) if !program.is_empty() => Self::new(program),
            _ => Self::new("inkscape"),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Find the executable, either as given or on `PATH`
    pub fn locate(&self) -> Option<PathBuf> {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return program.is_file().then(|| program.to_path_buf());
        }
        let paths = std::env::var_os("PATH")?;
        std::env::split_paths(&paths).find_map(|dir| {
            let candidate = dir.join(program);
            if candidate.is_file() {
                return Some(candidate);
            }
            let exe = candidate.with_extension("exe");
            (cfg!(windows) && exe.is_file()).then_some(exe)
        })
    }
}

impl VectorConverter for Inkscape {
    fn convert(&self, svg: &Path, output: &Path) -> Result<(), ConvertError> {
        let executable = self.locate().ok_or_else(|| ConvertError::NotFound {
            program: self.program.clone(),
        })?;
        debug!(program = %executable.display(), input = %svg.display(), "running converter");
        let result = Command::new(&executable)
            .arg(svg)
            .arg(format!("--export-filename={}", output.display()))
            .output()
            .map_err(|source| ConvertError::Io {
                program: self.program.clone(),
                source,
            })?;
        if !result.status.success() {
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        if !output.is_file() {
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                status: result.status.to_string(),
                stderr: format!("no output written to {}", output.display()),
            });
        }
        info!(input = %svg.display(), output = %output.display(), "converted");
        Ok(())
    }
}
